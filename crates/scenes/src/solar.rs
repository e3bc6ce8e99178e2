//! Stylized solar system: planets sweep circular orbits, spin about Y, and
//! carry moon groups; an asteroid belt turns slowly between Mars and Jupiter.
//!
//! Orbit periods are relative to Earth's, which completes one orbit in
//! `30000 / π` ms. Spin periods are `20000 ms` times a per-body factor; a
//! negative factor spins the other way.

use std::f32::consts::TAU;
use std::f64::consts::PI;

use glam::Vec3;
use kinema_animate::{Clock, SceneContext};
use kinema_common::{GeometryHandle, NodeId, Transform};
use kinema_geometry::Color;
use kinema_geometry::primitives::uv_sphere;
use kinema_kernel::{TransformNode, UpdateRule};
use kinema_render::Projection;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{Demo, DemoConfig, DemoError};

pub const EARTH_ORBIT_MS: f64 = 30_000.0 / PI;
pub const SPIN_BASE_MS: f64 = 20_000.0;
pub const MOON_GROUP_PERIOD_MS: f64 = 5_000.0;
pub const MOON_SPIN_PERIOD_MS: f64 = 2_000.0;
pub const BELT_PERIOD_MS: f64 = 80_000.0;
/// Camera distance from the sun.
pub const CAMERA_DISTANCE: f32 = 100.0;

pub const BELT_INNER: f32 = 16.0;
pub const BELT_OUTER: f32 = 20.0;
/// Asteroids per belt ring; one ring per asteroid shape.
const BELT_RING_SIZE: usize = 90;
const BELT_RINGS: usize = 4;
const MOON_RADIUS: f32 = 0.1;

/// One body of the system.
#[derive(Debug, Clone, Copy)]
pub struct Body {
    pub name: &'static str,
    /// Orbit radius; zero for the sun.
    pub distance: f32,
    pub radius: f32,
    pub moons: usize,
    /// Orbit speed relative to Earth.
    pub orbit_factor: f64,
    /// Spin period factor; negative spins clockwise seen from above.
    pub spin_factor: f64,
    pub color: Color,
}

const fn body(
    name: &'static str,
    distance: f32,
    radius: f32,
    moons: usize,
    orbit_factor: f64,
    spin_factor: f64,
    color: Color,
) -> Body {
    Body {
        name,
        distance,
        radius,
        moons,
        orbit_factor,
        spin_factor,
        color,
    }
}

pub const BODIES: [Body; 10] = [
    body("sun", 0.0, 4.0, 0, 1.0, -1.5, [1.0, 0.8, 0.2, 1.0]),
    body("mercury", 5.5, 0.75, 0, 4.0, 58.6, [0.6, 0.6, 0.6, 1.0]),
    body("venus", 8.0, 0.9, 0, 1.6, 243.0, [0.9, 0.7, 0.4, 1.0]),
    body("earth", 11.0, 1.0, 1, 1.0, 1.0, [0.2, 0.4, 0.9, 1.0]),
    body("mars", 14.0, 0.8, 2, 0.52, 1.03, [0.8, 0.3, 0.1, 1.0]),
    body("jupiter", 24.0, 2.0, 79, 0.084, 0.41, [0.8, 0.6, 0.4, 1.0]),
    body("saturn", 30.0, 1.75, 82, 0.0345, 0.45, [0.9, 0.8, 0.5, 1.0]),
    body("uranus", 35.0, 1.25, 27, 0.012, 0.72, [0.5, 0.8, 0.9, 1.0]),
    body("neptune", 40.0, 1.25, 14, 0.0061, 0.67, [0.2, 0.3, 0.8, 1.0]),
    body("pluto", 47.0, 0.5, 0, 0.00401, 6.39, [0.7, 0.6, 0.5, 1.0]),
];

impl Body {
    pub fn orbit_period_ms(&self) -> f64 {
        EARTH_ORBIT_MS / self.orbit_factor
    }

    pub fn spin_rule(&self) -> UpdateRule {
        let axis = if self.spin_factor < 0.0 { Vec3::NEG_Y } else { Vec3::Y };
        UpdateRule::spin(axis, SPIN_BASE_MS * self.spin_factor.abs())
    }
}

pub struct SolarDemo {
    ctx: SceneContext,
    /// Orbiting group per body, in [`BODIES`] order.
    pub bodies: Vec<NodeId>,
    pub belt: NodeId,
}

impl SolarDemo {
    pub fn build(config: &DemoConfig, clock: Box<dyn Clock>) -> Result<Self, DemoError> {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut ctx = SceneContext::new(clock)
            .with_projection(Projection::default().with_far(4000.0));
        let root = ctx.graph.root();
        if let Some(local) = ctx.graph.local_mut(root) {
            *local = Transform::from_translation(Vec3::new(0.0, 0.0, -CAMERA_DISTANCE));
        }
        let system = ctx
            .graph
            .insert(root, TransformNode::default().named("system"))?;

        let moon_mesh = ctx
            .geometry
            .insert(uv_sphere(MOON_RADIUS, 10, 10, [0.8, 0.8, 0.8, 1.0])?);
        let asteroid_mesh = ctx
            .geometry
            .insert(uv_sphere(0.15, 6, 4, [0.5, 0.45, 0.4, 1.0])?);

        // Inner planets, then the belt, then the outer planets.
        let (inner, outer) = BODIES.split_at(5);
        let mut bodies = Vec::with_capacity(BODIES.len());
        for body in inner {
            bodies.push(add_body(&mut ctx, system, body, moon_mesh, &mut rng)?);
        }
        let belt = add_belt(&mut ctx, system, asteroid_mesh, &mut rng)?;
        for body in outer {
            bodies.push(add_body(&mut ctx, system, body, moon_mesh, &mut rng)?);
        }

        Ok(Self { ctx, bodies, belt })
    }

    pub fn body(&self, name: &str) -> Option<NodeId> {
        BODIES
            .iter()
            .position(|b| b.name == name)
            .and_then(|i| self.bodies.get(i).copied())
    }
}

/// Orbit group -> (sphere, moon group -> moons).
fn add_body(
    ctx: &mut SceneContext,
    parent: NodeId,
    body: &Body,
    moon_mesh: GeometryHandle,
    rng: &mut StdRng,
) -> Result<NodeId, DemoError> {
    let mut group = TransformNode::new(Transform::from_translation(Vec3::new(
        body.distance,
        0.0,
        0.0,
    )))
    .named(body.name);
    if body.distance > 0.0 {
        group = group.with_rule(UpdateRule::orbit(
            body.distance,
            body.orbit_period_ms(),
            0.0,
        ));
    }
    let group = ctx.graph.insert(parent, group)?;

    ctx.spawn_mesh(
        group,
        TransformNode::default()
            .named(format!("{}_surface", body.name))
            .with_rule(body.spin_rule()),
        uv_sphere(body.radius, 20, 20, body.color)?,
    )?;

    let moons = ctx.graph.insert(
        group,
        TransformNode::default()
            .named(format!("{}_moons", body.name))
            .with_rule(UpdateRule::spin(Vec3::NEG_Y, MOON_GROUP_PERIOD_MS)),
    )?;
    let moon_distance = body.radius * 1.4;
    for i in 0..body.moons {
        let position = random_on_sphere(rng, moon_distance);
        ctx.spawn_instance(
            moons,
            TransformNode::new(Transform::from_translation(position))
                .named(format!("{}_moon_{i}", body.name))
                .with_rule(UpdateRule::spin(Vec3::NEG_Y, MOON_SPIN_PERIOD_MS)),
            moon_mesh,
        )?;
    }
    Ok(group)
}

fn add_belt(
    ctx: &mut SceneContext,
    parent: NodeId,
    asteroid_mesh: GeometryHandle,
    rng: &mut StdRng,
) -> Result<NodeId, DemoError> {
    let belt = ctx.graph.insert(
        parent,
        TransformNode::default()
            .named("asteroids")
            .with_rule(UpdateRule::spin(Vec3::NEG_Y, BELT_PERIOD_MS)),
    )?;
    for ring in 0..BELT_RINGS {
        for i in 0..BELT_RING_SIZE {
            let angle = i as f32 / BELT_RING_SIZE as f32 * TAU;
            let radius = rng.gen_range(BELT_INNER..BELT_OUTER);
            let y = rng.gen_range(-1.0..1.0);
            ctx.spawn_instance(
                belt,
                TransformNode::new(Transform::from_translation(Vec3::new(
                    angle.cos() * radius,
                    y,
                    angle.sin() * radius,
                )))
                .named(format!("asteroid_{ring}_{i}")),
                asteroid_mesh,
            )?;
        }
    }
    Ok(belt)
}

/// Uniformly random point on a sphere of `radius`.
fn random_on_sphere(rng: &mut impl Rng, radius: f32) -> Vec3 {
    let lat = rng.gen_range(0.0..TAU);
    let long = (2.0 * rng.gen_range(0.0f32..1.0) - 1.0).acos();
    Vec3::new(
        radius * lat.cos() * long.cos(),
        radius * lat.cos() * long.sin(),
        radius * lat.sin(),
    )
}

impl Demo for SolarDemo {
    fn name(&self) -> &str {
        "solar"
    }

    fn context(&self) -> &SceneContext {
        &self.ctx
    }

    fn context_mut(&mut self) -> &mut SceneContext {
        &mut self.ctx
    }
}
