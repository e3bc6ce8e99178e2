//! Three constant solids spinning about a tilted axis; the octahedron also
//! bobs up and down.

use glam::Vec3;
use kinema_animate::{Clock, SceneContext};
use kinema_common::{NodeId, Transform};
use kinema_geometry::polyhedra::{dodecahedron, octahedron, scutoid};
use kinema_kernel::{TransformNode, UpdateRule};
use kinema_render::Projection;

use crate::{Demo, DemoError};

pub const SPIN_PERIOD_MS: f64 = 10_000.0;
pub const SPIN_AXIS: Vec3 = Vec3::new(1.0, 1.0, 0.2);
/// Camera sits at +5 on Z; the root carries the inverse.
pub const CAMERA_OFFSET: Vec3 = Vec3::new(0.0, 0.0, -5.0);

pub struct FiguresDemo {
    ctx: SceneContext,
    pub octahedron: NodeId,
    pub dodecahedron: NodeId,
    pub scutoid: NodeId,
}

impl FiguresDemo {
    pub fn build(clock: Box<dyn Clock>) -> Result<Self, DemoError> {
        let mut ctx = SceneContext::new(clock).with_projection(Projection::default());
        let root = ctx.graph.root();
        if let Some(local) = ctx.graph.local_mut(root) {
            *local = Transform::from_translation(CAMERA_OFFSET);
        }

        let spin = UpdateRule::spin(SPIN_AXIS, SPIN_PERIOD_MS);
        let octahedron = ctx.spawn_mesh(
            root,
            TransformNode::new(Transform::from_translation(Vec3::new(-2.0, 1.5, -2.0)))
                .named("octahedron")
                .with_rule(UpdateRule::BoundedOscillate {
                    axis: Vec3::Y,
                    limit: 200,
                    step: 0.01,
                    spin_axis: SPIN_AXIS,
                    period_ms: SPIN_PERIOD_MS,
                }),
            octahedron()?,
        )?;
        let dodecahedron = ctx.spawn_mesh(
            root,
            TransformNode::new(Transform::from_translation(Vec3::new(-2.0, -1.5, -2.0)))
                .named("dodecahedron")
                .with_rule(spin),
            dodecahedron()?,
        )?;
        let scutoid = ctx.spawn_mesh(
            root,
            TransformNode::new(Transform::from_translation(Vec3::new(2.0, -1.5, -2.0)))
                .named("scutoid")
                .with_rule(spin),
            scutoid()?,
        )?;

        Ok(Self {
            ctx,
            octahedron,
            dodecahedron,
            scutoid,
        })
    }
}

impl Demo for FiguresDemo {
    fn name(&self) -> &str {
        "figures"
    }

    fn context(&self) -> &SceneContext {
        &self.ctx
    }

    fn context_mut(&mut self) -> &mut SceneContext {
        &mut self.ctx
    }
}
