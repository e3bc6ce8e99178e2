//! Pick-and-remove game: coloured cubes drift toward the camera and must be
//! picked before they pass it.
//!
//! A cube that is picked scores a point. A cube that reaches [`ESCAPE_Z`]
//! costs one. Each cube owns its buffer, which is freed with the node.

use glam::Vec3;
use kinema_animate::{Clock, SceneContext, TickReport};
use kinema_common::{NodeId, Transform};
use kinema_geometry::primitives::cuboid;
use kinema_geometry::random_color;
use kinema_input::Action;
use kinema_kernel::{TransformNode, UpdateRule};
use kinema_render::Projection;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{Demo, DemoConfig, DemoError, Response, handle_common};

pub const CUBE_SIZE: f32 = 7.0;
pub const SPAWN_INTERVAL_MS: f64 = 500.0;
pub const SPAWN_Z: f32 = -80.0;
/// Cubes at or past this depth have escaped.
pub const ESCAPE_Z: f32 = 15.0;
pub const DRIFT_SPEED: f32 = 15.0;

pub struct GameDemo {
    ctx: SceneContext,
    rng: StdRng,
    field: NodeId,
    since_spawn_ms: f64,
    score: i64,
    spawned: u64,
}

impl GameDemo {
    pub fn build(config: &DemoConfig, clock: Box<dyn Clock>) -> Result<Self, DemoError> {
        let mut ctx = SceneContext::new(clock)
            .with_projection(Projection::default().with_far(4000.0));
        let root = ctx.graph.root();
        if let Some(local) = ctx.graph.local_mut(root) {
            *local = Transform::from_translation(Vec3::new(0.0, -15.0, -125.0));
        }
        let field = ctx
            .graph
            .insert(root, TransformNode::default().named("field"))?;

        let mut demo = Self {
            ctx,
            rng: StdRng::seed_from_u64(config.seed),
            field,
            since_spawn_ms: 0.0,
            score: 0,
            spawned: 0,
        };
        demo.spawn_cube()?;
        Ok(demo)
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    /// Live cubes, oldest first.
    pub fn cubes(&self) -> &[NodeId] {
        self.ctx.graph.children(self.field)
    }

    pub fn spawn_cube(&mut self) -> Result<NodeId, DemoError> {
        let position = Vec3::new(
            self.rng.gen_range(-40i32..=40) as f32,
            self.rng.gen_range(0i32..=40) as f32,
            SPAWN_Z,
        );
        let color = random_color(&mut self.rng);
        let name = format!("cube_{}", self.spawned);
        let id = self.ctx.spawn_mesh(
            self.field,
            TransformNode::new(Transform::from_translation(position))
                .named(name)
                .with_rule(UpdateRule::Drift {
                    velocity: Vec3::new(0.0, 0.0, DRIFT_SPEED),
                }),
            cuboid([CUBE_SIZE; 3], color)?,
        )?;
        self.spawned += 1;
        tracing::debug!(cube = %id, ?position, "spawned cube");
        Ok(id)
    }

    /// Detach `id` and free its buffer.
    fn remove_cube(&mut self, id: NodeId) -> Result<(), DemoError> {
        let removed = self.ctx.graph.detach(id)?;
        for (_, node) in removed.iter() {
            if let Some(handle) = node.geometry {
                self.ctx.geometry.remove(handle);
            }
        }
        Ok(())
    }

    /// Remove a picked cube. Returns false for anything that is not a live cube.
    pub fn pick(&mut self, id: NodeId) -> Result<bool, DemoError> {
        if !self.cubes().contains(&id) {
            return Ok(false);
        }
        self.remove_cube(id)?;
        self.score += 1;
        tracing::info!(cube = %id, score = self.score, "cube picked");
        Ok(true)
    }
}

impl Demo for GameDemo {
    fn name(&self) -> &str {
        "game"
    }

    fn context(&self) -> &SceneContext {
        &self.ctx
    }

    fn context_mut(&mut self) -> &mut SceneContext {
        &mut self.ctx
    }

    fn handle(&mut self, action: &Action) -> Result<Response, DemoError> {
        match action {
            Action::Pick(id) => Ok(if self.pick(*id)? {
                Response::Handled
            } else {
                Response::Ignored
            }),
            other => Ok(handle_common(&mut self.ctx, other)),
        }
    }

    fn after_tick(&mut self, report: &TickReport) -> Result<(), DemoError> {
        let escaped: Vec<NodeId> = self
            .cubes()
            .iter()
            .copied()
            .filter(|id| {
                self.ctx
                    .graph
                    .get(*id)
                    .is_some_and(|node| node.local.translation.z >= ESCAPE_Z)
            })
            .collect();
        for id in escaped {
            self.remove_cube(id)?;
            self.score -= 1;
            tracing::info!(cube = %id, score = self.score, "cube escaped");
        }

        self.since_spawn_ms += report.delta_ms;
        while self.since_spawn_ms >= SPAWN_INTERVAL_MS {
            self.since_spawn_ms -= SPAWN_INTERVAL_MS;
            self.spawn_cube()?;
        }
        Ok(())
    }

    fn status(&self) -> Option<String> {
        Some(format!("score={} cubes={}", self.score, self.cubes().len()))
    }
}
