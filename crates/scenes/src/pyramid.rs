//! The fractal pyramid: a three-faced surface subdivided to a chosen depth,
//! spinning about Y. Changing the depth regenerates the buffer wholesale.

use std::f32::consts::FRAC_PI_8;

use glam::{Quat, Vec3};
use kinema_animate::{Clock, SceneContext};
use kinema_common::{GeometryHandle, NodeId, Transform};
use kinema_geometry::fractal_pyramid;
use kinema_input::Action;
use kinema_kernel::{TransformNode, UpdateRule};
use kinema_render::Projection;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::{Demo, DemoConfig, DemoError, Response, handle_common};

pub const SPIN_PERIOD_MS: f64 = 10_000.0;

pub struct PyramidDemo {
    ctx: SceneContext,
    rng: StdRng,
    depth: i32,
    handle: GeometryHandle,
    pub pyramid: NodeId,
}

impl PyramidDemo {
    pub fn build(config: &DemoConfig, clock: Box<dyn Clock>) -> Result<Self, DemoError> {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let buffer = fractal_pyramid(config.depth, &mut rng)?;

        let mut ctx = SceneContext::new(clock).with_projection(Projection::default());
        let handle = ctx.geometry.insert(buffer);
        let pyramid = ctx.spawn_instance(
            ctx.graph.root(),
            TransformNode::new(
                Transform::from_translation(Vec3::new(0.0, 0.0, -2.0))
                    .with_rotation(Quat::from_rotation_x(FRAC_PI_8)),
            )
            .named("pyramid")
            .with_rule(UpdateRule::spin(Vec3::Y, SPIN_PERIOD_MS)),
            handle,
        )?;

        Ok(Self {
            ctx,
            rng,
            depth: config.depth,
            handle,
            pyramid,
        })
    }

    pub fn depth(&self) -> i32 {
        self.depth
    }

    pub fn geometry(&self) -> GeometryHandle {
        self.handle
    }

    /// Regenerate the surface at `depth` and swap it in.
    ///
    /// On error the previous buffer stays bound.
    pub fn set_depth(&mut self, depth: i32) -> Result<(), DemoError> {
        let buffer = fractal_pyramid(depth, &mut self.rng)?;
        let vertices = buffer.vertex_count();
        self.ctx.geometry.replace(self.handle, buffer)?;
        self.depth = depth;
        tracing::info!(depth, vertices, "regenerated pyramid");
        Ok(())
    }
}

impl Demo for PyramidDemo {
    fn name(&self) -> &str {
        "pyramid"
    }

    fn context(&self) -> &SceneContext {
        &self.ctx
    }

    fn context_mut(&mut self) -> &mut SceneContext {
        &mut self.ctx
    }

    fn handle(&mut self, action: &Action) -> Result<Response, DemoError> {
        match action {
            Action::SetDepth(depth) => {
                self.set_depth(*depth)?;
                Ok(Response::Restart)
            }
            other => Ok(handle_common(&mut self.ctx, other)),
        }
    }

    fn status(&self) -> Option<String> {
        Some(format!("depth={}", self.depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinema_animate::ManualClock;
    use kinema_geometry::GeometryError;

    fn demo(depth: i32) -> PyramidDemo {
        let config = DemoConfig { seed: 7, depth };
        PyramidDemo::build(&config, Box::new(ManualClock::new())).unwrap()
    }

    fn vertices(demo: &PyramidDemo) -> usize {
        demo.context()
            .geometry
            .get(demo.geometry())
            .map(|b| b.vertex_count())
            .unwrap_or(0)
    }

    #[test]
    fn depth_two_has_81_vertices() {
        let demo = demo(2);
        assert_eq!(vertices(&demo), 81);
        assert_eq!(demo.status().as_deref(), Some("depth=2"));
    }

    #[test]
    fn set_depth_swaps_buffer_and_requests_restart() {
        let mut demo = demo(1);
        assert_eq!(vertices(&demo), 27);
        let response = demo.handle(&Action::SetDepth(3)).unwrap();
        assert_eq!(response, Response::Restart);
        assert_eq!(demo.depth(), 3);
        assert_eq!(vertices(&demo), 3 * 27 * 3);
        assert_eq!(demo.context().geometry.len(), 1);
    }

    #[test]
    fn invalid_depth_keeps_previous_buffer() {
        let mut demo = demo(2);
        let err = demo.handle(&Action::SetDepth(-1)).unwrap_err();
        assert!(matches!(
            err,
            DemoError::Geometry(GeometryError::InvalidDepth(-1))
        ));
        assert_eq!(demo.depth(), 2);
        assert_eq!(vertices(&demo), 81);
    }

    #[test]
    fn same_seed_same_colors() {
        let a = demo(2);
        let b = demo(2);
        let fa = a.context().geometry.get(a.geometry()).unwrap().fingerprint();
        let fb = b.context().geometry.get(b.geometry()).unwrap().fingerprint();
        assert_eq!(fa, fb);
    }
}
