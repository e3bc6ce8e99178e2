use std::f32::consts::FRAC_PI_4;

use glam::Mat4;
use serde::{Deserialize, Serialize};

/// Perspective camera parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y: FRAC_PI_4,
            aspect: 4.0 / 3.0,
            near: 1.0,
            far: 100.0,
        }
    }
}

impl Projection {
    pub fn new(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov_y,
            aspect,
            near,
            far,
        }
    }

    pub fn with_far(mut self, far: f32) -> Self {
        self.far = far;
        self
    }

    /// Right-handed, OpenGL depth range.
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y, self.aspect, self.near, self.far)
    }

    /// Update the aspect ratio for a new viewport size.
    ///
    /// A zero-sized viewport (minimized window) is ignored and returns `false`.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            tracing::debug!(width, height, "ignoring degenerate viewport");
            return false;
        }
        self.aspect = width as f32 / height as f32;
        true
    }
}
