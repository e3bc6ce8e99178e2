use std::fmt::Write;

use crate::frame::Frame;

/// Renderer-agnostic interface. All backends implement this trait.
///
/// A renderer consumes a [`Frame`] and produces some output. It only ever
/// sees borrowed scene data.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&mut self, frame: &Frame<'_>) -> Self::Output;
}

/// Produces a human-readable listing of each frame.
///
/// Stands in for a GPU backend in the CLI and in tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    frames: u64,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&mut self, frame: &Frame<'_>) -> String {
        self.frames += 1;
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Frame {} (items={}, triangles={}) ===",
            self.frames,
            frame.len(),
            frame.triangle_count()
        );
        let p = &frame.projection;
        let _ = writeln!(
            out,
            "Projection: fov={:.1}deg aspect={:.3} near={:.1} far={:.1}",
            p.fov_y.to_degrees(),
            p.aspect,
            p.near,
            p.far
        );
        for item in &frame.items {
            let pos = item.world.w_axis;
            let _ = writeln!(
                out,
                "  [{} {}] tris={} pos=({:.2}, {:.2}, {:.2})",
                item.node,
                item.name.unwrap_or("-"),
                item.buffer.triangle_count(),
                pos.x,
                pos.y,
                pos.z
            );
        }
        out
    }
}
