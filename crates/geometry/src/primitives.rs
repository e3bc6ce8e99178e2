//! Parametric single-color primitives: boxes and UV spheres.

use std::f32::consts::{PI, TAU};

use crate::GeometryError;
use crate::buffer::{Color, GeometryBuffer, Indexing};

/// Largest vertex count a generated sphere may have. Keeps every index well
/// inside `u32`.
pub const MAX_SPHERE_VERTICES: usize = 1 << 20;

/// Axis-aligned box centred on the origin, four vertices per face.
pub fn cuboid(size: [f32; 3], color: Color) -> Result<GeometryBuffer, GeometryError> {
    if size.iter().any(|s| !s.is_finite() || *s <= 0.0) {
        return Err(GeometryError::InvalidPrimitive(format!(
            "box extents must be positive, got {size:?}"
        )));
    }
    let [hx, hy, hz] = size.map(|s| s * 0.5);
    let positions = vec![
        // +z
        [-hx, -hy, hz],
        [hx, -hy, hz],
        [hx, hy, hz],
        [-hx, hy, hz],
        // -z
        [-hx, -hy, -hz],
        [-hx, hy, -hz],
        [hx, hy, -hz],
        [hx, -hy, -hz],
        // +y
        [-hx, hy, -hz],
        [-hx, hy, hz],
        [hx, hy, hz],
        [hx, hy, -hz],
        // -y
        [-hx, -hy, -hz],
        [hx, -hy, -hz],
        [hx, -hy, hz],
        [-hx, -hy, hz],
        // +x
        [hx, -hy, -hz],
        [hx, hy, -hz],
        [hx, hy, hz],
        [hx, -hy, hz],
        // -x
        [-hx, -hy, -hz],
        [-hx, -hy, hz],
        [-hx, hy, hz],
        [-hx, hy, -hz],
    ];
    let indices = (0..6u32)
        .flat_map(|face| {
            let base = face * 4;
            [base, base + 1, base + 2, base, base + 2, base + 3]
        })
        .collect();
    let colors = vec![color; positions.len()];
    GeometryBuffer::new(positions, colors, Indexing::Indexed(indices))
}

/// Latitude/longitude sphere with `segments` slices and `rings` stacks.
pub fn uv_sphere(
    radius: f32,
    segments: u32,
    rings: u32,
    color: Color,
) -> Result<GeometryBuffer, GeometryError> {
    if !radius.is_finite() || radius <= 0.0 {
        return Err(GeometryError::InvalidPrimitive(format!(
            "sphere radius must be positive, got {radius}"
        )));
    }
    if segments < 3 || rings < 2 {
        return Err(GeometryError::InvalidPrimitive(format!(
            "sphere needs at least 3 segments and 2 rings, got {segments}x{rings}"
        )));
    }

    let vertex_count = (segments as usize + 1)
        .checked_mul(rings as usize + 1)
        .filter(|n| *n <= MAX_SPHERE_VERTICES)
        .ok_or_else(|| {
            GeometryError::InvalidPrimitive(format!(
                "sphere of {segments}x{rings} exceeds {MAX_SPHERE_VERTICES} vertices"
            ))
        })?;

    let mut positions = Vec::with_capacity(vertex_count);
    for ring in 0..=rings {
        let theta = ring as f32 / rings as f32 * PI;
        let (sin_t, cos_t) = theta.sin_cos();
        for seg in 0..=segments {
            let phi = seg as f32 / segments as f32 * TAU;
            let (sin_p, cos_p) = phi.sin_cos();
            positions.push([
                -radius * cos_p * sin_t,
                radius * cos_t,
                radius * sin_p * sin_t,
            ]);
        }
    }

    let stride = segments + 1;
    let mut indices = Vec::with_capacity(segments as usize * rings as usize * 6);
    for ring in 0..rings {
        for seg in 0..segments {
            let a = ring * stride + seg;
            let b = a + stride;
            indices.extend_from_slice(&[a, b, a + 1, b, b + 1, a + 1]);
        }
    }
    let colors = vec![color; positions.len()];
    GeometryBuffer::new(positions, colors, Indexing::Indexed(indices))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREY: Color = [0.8, 0.8, 0.8, 1.0];

    #[test]
    fn cuboid_counts_and_extent() {
        let buffer = cuboid([0.8, 2.0, 0.8], GREY).unwrap();
        assert_eq!(buffer.vertex_count(), 24);
        assert_eq!(buffer.draw_count(), 36);
        let max_y = buffer
            .positions()
            .iter()
            .map(|p| p[1])
            .fold(f32::MIN, f32::max);
        assert_eq!(max_y, 1.0);
    }

    #[test]
    fn cuboid_rejects_flat_box() {
        assert!(matches!(
            cuboid([1.0, 0.0, 1.0], GREY),
            Err(GeometryError::InvalidPrimitive(_))
        ));
    }

    #[test]
    fn sphere_vertices_on_surface() {
        let buffer = uv_sphere(2.0, 20, 20, GREY).unwrap();
        assert_eq!(buffer.vertex_count(), 21 * 21);
        assert_eq!(buffer.draw_count(), 20 * 20 * 6);
        for p in buffer.positions() {
            let len = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
            assert!((len - 2.0).abs() < 1e-4);
        }
    }

    #[test]
    fn sphere_rejects_too_few_segments() {
        assert!(uv_sphere(1.0, 2, 4, GREY).is_err());
        assert!(uv_sphere(-1.0, 8, 8, GREY).is_err());
    }

    #[test]
    fn sphere_rejects_oversized_tessellation() {
        assert!(matches!(
            uv_sphere(1.0, 70_000, 70_000, GREY),
            Err(GeometryError::InvalidPrimitive(_))
        ));
        assert!(matches!(
            uv_sphere(1.0, u32::MAX, u32::MAX, GREY),
            Err(GeometryError::InvalidPrimitive(_))
        ));
        // Just under the cap still builds.
        let buffer = uv_sphere(1.0, 1023, 1023, GREY).unwrap();
        assert_eq!(buffer.vertex_count(), MAX_SPHERE_VERTICES);
    }
}
