//! Fractal triangle subdivision (Sierpinski gasket rule).

use glam::Vec3;
use rand::Rng;

use crate::GeometryError;
use crate::buffer::{Color, GeometryBuffer, Indexing};

/// Deepest subdivision accepted. Output grows as `3^depth` per face.
pub const MAX_SUBDIVISION_DEPTH: i32 = 8;

/// A triangle as its three corner points.
pub type Triangle = [Vec3; 3];

/// Faces of the 3-sided pyramid surface, apex first.
pub const PYRAMID_FACES: [Triangle; 3] = [
    [
        Vec3::new(0.0, 0.6, 0.0),
        Vec3::new(-0.6, 0.0, 0.4),
        Vec3::new(0.6, 0.0, 0.4),
    ],
    [
        Vec3::new(0.0, 0.6, 0.0),
        Vec3::new(-0.6, 0.0, 0.4),
        Vec3::new(0.0, 0.0, -0.6),
    ],
    [
        Vec3::new(0.0, 0.6, 0.0),
        Vec3::new(0.0, 0.0, -0.6),
        Vec3::new(0.6, 0.0, 0.4),
    ],
];

pub fn midpoint(p: Vec3, q: Vec3) -> Vec3 {
    (p + q) * 0.5
}

/// Number of leaf triangles a single face yields at `depth`.
pub fn leaf_count(depth: u32) -> usize {
    3usize.pow(depth)
}

fn check_depth(depth: i32) -> Result<u32, GeometryError> {
    if depth < 0 {
        return Err(GeometryError::InvalidDepth(depth));
    }
    if depth > MAX_SUBDIVISION_DEPTH {
        return Err(GeometryError::DepthTooLarge {
            depth,
            max: MAX_SUBDIVISION_DEPTH,
        });
    }
    Ok(depth as u32)
}

/// Subdivide triangle `(a, b, c)` `depth` times.
///
/// Each level keeps the three corner sub-triangles `(a, ab, ac)`,
/// `(ab, b, bc)`, `(ac, bc, c)` in that order and drops the centre, so the
/// result holds exactly `3^depth` triangles.
pub fn subdivide(a: Vec3, b: Vec3, c: Vec3, depth: i32) -> Result<Vec<Triangle>, GeometryError> {
    let depth = check_depth(depth)?;
    let mut out = Vec::with_capacity(leaf_count(depth));
    subdivide_into(a, b, c, depth, &mut out);
    Ok(out)
}

/// Depth-first subdivision with an explicit work stack.
///
/// Children are pushed in reverse so they pop in emission order, which keeps
/// the output identical to the recursive definition.
fn subdivide_into(a: Vec3, b: Vec3, c: Vec3, depth: u32, out: &mut Vec<Triangle>) {
    let mut stack: Vec<(Triangle, u32)> = Vec::with_capacity(2 * depth as usize + 1);
    stack.push(([a, b, c], depth));
    while let Some(([a, b, c], level)) = stack.pop() {
        if level == 0 {
            out.push([a, b, c]);
            continue;
        }
        let ab = midpoint(a, b);
        let ac = midpoint(a, c);
        let bc = midpoint(b, c);
        stack.push(([ac, bc, c], level - 1));
        stack.push(([ab, b, bc], level - 1));
        stack.push(([a, ab, ac], level - 1));
    }
}

/// Subdivide every face and pack the result into a non-indexed buffer.
///
/// Faces are processed independently and concatenated in order, giving
/// `faces.len() * 3^depth` triangles. Every leaf triangle gets one color drawn
/// from `rng`, repeated over its three vertices; vertices are never shared.
pub fn subdivided_surface(
    faces: &[Triangle],
    depth: i32,
    rng: &mut impl Rng,
) -> Result<GeometryBuffer, GeometryError> {
    let level = check_depth(depth)?;
    let triangle_total = faces.len() * leaf_count(level);
    let mut triangles = Vec::with_capacity(triangle_total);
    for [a, b, c] in faces {
        subdivide_into(*a, *b, *c, level, &mut triangles);
    }

    let mut positions = Vec::with_capacity(triangle_total * 3);
    let mut colors = Vec::with_capacity(triangle_total * 3);
    for triangle in &triangles {
        let color = random_color(rng);
        for vertex in triangle {
            positions.push(vertex.to_array());
            colors.push(color);
        }
    }
    tracing::debug!(
        faces = faces.len(),
        depth,
        triangles = triangles.len(),
        "generated subdivided surface"
    );
    GeometryBuffer::new(positions, colors, Indexing::Sequential)
}

/// The three-faced fractal pyramid surface.
pub fn fractal_pyramid(depth: i32, rng: &mut impl Rng) -> Result<GeometryBuffer, GeometryError> {
    subdivided_surface(&PYRAMID_FACES, depth, rng)
}

/// Opaque color with uniformly random RGB channels.
pub fn random_color(rng: &mut impl Rng) -> Color {
    [
        rng.gen_range(0.0..1.0),
        rng.gen_range(0.0..1.0),
        rng.gen_range(0.0..1.0),
        1.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn corners() -> (Vec3, Vec3, Vec3) {
        (
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        )
    }

    #[test]
    fn depth_zero_is_input_triangle() {
        let (a, b, c) = corners();
        assert_eq!(subdivide(a, b, c, 0).unwrap(), vec![[a, b, c]]);
    }

    #[test]
    fn depth_one_emits_corner_triangles_in_order() {
        let (a, b, c) = corners();
        let ab = midpoint(a, b);
        let ac = midpoint(a, c);
        let bc = midpoint(b, c);
        assert_eq!(
            subdivide(a, b, c, 1).unwrap(),
            vec![[a, ab, ac], [ab, b, bc], [ac, bc, c]]
        );
    }

    #[test]
    fn triangle_count_is_power_of_three() {
        let (a, b, c) = corners();
        for depth in 0..=6 {
            let tris = subdivide(a, b, c, depth).unwrap();
            assert_eq!(tris.len(), 3usize.pow(depth as u32), "depth {depth}");
        }
    }

    #[test]
    fn vertices_are_dyadic_points_in_hull() {
        // With corners at the unit axes the barycentric weights of b and c are
        // just x and y, so every vertex must sit on the 2^-depth lattice.
        let (a, b, c) = corners();
        let depth = 5;
        let scale = 2f32.powi(depth);
        for tri in subdivide(a, b, c, depth).unwrap() {
            for v in tri {
                assert_eq!(v.z, 0.0);
                assert!(v.x >= 0.0 && v.y >= 0.0 && v.x + v.y <= 1.0 + 1e-6);
                let (sx, sy) = (v.x * scale, v.y * scale);
                assert_eq!(sx, sx.round());
                assert_eq!(sy, sy.round());
            }
        }
    }

    #[test]
    fn midpoint_is_symmetric() {
        let points = [
            Vec3::new(0.1, -2.5, 3.3),
            Vec3::new(-0.6, 0.0, 0.4),
            Vec3::new(1e6, 1e-6, -7.0),
            Vec3::new(0.333, 0.666, 0.999),
        ];
        for p in points {
            for q in points {
                assert_eq!(midpoint(p, q), midpoint(q, p));
            }
        }
    }

    #[test]
    fn negative_depth_rejected() {
        let (a, b, c) = corners();
        assert!(matches!(
            subdivide(a, b, c, -1),
            Err(GeometryError::InvalidDepth(-1))
        ));
    }

    #[test]
    fn excessive_depth_rejected() {
        let (a, b, c) = corners();
        assert!(matches!(
            subdivide(a, b, c, MAX_SUBDIVISION_DEPTH + 1),
            Err(GeometryError::DepthTooLarge { .. })
        ));
    }

    #[test]
    fn pyramid_depth_two_has_81_vertices() {
        let mut rng = StdRng::seed_from_u64(42);
        let buffer = fractal_pyramid(2, &mut rng).unwrap();
        assert_eq!(buffer.vertex_count(), 81);
        assert_eq!(buffer.positions().len() * 3, 243);
        assert_eq!(buffer.colors().len(), 81);
        assert_eq!(buffer.indexing(), &Indexing::Sequential);
        assert_eq!(buffer.index_sequence(), (0..81).collect::<Vec<u32>>());
    }

    #[test]
    fn one_color_per_leaf_triangle() {
        let mut rng = StdRng::seed_from_u64(1);
        let buffer = fractal_pyramid(3, &mut rng).unwrap();
        for tri in buffer.colors().chunks(3) {
            assert_eq!(tri[0], tri[1]);
            assert_eq!(tri[1], tri[2]);
            assert_eq!(tri[0][3], 1.0);
        }
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let first = fractal_pyramid(3, &mut StdRng::seed_from_u64(9)).unwrap();
        let second = fractal_pyramid(3, &mut StdRng::seed_from_u64(9)).unwrap();
        let other = fractal_pyramid(3, &mut StdRng::seed_from_u64(10)).unwrap();
        assert_eq!(first.fingerprint(), second.fingerprint());
        assert_ne!(first.fingerprint(), other.fingerprint());
        assert_eq!(first.positions(), other.positions());
    }

    #[test]
    fn surface_faces_concatenate_in_order() {
        let mut rng = StdRng::seed_from_u64(3);
        let buffer = subdivided_surface(&PYRAMID_FACES, 1, &mut rng).unwrap();
        let [a, b, c] = PYRAMID_FACES[1];
        let second_face = subdivide(a, b, c, 1).unwrap();
        let start = 3 * 3;
        for (i, tri) in second_face.iter().enumerate() {
            for (j, v) in tri.iter().enumerate() {
                assert_eq!(buffer.positions()[start + i * 3 + j], v.to_array());
            }
        }
    }
}
