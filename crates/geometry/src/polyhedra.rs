//! Constant polyhedron tables.
//!
//! Each solid is a position table, a per-face color table with a matching
//! per-face vertex count, and a triangle index table. Face colors are expanded
//! to per-vertex colors and the result is finalized like any other buffer.

use crate::GeometryError;
use crate::buffer::{Color, GeometryBuffer, Indexing};

/// A constant solid description.
#[derive(Debug, Clone, Copy)]
pub struct PolyhedronTable {
    pub name: &'static str,
    pub positions: &'static [[f32; 3]],
    pub face_colors: &'static [Color],
    pub face_vertex_counts: &'static [usize],
    pub indices: &'static [u32],
}

impl PolyhedronTable {
    /// Expand face colors and finalize into a buffer.
    pub fn build(&self) -> Result<GeometryBuffer, GeometryError> {
        let colors: Vec<Color> = self
            .face_colors
            .iter()
            .zip(self.face_vertex_counts)
            .flat_map(|(color, &count)| std::iter::repeat_n(*color, count))
            .collect();
        GeometryBuffer::new(
            self.positions.to_vec(),
            colors,
            Indexing::Indexed(self.indices.to_vec()),
        )
    }
}

pub const OCTAHEDRON: PolyhedronTable = PolyhedronTable {
    name: "octahedron",
    positions: &[
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
        [-1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [-1.0, 0.0, 0.0],
        [0.0, 0.0, -1.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, -1.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0],
        [0.0, -1.0, 0.0],
        [0.0, 0.0, 1.0],
        [-1.0, 0.0, 0.0],
        [0.0, -1.0, 0.0],
        [-1.0, 0.0, 0.0],
        [0.0, 0.0, -1.0],
        [0.0, -1.0, 0.0],
        [0.0, 0.0, -1.0],
        [1.0, 0.0, 0.0],
        [0.0, -1.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0],
    ],
    face_colors: &[
        [1.0, 0.0, 0.0, 1.0],
        [0.0, 1.0, 0.0, 1.0],
        [0.0, 0.0, 1.0, 1.0],
        [1.0, 1.0, 0.0, 1.0],
        [1.0, 0.0, 1.0, 1.0],
        [0.0, 1.0, 1.0, 1.0],
        [1.0, 0.0, 1.0, 1.0],
        [0.0, 1.0, 1.0, 1.0],
    ],
    face_vertex_counts: &[3, 3, 3, 3, 3, 3, 3, 3],
    indices: &[
        0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23,
    ],
};

pub const DODECAHEDRON: PolyhedronTable = PolyhedronTable {
    name: "dodecahedron",
    positions: &[
        [0.00, 0.16, 0.41],
        [0.25, 0.25, 0.25],
        [0.16, 0.41, 0.00],
        [-0.16, 0.41, 0.00],
        [-0.25, 0.25, 0.25],
        [0.25, 0.25, 0.25],
        [0.41, 0.00, 0.16],
        [0.41, 0.00, -0.16],
        [0.25, 0.25, -0.25],
        [0.16, 0.41, 0.00],
        [0.41, 0.00, -0.16],
        [0.25, -0.25, -0.25],
        [0.00, -0.16, -0.41],
        [0.00, 0.16, -0.41],
        [0.25, 0.25, -0.25],
        [0.00, -0.16, -0.41],
        [-0.25, -0.25, -0.25],
        [-0.41, 0.00, -0.16],
        [-0.25, 0.25, -0.25],
        [0.00, 0.16, -0.41],
        [-0.25, -0.25, -0.25],
        [-0.16, -0.41, 0.00],
        [-0.25, -0.25, 0.25],
        [-0.41, 0.00, 0.16],
        [-0.41, 0.00, -0.16],
        [-0.25, 0.25, -0.25],
        [-0.41, 0.00, -0.16],
        [-0.41, 0.00, 0.16],
        [-0.25, 0.25, 0.25],
        [-0.16, 0.41, 0.00],
        [-0.41, 0.00, 0.16],
        [-0.25, -0.25, 0.25],
        [0.00, -0.16, 0.41],
        [0.00, 0.16, 0.41],
        [-0.25, 0.25, 0.25],
        [0.25, -0.25, -0.25],
        [0.16, -0.41, 0.00],
        [-0.16, -0.41, 0.00],
        [-0.25, -0.25, -0.25],
        [0.00, -0.16, -0.41],
        [0.00, 0.16, 0.41],
        [0.00, -0.16, 0.41],
        [0.25, -0.25, 0.25],
        [0.41, 0.00, 0.16],
        [0.25, 0.25, 0.25],
        [0.41, 0.00, 0.16],
        [0.25, -0.25, 0.25],
        [0.16, -0.41, 0.00],
        [0.25, -0.25, -0.25],
        [0.41, 0.00, -0.16],
        [0.25, 0.25, -0.25],
        [0.00, 0.16, -0.41],
        [-0.25, 0.25, -0.25],
        [-0.16, 0.41, 0.00],
        [0.16, 0.41, 0.00],
        [-0.25, -0.25, 0.25],
        [-0.16, -0.41, 0.00],
        [0.16, -0.41, 0.00],
        [0.25, -0.25, 0.25],
        [0.00, -0.16, 0.41],
    ],
    face_colors: &[
        [1.0, 1.0, 1.0, 1.0],
        [0.0, 1.0, 1.0, 1.0],
        [0.9, 0.9, 0.9, 1.0],
        [0.0, 0.75, 1.0, 1.0],
        [1.0, 0.0, 1.0, 1.0],
        [0.25, 1.0, 0.0, 1.0],
        [0.0, 1.0, 0.5, 1.0],
        [1.0, 0.5, 0.25, 1.0],
        [0.5, 1.0, 1.0, 1.0],
        [1.0, 0.5, 0.0, 1.0],
        [1.0, 0.5, 1.0, 1.0],
        [0.5, 0.75, 0.5, 1.0],
    ],
    face_vertex_counts: &[5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5],
    indices: &[
        0, 1, 2, 0, 2, 3, 0, 3, 4, //
        5, 6, 7, 5, 7, 8, 5, 8, 9, //
        10, 11, 12, 10, 12, 13, 10, 13, 14, //
        15, 16, 17, 15, 17, 18, 15, 18, 19, //
        20, 21, 22, 20, 22, 23, 20, 23, 24, //
        25, 26, 27, 25, 27, 28, 25, 28, 29, //
        30, 31, 32, 30, 32, 33, 30, 33, 34, //
        35, 36, 37, 35, 37, 38, 35, 38, 39, //
        40, 41, 42, 40, 42, 43, 40, 43, 44, //
        45, 46, 47, 45, 47, 48, 45, 48, 49, //
        50, 51, 52, 50, 52, 53, 50, 53, 54, //
        55, 56, 57, 55, 57, 58, 55, 58, 59,
    ],
};

/// Non-convex scutoid: a pentagonal end, a hexagonal end and a triangular
/// apex region joining them.
pub const SCUTOID: PolyhedronTable = PolyhedronTable {
    name: "scutoid",
    positions: &[
        // pentagon end
        [1.00, 1.00, 0.00],
        [1.00, 0.62, 0.70],
        [1.00, 0.00, 0.50],
        [1.00, 0.00, -0.50],
        [1.00, 0.62, -0.70],
        // bottom
        [1.00, 0.00, 0.50],
        [-1.00, 0.00, 0.50],
        [1.00, 0.00, -0.50],
        [-1.00, 0.00, -0.50],
        // back lower side
        [1.00, 0.62, -0.70],
        [1.00, 0.00, -0.50],
        [-1.00, 0.62, -0.70],
        [-1.00, 0.00, -0.50],
        // front lower side
        [1.00, 0.62, 0.70],
        [1.00, 0.00, 0.50],
        [-1.00, 0.62, 0.70],
        [-1.00, 0.00, 0.50],
        // front upper side
        [1.00, 1.00, 0.00],
        [1.00, 0.62, 0.70],
        [-1.00, 0.62, 0.70],
        [-0.40, 1.40, 0.00],
        // back upper side
        [1.00, 1.00, 0.00],
        [1.00, 0.62, -0.70],
        [-1.00, 0.62, -0.70],
        [-0.40, 1.40, 0.00],
        // hexagon end, fanned around its centre
        [-1.00, 0.50, 0.00],
        [-1.00, 1.00, 0.50],
        [-1.00, 0.62, 0.70],
        [-1.00, 0.00, 0.50],
        [-1.00, 0.00, -0.50],
        [-1.00, 0.62, -0.70],
        [-1.00, 1.00, -0.50],
        // apex triangles
        [-0.40, 1.40, 0.00],
        [-1.00, 1.00, 0.50],
        [-1.00, 1.00, -0.50],
        [-0.40, 1.40, 0.00],
        [-1.00, 1.00, 0.50],
        [-1.00, 0.62, 0.70],
        [-0.40, 1.40, 0.00],
        [-1.00, 1.00, -0.50],
        [-1.00, 0.62, -0.70],
    ],
    face_colors: &[
        [1.0, 0.0, 0.0, 1.0],
        [0.0, 1.0, 0.0, 1.0],
        [0.0, 0.0, 1.0, 1.0],
        [1.0, 1.0, 0.0, 1.0],
        [1.0, 0.0, 1.0, 1.0],
        [0.0, 1.0, 1.0, 1.0],
        [1.0, 0.5, 0.0, 1.0],
        [0.5, 0.0, 1.0, 1.0],
        [1.0, 0.0, 1.0, 1.0],
        [0.0, 1.0, 1.0, 1.0],
    ],
    face_vertex_counts: &[5, 4, 4, 4, 4, 4, 7, 3, 3, 3],
    indices: &[
        0, 1, 2, 0, 2, 3, 0, 3, 4, //
        5, 6, 7, 6, 7, 8, //
        9, 12, 10, 11, 9, 12, //
        13, 15, 14, 16, 15, 14, //
        17, 19, 18, 20, 17, 19, //
        21, 23, 22, 24, 21, 23, //
        26, 25, 27, 27, 25, 28, 28, 25, 29, 29, 25, 30, 30, 25, 31, 31, 25, 26, //
        32, 33, 34, //
        35, 36, 37, //
        38, 39, 40,
    ],
};

pub fn octahedron() -> Result<GeometryBuffer, GeometryError> {
    OCTAHEDRON.build()
}

pub fn dodecahedron() -> Result<GeometryBuffer, GeometryError> {
    DODECAHEDRON.build()
}

pub fn scutoid() -> Result<GeometryBuffer, GeometryError> {
    SCUTOID.build()
}
