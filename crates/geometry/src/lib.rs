//! Geometry generation and storage.
//!
//! Buffers are produced once (fractal subdivision, constant polyhedron tables,
//! parametric primitives), validated on construction, and stored behind
//! handles. The renderer consumes them by handle, never by mutation.
//!
//! # Invariants
//! - `colors.len() == positions.len()` for every buffer.
//! - Every index addresses an existing vertex.
//! - A buffer is immutable once built; regeneration replaces it wholesale.

mod buffer;
pub mod polyhedra;
pub mod primitives;
mod store;
pub mod subdivide;

use kinema_common::GeometryHandle;

pub use buffer::{Color, GeometryBuffer, Indexing};
pub use store::GeometryStore;
pub use subdivide::{
    MAX_SUBDIVISION_DEPTH, Triangle, fractal_pyramid, midpoint, random_color, subdivide,
};

/// Errors from geometry generation and validation.
#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    #[error("subdivision depth must be non-negative, got {0}")]
    InvalidDepth(i32),
    #[error("subdivision depth {depth} exceeds the maximum of {max}")]
    DepthTooLarge { depth: i32, max: i32 },
    #[error("geometry buffer size mismatch: {positions} positions but {colors} colors")]
    SizeMismatch { positions: usize, colors: usize },
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
    #[error("draw count {count} is not a whole number of triangles")]
    IncompleteTriangle { count: usize },
    #[error("invalid primitive: {0}")]
    InvalidPrimitive(String),
    #[error("unknown geometry handle {0:?}")]
    UnknownHandle(GeometryHandle),
}

pub fn crate_info() -> &'static str {
    "kinema-geometry v0.1.0"
}
