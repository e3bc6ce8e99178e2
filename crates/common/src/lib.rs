//! Shared types used across the kinema workspace.

pub mod types;

pub use types::{GeometryHandle, NodeId, Transform};
