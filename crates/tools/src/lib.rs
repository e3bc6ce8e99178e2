//! Developer tooling: read-only views of a running scene.
//!
//! # Invariants
//! - Tools never mutate the graph or the geometry store.

mod inspector;

pub use inspector::{NodeInfo, SceneInspector, SceneSummary};

pub fn crate_info() -> &'static str {
    "kinema-tools v0.1.0"
}
