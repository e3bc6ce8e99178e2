//! Scene kernel: the transform hierarchy and the per-tick update rules.
//!
//! # Invariants
//! - The graph is a rooted tree: no cycles, one parent per non-root node.
//! - `world = parent.world * local` for every reachable non-root node, and
//!   `world = local` for the root, after each recompute pass.
//! - Update rules only write the local transform of the node they belong to.
//! - A failed structural operation leaves the graph unchanged.

pub mod graph;
pub mod rule;

use kinema_common::NodeId;

pub use graph::{SceneGraph, Subtree, TransformNode};
pub use rule::{RuleError, RuleState, UpdateRule};

/// Structural errors raised by [`SceneGraph`] operations.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("attaching {child} under {parent} would create a cycle")]
    CycleDetected { parent: NodeId, child: NodeId },
    #[error("no node with id {0}")]
    DanglingReference(NodeId),
    #[error("the root node cannot be attached under another node")]
    RootNotAttachable,
    #[error("the root node cannot be detached")]
    RootNotDetachable,
    #[error("invalid update rule on {node}: {source}")]
    InvalidRule {
        node: NodeId,
        #[source]
        source: RuleError,
    },
}

pub fn crate_info() -> &'static str {
    "kinema-kernel v0.1.0"
}
