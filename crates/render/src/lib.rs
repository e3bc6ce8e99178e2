//! Rendering contract: what a frame hands to a backend.
//!
//! # Invariants
//! - A renderer never mutates the scene; a [`Frame`] only borrows it.
//! - Draw items appear in scene pre-order (parent before child, children in
//!   list order).
//!
//! Window setup and draw-call submission belong to the backend. This crate
//! ships a debug text renderer so the contract can be exercised headlessly.

mod frame;
mod projection;
mod renderer;

pub use frame::{DrawItem, Frame, Primitive};
pub use projection::Projection;
pub use renderer::{DebugTextRenderer, Renderer};

pub fn crate_info() -> &'static str {
    "kinema-render v0.1.0"
}
