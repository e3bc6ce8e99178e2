//! Input layer: sliders, pointer picks and window events mapped to actions.
//!
//! # Invariants
//! - Demos consume [`Action`]s, never raw events.
//! - Actions are applied between ticks, never during one.

pub mod action;
pub mod script;

pub use action::{Action, ParseActionError};
pub use script::{InputScript, ScriptError, ScriptErrorKind};
