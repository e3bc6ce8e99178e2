//! Per-frame animation driving.
//!
//! The scheduler owns no scene state. Everything a tick touches lives in a
//! [`SceneContext`] passed in explicitly, and frames arrive from a
//! [`FrameHost`] one request at a time.
//!
//! # Invariants
//! - At most one frame request is pending per scheduler.
//! - A request that is not the pending one is ignored.
//! - Each tick runs rules, then recomputes world transforms, then renders.

mod clock;
mod context;
mod host;
mod scheduler;
mod timer;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use context::{ContextError, SceneContext};
pub use host::{FrameHost, FrameRequest, HeadlessHost};
pub use scheduler::{AnimationScheduler, SchedulerConfig, SchedulerState, TickReport};
pub use timer::FrameTimer;

pub fn crate_info() -> &'static str {
    "kinema-animate v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("animate"));
    }
}
