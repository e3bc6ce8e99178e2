use std::f64::consts::TAU;

use glam::{Quat, Vec3};
use kinema_common::Transform;
use serde::{Deserialize, Serialize};

/// Per-tick behavior of a node, expressed as data.
///
/// A rule only ever touches the local transform of the node that carries it.
/// Periods are in milliseconds; axes need not be normalized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UpdateRule {
    /// Incremental rotation about `axis`, one full turn per `period_ms`.
    Spin { axis: Vec3, period_ms: f64 },
    /// Absolute placement on a circle of `radius` in the XZ plane.
    Orbit {
        radius: f32,
        period_ms: f64,
        #[serde(default)]
        phase_offset: f64,
    },
    /// Spin about `spin_axis` while bobbing `±step` along `axis`, reversing
    /// direction whenever the tick counter reaches `±limit`.
    BoundedOscillate {
        axis: Vec3,
        limit: i32,
        step: f32,
        spin_axis: Vec3,
        period_ms: f64,
    },
    /// Constant linear motion, `velocity` in units per second.
    Drift { velocity: Vec3 },
}

/// Mutable bookkeeping a rule keeps between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleState {
    /// Accumulated angle in radians.
    pub angle: f64,
    /// Signed oscillation counter.
    pub counter: i32,
    pub rising: bool,
}

impl Default for RuleState {
    fn default() -> Self {
        Self {
            angle: 0.0,
            counter: 0,
            rising: true,
        }
    }
}

/// Why a rule was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuleError {
    #[error("rotation axis must be finite and non-zero, got {0}")]
    DegenerateAxis(Vec3),
    #[error("period must be finite and positive, got {0} ms")]
    InvalidPeriod(f64),
    #[error("oscillation limit must be non-negative, got {0}")]
    NegativeLimit(i32),
    #[error("{0} must be finite")]
    NonFinite(&'static str),
}

fn check_axis(axis: Vec3) -> Result<(), RuleError> {
    if !axis.is_finite() || axis.length_squared() == 0.0 {
        return Err(RuleError::DegenerateAxis(axis));
    }
    Ok(())
}

fn check_period(period_ms: f64) -> Result<(), RuleError> {
    if !period_ms.is_finite() || period_ms <= 0.0 {
        return Err(RuleError::InvalidPeriod(period_ms));
    }
    Ok(())
}

impl UpdateRule {
    pub fn spin(axis: Vec3, period_ms: f64) -> Self {
        Self::Spin { axis, period_ms }
    }

    pub fn orbit(radius: f32, period_ms: f64, phase_offset: f64) -> Self {
        Self::Orbit {
            radius,
            period_ms,
            phase_offset,
        }
    }

    /// Reject rules that would produce non-finite transforms.
    pub fn validate(&self) -> Result<(), RuleError> {
        match *self {
            Self::Spin { axis, period_ms } => {
                check_axis(axis)?;
                check_period(period_ms)
            }
            Self::Orbit {
                radius,
                period_ms,
                phase_offset,
            } => {
                if !radius.is_finite() {
                    return Err(RuleError::NonFinite("orbit radius"));
                }
                if !phase_offset.is_finite() {
                    return Err(RuleError::NonFinite("orbit phase offset"));
                }
                check_period(period_ms)
            }
            Self::BoundedOscillate {
                axis,
                limit,
                step,
                spin_axis,
                period_ms,
            } => {
                if !axis.is_finite() {
                    return Err(RuleError::NonFinite("oscillation axis"));
                }
                if !step.is_finite() {
                    return Err(RuleError::NonFinite("oscillation step"));
                }
                if limit < 0 {
                    return Err(RuleError::NegativeLimit(limit));
                }
                check_axis(spin_axis)?;
                check_period(period_ms)
            }
            Self::Drift { velocity } => {
                if !velocity.is_finite() {
                    return Err(RuleError::NonFinite("drift velocity"));
                }
                Ok(())
            }
        }
    }

    /// Advance the rule by `delta_ms` and write the result into `local`.
    pub fn apply(&self, state: &mut RuleState, local: &mut Transform, delta_ms: f64) {
        match *self {
            Self::Spin { axis, period_ms } => {
                spin(state, local, axis, period_ms, delta_ms);
            }
            Self::Orbit {
                radius,
                period_ms,
                phase_offset,
            } => {
                state.angle += TAU * delta_ms / period_ms;
                let theta = state.angle + phase_offset;
                local.translation.x = (theta.cos() * radius as f64) as f32;
                local.translation.z = (theta.sin() * radius as f64) as f32;
            }
            Self::BoundedOscillate {
                axis,
                limit,
                step,
                spin_axis,
                period_ms,
            } => {
                spin(state, local, spin_axis, period_ms, delta_ms);
                if state.rising && state.counter >= limit {
                    state.rising = false;
                } else if !state.rising && state.counter <= -limit {
                    state.rising = true;
                } else {
                    let sign = if state.rising { 1.0 } else { -1.0 };
                    state.counter += if state.rising { 1 } else { -1 };
                    local.translation += axis * (step * sign);
                }
            }
            Self::Drift { velocity } => {
                local.translation += velocity * (delta_ms / 1000.0) as f32;
            }
        }
    }
}

/// Compose an incremental rotation onto the current orientation.
fn spin(state: &mut RuleState, local: &mut Transform, axis: Vec3, period_ms: f64, delta_ms: f64) {
    let increment = TAU * delta_ms / period_ms;
    state.angle += increment;
    let step = Quat::from_axis_angle(axis.normalize(), increment as f32);
    // Renormalize so repeated products stay a unit quaternion.
    local.rotation = (local.rotation * step).normalize();
}
