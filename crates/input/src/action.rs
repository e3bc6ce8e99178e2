use std::str::FromStr;

use glam::Vec3;
use kinema_common::NodeId;

/// A high-level request produced by UI widgets, pointer hits or the window.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The viewport changed size.
    Resize { width: u32, height: u32 },
    /// Set a named joint's XYZ Euler angles in radians.
    SetJoint { joint: String, angles: Vec3 },
    /// The pointer hit a node.
    Pick(NodeId),
    /// Regenerate procedural geometry at a new subdivision depth.
    SetDepth(i32),
    /// Pause or resume animation.
    ToggleAnimation,
    /// No-op (used for input mapping that hasn't been bound yet).
    Noop,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseActionError {
    #[error("empty action")]
    Empty,
    #[error("unknown action `{0}`")]
    UnknownVerb(String),
    #[error("`{verb}` expects {expected} argument(s), got {got}")]
    WrongArity {
        verb: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("bad number `{0}`")]
    BadNumber(String),
}

fn number<T: FromStr>(text: &str) -> Result<T, ParseActionError> {
    text.parse()
        .map_err(|_| ParseActionError::BadNumber(text.to_string()))
}

fn arity(verb: &'static str, args: &[&str], expected: usize) -> Result<(), ParseActionError> {
    if args.len() != expected {
        return Err(ParseActionError::WrongArity {
            verb,
            expected,
            got: args.len(),
        });
    }
    Ok(())
}

/// Parses the textual form used by input scripts:
/// `resize W H`, `joint NAME X Y Z`, `pick ID`, `depth N`, `toggle`, `noop`.
impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let verb = words.next().ok_or(ParseActionError::Empty)?;
        let args: Vec<&str> = words.collect();
        match verb {
            "resize" => {
                arity("resize", &args, 2)?;
                Ok(Action::Resize {
                    width: number(args[0])?,
                    height: number(args[1])?,
                })
            }
            "joint" => {
                arity("joint", &args, 4)?;
                Ok(Action::SetJoint {
                    joint: args[0].to_string(),
                    angles: Vec3::new(number(args[1])?, number(args[2])?, number(args[3])?),
                })
            }
            "pick" => {
                arity("pick", &args, 1)?;
                let id = args[0].trim_start_matches('#');
                Ok(Action::Pick(NodeId(number(id)?)))
            }
            "depth" => {
                arity("depth", &args, 1)?;
                Ok(Action::SetDepth(number(args[0])?))
            }
            "toggle" => {
                arity("toggle", &args, 0)?;
                Ok(Action::ToggleAnimation)
            }
            "noop" => Ok(Action::Noop),
            other => Err(ParseActionError::UnknownVerb(other.to_string())),
        }
    }
}
