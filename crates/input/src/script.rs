use std::collections::BTreeMap;
use std::str::FromStr;

use crate::action::{Action, ParseActionError};

/// Actions keyed by the tick after which they fire.
///
/// Text form, one action per line: `@TICK ACTION`. Blank lines and lines
/// starting with `#` are skipped.
///
/// ```text
/// # raise the elbow, then pick
/// @10 joint elbow 0.5 0 0
/// @20 pick #4
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputScript {
    actions: BTreeMap<u64, Vec<Action>>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("line {line}: {kind}")]
pub struct ScriptError {
    pub line: usize,
    pub kind: ScriptErrorKind,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScriptErrorKind {
    #[error("expected `@TICK ACTION`")]
    MissingTick,
    #[error("bad tick `{0}`")]
    BadTick(String),
    #[error(transparent)]
    Action(#[from] ParseActionError),
}

impl InputScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tick: u64, action: Action) {
        self.actions.entry(tick).or_default().push(action);
    }

    /// Actions scheduled for `tick`, in script order.
    pub fn at(&self, tick: u64) -> &[Action] {
        self.actions.get(&tick).map_or(&[], Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.actions.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn last_tick(&self) -> Option<u64> {
        self.actions.keys().next_back().copied()
    }
}

impl FromStr for InputScript {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut script = Self::new();
        for (index, raw) in s.lines().enumerate() {
            let line = index + 1;
            let text = raw.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }
            let fail = |kind| ScriptError { line, kind };
            let rest = text
                .strip_prefix('@')
                .ok_or_else(|| fail(ScriptErrorKind::MissingTick))?;
            let (tick, action) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| fail(ScriptErrorKind::MissingTick))?;
            let tick = tick
                .parse()
                .map_err(|_| fail(ScriptErrorKind::BadTick(tick.to_string())))?;
            let action = action
                .parse()
                .map_err(|e| fail(ScriptErrorKind::Action(e)))?;
            script.push(tick, action);
        }
        tracing::debug!(actions = script.len(), "parsed input script");
        Ok(script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinema_common::NodeId;

    #[test]
    fn parses_comments_and_order() {
        let script: InputScript = "# setup\n@3 depth 2\n\n@1 toggle\n@3 pick 7\n"
            .parse()
            .unwrap();
        assert_eq!(script.len(), 3);
        assert_eq!(script.at(1), &[Action::ToggleAnimation]);
        assert_eq!(script.at(3), &[Action::SetDepth(2), Action::Pick(NodeId(7))]);
        assert!(script.at(2).is_empty());
        assert_eq!(script.last_tick(), Some(3));
    }

    #[test]
    fn reports_line_numbers() {
        let err = "@1 toggle\ndepth 3\n".parse::<InputScript>().unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.kind, ScriptErrorKind::MissingTick);

        let err = "@x toggle".parse::<InputScript>().unwrap_err();
        assert!(matches!(err.kind, ScriptErrorKind::BadTick(_)));

        let err = "@1 jump".parse::<InputScript>().unwrap_err();
        assert!(err.to_string().starts_with("line 1:"));
    }
}
