//! Demo scenes built on the scene graph, the geometry generators and the
//! animation scheduler.
//!
//! Every demo owns one [`SceneContext`]. Input arrives as [`Action`]s between
//! ticks; a demo that needs to react to elapsed time does so in
//! [`Demo::after_tick`].
//!
//! # Invariants
//! - Demos mutate their context only between ticks.
//! - A failed action leaves the scene as it was.

pub mod arm;
pub mod description;
pub mod figures;
pub mod game;
pub mod pyramid;
mod runner;
pub mod solar;

use std::fmt;
use std::str::FromStr;

use kinema_animate::{Clock, ContextError, SceneContext, TickReport};
use kinema_geometry::GeometryError;
use kinema_input::{Action, ScriptError};
use kinema_kernel::SceneError;

pub use runner::{RunOptions, RunSummary, run_headless};

/// Errors from building demos and applying actions.
#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error("unknown joint `{0}`")]
    UnknownJoint(String),
    #[error("unknown demo `{0}`")]
    UnknownDemo(String),
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ContextError> for DemoError {
    fn from(err: ContextError) -> Self {
        match err {
            ContextError::Scene(e) => Self::Scene(e),
            ContextError::Geometry(e) => Self::Geometry(e),
        }
    }
}

/// How a demo treated an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    Handled,
    /// The action does not apply to this demo.
    Ignored,
    /// Scene parameters changed; the tick chain must be restarted.
    Restart,
}

/// One running visualization.
pub trait Demo {
    fn name(&self) -> &str;

    fn context(&self) -> &SceneContext;

    fn context_mut(&mut self) -> &mut SceneContext;

    /// Apply an input action between ticks.
    fn handle(&mut self, action: &Action) -> Result<Response, DemoError> {
        Ok(handle_common(self.context_mut(), action))
    }

    /// Called after every completed tick.
    fn after_tick(&mut self, _report: &TickReport) -> Result<(), DemoError> {
        Ok(())
    }

    /// One-line demo-specific state, if any.
    fn status(&self) -> Option<String> {
        None
    }
}

/// Actions every demo understands: resize, pause toggle and no-op.
pub fn handle_common(ctx: &mut SceneContext, action: &Action) -> Response {
    match action {
        Action::Resize { width, height } => {
            ctx.projection.resize(*width, *height);
            Response::Handled
        }
        Action::ToggleAnimation => {
            ctx.time_scale = if ctx.time_scale == 0.0 { 1.0 } else { 0.0 };
            tracing::info!(time_scale = ctx.time_scale, "toggled animation");
            Response::Handled
        }
        Action::Noop => Response::Handled,
        other => {
            tracing::debug!(?other, "action ignored");
            Response::Ignored
        }
    }
}

/// Parameters shared by the demo builders.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    /// Seed for every random choice a demo makes.
    pub seed: u64,
    /// Initial subdivision depth for the fractal pyramid.
    pub depth: i32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self { seed: 42, depth: 3 }
    }
}

/// The built-in demos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoKind {
    Figures,
    Pyramid,
    Solar,
    Arm,
    Game,
}

impl DemoKind {
    pub const ALL: [DemoKind; 5] = [
        DemoKind::Figures,
        DemoKind::Pyramid,
        DemoKind::Solar,
        DemoKind::Arm,
        DemoKind::Game,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DemoKind::Figures => "figures",
            DemoKind::Pyramid => "pyramid",
            DemoKind::Solar => "solar",
            DemoKind::Arm => "arm",
            DemoKind::Game => "game",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            DemoKind::Figures => "octahedron, dodecahedron and scutoid spinning in place",
            DemoKind::Pyramid => "fractal pyramid with adjustable subdivision depth",
            DemoKind::Solar => "sun, planets, moons and an asteroid belt on stylized orbits",
            DemoKind::Arm => "articulated arm posed through joint angles",
            DemoKind::Game => "drifting cubes to pick before they escape",
        }
    }
}

impl fmt::Display for DemoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DemoKind {
    type Err = DemoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DemoKind::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| DemoError::UnknownDemo(s.to_string()))
    }
}

/// Build a built-in demo around `clock`.
pub fn build_demo(
    kind: DemoKind,
    config: &DemoConfig,
    clock: Box<dyn Clock>,
) -> Result<Box<dyn Demo>, DemoError> {
    let _span = tracing::info_span!("build_demo", demo = kind.name()).entered();
    let demo: Box<dyn Demo> = match kind {
        DemoKind::Figures => Box::new(figures::FiguresDemo::build(clock)?),
        DemoKind::Pyramid => Box::new(pyramid::PyramidDemo::build(config, clock)?),
        DemoKind::Solar => Box::new(solar::SolarDemo::build(config, clock)?),
        DemoKind::Arm => Box::new(arm::ArmDemo::build(clock)?),
        DemoKind::Game => Box::new(game::GameDemo::build(config, clock)?),
    };
    tracing::info!(
        nodes = demo.context().graph.node_count(),
        buffers = demo.context().geometry.len(),
        "demo built"
    );
    Ok(demo)
}

pub fn crate_info() -> &'static str {
    "kinema-scenes v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinema_animate::ManualClock;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("scenes"));
    }

    #[test]
    fn demo_kinds_parse_by_name() {
        for kind in DemoKind::ALL {
            assert_eq!(kind.name().parse::<DemoKind>().unwrap(), kind);
        }
        assert_eq!("SOLAR".parse::<DemoKind>().unwrap(), DemoKind::Solar);
        assert!(matches!(
            "teapot".parse::<DemoKind>(),
            Err(DemoError::UnknownDemo(_))
        ));
    }

    #[test]
    fn common_actions() {
        let mut ctx = SceneContext::new(Box::new(ManualClock::new()));
        assert_eq!(
            handle_common(&mut ctx, &Action::ToggleAnimation),
            Response::Handled
        );
        assert_eq!(ctx.time_scale, 0.0);
        handle_common(&mut ctx, &Action::ToggleAnimation);
        assert_eq!(ctx.time_scale, 1.0);

        handle_common(
            &mut ctx,
            &Action::Resize {
                width: 1000,
                height: 500,
            },
        );
        assert_eq!(ctx.projection.aspect, 2.0);
        assert_eq!(
            handle_common(&mut ctx, &Action::SetDepth(2)),
            Response::Ignored
        );
    }

    #[test]
    fn every_builtin_demo_builds() {
        let config = DemoConfig::default();
        for kind in DemoKind::ALL {
            let demo = build_demo(kind, &config, Box::new(ManualClock::new())).unwrap();
            assert_eq!(demo.name(), kind.name());
            assert!(demo.context().graph.node_count() > 1);
        }
    }
}
