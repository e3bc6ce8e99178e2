use std::time::Duration;

use kinema_animate::{AnimationScheduler, HeadlessHost, ManualClock, SchedulerConfig, TickReport};
use kinema_input::{Action, InputScript};
use kinema_render::Renderer;

use crate::{Demo, DemoError, Response};

/// How a headless run advances time.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub ticks: u64,
    /// Manual clock advance per tick.
    pub dt_ms: f64,
    pub scheduler: SchedulerConfig,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            ticks: 60,
            dt_ms: 1000.0 / 60.0,
            scheduler: SchedulerConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    /// Rule applications summed over all ticks.
    pub rules_applied: usize,
    pub restarts: u64,
    /// Actions the demo returned an error for.
    pub rejected_actions: u64,
    pub last_draw_items: usize,
    /// Sum of the deltas handed to the rules.
    pub sim_time_ms: f64,
    pub avg_tick: Duration,
    pub status: Option<String>,
}

/// Drive `demo` for `options.ticks` frames on a manual clock.
///
/// Script actions keyed `@0` fire before the first tick; actions keyed `@n`
/// fire right after tick `n`. A rejected action is logged and skipped.
pub fn run_headless<R: Renderer>(
    demo: &mut dyn Demo,
    clock: &ManualClock,
    renderer: &mut R,
    options: &RunOptions,
    script: &InputScript,
    mut on_tick: impl FnMut(&TickReport, R::Output),
) -> Result<RunSummary, DemoError> {
    let _span = tracing::info_span!("run", demo = demo.name(), ticks = options.ticks).entered();
    let mut host = HeadlessHost::new();
    let mut scheduler = AnimationScheduler::new(options.scheduler.clone());
    let mut summary = RunSummary {
        ticks: 0,
        rules_applied: 0,
        restarts: 0,
        rejected_actions: 0,
        last_draw_items: 0,
        sim_time_ms: 0.0,
        avg_tick: Duration::ZERO,
        status: None,
    };

    scheduler.start(demo.context(), &mut host);
    apply_actions(demo, script.at(0), &mut scheduler, &mut host, &mut summary);

    while summary.ticks < options.ticks {
        clock.advance(options.dt_ms);
        let due = host.take_pending();
        if due.is_empty() {
            tracing::warn!("no frame pending; stopping early");
            break;
        }
        for request in due {
            let Some((report, output)) =
                scheduler.on_frame(request, demo.context_mut(), renderer, &mut host)
            else {
                continue;
            };
            demo.after_tick(&report)?;
            summary.ticks = report.tick;
            summary.rules_applied += report.rules_applied;
            summary.last_draw_items = report.draw_items;
            summary.sim_time_ms += report.delta_ms;
            on_tick(&report, output);
        }
        apply_actions(demo, script.at(summary.ticks), &mut scheduler, &mut host, &mut summary);
    }

    scheduler.stop(&mut host);
    summary.avg_tick = scheduler.timer().average();
    summary.status = demo.status();
    tracing::info!(
        ticks = summary.ticks,
        rules_applied = summary.rules_applied,
        restarts = summary.restarts,
        "run finished"
    );
    Ok(summary)
}

fn apply_actions(
    demo: &mut dyn Demo,
    actions: &[Action],
    scheduler: &mut AnimationScheduler,
    host: &mut HeadlessHost,
    summary: &mut RunSummary,
) {
    for action in actions {
        match demo.handle(action) {
            Ok(Response::Restart) => {
                scheduler.start(demo.context(), host);
                summary.restarts += 1;
            }
            Ok(Response::Handled) => tracing::debug!(?action, "action handled"),
            Ok(Response::Ignored) => tracing::debug!(?action, "action ignored"),
            Err(err) => {
                tracing::warn!(?action, error = %err, "action rejected");
                summary.rejected_actions += 1;
            }
        }
    }
}
