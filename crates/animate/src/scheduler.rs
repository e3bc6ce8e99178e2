use std::time::{Duration, Instant};

use kinema_render::Renderer;

use crate::context::SceneContext;
use crate::host::{FrameHost, FrameRequest};
use crate::timer::FrameTimer;

/// Scheduler tuning.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Upper bound on a single tick's delta in milliseconds. `None` lets a
    /// long stall be caught up in one tick.
    pub max_delta_ms: Option<f64>,
    /// Number of tick durations kept by the frame timer.
    pub timer_window: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_delta_ms: Some(250.0),
            timer_window: 120,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running { pending: FrameRequest },
}

/// What one tick did.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// 1-based tick number since the scheduler was created.
    pub tick: u64,
    /// Clock time at the start of the tick.
    pub now_ms: f64,
    /// Delta handed to the update rules, after clamping and time scaling.
    pub delta_ms: f64,
    /// Clock delta before clamping.
    pub raw_delta_ms: f64,
    pub rules_applied: usize,
    pub draw_items: usize,
    pub triangles: usize,
    /// Wall time spent inside the tick.
    pub elapsed: Duration,
}

/// Drives a [`SceneContext`] from frame notifications.
///
/// `Idle --start--> Running{pending} --on_frame--> Running{next}`;
/// `stop` returns to `Idle` and cancels the pending request.
#[derive(Debug)]
pub struct AnimationScheduler {
    config: SchedulerConfig,
    state: SchedulerState,
    last_tick_ms: f64,
    ticks: u64,
    timer: FrameTimer,
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

impl AnimationScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        let timer = FrameTimer::new(config.timer_window);
        Self {
            config,
            state: SchedulerState::Idle,
            last_tick_ms: 0.0,
            ticks: 0,
            timer,
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, SchedulerState::Running { .. })
    }

    /// Ticks completed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn timer(&self) -> &FrameTimer {
        &self.timer
    }

    /// Begin (or restart) the tick chain.
    ///
    /// Restarting cancels the outstanding request first, so there is never
    /// more than one chain.
    pub fn start(&mut self, ctx: &SceneContext, host: &mut impl FrameHost) {
        if let SchedulerState::Running { pending } = self.state {
            tracing::debug!(request = pending.0, "restart cancels pending frame");
            host.cancel_frame(pending);
        }
        self.last_tick_ms = ctx.now_ms();
        let pending = host.request_frame();
        self.state = SchedulerState::Running { pending };
        tracing::info!(request = pending.0, "animation started");
    }

    pub fn stop(&mut self, host: &mut impl FrameHost) {
        if let SchedulerState::Running { pending } = self.state {
            host.cancel_frame(pending);
            tracing::info!(ticks = self.ticks, "animation stopped");
        }
        self.state = SchedulerState::Idle;
    }

    /// Handle a delivered frame notification.
    ///
    /// Returns `None` when `request` is not the pending one (stale, cancelled,
    /// or the scheduler is idle). Otherwise runs one tick and re-arms.
    pub fn on_frame<R: Renderer>(
        &mut self,
        request: FrameRequest,
        ctx: &mut SceneContext,
        renderer: &mut R,
        host: &mut impl FrameHost,
    ) -> Option<(TickReport, R::Output)> {
        let SchedulerState::Running { pending } = self.state else {
            tracing::trace!(request = request.0, "frame delivered while idle");
            return None;
        };
        if pending != request {
            tracing::trace!(request = request.0, pending = pending.0, "ignoring stale frame");
            return None;
        }

        let _span = tracing::trace_span!("tick", tick = self.ticks + 1).entered();
        let started = Instant::now();

        let now = ctx.now_ms();
        let raw_delta = (now - self.last_tick_ms).max(0.0);
        self.last_tick_ms = now;
        let clamped = match self.config.max_delta_ms {
            Some(max) => raw_delta.min(max),
            None => raw_delta,
        };
        if clamped < raw_delta {
            tracing::debug!(raw_delta, clamped, "clamped long frame");
        }
        let delta = clamped * ctx.time_scale;

        let rules_applied = ctx.graph.apply_rules(delta);
        ctx.graph.recompute_world_transforms();
        let (output, draw_items, triangles) = {
            let frame = ctx.frame();
            (renderer.render(&frame), frame.len(), frame.triangle_count())
        };

        self.state = SchedulerState::Running {
            pending: host.request_frame(),
        };
        self.ticks += 1;
        let elapsed = started.elapsed();
        self.timer.record(elapsed);

        tracing::trace!(delta, rules_applied, draw_items, "tick complete");
        let report = TickReport {
            tick: self.ticks,
            now_ms: now,
            delta_ms: delta,
            raw_delta_ms: raw_delta,
            rules_applied,
            draw_items,
            triangles,
            elapsed,
        };
        Some((report, output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::host::HeadlessHost;
    use glam::Vec3;
    use kinema_geometry::polyhedra::octahedron;
    use kinema_kernel::{TransformNode, UpdateRule};
    use kinema_render::Frame;

    /// Counts frames and remembers how many items each had.
    #[derive(Default)]
    struct CountingRenderer {
        items: Vec<usize>,
    }

    impl Renderer for CountingRenderer {
        type Output = usize;

        fn render(&mut self, frame: &Frame<'_>) -> usize {
            self.items.push(frame.len());
            frame.len()
        }
    }

    fn spinning_scene(clock: &ManualClock) -> SceneContext {
        let mut ctx = SceneContext::new(Box::new(clock.clone()));
        let root = ctx.graph.root();
        ctx.spawn_mesh(
            root,
            TransformNode::default().with_rule(UpdateRule::spin(Vec3::Y, 1000.0)),
            octahedron().unwrap(),
        )
        .unwrap();
        ctx
    }

    #[test]
    fn start_requests_one_frame() {
        let clock = ManualClock::new();
        let ctx = spinning_scene(&clock);
        let mut host = HeadlessHost::new();
        let mut scheduler = AnimationScheduler::default();

        assert_eq!(scheduler.state(), SchedulerState::Idle);
        scheduler.start(&ctx, &mut host);
        assert!(scheduler.is_running());
        assert_eq!(host.pending_count(), 1);
    }

    #[test]
    fn double_start_keeps_a_single_chain() {
        let clock = ManualClock::new();
        let mut ctx = spinning_scene(&clock);
        let mut host = HeadlessHost::new();
        let mut renderer = CountingRenderer::default();
        let mut scheduler = AnimationScheduler::default();

        scheduler.start(&ctx, &mut host);
        scheduler.start(&ctx, &mut host);
        assert_eq!(host.pending_count(), 1);
        assert_eq!(host.cancelled_count(), 1);

        for _ in 0..5 {
            clock.advance(16.0);
            let due = host.take_pending();
            assert_eq!(due.len(), 1);
            for request in due {
                assert!(scheduler.on_frame(request, &mut ctx, &mut renderer, &mut host).is_some());
            }
        }
        assert_eq!(scheduler.ticks(), 5);
        assert_eq!(renderer.items, vec![1; 5]);
    }

    #[test]
    fn stale_and_post_stop_frames_are_ignored() {
        let clock = ManualClock::new();
        let mut ctx = spinning_scene(&clock);
        let mut host = HeadlessHost::new();
        let mut renderer = CountingRenderer::default();
        let mut scheduler = AnimationScheduler::default();

        scheduler.start(&ctx, &mut host);
        let first = host.take_pending()[0];
        scheduler.start(&ctx, &mut host);
        assert!(scheduler.on_frame(first, &mut ctx, &mut renderer, &mut host).is_none());

        let second = host.take_pending()[0];
        scheduler.stop(&mut host);
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert!(scheduler.on_frame(second, &mut ctx, &mut renderer, &mut host).is_none());
        assert_eq!(scheduler.ticks(), 0);
        assert!(renderer.items.is_empty());
        assert_eq!(host.pending_count(), 0);
    }

    #[test]
    fn restart_after_stop_keeps_a_single_chain() {
        let clock = ManualClock::new();
        let mut ctx = spinning_scene(&clock);
        let mut host = HeadlessHost::new();
        let mut renderer = CountingRenderer::default();
        let mut scheduler = AnimationScheduler::default();

        // Cancelled while still queued.
        scheduler.start(&ctx, &mut host);
        scheduler.stop(&mut host);
        assert_eq!(host.cancelled_count(), 1);
        scheduler.start(&ctx, &mut host);
        assert_eq!(host.pending_count(), 1);

        // Already handed to the driver when stop ran.
        let delivered = host.take_pending()[0];
        scheduler.stop(&mut host);
        scheduler.start(&ctx, &mut host);
        assert_eq!(host.pending_count(), 1);
        assert!(scheduler.on_frame(delivered, &mut ctx, &mut renderer, &mut host).is_none());
        assert_eq!(host.pending_count(), 1);

        for tick in 1..=3 {
            clock.advance(16.0);
            let due = host.take_pending();
            assert_eq!(due.len(), 1);
            let fired = due
                .into_iter()
                .filter_map(|request| scheduler.on_frame(request, &mut ctx, &mut renderer, &mut host))
                .count();
            assert_eq!(fired, 1);
            assert_eq!(scheduler.ticks(), tick);
            assert_eq!(host.pending_count(), 1);
        }
        assert_eq!(renderer.items, vec![1; 3]);
    }

    #[test]
    fn tick_runs_rules_then_renders_and_rearms() {
        let clock = ManualClock::starting_at(1000.0);
        let mut ctx = spinning_scene(&clock);
        let mut host = HeadlessHost::new();
        let mut renderer = CountingRenderer::default();
        let mut scheduler = AnimationScheduler::default();

        scheduler.start(&ctx, &mut host);
        clock.advance(125.0);
        let request = host.take_pending()[0];
        let (report, output) = scheduler
            .on_frame(request, &mut ctx, &mut renderer, &mut host)
            .unwrap();

        assert_eq!(report.tick, 1);
        assert_eq!(report.delta_ms, 125.0);
        assert_eq!(report.rules_applied, 1);
        assert_eq!(report.draw_items, 1);
        assert_eq!(report.triangles, 8);
        assert_eq!(output, 1);
        assert_eq!(host.pending_count(), 1);

        let spun = ctx.graph.children(ctx.graph.root())[0];
        let angle = ctx.graph.get(spun).unwrap().rule_state().angle;
        assert!((angle - std::f64::consts::FRAC_PI_4).abs() < 1e-9);
        assert!(ctx.graph.world_transform(spun).is_some());
    }

    #[test]
    fn long_stall_is_clamped() {
        let clock = ManualClock::new();
        let mut ctx = spinning_scene(&clock);
        let mut host = HeadlessHost::new();
        let mut renderer = CountingRenderer::default();
        let mut scheduler = AnimationScheduler::default();

        scheduler.start(&ctx, &mut host);
        clock.advance(5000.0);
        let request = host.take_pending()[0];
        let (report, _) = scheduler
            .on_frame(request, &mut ctx, &mut renderer, &mut host)
            .unwrap();
        assert_eq!(report.raw_delta_ms, 5000.0);
        assert_eq!(report.delta_ms, 250.0);
    }

    #[test]
    fn unclamped_config_catches_up() {
        let clock = ManualClock::new();
        let mut ctx = spinning_scene(&clock);
        let mut host = HeadlessHost::new();
        let mut renderer = CountingRenderer::default();
        let mut scheduler = AnimationScheduler::new(SchedulerConfig {
            max_delta_ms: None,
            ..SchedulerConfig::default()
        });

        scheduler.start(&ctx, &mut host);
        clock.advance(5000.0);
        let request = host.take_pending()[0];
        let (report, _) = scheduler
            .on_frame(request, &mut ctx, &mut renderer, &mut host)
            .unwrap();
        assert_eq!(report.delta_ms, 5000.0);
    }

    #[test]
    fn zero_time_scale_freezes_rules() {
        let clock = ManualClock::new();
        let mut ctx = spinning_scene(&clock);
        ctx.time_scale = 0.0;
        let mut host = HeadlessHost::new();
        let mut renderer = CountingRenderer::default();
        let mut scheduler = AnimationScheduler::default();

        scheduler.start(&ctx, &mut host);
        clock.advance(100.0);
        let request = host.take_pending()[0];
        let (report, _) = scheduler
            .on_frame(request, &mut ctx, &mut renderer, &mut host)
            .unwrap();
        assert_eq!(report.delta_ms, 0.0);
        let spun = ctx.graph.children(ctx.graph.root())[0];
        assert_eq!(ctx.graph.get(spun).unwrap().rule_state().angle, 0.0);
    }
}
