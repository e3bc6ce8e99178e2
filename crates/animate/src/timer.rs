use std::collections::VecDeque;
use std::time::Duration;

/// Rolling window of tick durations for instrumentation.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    window: VecDeque<Duration>,
    capacity: usize,
}

impl FrameTimer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, dt: Duration) {
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(dt);
    }

    pub fn average(&self) -> Duration {
        if self.window.is_empty() {
            return Duration::ZERO;
        }
        let total: Duration = self.window.iter().sum();
        total / self.window.len() as u32
    }

    pub fn max(&self) -> Duration {
        self.window.iter().copied().max().unwrap_or(Duration::ZERO)
    }

    pub fn min(&self) -> Duration {
        self.window.iter().copied().min().unwrap_or(Duration::ZERO)
    }

    /// Samples currently in the window.
    pub fn count(&self) -> usize {
        self.window.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_timer_reports_zero() {
        let timer = FrameTimer::new(8);
        assert_eq!(timer.average(), Duration::ZERO);
        assert_eq!(timer.max(), Duration::ZERO);
        assert_eq!(timer.count(), 0);
    }

    #[test]
    fn window_drops_oldest_sample() {
        let mut timer = FrameTimer::new(3);
        for ms in [10, 1, 2, 3] {
            timer.record(Duration::from_millis(ms));
        }
        assert_eq!(timer.count(), 3);
        assert_eq!(timer.max(), Duration::from_millis(3));
        assert_eq!(timer.min(), Duration::from_millis(1));
        assert_eq!(timer.average(), Duration::from_millis(2));
    }
}
