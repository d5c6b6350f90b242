//! Frame pacing and periodic frame statistics.

use std::time::{Duration, Instant};

/// Sleeps out the remainder of each frame's time budget.
///
/// A budget of `None` never waits.
#[derive(Debug, Clone)]
pub struct FrameLimiter {
    budget: Option<Duration>,
    previous_frame_time: Instant,
}

impl FrameLimiter {
    pub fn new(budget: Option<Duration>) -> Self {
        Self {
            budget,
            previous_frame_time: Instant::now(),
        }
    }

    /// Waits if necessary to maintain frame rate and returns the delta time.
    /// Delta time represents the time elapsed since the last call to this method.
    pub fn wait_and_get_delta(&mut self) -> Duration {
        let mut current_time = Instant::now();
        let mut delta_time = current_time.saturating_duration_since(self.previous_frame_time);

        if let Some(budget) = self.budget {
            if delta_time < budget {
                std::thread::sleep(budget - delta_time);
                current_time = Instant::now();
                delta_time = current_time.saturating_duration_since(self.previous_frame_time);
            }
        }

        self.previous_frame_time = current_time;
        delta_time
    }
}

/// Averages over one reporting window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub frames: u64,
    pub fps: f64,
    /// Mean time spent rasterizing and packing, in milliseconds.
    pub render_ms: f64,
    /// Mean frame delta, in milliseconds.
    pub dt_ms: f64,
}

/// Accumulates frame timings and yields a [`FrameReport`] once `interval`
/// of frame time has passed.
#[derive(Debug, Clone)]
pub struct FrameStats {
    interval: Duration,
    frames: u64,
    elapsed: Duration,
    render_time: Duration,
}

impl FrameStats {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            frames: 0,
            elapsed: Duration::ZERO,
            render_time: Duration::ZERO,
        }
    }

    pub fn record(&mut self, dt: Duration, render_time: Duration) -> Option<FrameReport> {
        self.frames += 1;
        self.elapsed += dt;
        self.render_time += render_time;

        if self.elapsed < self.interval {
            return None;
        }

        let frames = self.frames as f64;
        let seconds = self.elapsed.as_secs_f64();
        let report = FrameReport {
            frames: self.frames,
            fps: if seconds > 0.0 { frames / seconds } else { 0.0 },
            render_ms: self.render_time.as_secs_f64() * 1000.0 / frames,
            dt_ms: seconds * 1000.0 / frames,
        };

        self.frames = 0;
        self.elapsed = Duration::ZERO;
        self.render_time = Duration::ZERO;
        Some(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn stats_report_after_interval() {
        let mut stats = FrameStats::new(Duration::from_secs(1));
        let dt = Duration::from_millis(250);
        let render = Duration::from_millis(5);

        for _ in 0..3 {
            assert!(stats.record(dt, render).is_none());
        }
        let report = stats.record(dt, render).unwrap();
        assert_eq!(report.frames, 4);
        assert_relative_eq!(report.fps, 4.0, epsilon = 1e-9);
        assert_relative_eq!(report.dt_ms, 250.0, epsilon = 1e-9);
        assert_relative_eq!(report.render_ms, 5.0, epsilon = 1e-9);

        // Window restarts after a report.
        assert!(stats.record(dt, render).is_none());
    }

    #[test]
    fn zero_interval_reports_every_frame() {
        let mut stats = FrameStats::new(Duration::ZERO);
        assert!(stats.record(Duration::ZERO, Duration::ZERO).is_some());
        assert!(stats.record(Duration::from_millis(1), Duration::ZERO).is_some());
    }

    #[test]
    fn limiter_waits_for_budget() {
        let budget = Duration::from_millis(20);
        let mut limiter = FrameLimiter::new(Some(budget));
        let delta = limiter.wait_and_get_delta();
        assert!(delta >= budget);
    }

    #[test]
    fn uncapped_limiter_does_not_wait() {
        let mut limiter = FrameLimiter::new(None);
        let delta = limiter.wait_and_get_delta();
        assert!(delta < Duration::from_millis(20));
    }
}
