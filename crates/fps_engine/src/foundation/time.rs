//! Time management utilities

/// Frame timer fed by the host's monotonic clock
///
/// The engine samples the platform clock once per frame and passes the
/// reading to [`FrameClock::tick`]; the clock itself never reads wall time,
/// which keeps frame timing scriptable in tests.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_frame: f64,
    delta_time: f64,
    total_time: f64,
    frame_count: u64,
}

impl FrameClock {
    /// Create a clock whose first frame is measured from `now`
    pub const fn starting_at(now: f64) -> Self {
        Self {
            last_frame: now,
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Restart measurement from `now` without touching the counters
    pub fn reset(&mut self, now: f64) {
        self.last_frame = now;
    }

    /// Advance to `now` and return the seconds since the previous tick
    ///
    /// A clock reading that goes backwards is clamped to a zero delta.
    pub fn tick(&mut self, now: f64) -> f64 {
        let delta = (now - self.last_frame).max(0.0);
        self.last_frame = now;
        self.delta_time = delta;
        self.total_time += delta;
        self.frame_count += 1;
        delta
    }

    /// Seconds between the last two ticks
    pub const fn delta_time(&self) -> f64 {
        self.delta_time
    }

    /// Seconds accumulated over all ticks
    pub const fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Number of ticks so far
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Average frames per second since the clock started
    #[allow(clippy::cast_precision_loss)]
    pub fn average_fps(&self) -> f64 {
        if self.total_time > 0.0 {
            self.frame_count as f64 / self.total_time
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_accumulates() {
        let mut clock = FrameClock::starting_at(1.0);
        assert!((clock.tick(1.5) - 0.5).abs() < 1e-12);
        assert!((clock.tick(1.75) - 0.25).abs() < 1e-12);
        assert_eq!(clock.frame_count(), 2);
        assert!((clock.total_time() - 0.75).abs() < 1e-12);
        assert!((clock.average_fps() - 2.0 / 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_backwards_clock_clamps() {
        let mut clock = FrameClock::starting_at(5.0);
        assert_eq!(clock.tick(4.0), 0.0);
        assert_eq!(clock.total_time(), 0.0);
    }
}
