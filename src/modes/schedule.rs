use std::time::Duration;

/// Shortest interval a schedule hands out
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Tick pacing for interactive play
///
/// The game gets faster every time food is eaten: the interval is multiplied
/// by `speed_up` and clamped to `floor`. Restarting goes back to `base`.
/// No interval is ever shorter than [`MIN_INTERVAL`].
#[derive(Debug, Clone, PartialEq)]
pub struct TickSchedule {
    base: Duration,
    current: Duration,
    speed_up: f64,
    floor: Duration,
}

impl TickSchedule {
    /// A `speed_up` outside `[0, 1]` is clamped; NaN keeps the pace constant.
    pub fn new(base: Duration, speed_up: f64, floor: Duration) -> Self {
        let base = base.max(MIN_INTERVAL);
        let floor = floor.clamp(MIN_INTERVAL, base);
        let speed_up = if speed_up.is_nan() {
            1.0
        } else {
            speed_up.clamp(0.0, 1.0)
        };
        Self {
            base,
            current: base,
            speed_up,
            floor,
        }
    }

    pub fn current(&self) -> Duration {
        self.current
    }

    /// Shorten the interval after food was eaten; returns the new interval
    pub fn on_food(&mut self) -> Duration {
        self.current = self.current.mul_f64(self.speed_up).max(self.floor);
        self.current
    }

    pub fn reset(&mut self) {
        self.current = self.base;
    }
}

impl Default for TickSchedule {
    fn default() -> Self {
        Self::new(Duration::from_millis(100), 0.99, Duration::from_millis(30))
    }
}
