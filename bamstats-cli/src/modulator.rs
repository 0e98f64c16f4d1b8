use std::time::{Duration, Instant};

const RATE_FACTOR: f64 = 1.5;

///
/// Adapts the snapshot rate so that snapshots arrive roughly every `target` of wall time.
///
/// Snapshots that come faster than `target - tolerance` grow the rate by half; slower than
/// `target + tolerance` shrink it by a third. The rate never drops below one read.
///
#[derive(Debug, Clone)]
pub struct RateModulator {
    target: Duration,
    tolerance: Duration,
    last_snapshot: Instant,
}

impl RateModulator {
    pub fn new(target: Duration, tolerance: Duration) -> Self {
        RateModulator {
            target,
            tolerance,
            last_snapshot: Instant::now(),
        }
    }

    pub fn from_millis(target_ms: u64, tolerance_ms: u64) -> Self {
        RateModulator::new(
            Duration::from_millis(target_ms),
            Duration::from_millis(tolerance_ms),
        )
    }

    ///
    /// Record that a snapshot was just emitted and return the rate to use from here on.
    ///
    pub fn on_snapshot(&mut self, rate: u64) -> u64 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_snapshot);
        self.last_snapshot = now;

        self.modulate(rate, elapsed)
    }

    pub fn modulate(&self, rate: u64, elapsed: Duration) -> u64 {
        let lower = self.target.saturating_sub(self.tolerance);
        let upper = self.target.saturating_add(self.tolerance);

        if elapsed < lower {
            // ceil so that a rate of 1 can still grow
            (rate as f64 * RATE_FACTOR).ceil() as u64
        } else if elapsed > upper {
            ((rate as f64 / RATE_FACTOR) as u64).max(1)
        } else {
            rate
        }
    }
}
