// ---------------------------------------------------------------------------
// Fixed-timestep accumulator for drivers with a variable frame rate
// ---------------------------------------------------------------------------

pub const TICK_RATE: u32 = 120;
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Most ticks run for one frame; a long stall (debugger, window drag) drops
/// the excess instead of trying to catch up forever.
pub const MAX_STEPS_PER_FRAME: usize = 30;

/// Turns wall-clock frame times into a whole number of fixed ticks.
///
/// The remainder carries over, so over any span the tick count matches
/// `elapsed / dt` regardless of how the span was chopped into frames.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    dt: f64,
    max_steps: usize,
    accumulator: f64,
    dropped: f64,
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(DT)
    }
}

impl FixedTimestep {
    /// Falls back to [`DT`] if `dt` is not a positive finite number.
    pub fn new(dt: f64) -> Self {
        let dt = if dt > 0.0 && dt.is_finite() { dt } else { DT };
        Self { dt, max_steps: MAX_STEPS_PER_FRAME, accumulator: 0.0, dropped: 0.0 }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Add `elapsed` seconds and return how many ticks to run now.
    pub fn advance(&mut self, elapsed: f64) -> usize {
        if elapsed > 0.0 && elapsed.is_finite() {
            self.accumulator += elapsed;
        }
        let mut steps = 0;
        while self.accumulator >= self.dt && steps < self.max_steps {
            self.accumulator -= self.dt;
            steps += 1;
        }
        if self.accumulator >= self.dt {
            // Over budget: keep the sub-tick remainder only
            let excess = self.accumulator - self.accumulator % self.dt;
            self.dropped += excess;
            self.accumulator -= excess;
        }
        steps
    }

    /// Fraction of a tick left in the accumulator, for render interpolation.
    pub fn alpha(&self) -> f64 {
        (self.accumulator / self.dt).clamp(0.0, 1.0)
    }

    /// Simulated time discarded by the per-frame cap.
    pub fn dropped(&self) -> f64 {
        self.dropped
    }

    pub fn clear(&mut self) {
        self.accumulator = 0.0;
    }
}
