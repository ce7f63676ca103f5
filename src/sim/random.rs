// ---------------------------------------------------------------------------
// Injectable randomness (backfire draw only)
// ---------------------------------------------------------------------------

/// Source of uniform draws in `[0, 1)`.
///
/// The step function asks for a draw only when a backfire is possible, so a
/// seeded source reproduces the same run bit for bit.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

impl RandomSource for fastrand::Rng {
    fn next_unit(&mut self) -> f64 {
        self.f64()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// Seeded generator used by the runner and binaries.
pub fn seeded(seed: u64) -> fastrand::Rng {
    fastrand::Rng::with_seed(seed)
}

/// Replays a fixed list of draws, cycling. Counts how often it was asked.
#[derive(Debug, Clone)]
pub struct FixedDraws {
    draws: Vec<f64>,
    next: usize,
    calls: usize,
}

impl FixedDraws {
    /// An empty list behaves like a constant `0.0` draw.
    pub fn new(draws: Vec<f64>) -> Self {
        Self { draws, next: 0, calls: 0 }
    }

    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl RandomSource for FixedDraws {
    fn next_unit(&mut self) -> f64 {
        self.calls += 1;
        if self.draws.is_empty() {
            return 0.0;
        }
        let v = self.draws[self.next % self.draws.len()];
        self.next = (self.next + 1) % self.draws.len();
        v
    }
}
