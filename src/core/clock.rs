//! Pausable simulation clock.
//!
//! Real elapsed time goes in, simulation time comes out. While paused the
//! clock reports zero so nothing downstream advances.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameClock {
    elapsed: f64,
    paused: bool,
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Converts a real-time delta into a simulation delta and accumulates it.
    /// Negative or non-finite deltas count as zero.
    pub fn advance(&mut self, real_dt: f64) -> f64 {
        if self.paused || !real_dt.is_finite() || real_dt <= 0.0 {
            return 0.0;
        }
        self.elapsed += real_dt;
        real_dt
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Simulation seconds since creation or the last reset.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }
}
