//! Physical-input conditioning.
//!
//! External signals cross into the tick domain through a synchronizer
//! chain (the metastability guard — modeled as a pure N-tick delay) and,
//! for mechanical sources, a counter-based debouncer that ignores any
//! level change shorter than the configured timeout.

use crate::error::{Result, SimError};
use std::collections::VecDeque;

/// N-stage synchronizer register chain.
///
/// The output is the input delayed by the stage count; stages power up
/// deasserted.
#[derive(Debug, Clone)]
pub struct Synchronizer {
    stages: VecDeque<bool>,
}

impl Synchronizer {
    /// Build a chain of `stages` registers.
    ///
    /// # Errors
    ///
    /// A zero-stage chain is a configuration error.
    pub fn new(stages: usize) -> Result<Self> {
        if stages == 0 {
            return Err(SimError::NoSyncStages);
        }
        Ok(Self { stages: VecDeque::from(vec![false; stages]) })
    }

    /// Shift one tick; returns the synchronized level.
    pub fn step(&mut self, level: bool) -> bool {
        self.stages.push_back(level);
        self.stages.pop_front().unwrap_or(level)
    }

    /// Clear all stages to deasserted.
    pub fn reset(&mut self) {
        for stage in &mut self.stages {
            *stage = false;
        }
    }
}

/// Counter-based debouncer.
///
/// The output follows the input only once the input has held a new level
/// for `timeout` consecutive ticks.
#[derive(Debug, Clone)]
pub struct Debouncer {
    timeout: usize,
    stable: bool,
    candidate: bool,
    count: usize,
}

impl Debouncer {
    /// Debounce with the given timeout in ticks (0 passes levels through).
    pub fn new(timeout: usize) -> Self {
        Self { timeout, stable: false, candidate: false, count: 0 }
    }

    /// Sample one tick; returns the debounced level.
    pub fn step(&mut self, level: bool) -> bool {
        if level == self.stable {
            self.candidate = level;
            self.count = 0;
        } else if level == self.candidate {
            self.count += 1;
            if self.count >= self.timeout {
                self.stable = level;
                self.count = 0;
            }
        } else {
            self.candidate = level;
            self.count = 1;
            if self.timeout <= 1 {
                self.stable = level;
                self.count = 0;
            }
        }
        self.stable
    }

    /// Clear to a deasserted stable level.
    pub fn reset(&mut self) {
        self.stable = false;
        self.candidate = false;
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synchronizer_delays_by_stage_count() {
        let mut sync = Synchronizer::new(2).unwrap();
        assert!(!sync.step(true));
        assert!(!sync.step(true));
        assert!(sync.step(true));
    }

    #[test]
    fn zero_stage_synchronizer_rejected() {
        assert_eq!(Synchronizer::new(0).unwrap_err(), SimError::NoSyncStages);
    }

    #[test]
    fn debouncer_ignores_short_glitches() {
        let mut db = Debouncer::new(3);
        // Two-tick glitch: shorter than the timeout, must not pass.
        assert!(!db.step(true));
        assert!(!db.step(true));
        assert!(!db.step(false));
        assert!(!db.step(false));
    }

    #[test]
    fn debouncer_passes_held_levels() {
        let mut db = Debouncer::new(3);
        db.step(true);
        db.step(true);
        assert!(db.step(true), "held for the timeout");
        // Falling edge needs the same hold.
        assert!(db.step(false));
        assert!(db.step(false));
        assert!(!db.step(false));
    }

    #[test]
    fn zero_timeout_passes_through() {
        let mut db = Debouncer::new(0);
        assert!(db.step(true));
        assert!(!db.step(false));
    }
}
