//! Fixed-interval spawn timer
//!
//! The host loop feeds it simulation time; it reports how many spawns came due.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_SPAWNS_PER_ADVANCE;
use crate::entity::Category;

/// Accumulating timer for one category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnTimer {
    pub category: Category,
    /// Seconds between spawns
    pub interval: f32,
    accumulator: f32,
}

impl SpawnTimer {
    pub fn new(category: Category, interval: f32) -> Self {
        Self {
            category,
            interval,
            accumulator: 0.0,
        }
    }

    /// Advance by `dt` seconds and return the number of spawns due.
    ///
    /// At most `MAX_SPAWNS_PER_ADVANCE` come due per call; the backlog past
    /// that is dropped and only the partial interval carries over.
    pub fn advance(&mut self, dt: f32) -> u32 {
        if !(self.interval > 0.0) || !(dt > 0.0) || !dt.is_finite() {
            return 0;
        }

        self.accumulator += dt;
        if self.accumulator < self.interval {
            return 0;
        }

        let due = (self.accumulator / self.interval).floor();
        self.accumulator = self.accumulator.rem_euclid(self.interval);
        if due > MAX_SPAWNS_PER_ADVANCE as f32 {
            log::warn!(
                "{} timer fell {} spawns behind, capping at {}",
                self.category,
                due,
                MAX_SPAWNS_PER_ADVANCE
            );
            return MAX_SPAWNS_PER_ADVANCE;
        }
        due as u32
    }

    /// Seconds until the next spawn
    pub fn remaining(&self) -> f32 {
        (self.interval - self.accumulator).max(0.0)
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
