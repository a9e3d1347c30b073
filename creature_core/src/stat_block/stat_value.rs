//! StatValue - Base, flat and percentage parts of a derived stat

use serde::{Deserialize, Serialize};

/// Represents a stat built from a base value and bonuses
///
/// Final value is calculated as:
/// `(base + flat) × (100 + percent) / 100`
///
/// Percentages from every source are summed before they are applied, so
/// the result does not depend on the order sources contributed them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatValue {
    /// Base value (from race, role or equipment)
    pub base: i32,
    /// Sum of all flat additions
    pub flat: i32,
    /// Sum of all percentage bonuses
    pub percent: i32,
}

impl StatValue {
    /// Create a new StatValue with the given base
    pub fn with_base(base: i32) -> Self {
        StatValue {
            base,
            flat: 0,
            percent: 0,
        }
    }

    /// Calculate final value
    pub fn compute(&self) -> i32 {
        scale_percent(self.base + self.flat, self.percent)
    }

    pub fn add_flat(&mut self, value: i32) {
        self.flat += value;
    }

    pub fn add_percent(&mut self, value: i32) {
        self.percent += value;
    }

    /// Get the total flat value (base + flat additions)
    pub fn total_flat(&self) -> i32 {
        self.base + self.flat
    }
}

/// Apply a summed percentage to a value once
pub fn scale_percent(value: i32, percent: i32) -> i32 {
    value * (100 + percent) / 100
}
