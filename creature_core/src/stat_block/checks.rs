//! Damage mitigation and d100 resistance checks against a StatBlock

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::stat_block::{scale_percent, StatBlock};

/// Resistance used by a check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resistance {
    Mental,
    Physical,
    Reflex,
}

/// Outcome of one resistance check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub resistance: Resistance,
    /// d100 roll, 1..=100
    pub roll: i32,
    pub modifier: i32,
    pub difficulty: i32,
}

impl CheckResult {
    pub fn total(&self) -> i32 {
        self.roll + self.modifier
    }

    /// Ties go to the defender
    pub fn success(&self) -> bool {
        self.total() >= self.difficulty
    }
}

impl StatBlock {
    pub fn resistance(&self, resistance: Resistance) -> i32 {
        match resistance {
            Resistance::Mental => self.mental_resistance,
            Resistance::Physical => self.physical_resistance,
            Resistance::Reflex => self.reflex_resistance,
        }
    }

    /// Damage left after immunity and reduction for one damage type
    ///
    /// Immunity is a percentage, negative for vulnerability. Reduction is
    /// subtracted afterwards and the result never drops below zero.
    pub fn applied_damage(&self, amount: i32, damage_type: &str) -> i32 {
        let scaled = scale_percent(amount.max(0), -self.damage_immunity(damage_type));
        (scaled - self.damage_reduction(damage_type)).max(0)
    }

    /// Roll a resistance check against `difficulty`
    pub fn resistance_check(&self, resistance: Resistance, difficulty: i32) -> CheckResult {
        let mut rng = rand::thread_rng();
        self.resistance_check_with_rng(resistance, difficulty, &mut rng)
    }

    /// Roll a resistance check with a provided RNG (for deterministic testing)
    pub fn resistance_check_with_rng(
        &self,
        resistance: Resistance,
        difficulty: i32,
        rng: &mut impl Rng,
    ) -> CheckResult {
        let result = CheckResult {
            resistance,
            roll: rng.gen_range(1..=100),
            modifier: self.resistance(resistance),
            difficulty,
        };
        tracing::debug!(
            ?resistance,
            roll = result.roll,
            modifier = result.modifier,
            difficulty,
            success = result.success(),
            "resistance check"
        );
        result
    }
}
