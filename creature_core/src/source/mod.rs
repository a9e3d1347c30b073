//! StatSource - Trait and implementations for stat providers

mod base_stats;
mod effects;
mod gear;
mod roles;

pub use base_stats::BaseStatsSource;
pub use gear::GearSource;
pub use roles::RoleSource;

use crate::stat_block::StatAccumulator;

/// Trait for anything that contributes stats to a StatBlock
pub trait StatSource: Send + Sync {
    /// Unique identifier for this source
    fn id(&self) -> &str;

    /// Priority for application order (higher = applied later)
    /// Default priority is 0.
    /// Suggested priorities:
    /// - Base attributes: -100
    /// - Roles: -50
    /// - Equipped items: 0
    /// - Own effects: 200
    fn priority(&self) -> i32 {
        0
    }

    /// Apply this source's stats to the accumulator
    fn apply(&self, stats: &mut StatAccumulator);
}
