//! StatBlock - Derived creature stats aggregated from all sources

mod aggregator;
mod checks;
mod computed;
mod stat_value;

pub use aggregator::{RoleProgress, StatAccumulator, WornItem};
pub use checks::{CheckResult, Resistance};
pub use stat_value::{scale_percent, StatValue};

use crate::bonus::BonusAggregate;
use crate::config::RuleConstants;
use crate::source::StatSource;
use crate::types::{AttributeScores, Size};
use serde::{Deserialize, Serialize};

/// Cached snapshot of every derived statistic of a creature
///
/// A StatBlock is recomputed from scratch by [`StatBlock::rebuild_from_sources`]
/// and is read-only to everything else. Capability queries read the bonus
/// aggregate cached inside it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBlock {
    // === Attributes ===
    pub attributes: AttributeScores,
    pub size: Size,
    pub level: u32,

    // === Hit points ===
    pub max_hp: i32,
    /// Part of max HP that comes from constitution
    pub con_hp: i32,
    /// Temporary hit points granted by bonuses
    pub temporary_hp_bonus: i32,

    // === Defense ===
    pub armor_class: i32,
    /// Percentage penalty from worn armor, 0-100
    pub armor_penalty: i32,
    /// Percentage movement penalty from worn armor, 0-100
    pub movement_penalty: i32,
    pub mental_resistance: i32,
    pub physical_resistance: i32,
    pub reflex_resistance: i32,

    // === Offense ===
    pub main_hand_attack: i32,
    /// Percentage damage bonus
    pub main_hand_damage: i32,
    pub off_hand_attack: Option<i32>,
    pub off_hand_damage: Option<i32>,
    /// Action points per attack
    pub attack_cost: i32,
    pub touch_attack: i32,

    // === Utility ===
    pub initiative: i32,
    /// Action points per tile moved
    pub movement_cost: i32,
    pub weight_limit: i32,

    default_base_weapon: String,
    default_armor_type: String,
    bonuses: BonusAggregate,
}

impl StatBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild stats from all sources
    ///
    /// Sources are applied in priority order. The previous contents of the
    /// block do not influence the result, so calling this twice with the same
    /// sources yields identical snapshots.
    pub fn rebuild_from_sources(&mut self, sources: &[&dyn StatSource], constants: &RuleConstants) {
        let mut accumulator = StatAccumulator::new();

        let mut sorted_sources: Vec<_> = sources.iter().collect();
        sorted_sources.sort_by_key(|s| s.priority());

        for source in sorted_sources {
            source.apply(&mut accumulator);
        }

        let mut block = StatBlock::new();
        accumulator.apply_to(&mut block, constants);
        *self = block;
    }

    /// Every bonus that contributed to this snapshot
    pub fn bonuses(&self) -> &BonusAggregate {
        &self.bonuses
    }
}
