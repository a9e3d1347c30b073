//! Own effects as a stat source

use crate::effect::EffectSet;
use crate::source::StatSource;
use crate::stat_block::StatAccumulator;
use crate::types::EntityRef;

impl StatSource for EffectSet {
    fn id(&self) -> &str {
        match self.owner() {
            EntityRef::Creature(id) | EntityRef::Item(id) => id,
        }
    }

    fn priority(&self) -> i32 {
        200 // Effects apply after gear
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        for effect in self.iter() {
            stats.bonuses.add_all(effect.bonuses());
        }
    }
}
