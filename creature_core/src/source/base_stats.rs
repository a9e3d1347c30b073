//! BaseStatsSource - Assigned attributes and racial baseline

use crate::config::RaceDef;
use crate::source::StatSource;
use crate::stat_block::StatAccumulator;
use crate::types::{Attribute, AttributeScores, Size};

/// Stats a creature has before roles, gear or effects
#[derive(Debug, Clone)]
pub struct BaseStatsSource {
    pub race_id: String,
    /// Assigned attribute points
    pub attributes: AttributeScores,
    /// Racial attribute modifiers
    pub race_attributes: AttributeScores,
    pub size: Size,
    pub movement_cost: i32,
}

impl BaseStatsSource {
    /// Create a new base stats source
    pub fn new(attributes: AttributeScores, race: &RaceDef) -> Self {
        BaseStatsSource {
            race_id: race.id.clone(),
            attributes,
            race_attributes: race.attributes,
            size: race.size,
            movement_cost: race.movement_cost,
        }
    }
}

impl StatSource for BaseStatsSource {
    fn id(&self) -> &str {
        &self.race_id
    }

    fn priority(&self) -> i32 {
        -100 // Base stats apply first
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        for &attribute in Attribute::all() {
            let value = self.attributes.get(attribute) + self.race_attributes.get(attribute);
            stats.attributes.set(attribute, stats.attributes.get(attribute) + value);
        }
        stats.size = self.size;
        stats.base_movement_cost = self.movement_cost;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn halfling() -> RaceDef {
        RaceDef {
            id: "halfling".to_string(),
            name: "Halfling".to_string(),
            size: Size::Small,
            movement_cost: 1250,
            attributes: AttributeScores::new(-2, 2, 0, 0, 0, 0),
        }
    }

    #[test]
    fn test_race_modifiers_added() {
        let source = BaseStatsSource::new(AttributeScores::uniform(12), &halfling());
        let mut acc = StatAccumulator::new();
        source.apply(&mut acc);

        assert_eq!(acc.attributes.get(Attribute::Str), 10);
        assert_eq!(acc.attributes.get(Attribute::Dex), 14);
        assert_eq!(acc.attributes.get(Attribute::Wis), 12);
        assert_eq!(acc.size, Size::Small);
        assert_eq!(acc.base_movement_cost, 1250);
    }

    #[test]
    fn test_base_stats_priority() {
        let source = BaseStatsSource::new(AttributeScores::uniform(10), &halfling());
        assert_eq!(source.priority(), -100);
        assert_eq!(source.id(), "halfling");
    }
}
