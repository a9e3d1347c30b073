//! Persistence - Format-agnostic save records for creatures
//!
//! Records only hold identities and mutable state. Everything else is rebuilt
//! from the rule data on load, and references that no longer resolve are
//! dropped with a warning.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::RuleData;
use crate::creature::{Creature, CreatureError};
use crate::effect::{Effect, EffectSet};
use crate::item::Item;
use crate::source::{BaseStatsSource, RoleSource};
use crate::types::{AttributeScores, EquipSlot};
use crate::vitality::VitalityState;

/// An attached effect, by template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectRecord {
    pub template_id: String,
    /// Rounds left, `None` for permanent effects
    #[serde(default)]
    pub remaining: Option<u32>,
}

/// An item instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: String,
    pub template_id: String,
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default)]
    pub cursed: bool,
    #[serde(default)]
    pub enchantments: Vec<EffectRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquippedRecord {
    pub slot: EquipSlot,
    pub item: ItemRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRecord {
    pub role_id: String,
    pub level: u32,
}

/// Everything needed to restore a creature against the same rule data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureRecord {
    pub id: String,
    pub name: String,
    pub race_id: String,
    pub attributes: AttributeScores,
    #[serde(default)]
    pub roles: Vec<RoleRecord>,
    #[serde(default)]
    pub player_controlled: bool,
    #[serde(default)]
    pub experience: u32,
    /// Hit points, flags and the summon window
    pub vitality: VitalityState,
    #[serde(default)]
    pub equipped: Vec<EquippedRecord>,
    #[serde(default)]
    pub unequipped: Vec<ItemRecord>,
    #[serde(default)]
    pub effects: Vec<EffectRecord>,
}

fn effect_records(set: &EffectSet) -> Vec<EffectRecord> {
    set.iter()
        .map(|effect| EffectRecord {
            template_id: effect.template_id.clone(),
            remaining: effect.remaining(),
        })
        .collect()
}

fn item_record(item: &Item) -> ItemRecord {
    ItemRecord {
        id: item.id.clone(),
        template_id: item.template_id.clone(),
        quality: item.quality.clone(),
        cursed: item.cursed,
        enchantments: effect_records(item.enchantments()),
    }
}

fn restore_effect(rules: &RuleData, record: &EffectRecord, owner: &str) -> Option<Effect> {
    let Some(effect) = rules.create_effect(&record.template_id) else {
        tracing::warn!(owner, template = %record.template_id, "dropping effect with unknown template");
        return None;
    };
    Some(match record.remaining {
        Some(rounds) => effect.with_duration(rounds),
        None => effect,
    })
}

fn restore_item(rules: &RuleData, record: &ItemRecord, owner: &str) -> Option<Item> {
    let Some(mut item) = rules.create_bare_item(&record.template_id, record.id.clone()) else {
        tracing::warn!(owner, item = %record.id, template = %record.template_id, "dropping item with unknown template");
        return None;
    };
    item.quality = record.quality.clone();
    item.cursed = record.cursed;

    for enchantment in &record.enchantments {
        if let Some(effect) = restore_effect(rules, enchantment, &record.id) {
            // Freshly created effects are unapplied
            let _ = item.enchant(effect);
        }
    }
    Some(item)
}

impl Creature {
    pub fn to_record(&self) -> CreatureRecord {
        CreatureRecord {
            id: self.id.clone(),
            name: self.name.clone(),
            race_id: self.base.race_id.clone(),
            attributes: self.base.attributes,
            roles: self
                .roles
                .roles()
                .iter()
                .map(|r| RoleRecord {
                    role_id: r.role_id.clone(),
                    level: r.level,
                })
                .collect(),
            player_controlled: self.player_controlled,
            experience: self.experience,
            vitality: self.vitality.clone(),
            equipped: self
                .equipment
                .equipped()
                .map(|(slot, item)| EquippedRecord {
                    slot,
                    item: item_record(item),
                })
                .collect(),
            unequipped: self.equipment.unequipped().iter().map(item_record).collect(),
            effects: effect_records(&self.effects),
        }
    }

    /// Restore a creature from a record
    ///
    /// Unknown roles, items and effects are dropped. The saved vitality is
    /// kept as is, so bonuses present at save time are not granted again.
    pub fn from_record(record: &CreatureRecord, rules: Arc<RuleData>) -> Result<Creature, CreatureError> {
        let race = rules
            .race(&record.race_id)
            .ok_or_else(|| CreatureError::UnknownRace(record.race_id.clone()))?;

        let levels: Vec<(String, u32)> = record.roles.iter().map(|r| (r.role_id.clone(), r.level)).collect();
        let mut creature = Creature::assemble(
            record.id.clone(),
            record.name.clone(),
            BaseStatsSource::new(record.attributes, race),
            RoleSource::from_levels(&levels, &rules),
            rules.clone(),
        );
        creature.player_controlled = record.player_controlled;
        creature.experience = record.experience;

        for effect in &record.effects {
            if let Some(effect) = restore_effect(&rules, effect, &record.id) {
                let _ = creature.effects.add(effect);
            }
        }

        for equipped in &record.equipped {
            let Some(item) = restore_item(&rules, &equipped.item, &record.id) else { continue };
            if !item.item_type.fits(equipped.slot) {
                tracing::warn!(creature = %record.id, item = %item.id, slot = ?equipped.slot, "item no longer fits its slot, moved to inventory");
                creature.equipment.add_item(item);
                continue;
            }
            if let Some(displaced) = creature.equipment.restore(equipped.slot, item, &record.id) {
                tracing::warn!(creature = %record.id, item = %displaced.id, "two items saved in one slot");
                creature.equipment.add_item(displaced);
            }
        }

        for unequipped in &record.unequipped {
            if let Some(item) = restore_item(&rules, unequipped, &record.id) {
                creature.equipment.add_item(item);
            }
        }

        // Hooks fired while restoring must not touch the saved vitality
        creature.effects.drain_commands();
        for item in creature.equipment.equipped_mut() {
            item.enchantments_mut().drain_commands();
        }

        creature.recompute_silently();
        creature.vitality = record.vitality.clone();
        creature.start_turn();
        Ok(creature)
    }
}
