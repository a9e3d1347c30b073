//! GearSource - Stats from equipped items

use crate::item::Item;
use crate::source::StatSource;
use crate::stat_block::{StatAccumulator, WornItem};
use crate::types::EquipSlot;

/// Stats from an equipped item
///
/// Contributes the item's enchantment bonuses plus its structural armor and
/// weapon data, which the accumulator turns into armor class, penalties and
/// attack stats.
pub struct GearSource<'a> {
    /// Which slot this item is in
    pub slot: EquipSlot,
    /// The equipped item
    pub item: &'a Item,
}

impl<'a> GearSource<'a> {
    /// Create a new gear source
    pub fn new(slot: EquipSlot, item: &'a Item) -> Self {
        GearSource { slot, item }
    }
}

impl StatSource for GearSource<'_> {
    fn id(&self) -> &str {
        &self.item.id
    }

    fn priority(&self) -> i32 {
        0 // Gear applies at default priority
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        for enchantment in self.item.enchantments().iter() {
            stats.bonuses.add_all(enchantment.bonuses());
        }

        stats.worn.push(WornItem {
            slot: self.slot,
            item_type: self.item.item_type,
            weapon: self.item.weapon.clone(),
            armor: self.item.armor.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bonus::{Bonus, BonusKind};
    use crate::effect::Effect;
    use crate::item::ArmorProps;
    use crate::types::ItemType;

    #[test]
    fn test_gear_source_id() {
        let item = Item::new("helm-7", "iron_helm", ItemType::Helmet);
        let source = GearSource::new(EquipSlot::Helmet, &item);
        assert_eq!(source.id(), "helm-7");
    }

    #[test]
    fn test_gear_contributes_enchantments_and_armor() {
        let item = Item::new("plate-1", "plate", ItemType::Armor)
            .with_armor(ArmorProps {
                armor_type: "heavy".to_string(),
                armor_class: 40,
                armor_penalty: 40,
                movement_penalty: 20,
                shield_attack_penalty: 0,
            })
            .with_enchantment(Effect::new("warding", "Warding").with_bonus(Bonus::flat(BonusKind::MentalResistance, 5)))
            .unwrap();

        let mut acc = StatAccumulator::new();
        GearSource::new(EquipSlot::Armor, &item).apply(&mut acc);

        assert_eq!(acc.bonuses.get(BonusKind::MentalResistance), 5);
        assert_eq!(acc.worn.len(), 1);
        assert_eq!(acc.worn[0].armor.as_ref().unwrap().armor_class, 40);
    }
}
