//! Capability queries against a cached StatBlock

use crate::bonus::BonusKind;
use crate::stat_block::StatBlock;
use crate::types::Attribute;

impl StatBlock {
    pub fn attribute(&self, attribute: Attribute) -> i32 {
        self.attributes.get(attribute)
    }

    /// Flat total of an unkeyed bonus kind
    pub fn bonus(&self, kind: BonusKind) -> i32 {
        self.bonuses().get(kind)
    }

    pub fn has(&self, kind: BonusKind) -> bool {
        self.bonuses().has(kind)
    }

    pub fn has_weapon_proficiency(&self, base_weapon: &str) -> bool {
        base_weapon == self.default_base_weapon
            || self.bonuses().has_sub(BonusKind::WeaponProficiency, base_weapon)
    }

    pub fn has_armor_proficiency(&self, armor_type: &str) -> bool {
        armor_type == self.default_armor_type
            || self.bonuses().has_sub(BonusKind::ArmorProficiency, armor_type)
    }

    pub fn has_dual_wield_training(&self) -> bool {
        self.has(BonusKind::DualWieldTraining)
    }

    pub fn can_bypass_curses(&self) -> bool {
        self.has(BonusKind::CurseBypass)
    }

    pub fn is_immobilized(&self) -> bool {
        self.has(BonusKind::Immobilized) && !self.has(BonusKind::ImmobilizationImmunity)
    }

    pub fn is_helpless(&self) -> bool {
        self.has(BonusKind::Helpless) && !self.has(BonusKind::ImmobilizationImmunity)
    }

    pub fn damage_reduction(&self, damage_type: &str) -> i32 {
        self.bonuses().get_sub(BonusKind::DamageReduction, damage_type)
    }

    /// Immunity percentage, clamped to -100..=100
    pub fn damage_immunity(&self, damage_type: &str) -> i32 {
        self.bonuses().get_sub(BonusKind::DamageImmunity, damage_type)
    }

    /// Extra action points granted each round
    pub fn bonus_action_points(&self) -> i32 {
        self.bonus(BonusKind::ActionPoint)
    }

    /// Summed percentage discount on equipping weapons and shields
    pub fn equip_hands_discount(&self) -> i32 {
        self.bonuses().percent(BonusKind::ActionPointEquipHands)
    }
}

#[cfg(test)]
mod tests {
    use crate::bonus::{Bonus, BonusKind};
    use crate::config::RuleConstants;
    use crate::stat_block::{StatAccumulator, StatBlock};

    fn block_with(bonuses: &[Bonus]) -> StatBlock {
        let mut acc = StatAccumulator::new();
        for bonus in bonuses {
            acc.bonuses.add(bonus.clone());
        }
        let mut block = StatBlock::new();
        acc.apply_to(&mut block, &RuleConstants::default());
        block
    }

    #[test]
    fn test_default_proficiencies() {
        let block = block_with(&[]);
        assert!(block.has_weapon_proficiency("unarmed"));
        assert!(block.has_armor_proficiency("none"));
        assert!(!block.has_weapon_proficiency("longsword"));
        assert!(!block.has_armor_proficiency("heavy"));
    }

    #[test]
    fn test_granted_proficiencies() {
        let block = block_with(&[
            Bonus::flag(BonusKind::WeaponProficiency).with_subtype("longsword"),
            Bonus::flag(BonusKind::ArmorProficiency).with_subtype("heavy"),
        ]);
        assert!(block.has_weapon_proficiency("longsword"));
        assert!(block.has_armor_proficiency("heavy"));
    }

    #[test]
    fn test_helpless_negated_by_immunity() {
        let block = block_with(&[Bonus::flag(BonusKind::Helpless)]);
        assert!(block.is_helpless());

        let block = block_with(&[
            Bonus::flag(BonusKind::Helpless),
            Bonus::flag(BonusKind::ImmobilizationImmunity),
        ]);
        assert!(!block.is_helpless());
    }

    #[test]
    fn test_damage_queries() {
        let block = block_with(&[
            Bonus::flat(BonusKind::DamageReduction, 4).with_subtype("piercing"),
            Bonus::flat(BonusKind::DamageImmunity, 150).with_subtype("fire"),
        ]);
        assert_eq!(block.damage_reduction("piercing"), 4);
        assert_eq!(block.damage_immunity("fire"), 100);
        assert_eq!(block.damage_immunity("cold"), 0);
    }
}
