//! StatAccumulator - Collects contributions before deriving a StatBlock

use crate::bonus::{BonusAggregate, BonusKind};
use crate::config::RuleConstants;
use crate::item::{ArmorProps, WeaponProps};
use crate::stat_block::{scale_percent, StatBlock, StatValue};
use crate::types::{Attribute, AttributeScores, EquipSlot, Handedness, ItemType, Size};

/// Levels held in one role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleProgress {
    pub role_id: String,
    pub level: u32,
    pub level1_hp: i32,
    pub hp_per_level: i32,
    pub attack_per_level: i32,
}

/// Structural data of an equipped item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WornItem {
    pub slot: EquipSlot,
    pub item_type: ItemType,
    pub weapon: Option<WeaponProps>,
    pub armor: Option<ArmorProps>,
}

/// Accumulates stat contributions from various sources
///
/// Sources only push data here. All derivation happens in
/// [`StatAccumulator::apply_to`], once every source has been applied.
#[derive(Debug, Clone, Default)]
pub struct StatAccumulator {
    /// Assigned points plus racial modifiers
    pub attributes: AttributeScores,
    pub size: Size,
    pub base_movement_cost: i32,
    /// Roles in the order they were taken; the first is the base role
    pub roles: Vec<RoleProgress>,
    pub bonuses: BonusAggregate,
    pub worn: Vec<WornItem>,
}

/// Armor totals across worn items
#[derive(Debug, Default)]
struct ArmorTotals {
    armor_class: i32,
    armor_penalty: i32,
    movement_penalty: i32,
    shield_attack_penalty: i32,
}

impl StatAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    fn worn_in(&self, slot: EquipSlot) -> Option<&WornItem> {
        self.worn.iter().find(|w| w.slot == slot)
    }

    fn armor_totals(&self) -> ArmorTotals {
        let b = &self.bonuses;
        let mut totals = ArmorTotals::default();

        for worn in &self.worn {
            let Some(armor) = &worn.armor else { continue };
            let ty = armor.armor_type.as_str();

            totals.armor_class += scale_percent(armor.armor_class, b.percent_sub(BonusKind::ArmorTypeArmorClass, ty));
            totals.armor_penalty +=
                scale_percent(armor.armor_penalty, -b.percent_sub(BonusKind::ArmorTypeArmorPenalty, ty)).max(0);
            totals.movement_penalty +=
                scale_percent(armor.movement_penalty, -b.percent_sub(BonusKind::ArmorTypeMovementPenalty, ty)).max(0);
            if worn.item_type == ItemType::Shield {
                totals.shield_attack_penalty += armor.shield_attack_penalty;
            }
        }

        totals.armor_penalty = (totals.armor_penalty - b.get(BonusKind::ArmorPenalty)).clamp(0, 100);
        totals.movement_penalty = totals.movement_penalty.clamp(0, 100);
        totals
    }

    /// Attribute contribution and per-weapon bonus for an attack with `weapon`
    fn weapon_attack(&self, weapon: Option<&WeaponProps>, attributes: &AttributeScores, default_weapon: &str) -> i32 {
        let b = &self.bonuses;
        let str = attributes.get(Attribute::Str);
        let dex = attributes.get(Attribute::Dex);

        match weapon {
            None => b.get_sub(BonusKind::BaseWeaponAttack, default_weapon) + (str.max(dex) - 10) * 2,
            Some(w) if w.weapon_type.is_melee() => {
                let handed = w.handedness.relative_to(w.size.ordinal() - self.size.ordinal());
                let attribute = if handed == Handedness::Light { str.max(dex) } else { str };
                b.get_sub(BonusKind::BaseWeaponAttack, &w.base_weapon) + (attribute - 10) * 2
            }
            Some(w) => {
                b.get_sub(BonusKind::BaseWeaponAttack, &w.base_weapon)
                    + (dex - 10) * 2
                    + b.get(BonusKind::RangedAttack)
            }
        }
    }

    /// Derive every statistic into `block`
    pub fn apply_to(&self, block: &mut StatBlock, constants: &RuleConstants) {
        let b = &self.bonuses;

        // === Attributes ===
        let mut attributes = self.attributes;
        for &attribute in Attribute::all() {
            let value = attributes.get(attribute)
                + b.get(BonusKind::base_attribute(attribute))
                + b.get(BonusKind::attribute(attribute));
            attributes.set(attribute, value);
        }
        let str = attributes.get(Attribute::Str);
        let dex = attributes.get(Attribute::Dex);
        let con = attributes.get(Attribute::Con);
        let wis = attributes.get(Attribute::Wis);

        // === Level and hit points ===
        let level: u32 = self.roles.iter().map(|r| r.level).sum();
        let lvl = level as i32;
        let mut role_hp = 0;
        let mut level_attack = 0;
        for (i, role) in self.roles.iter().enumerate() {
            if role.level == 0 {
                continue;
            }
            let role_level = role.level as i32;
            role_hp += if i == 0 {
                role.level1_hp + (role_level - 1) * role.hp_per_level
            } else {
                role_level * role.hp_per_level
            };
            level_attack += role_level * role.attack_per_level;
        }
        let con_hp = (con - 10) * lvl / 3;

        let mut max_hp = StatValue::with_base(role_hp + con_hp);
        max_hp.add_flat(b.get(BonusKind::MaxHp));
        max_hp.add_percent(b.percent(BonusKind::MaxHp));

        // === Defense ===
        let immune = b.has(BonusKind::ImmobilizationImmunity);
        let immobilized = b.has(BonusKind::Immobilized) && !immune;
        let armor = self.armor_totals();

        let mut dex_ac = 4 * (dex - 10);
        if dex_ac > 0 {
            dex_ac = scale_percent(dex_ac, -armor.armor_penalty);
        }
        let mut armor_class = constants.creature.base_armor_class
            + self.size.armor_class_modifier()
            + b.get(BonusKind::ArmorClass)
            + b.get(BonusKind::DeflectionArmorClass)
            + b.get(BonusKind::NaturalArmorClass)
            + armor.armor_class
            + dex_ac;
        if immobilized {
            armor_class -= 20;
        }

        // === Movement ===
        let mut movement = b.percent(BonusKind::Movement) - armor.movement_penalty;
        if immune && movement < 0 {
            movement = 0;
        }
        let movement_cost = scale_percent(self.base_movement_cost, -movement).max(1);

        // === Offense ===
        let default_weapon = constants.defaults.base_weapon.as_str();
        let main = self.worn_in(EquipSlot::MainHand).and_then(|w| w.weapon.as_ref());
        let off = self
            .worn_in(EquipSlot::OffHand)
            .filter(|w| w.item_type == ItemType::Weapon)
            .and_then(|w| w.weapon.as_ref());

        let size_attack = self.size.attack_modifier();
        let base_attack = b.get(BonusKind::Attack) + level_attack + size_attack;
        let shield_penalty = (b.get(BonusKind::ShieldAttack) - armor.shield_attack_penalty).min(0);

        let mut main_hand_attack = base_attack
            + b.get(BonusKind::MainHandAttack)
            + shield_penalty
            + self.weapon_attack(main, &attributes, default_weapon);

        let main_is_melee = main.map_or(true, |w| w.weapon_type.is_melee());
        let mut main_hand_damage = b.percent(BonusKind::Damage) + b.percent(BonusKind::MainHandDamage);
        if main_is_melee {
            main_hand_damage += if off.is_some() { 4 * (str - 10) } else { 8 * (str - 10) };
        } else {
            main_hand_damage += b.percent(BonusKind::RangedDamage);
        }

        let (off_hand_attack, off_hand_damage) = match off {
            Some(off_weapon) => {
                let light = off_weapon.handedness.relative_to(off_weapon.size.ordinal() - self.size.ordinal())
                    == Handedness::Light;
                let light_bonus = if light { 10 } else { 0 };
                let dual = b.get(BonusKind::DualWieldAttack) + light_bonus;

                main_hand_attack += dual - 25;
                let attack = base_attack
                    + b.get(BonusKind::OffHandAttack)
                    + self.weapon_attack(Some(off_weapon), &attributes, default_weapon)
                    + dual
                    - 35;
                let damage = b.percent(BonusKind::Damage) + b.percent(BonusKind::OffHandDamage) + 4 * (str - 10);
                (Some(attack), Some(damage))
            }
            None => (None, None),
        };

        let (weapon_cost, base_weapon) = match main {
            Some(w) => (w.attack_cost, w.base_weapon.as_str()),
            None => (constants.action_points.unarmed_attack_cost, default_weapon),
        };
        let speed = b.percent(BonusKind::AttackCost) + b.percent_sub(BonusKind::BaseWeaponSpeed, base_weapon);
        let attack_cost = scale_percent(weapon_cost, -speed).max(1);

        // === Write out ===
        block.attributes = attributes;
        block.size = self.size;
        block.level = level;
        block.con_hp = con_hp;
        block.max_hp = max_hp.compute().max(1);
        block.temporary_hp_bonus = b.get(BonusKind::TemporaryHp).max(0);
        block.armor_class = armor_class;
        block.armor_penalty = armor.armor_penalty;
        block.movement_penalty = armor.movement_penalty;
        block.movement_cost = movement_cost;
        block.initiative = b.get(BonusKind::Initiative) + (dex - 10) * 2;
        block.main_hand_attack = main_hand_attack;
        block.main_hand_damage = main_hand_damage;
        block.off_hand_attack = off_hand_attack;
        block.off_hand_damage = off_hand_damage;
        block.attack_cost = attack_cost;
        block.touch_attack = (dex - 10) * 2 + size_attack + b.get(BonusKind::Attack);
        block.mental_resistance = (wis - 10) * 2 + lvl * 3 + b.get(BonusKind::MentalResistance);
        block.physical_resistance = (con - 10) * 2 + lvl * 3 + b.get(BonusKind::PhysicalResistance);
        block.reflex_resistance = (dex - 10) * 2 + lvl * 3 + b.get(BonusKind::ReflexResistance);
        block.weight_limit = constants.creature.weight_limit_base
            + (str - 10) * constants.creature.weight_limit_per_str;
        block.default_base_weapon = constants.defaults.base_weapon.clone();
        block.default_armor_type = constants.defaults.armor_type.clone();
        block.bonuses = self.bonuses.clone();
    }
}
