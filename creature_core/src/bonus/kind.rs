//! BonusKind - The closed set of bonus categories

use serde::{Deserialize, Serialize};

use crate::types::Attribute;

/// How multiple bonuses of one kind combine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stacking {
    /// Values are summed
    Additive,
    /// Values are summed, then clamped to the range
    Capped { min: i32, max: i32 },
    /// Largest single value wins
    Highest,
}

/// Bonus category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusKind {
    // === Attributes ===
    BaseStr,
    BaseDex,
    BaseCon,
    BaseInt,
    BaseWis,
    BaseCha,
    Str,
    Dex,
    Con,
    Int,
    Wis,
    Cha,

    // === Hit points ===
    MaxHp,
    TemporaryHp,

    // === Defense ===
    ArmorClass,
    DeflectionArmorClass,
    NaturalArmorClass,
    ArmorPenalty,
    /// Keyed by armor type
    ArmorTypeArmorClass,
    /// Keyed by armor type
    ArmorTypeArmorPenalty,
    /// Keyed by armor type
    ArmorTypeMovementPenalty,
    MentalResistance,
    PhysicalResistance,
    ReflexResistance,
    /// Keyed by damage type
    DamageReduction,
    /// Keyed by damage type
    DamageImmunity,

    // === Offense ===
    Attack,
    MainHandAttack,
    OffHandAttack,
    RangedAttack,
    ShieldAttack,
    DualWieldAttack,
    /// Keyed by base weapon
    BaseWeaponAttack,
    /// Keyed by base weapon
    BaseWeaponSpeed,
    Damage,
    MainHandDamage,
    OffHandDamage,
    RangedDamage,
    AttackCost,

    // === Movement and timing ===
    Initiative,
    Movement,
    ActionPoint,
    ActionPointEquipHands,

    // === Capabilities ===
    Immobilized,
    Helpless,
    ImmobilizationImmunity,
    DualWieldTraining,
    /// Keyed by base weapon
    WeaponProficiency,
    /// Keyed by armor type
    ArmorProficiency,
    CurseBypass,
}

impl BonusKind {
    /// Stacking rule for this kind
    pub fn stacking(self) -> Stacking {
        match self {
            BonusKind::DamageImmunity => Stacking::Capped { min: -100, max: 100 },
            BonusKind::DamageReduction => Stacking::Highest,
            _ => Stacking::Additive,
        }
    }

    /// Permanent attribute layer for an attribute
    pub fn base_attribute(attribute: Attribute) -> BonusKind {
        match attribute {
            Attribute::Str => BonusKind::BaseStr,
            Attribute::Dex => BonusKind::BaseDex,
            Attribute::Con => BonusKind::BaseCon,
            Attribute::Int => BonusKind::BaseInt,
            Attribute::Wis => BonusKind::BaseWis,
            Attribute::Cha => BonusKind::BaseCha,
        }
    }

    /// Transient attribute layer for an attribute
    pub fn attribute(attribute: Attribute) -> BonusKind {
        match attribute {
            Attribute::Str => BonusKind::Str,
            Attribute::Dex => BonusKind::Dex,
            Attribute::Con => BonusKind::Con,
            Attribute::Int => BonusKind::Int,
            Attribute::Wis => BonusKind::Wis,
            Attribute::Cha => BonusKind::Cha,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stacking_rules() {
        assert_eq!(BonusKind::Attack.stacking(), Stacking::Additive);
        assert_eq!(BonusKind::DamageReduction.stacking(), Stacking::Highest);
        assert!(matches!(
            BonusKind::DamageImmunity.stacking(),
            Stacking::Capped { max: 100, .. }
        ));
    }

    #[test]
    fn test_serde_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            kind: BonusKind,
        }

        let parsed: Wrapper = toml::from_str("kind = \"dual_wield_training\"").unwrap();
        assert_eq!(parsed.kind, BonusKind::DualWieldTraining);
    }
}
