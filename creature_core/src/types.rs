//! Core types shared across the creature engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Equipment slot for gear
///
/// The discriminants are the stable slot indices used by saved games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipSlot {
    MainHand = 0,
    OffHand = 1,
    Armor = 2,
    Gloves = 3,
    Helmet = 4,
    Cloak = 5,
    Boots = 6,
    Belt = 7,
    Amulet = 8,
    RingRight = 9,
    RingLeft = 10,
    Quiver = 11,
}

impl EquipSlot {
    /// Number of equipment slots on a creature
    pub const COUNT: usize = 12;

    /// Get all equipment slots in index order
    pub fn all() -> &'static [EquipSlot] {
        &[
            EquipSlot::MainHand,
            EquipSlot::OffHand,
            EquipSlot::Armor,
            EquipSlot::Gloves,
            EquipSlot::Helmet,
            EquipSlot::Cloak,
            EquipSlot::Boots,
            EquipSlot::Belt,
            EquipSlot::Amulet,
            EquipSlot::RingRight,
            EquipSlot::RingLeft,
            EquipSlot::Quiver,
        ]
    }

    /// Stable index of this slot
    pub fn index(self) -> usize {
        self as usize
    }

    /// Slot for a stable index
    pub fn from_index(index: usize) -> Option<EquipSlot> {
        Self::all().get(index).copied()
    }

    pub fn is_ring(self) -> bool {
        matches!(self, EquipSlot::RingRight | EquipSlot::RingLeft)
    }
}

/// Item category, which decides the slot an item can occupy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    /// Plain inventory item, never equippable
    Item,
    Weapon,
    Armor,
    Gloves,
    Helmet,
    Cloak,
    Boots,
    Belt,
    Amulet,
    Ring,
    Ammo,
    Shield,
}

impl ItemType {
    /// Default slot for this item type, if it can be equipped at all
    pub fn default_slot(self) -> Option<EquipSlot> {
        match self {
            ItemType::Item => None,
            ItemType::Weapon => Some(EquipSlot::MainHand),
            ItemType::Shield => Some(EquipSlot::OffHand),
            ItemType::Armor => Some(EquipSlot::Armor),
            ItemType::Gloves => Some(EquipSlot::Gloves),
            ItemType::Helmet => Some(EquipSlot::Helmet),
            ItemType::Cloak => Some(EquipSlot::Cloak),
            ItemType::Boots => Some(EquipSlot::Boots),
            ItemType::Belt => Some(EquipSlot::Belt),
            ItemType::Amulet => Some(EquipSlot::Amulet),
            ItemType::Ring => Some(EquipSlot::RingRight),
            ItemType::Ammo => Some(EquipSlot::Quiver),
        }
    }

    /// Whether items of this type may sit in the given slot
    pub fn fits(self, slot: EquipSlot) -> bool {
        match self {
            ItemType::Weapon => matches!(slot, EquipSlot::MainHand | EquipSlot::OffHand),
            ItemType::Ring => slot.is_ring(),
            other => other.default_slot() == Some(slot),
        }
    }

    /// Item types that carry an armor type and need armor proficiency
    pub fn is_armor_like(self) -> bool {
        matches!(
            self,
            ItemType::Armor | ItemType::Gloves | ItemType::Helmet | ItemType::Boots | ItemType::Shield
        )
    }
}

/// Weapon delivery category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponType {
    Melee,
    Thrown,
    Sling,
    Crossbow,
    Bow,
}

impl WeaponType {
    pub fn is_melee(self) -> bool {
        self == WeaponType::Melee
    }
}

/// How many hands a weapon needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handedness {
    Light,
    OneHanded,
    TwoHanded,
    /// Too large to wield at all
    None,
}

impl Handedness {
    /// Handedness for a wielder whose size differs from the weapon's
    ///
    /// `size_difference` is weapon size minus wielder size.
    pub fn relative_to(self, size_difference: i32) -> Handedness {
        match size_difference {
            -2 => Handedness::Light,
            -1 => match self {
                Handedness::Light | Handedness::OneHanded => Handedness::Light,
                Handedness::TwoHanded => Handedness::OneHanded,
                Handedness::None => Handedness::None,
            },
            0 => self,
            1 => match self {
                Handedness::Light => Handedness::OneHanded,
                Handedness::OneHanded => Handedness::TwoHanded,
                _ => Handedness::None,
            },
            2 => match self {
                Handedness::Light => Handedness::TwoHanded,
                _ => Handedness::None,
            },
            _ => Handedness::None,
        }
    }
}

/// Creature and weapon size category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Size {
    Tiny,
    Small,
    Medium,
    Large,
    Huge,
}

impl Size {
    /// Ordinal used for size differences
    pub fn ordinal(self) -> i32 {
        self as i32
    }

    /// Armor class modifier for this size
    pub fn armor_class_modifier(self) -> i32 {
        match self {
            Size::Tiny => 10,
            Size::Small => 5,
            Size::Medium => 0,
            Size::Large => -5,
            Size::Huge => -10,
        }
    }

    /// Attack modifier for this size
    pub fn attack_modifier(self) -> i32 {
        self.armor_class_modifier()
    }
}

impl Default for Size {
    fn default() -> Self {
        Size::Medium
    }
}

/// The six creature attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Str,
    Dex,
    Con,
    Int,
    Wis,
    Cha,
}

impl Attribute {
    pub fn all() -> &'static [Attribute] {
        &[
            Attribute::Str,
            Attribute::Dex,
            Attribute::Con,
            Attribute::Int,
            Attribute::Wis,
            Attribute::Cha,
        ]
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Fixed-size set of attribute scores, indexed by [`Attribute`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeScores(pub [i32; 6]);

impl AttributeScores {
    pub fn new(str: i32, dex: i32, con: i32, int: i32, wis: i32, cha: i32) -> Self {
        AttributeScores([str, dex, con, int, wis, cha])
    }

    /// All attributes at the same value
    pub fn uniform(value: i32) -> Self {
        AttributeScores([value; 6])
    }

    pub fn get(&self, attribute: Attribute) -> i32 {
        self.0[attribute.index()]
    }

    pub fn set(&mut self, attribute: Attribute, value: i32) {
        self.0[attribute.index()] = value;
    }
}

impl Default for AttributeScores {
    fn default() -> Self {
        AttributeScores([0; 6])
    }
}

/// Weak reference to an entity that an effect can target
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityRef {
    Creature(String),
    Item(String),
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityRef::Creature(id) => write!(f, "creature:{}", id),
            EntityRef::Item(id) => write!(f, "item:{}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_indices_are_stable() {
        for (i, slot) in EquipSlot::all().iter().enumerate() {
            assert_eq!(slot.index(), i);
            assert_eq!(EquipSlot::from_index(i), Some(*slot));
        }
        assert_eq!(EquipSlot::all().len(), EquipSlot::COUNT);
        assert_eq!(EquipSlot::from_index(12), None);
    }

    #[test]
    fn test_item_type_fits() {
        assert!(ItemType::Weapon.fits(EquipSlot::OffHand));
        assert!(ItemType::Ring.fits(EquipSlot::RingLeft));
        assert!(!ItemType::Shield.fits(EquipSlot::MainHand));
        assert!(!ItemType::Item.fits(EquipSlot::MainHand));
    }

    #[test]
    fn test_relative_handedness() {
        assert_eq!(Handedness::TwoHanded.relative_to(-2), Handedness::Light);
        assert_eq!(Handedness::TwoHanded.relative_to(-1), Handedness::OneHanded);
        assert_eq!(Handedness::OneHanded.relative_to(1), Handedness::TwoHanded);
        assert_eq!(Handedness::TwoHanded.relative_to(1), Handedness::None);
        assert_eq!(Handedness::Light.relative_to(2), Handedness::TwoHanded);
        assert_eq!(Handedness::OneHanded.relative_to(2), Handedness::None);
        assert_eq!(Handedness::Light.relative_to(3), Handedness::None);
    }
}
