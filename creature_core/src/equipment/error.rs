//! Equip failures and their reason classes

use thiserror::Error;

use crate::types::EquipSlot;

/// Broad class of an equip failure, used to pick the message shown to players
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquipFailure {
    /// A cursed item is in the way
    Curse,
    /// The creature cannot use the item in that configuration
    Prerequisites,
    /// Not enough action points
    Resource,
    /// The request itself was invalid
    Precondition,
}

/// Why an equip or unequip request was refused
///
/// A refused request never changes any state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EquipError {
    #[error("Slot {0:?} holds a cursed item")]
    CursedOccupant(EquipSlot),
    #[error("The item in {0:?} is cursed and cannot be removed")]
    CursedItem(EquipSlot),
    #[error("Missing weapon proficiency: {0}")]
    MissingWeaponProficiency(String),
    #[error("Missing armor proficiency: {0}")]
    MissingArmorProficiency(String),
    #[error("Off-hand weapons require dual wield training")]
    DualWieldRequired,
    #[error("Weapon cannot be wielded in the off hand")]
    OffHandIncompatible,
    #[error("The main hand weapon needs both hands")]
    HandsOccupied,
    #[error("Item cannot be equipped")]
    NotEquippable,
    #[error("Weapon is too large to wield")]
    TooLarge,
    #[error("Needs {cost} action points, {available} available")]
    InsufficientActionPoints { cost: i32, available: i32 },
    #[error("No unequipped item at index {0}")]
    NotInInventory(usize),
    #[error("Item is already equipped")]
    AlreadyEquipped,
    #[error("Item cannot be placed in {0:?}")]
    InvalidSlot(EquipSlot),
    #[error("Slot {0:?} is empty")]
    SlotEmpty(EquipSlot),
}

impl EquipError {
    pub fn reason(&self) -> EquipFailure {
        match self {
            EquipError::CursedOccupant(_) | EquipError::CursedItem(_) => EquipFailure::Curse,
            EquipError::MissingWeaponProficiency(_)
            | EquipError::MissingArmorProficiency(_)
            | EquipError::DualWieldRequired
            | EquipError::OffHandIncompatible
            | EquipError::HandsOccupied
            | EquipError::NotEquippable
            | EquipError::TooLarge => EquipFailure::Prerequisites,
            EquipError::InsufficientActionPoints { .. } => EquipFailure::Resource,
            EquipError::NotInInventory(_)
            | EquipError::AlreadyEquipped
            | EquipError::InvalidSlot(_)
            | EquipError::SlotEmpty(_) => EquipFailure::Precondition,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_classes() {
        assert_eq!(EquipError::CursedOccupant(EquipSlot::RingLeft).reason(), EquipFailure::Curse);
        assert_eq!(EquipError::HandsOccupied.reason(), EquipFailure::Prerequisites);
        assert_eq!(
            EquipError::InsufficientActionPoints { cost: 3000, available: 100 }.reason(),
            EquipFailure::Resource
        );
        assert_eq!(EquipError::SlotEmpty(EquipSlot::Belt).reason(), EquipFailure::Precondition);
    }

    #[test]
    fn test_messages() {
        let err = EquipError::MissingWeaponProficiency("greatsword".to_string());
        assert_eq!(err.to_string(), "Missing weapon proficiency: greatsword");
    }
}
