//! Equipment - Equip slots, the unequipped list and the rules that move items between them

mod error;

pub use error::{EquipError, EquipFailure};

use crate::effect::{HookCommand, HookContext};
use crate::item::Item;
use crate::types::{EntityRef, EquipSlot, Handedness, ItemType, Size};

/// What the equipment rules need to know about the creature
pub trait Wielder {
    fn id(&self) -> &str;
    fn size(&self) -> Size;
    fn has_weapon_proficiency(&self, base_weapon: &str) -> bool;
    fn has_armor_proficiency(&self, armor_type: &str) -> bool;
    fn has_dual_wield_training(&self) -> bool;
    fn can_bypass_curses(&self) -> bool;
    /// Action point cost of equipping the item
    fn equip_cost(&self, item: &Item) -> i32;
    fn can_afford(&self, cost: i32) -> bool;
    fn action_points(&self) -> i32;
}

/// A validated equip request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquipPlan {
    /// Index in the unequipped list
    pub index: usize,
    pub slot: EquipSlot,
    /// Occupied slots that will be emptied first
    pub evict: Vec<EquipSlot>,
    pub cost: i32,
}

/// Result of a successful equip
#[derive(Debug)]
pub struct EquipOutcome {
    pub slot: EquipSlot,
    pub item_id: String,
    /// Slots emptied and the ids of the items moved back to the unequipped list
    pub evicted: Vec<(EquipSlot, String)>,
    pub cost: i32,
    /// Commands queued by item hooks
    pub commands: Vec<HookCommand>,
}

/// Result of a successful unequip
#[derive(Debug)]
pub struct UnequipOutcome {
    pub slot: EquipSlot,
    pub item_id: String,
    pub commands: Vec<HookCommand>,
}

/// The twelve equip slots of a creature plus its unequipped items
///
/// An item is either in exactly one slot or in the unequipped list, never
/// both. Slots are only changed through [`EquipmentSlots::equip`] and
/// [`EquipmentSlots::unequip`].
#[derive(Debug)]
pub struct EquipmentSlots {
    slots: [Option<Item>; EquipSlot::COUNT],
    unequipped: Vec<Item>,
}

impl Default for EquipmentSlots {
    fn default() -> Self {
        Self::new()
    }
}

impl EquipmentSlots {
    pub fn new() -> Self {
        EquipmentSlots {
            slots: std::array::from_fn(|_| None),
            unequipped: Vec::new(),
        }
    }

    /// Put an item in the unequipped list, returning its index
    pub fn add_item(&mut self, mut item: Item) -> usize {
        item.set_owner(None);
        self.unequipped.push(item);
        self.unequipped.len() - 1
    }

    /// Take an item out of the unequipped list
    pub fn take_item(&mut self, index: usize) -> Option<Item> {
        if index < self.unequipped.len() {
            Some(self.unequipped.remove(index))
        } else {
            None
        }
    }

    pub fn unequipped(&self) -> &[Item] {
        &self.unequipped
    }

    pub fn find_unequipped(&self, item_id: &str) -> Option<usize> {
        self.unequipped.iter().position(|i| i.id == item_id)
    }

    pub fn get(&self, slot: EquipSlot) -> Option<&Item> {
        self.slots[slot.index()].as_ref()
    }

    pub fn is_empty(&self, slot: EquipSlot) -> bool {
        self.slots[slot.index()].is_none()
    }

    /// Equipped items in slot order
    pub fn equipped(&self) -> impl Iterator<Item = (EquipSlot, &Item)> {
        EquipSlot::all()
            .iter()
            .filter_map(move |slot| self.get(*slot).map(|item| (*slot, item)))
    }

    pub(crate) fn equipped_mut(&mut self) -> impl Iterator<Item = &mut Item> {
        self.slots.iter_mut().filter_map(Option::as_mut)
    }

    pub(crate) fn unequipped_mut(&mut self) -> impl Iterator<Item = &mut Item> {
        self.unequipped.iter_mut()
    }

    /// Slot holding the item with this id
    pub fn slot_of(&self, item_id: &str) -> Option<EquipSlot> {
        self.equipped().find(|(_, item)| item.id == item_id).map(|(slot, _)| slot)
    }

    /// Proficiency and action point check for an unequipped item
    pub fn can_equip(&self, item: &Item, wielder: &dyn Wielder) -> bool {
        check_prerequisites(item, wielder).is_ok() && wielder.can_afford(wielder.equip_cost(item))
    }

    /// Validate an equip request without changing anything
    pub fn check_equip(
        &self,
        index: usize,
        slot_hint: Option<EquipSlot>,
        wielder: &dyn Wielder,
    ) -> Result<EquipPlan, EquipError> {
        let item = self.unequipped.get(index).ok_or(EquipError::NotInInventory(index))?;
        if item.is_equipped() {
            return Err(EquipError::AlreadyEquipped);
        }
        check_prerequisites(item, wielder)?;

        let slot = self.resolve_slot(item, slot_hint)?;
        let mut evict = Vec::new();

        match slot {
            EquipSlot::MainHand => {
                let handed = item.handedness_for(wielder.size());
                let off_is_weapon = self
                    .get(EquipSlot::OffHand)
                    .map_or(false, |off| off.item_type == ItemType::Weapon);

                if !self.is_empty(EquipSlot::OffHand)
                    && (handed == Some(Handedness::TwoHanded) || (!item.is_melee_weapon() && off_is_weapon))
                {
                    evict.push(EquipSlot::OffHand);
                }
            }
            EquipSlot::OffHand => {
                if let Some(main) = self.get(EquipSlot::MainHand) {
                    if main.handedness_for(wielder.size()) == Some(Handedness::TwoHanded) {
                        return Err(EquipError::HandsOccupied);
                    }
                }
                if item.item_type == ItemType::Weapon {
                    self.check_off_hand_weapon(item, wielder)?;
                }
            }
            _ => {}
        }
        if !self.is_empty(slot) {
            evict.insert(0, slot);
        }

        for evicted in &evict {
            if self.get(*evicted).map_or(false, |occupant| occupant.cursed) {
                return Err(EquipError::CursedOccupant(*evicted));
            }
        }

        let cost = wielder.equip_cost(item);
        if !wielder.can_afford(cost) {
            return Err(EquipError::InsufficientActionPoints {
                cost,
                available: wielder.action_points(),
            });
        }

        Ok(EquipPlan { index, slot, evict, cost })
    }

    /// Equip the unequipped item at `index`
    ///
    /// Occupants in the way go back to the unequipped list first. On error
    /// nothing changes.
    pub fn equip(
        &mut self,
        index: usize,
        slot_hint: Option<EquipSlot>,
        wielder: &dyn Wielder,
    ) -> Result<EquipOutcome, EquipError> {
        let plan = self.check_equip(index, slot_hint, wielder)?;
        let mut ctx = HookContext::new(EntityRef::Creature(wielder.id().to_string()));

        let mut item = self.unequipped.remove(plan.index);

        let mut evicted = Vec::new();
        for slot in &plan.evict {
            if let Some(old) = self.detach(*slot, &mut ctx) {
                tracing::debug!(creature = wielder.id(), ?slot, item = %old.id, "evicted");
                evicted.push((*slot, old.id.clone()));
                self.unequipped.push(old);
            }
        }

        item.set_owner(Some(wielder.id().to_string()));
        if let Some(hooks) = item.hooks() {
            hooks.on_equipped(&item, &mut ctx);
        }
        let item_id = item.id.clone();
        self.slots[plan.slot.index()] = Some(item);
        tracing::debug!(creature = wielder.id(), slot = ?plan.slot, item = %item_id, "equipped");

        Ok(EquipOutcome {
            slot: plan.slot,
            item_id,
            evicted,
            cost: plan.cost,
            commands: ctx.into_commands(),
        })
    }

    /// Move the item in `slot` back to the unequipped list
    pub fn unequip(&mut self, slot: EquipSlot, wielder: &dyn Wielder) -> Result<UnequipOutcome, EquipError> {
        let occupant = self.get(slot).ok_or(EquipError::SlotEmpty(slot))?;
        if occupant.cursed && !wielder.can_bypass_curses() {
            return Err(EquipError::CursedItem(slot));
        }

        let mut ctx = HookContext::new(EntityRef::Creature(wielder.id().to_string()));
        let item_id = match self.detach(slot, &mut ctx) {
            Some(item) => {
                let id = item.id.clone();
                self.unequipped.push(item);
                id
            }
            None => return Err(EquipError::SlotEmpty(slot)),
        };
        tracing::debug!(creature = wielder.id(), ?slot, item = %item_id, "unequipped");

        Ok(UnequipOutcome {
            slot,
            item_id,
            commands: ctx.into_commands(),
        })
    }

    /// Place an item straight into a slot, skipping every rule
    ///
    /// Only used when restoring saved equipment.
    pub(crate) fn restore(&mut self, slot: EquipSlot, mut item: Item, owner: &str) -> Option<Item> {
        item.set_owner(Some(owner.to_string()));
        self.slots[slot.index()].replace(item)
    }

    fn detach(&mut self, slot: EquipSlot, ctx: &mut HookContext) -> Option<Item> {
        let mut item = self.slots[slot.index()].take()?;
        if let Some(hooks) = item.hooks() {
            hooks.on_unequipped(&item, ctx);
        }
        item.set_owner(None);
        Some(item)
    }

    fn resolve_slot(&self, item: &Item, slot_hint: Option<EquipSlot>) -> Result<EquipSlot, EquipError> {
        let default = item.item_type.default_slot().ok_or(EquipError::NotEquippable)?;

        if let Some(hint) = slot_hint {
            return if item.item_type.fits(hint) {
                Ok(hint)
            } else {
                Err(EquipError::InvalidSlot(hint))
            };
        }

        if item.item_type != ItemType::Ring {
            return Ok(default);
        }

        let right = self.get(EquipSlot::RingRight);
        let left = self.get(EquipSlot::RingLeft);
        match (right, left) {
            (None, _) => Ok(EquipSlot::RingRight),
            (_, None) => Ok(EquipSlot::RingLeft),
            (_, Some(l)) if !l.cursed => Ok(EquipSlot::RingLeft),
            (Some(r), _) if !r.cursed => Ok(EquipSlot::RingRight),
            _ => Err(EquipError::CursedOccupant(EquipSlot::RingLeft)),
        }
    }

    fn check_off_hand_weapon(&self, item: &Item, wielder: &dyn Wielder) -> Result<(), EquipError> {
        if !wielder.has_dual_wield_training() {
            return Err(EquipError::DualWieldRequired);
        }
        match item.handedness_for(wielder.size()) {
            Some(Handedness::Light) | Some(Handedness::OneHanded) => {}
            _ => return Err(EquipError::OffHandIncompatible),
        }
        if !item.is_melee_weapon() {
            return Err(EquipError::OffHandIncompatible);
        }
        if let Some(main) = self.get(EquipSlot::MainHand) {
            if main.weapon.is_some() && !main.is_melee_weapon() {
                return Err(EquipError::OffHandIncompatible);
            }
        }
        Ok(())
    }
}

/// Proficiency and wieldability checks that do not depend on other slots
fn check_prerequisites(item: &Item, wielder: &dyn Wielder) -> Result<(), EquipError> {
    if item.item_type == ItemType::Item {
        return Err(EquipError::NotEquippable);
    }

    if item.item_type.is_armor_like() {
        if let Some(armor) = &item.armor {
            if !wielder.has_armor_proficiency(&armor.armor_type) {
                return Err(EquipError::MissingArmorProficiency(armor.armor_type.clone()));
            }
        }
    }

    if let Some(weapon) = &item.weapon {
        if item.handedness_for(wielder.size()) == Some(Handedness::None) {
            return Err(EquipError::TooLarge);
        }
        if !wielder.has_weapon_proficiency(&weapon.base_weapon) {
            return Err(EquipError::MissingWeaponProficiency(weapon.base_weapon.clone()));
        }
    }

    Ok(())
}
