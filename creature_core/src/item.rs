//! Item - Equippable item instances and their enchantments

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::effect::{Effect, EffectError, EffectId, EffectSet, HookContext};
use crate::types::{EntityRef, Handedness, ItemType, Size, WeaponType};

/// Weapon properties of an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponProps {
    /// Base weapon id, used for proficiency and per-weapon bonuses
    pub base_weapon: String,
    pub weapon_type: WeaponType,
    /// Handedness for a wielder of the same size as the weapon
    pub handedness: Handedness,
    #[serde(default)]
    pub size: Size,
    /// Action points per attack
    pub attack_cost: i32,
}

/// Armor properties of an item (armor, gloves, helmet, boots, shields)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmorProps {
    pub armor_type: String,
    #[serde(default)]
    pub armor_class: i32,
    /// Percentage penalty to dexterity armor class
    #[serde(default)]
    pub armor_penalty: i32,
    /// Percentage penalty to movement
    #[serde(default)]
    pub movement_penalty: i32,
    /// Attack penalty while carried, shields only
    #[serde(default)]
    pub shield_attack_penalty: i32,
}

/// Callbacks fired when an item changes hands
pub trait ItemHooks: Send + Sync {
    fn on_equipped(&self, _item: &Item, _ctx: &mut HookContext) {}
    fn on_unequipped(&self, _item: &Item, _ctx: &mut HookContext) {}
}

/// An item instance
pub struct Item {
    /// Instance id
    pub id: String,
    /// Template this item was created from
    pub template_id: String,
    pub name: String,
    pub item_type: ItemType,
    pub quality: Option<String>,
    pub cursed: bool,
    pub weapon: Option<WeaponProps>,
    pub armor: Option<ArmorProps>,
    enchantments: EffectSet,
    owner: Option<String>,
    hooks: Option<Arc<dyn ItemHooks>>,
}

impl Item {
    pub fn new(id: impl Into<String>, template_id: impl Into<String>, item_type: ItemType) -> Self {
        let id = id.into();
        let template_id = template_id.into();
        Item {
            enchantments: EffectSet::new(EntityRef::Item(id.clone())),
            name: template_id.clone(),
            id,
            template_id,
            item_type,
            quality: None,
            cursed: false,
            weapon: None,
            armor: None,
            owner: None,
            hooks: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_quality(mut self, quality: impl Into<String>) -> Self {
        self.quality = Some(quality.into());
        self
    }

    pub fn with_curse(mut self) -> Self {
        self.cursed = true;
        self
    }

    pub fn with_weapon(mut self, weapon: WeaponProps) -> Self {
        self.weapon = Some(weapon);
        self
    }

    pub fn with_armor(mut self, armor: ArmorProps) -> Self {
        self.armor = Some(armor);
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn ItemHooks>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Add a permanent enchantment (builder style)
    ///
    /// Fails only if the effect was already applied somewhere else.
    pub fn with_enchantment(mut self, enchantment: Effect) -> Result<Self, EffectError> {
        self.enchantments.add(enchantment)?;
        Ok(self)
    }

    pub fn enchant(&mut self, effect: Effect) -> Result<EffectId, EffectError> {
        self.enchantments.add(effect)
    }

    pub fn enchantments(&self) -> &EffectSet {
        &self.enchantments
    }

    pub(crate) fn enchantments_mut(&mut self) -> &mut EffectSet {
        &mut self.enchantments
    }

    /// Creature currently wearing this item
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub fn is_equipped(&self) -> bool {
        self.owner.is_some()
    }

    pub(crate) fn set_owner(&mut self, owner: Option<String>) {
        self.owner = owner;
    }

    pub(crate) fn hooks(&self) -> Option<Arc<dyn ItemHooks>> {
        self.hooks.clone()
    }

    /// Weapon handedness for a wielder of the given size
    pub fn handedness_for(&self, wielder: Size) -> Option<Handedness> {
        self.weapon
            .as_ref()
            .map(|w| w.handedness.relative_to(w.size.ordinal() - wielder.ordinal()))
    }

    pub fn is_melee_weapon(&self) -> bool {
        self.weapon.as_ref().map_or(false, |w| w.weapon_type.is_melee())
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("id", &self.id)
            .field("template_id", &self.template_id)
            .field("item_type", &self.item_type)
            .field("quality", &self.quality)
            .field("cursed", &self.cursed)
            .field("weapon", &self.weapon)
            .field("armor", &self.armor)
            .field("enchantments", &self.enchantments.len())
            .field("owner", &self.owner)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bonus::{Bonus, BonusKind};

    fn greatsword() -> Item {
        Item::new("sword-1", "greatsword", ItemType::Weapon).with_weapon(WeaponProps {
            base_weapon: "greatsword".to_string(),
            weapon_type: WeaponType::Melee,
            handedness: Handedness::TwoHanded,
            size: Size::Medium,
            attack_cost: 3000,
        })
    }

    #[test]
    fn test_handedness_depends_on_wielder_size() {
        let sword = greatsword();
        assert_eq!(sword.handedness_for(Size::Medium), Some(Handedness::TwoHanded));
        assert_eq!(sword.handedness_for(Size::Large), Some(Handedness::OneHanded));
        assert_eq!(sword.handedness_for(Size::Small), Some(Handedness::None));
    }

    #[test]
    fn test_enchantments_target_the_item() {
        let sword = greatsword()
            .with_enchantment(Effect::new("keen", "Keen").with_bonus(Bonus::flat(BonusKind::Attack, 1)))
            .unwrap();

        let enchantment = sword.enchantments().iter().next().unwrap();
        assert_eq!(enchantment.target(), Some(&EntityRef::Item("sword-1".to_string())));
        assert_eq!(sword.enchantments().bonuses().get(BonusKind::Attack), 1);
    }

    #[test]
    fn test_new_item_is_unowned() {
        let sword = greatsword();
        assert!(!sword.is_equipped());
        assert!(sword.owner().is_none());
        assert!(sword.is_melee_weapon());
    }
}
