//! RuleData - Read-only roles, races and templates injected into creatures

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use super::{ConfigError, RuleConstants};
use crate::bonus::{Bonus, BonusKind};
use crate::effect::{Effect, EffectHooks};
use crate::item::{ArmorProps, Item, ItemHooks, WeaponProps};
use crate::types::{AttributeScores, Handedness, ItemType, Size, WeaponType};

/// Level progression for a role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDef {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Hit points at first level when this is a creature's base role
    pub level1_hp: i32,
    pub hp_per_level: i32,
    #[serde(default)]
    pub attack_per_level: i32,
}

/// Racial baseline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceDef {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub size: Size,
    /// Action points per tile moved
    pub movement_cost: i32,
    /// Added to assigned attribute points, in str/dex/con/int/wis/cha order
    #[serde(default)]
    pub attributes: AttributeScores,
}

/// Blueprint for items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemTemplate {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub item_type: ItemType,
    #[serde(default)]
    pub cursed: bool,
    #[serde(default)]
    pub weapon: Option<WeaponProps>,
    #[serde(default)]
    pub armor: Option<ArmorProps>,
    /// Effect template ids applied as permanent enchantments
    #[serde(default)]
    pub enchantments: Vec<String>,
}

/// Blueprint for effects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectTemplate {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub bonuses: Vec<Bonus>,
    /// Rounds; absent for permanent effects
    #[serde(default)]
    pub duration: Option<u32>,
}

/// On-disk layout of a rules file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesFile {
    #[serde(default)]
    pub constants: RuleConstants,
    #[serde(default)]
    pub roles: Vec<RoleDef>,
    #[serde(default)]
    pub races: Vec<RaceDef>,
    #[serde(default)]
    pub items: Vec<ItemTemplate>,
    #[serde(default)]
    pub effects: Vec<EffectTemplate>,
}

/// Rule-data lookups shared by every creature
///
/// Script hooks cannot be expressed in TOML; attach them to templates with
/// [`RuleData::register_effect_hooks`] and [`RuleData::register_item_hooks`].
#[derive(Default)]
pub struct RuleData {
    pub constants: RuleConstants,
    roles: HashMap<String, RoleDef>,
    races: HashMap<String, RaceDef>,
    items: HashMap<String, ItemTemplate>,
    effects: HashMap<String, EffectTemplate>,
    effect_hooks: HashMap<String, Arc<dyn EffectHooks>>,
    item_hooks: HashMap<String, Arc<dyn ItemHooks>>,
}

impl RuleData {
    /// Create an empty rule set with default constants
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and validate from a parsed rules file
    pub fn from_file(file: RulesFile) -> Result<Self, ConfigError> {
        if file.constants.vitality.outside_combat_healing_factor <= 0 {
            return Err(ConfigError::ValidationError(
                "outside_combat_healing_factor must be positive".to_string(),
            ));
        }

        check_unique("role", file.roles.iter().map(|r| r.id.as_str()))?;
        check_unique("race", file.races.iter().map(|r| r.id.as_str()))?;
        check_unique("item", file.items.iter().map(|i| i.id.as_str()))?;
        check_unique("effect", file.effects.iter().map(|e| e.id.as_str()))?;

        let mut rules = RuleData {
            constants: file.constants,
            ..RuleData::default()
        };
        for effect in file.effects {
            rules.register_effect(effect);
        }
        for item in file.items {
            if let Some(missing) = item.enchantments.iter().find(|e| !rules.effects.contains_key(*e)) {
                return Err(ConfigError::ValidationError(format!(
                    "item '{}' references unknown enchantment '{}'",
                    item.id, missing
                )));
            }
            rules.register_item(item);
        }
        for role in file.roles {
            rules.register_role(role);
        }
        for race in file.races {
            rules.register_race(race);
        }

        Ok(rules)
    }

    pub fn register_role(&mut self, role: RoleDef) {
        self.roles.insert(role.id.clone(), role);
    }

    pub fn register_race(&mut self, race: RaceDef) {
        self.races.insert(race.id.clone(), race);
    }

    pub fn register_item(&mut self, item: ItemTemplate) {
        self.items.insert(item.id.clone(), item);
    }

    pub fn register_effect(&mut self, effect: EffectTemplate) {
        self.effects.insert(effect.id.clone(), effect);
    }

    pub fn register_effect_hooks(&mut self, template_id: impl Into<String>, hooks: Arc<dyn EffectHooks>) {
        self.effect_hooks.insert(template_id.into(), hooks);
    }

    pub fn register_item_hooks(&mut self, template_id: impl Into<String>, hooks: Arc<dyn ItemHooks>) {
        self.item_hooks.insert(template_id.into(), hooks);
    }

    pub fn role(&self, id: &str) -> Option<&RoleDef> {
        self.roles.get(id)
    }

    pub fn race(&self, id: &str) -> Option<&RaceDef> {
        self.races.get(id)
    }

    pub fn item_template(&self, id: &str) -> Option<&ItemTemplate> {
        self.items.get(id)
    }

    pub fn effect_template(&self, id: &str) -> Option<&EffectTemplate> {
        self.effects.get(id)
    }

    /// Instantiate an effect from its template
    pub fn create_effect(&self, template_id: &str) -> Option<Effect> {
        let template = self.effects.get(template_id)?;
        let mut effect = Effect::new(template.id.clone(), template.name.clone());
        for bonus in &template.bonuses {
            effect = effect.with_bonus(bonus.clone());
        }
        if let Some(rounds) = template.duration {
            effect = effect.with_duration(rounds);
        }
        if let Some(hooks) = self.effect_hooks.get(template_id) {
            effect = effect.with_hooks(hooks.clone());
        }
        Some(effect)
    }

    /// Instantiate an item from its template, with its enchantments applied
    pub fn create_item(&self, template_id: &str, instance_id: impl Into<String>) -> Option<Item> {
        let template = self.items.get(template_id)?;
        let mut item = self.create_bare_item(template_id, instance_id)?;

        for enchantment_id in &template.enchantments {
            match self.create_effect(enchantment_id) {
                Some(effect) => {
                    // A freshly created effect is always unapplied
                    let _ = item.enchant(effect);
                }
                None => tracing::warn!(item = template_id, enchantment = %enchantment_id, "unknown enchantment"),
            }
        }
        Some(item)
    }

    /// Instantiate an item from its template without enchantments
    pub(crate) fn create_bare_item(&self, template_id: &str, instance_id: impl Into<String>) -> Option<Item> {
        let template = self.items.get(template_id)?;
        let mut item = Item::new(instance_id, template.id.clone(), template.item_type)
            .with_name(template.name.clone());
        item.cursed = template.cursed;
        item.weapon = template.weapon.clone();
        item.armor = template.armor.clone();
        if let Some(hooks) = self.item_hooks.get(template_id) {
            item = item.with_hooks(hooks.clone());
        }
        Some(item)
    }

    /// Small built-in rule set
    pub fn with_defaults() -> Self {
        let mut rules = Self::new();

        rules.register_role(RoleDef {
            id: "fighter".to_string(),
            name: "Fighter".to_string(),
            level1_hp: 20,
            hp_per_level: 10,
            attack_per_level: 5,
        });
        rules.register_role(RoleDef {
            id: "adept".to_string(),
            name: "Adept".to_string(),
            level1_hp: 12,
            hp_per_level: 6,
            attack_per_level: 3,
        });

        rules.register_race(RaceDef {
            id: "human".to_string(),
            name: "Human".to_string(),
            size: Size::Medium,
            movement_cost: 1000,
            attributes: AttributeScores::default(),
        });
        rules.register_race(RaceDef {
            id: "halfling".to_string(),
            name: "Halfling".to_string(),
            size: Size::Small,
            movement_cost: 1250,
            attributes: AttributeScores::new(-2, 2, 0, 0, 0, 0),
        });

        rules.register_effect(EffectTemplate {
            id: "bless".to_string(),
            name: "Bless".to_string(),
            bonuses: vec![Bonus::flat(BonusKind::Attack, 5)],
            duration: Some(5),
        });
        rules.register_effect(EffectTemplate {
            id: "vigor".to_string(),
            name: "Vigor".to_string(),
            bonuses: vec![Bonus::flat(BonusKind::MaxHp, 5)],
            duration: None,
        });
        rules.register_effect(EffectTemplate {
            id: "false_life".to_string(),
            name: "False Life".to_string(),
            bonuses: vec![Bonus::flat(BonusKind::TemporaryHp, 10)],
            duration: Some(10),
        });
        rules.register_effect(EffectTemplate {
            id: "protection".to_string(),
            name: "Protection".to_string(),
            bonuses: vec![Bonus::flat(BonusKind::DeflectionArmorClass, 5)],
            duration: None,
        });
        rules.register_effect(EffectTemplate {
            id: "quickness".to_string(),
            name: "Quickness".to_string(),
            bonuses: vec![Bonus::percent(BonusKind::ActionPointEquipHands, 50)],
            duration: None,
        });
        rules.register_effect(EffectTemplate {
            id: "dual_wield_training".to_string(),
            name: "Dual Wield Training".to_string(),
            bonuses: vec![Bonus::flag(BonusKind::DualWieldTraining)],
            duration: None,
        });

        rules.register_effect(EffectTemplate {
            id: "martial_training".to_string(),
            name: "Martial Training".to_string(),
            bonuses: ["longsword", "greatsword", "dagger", "shortbow"]
                .iter()
                .map(|w| Bonus::flag(BonusKind::WeaponProficiency).with_subtype(*w))
                .chain(
                    ["light", "medium"]
                        .iter()
                        .map(|a| Bonus::flag(BonusKind::ArmorProficiency).with_subtype(*a)),
                )
                .collect(),
            duration: None,
        });

        rules.register_item(weapon_template("longsword", "Longsword", WeaponType::Melee, Handedness::OneHanded, 5000));
        rules.register_item(weapon_template("greatsword", "Greatsword", WeaponType::Melee, Handedness::TwoHanded, 6000));
        rules.register_item(weapon_template("dagger", "Dagger", WeaponType::Melee, Handedness::Light, 4000));
        rules.register_item(weapon_template("shortbow", "Shortbow", WeaponType::Bow, Handedness::TwoHanded, 5000));
        rules.register_item(armor_template("leather_armor", "Leather Armor", ItemType::Armor, "light", 10, 10));
        rules.register_item(armor_template("chain_mail", "Chain Mail", ItemType::Armor, "medium", 25, 30));
        rules.register_item(armor_template("buckler", "Buckler", ItemType::Shield, "light", 5, 5));
        rules.register_item(ItemTemplate {
            id: "ring_of_protection".to_string(),
            name: "Ring of Protection".to_string(),
            item_type: ItemType::Ring,
            cursed: false,
            weapon: None,
            armor: None,
            enchantments: vec!["protection".to_string()],
        });
        rules.register_item(ItemTemplate {
            id: "ring_of_binding".to_string(),
            name: "Ring of Binding".to_string(),
            item_type: ItemType::Ring,
            cursed: true,
            weapon: None,
            armor: None,
            enchantments: Vec::new(),
        });

        rules
    }
}

impl fmt::Debug for RuleData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleData")
            .field("constants", &self.constants)
            .field("roles", &self.roles.len())
            .field("races", &self.races.len())
            .field("items", &self.items.len())
            .field("effects", &self.effects.len())
            .finish()
    }
}

fn check_unique<'a>(what: &str, ids: impl Iterator<Item = &'a str>) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ConfigError::ValidationError(format!("duplicate {} id '{}'", what, id)));
        }
    }
    Ok(())
}

fn weapon_template(
    id: &str,
    name: &str,
    weapon_type: WeaponType,
    handedness: Handedness,
    attack_cost: i32,
) -> ItemTemplate {
    ItemTemplate {
        id: id.to_string(),
        name: name.to_string(),
        item_type: ItemType::Weapon,
        cursed: false,
        weapon: Some(WeaponProps {
            base_weapon: id.to_string(),
            weapon_type,
            handedness,
            size: Size::Medium,
            attack_cost,
        }),
        armor: None,
        enchantments: Vec::new(),
    }
}

fn armor_template(
    id: &str,
    name: &str,
    item_type: ItemType,
    armor_type: &str,
    armor_class: i32,
    armor_penalty: i32,
) -> ItemTemplate {
    ItemTemplate {
        id: id.to_string(),
        name: name.to_string(),
        item_type,
        cursed: false,
        weapon: None,
        armor: Some(ArmorProps {
            armor_type: armor_type.to_string(),
            armor_class,
            armor_penalty,
            movement_penalty: armor_penalty / 2,
            shield_attack_penalty: if item_type == ItemType::Shield { 5 } else { 0 },
        }),
        enchantments: Vec::new(),
    }
}

/// Load rule data from a TOML file
pub fn load_rules(path: &Path) -> Result<RuleData, ConfigError> {
    let file: RulesFile = super::load_toml(path)?;
    RuleData::from_file(file)
}

/// Load rule data from a TOML string
pub fn parse_rules(content: &str) -> Result<RuleData, ConfigError> {
    let file: RulesFile = super::parse_toml(content)?;
    RuleData::from_file(file)
}
