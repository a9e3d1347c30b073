//! Rule constants configuration

use serde::{Deserialize, Serialize};

/// Tunable rule constants
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RuleConstants {
    #[serde(default)]
    pub vitality: VitalityConstants,
    #[serde(default)]
    pub action_points: ActionPointConstants,
    #[serde(default)]
    pub creature: CreatureConstants,
    #[serde(default)]
    pub defaults: DefaultConstants,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VitalityConstants {
    /// Hit points at or below which a creature is dead
    #[serde(default = "default_death_threshold")]
    pub death_threshold: i32,
    /// Hit points after being raised
    #[serde(default = "default_raise_hp")]
    pub raise_hp: i32,
    /// Experience lost per character level when raised
    #[serde(default = "default_death_xp_penalty")]
    pub death_xp_penalty_per_level: u32,
    /// Max HP divisor for healing between encounters
    #[serde(default = "default_healing_factor")]
    pub outside_combat_healing_factor: i32,
}

impl Default for VitalityConstants {
    fn default() -> Self {
        VitalityConstants {
            death_threshold: -20,
            raise_hp: 1,
            death_xp_penalty_per_level: 100,
            outside_combat_healing_factor: 4,
        }
    }
}

fn default_death_threshold() -> i32 {
    -20
}
fn default_raise_hp() -> i32 {
    1
}
fn default_death_xp_penalty() -> u32 {
    100
}
fn default_healing_factor() -> i32 {
    4
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPointConstants {
    /// Action points at the start of a turn
    #[serde(default = "default_base_action_points")]
    pub base_action_points: i32,
    /// Cost to equip weapons, shields and accessories
    #[serde(default = "default_equip_item_cost")]
    pub equip_item_cost: i32,
    /// Cost to equip body armor
    #[serde(default = "default_equip_armor_cost")]
    pub equip_armor_cost: i32,
    /// Attack cost with no weapon in the main hand
    #[serde(default = "default_unarmed_attack_cost")]
    pub unarmed_attack_cost: i32,
}

impl Default for ActionPointConstants {
    fn default() -> Self {
        ActionPointConstants {
            base_action_points: 10000,
            equip_item_cost: 3000,
            equip_armor_cost: 6000,
            unarmed_attack_cost: 4000,
        }
    }
}

fn default_base_action_points() -> i32 {
    10000
}
fn default_equip_item_cost() -> i32 {
    3000
}
fn default_equip_armor_cost() -> i32 {
    6000
}
fn default_unarmed_attack_cost() -> i32 {
    4000
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureConstants {
    #[serde(default = "default_base_armor_class")]
    pub base_armor_class: i32,
    #[serde(default = "default_weight_limit_base")]
    pub weight_limit_base: i32,
    /// Weight limit gained per point of strength above 10
    #[serde(default = "default_weight_limit_per_str")]
    pub weight_limit_per_str: i32,
}

impl Default for CreatureConstants {
    fn default() -> Self {
        CreatureConstants {
            base_armor_class: 50,
            weight_limit_base: 10000,
            weight_limit_per_str: 1000,
        }
    }
}

fn default_base_armor_class() -> i32 {
    50
}
fn default_weight_limit_base() -> i32 {
    10000
}
fn default_weight_limit_per_str() -> i32 {
    1000
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultConstants {
    /// Base weapon every creature is proficient with
    #[serde(default = "default_base_weapon")]
    pub base_weapon: String,
    /// Armor type every creature is proficient with
    #[serde(default = "default_armor_type")]
    pub armor_type: String,
}

impl Default for DefaultConstants {
    fn default() -> Self {
        DefaultConstants {
            base_weapon: default_base_weapon(),
            armor_type: default_armor_type(),
        }
    }
}

fn default_base_weapon() -> String {
    "unarmed".to_string()
}
fn default_armor_type() -> String {
    "none".to_string()
}
