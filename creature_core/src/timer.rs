//! RoundTimer - Per-turn action point budget

use serde::{Deserialize, Serialize};

use crate::config::ActionPointConstants;
use crate::item::Item;
use crate::stat_block::{scale_percent, StatBlock};
use crate::types::ItemType;

/// Action points available to a creature this turn
///
/// Outside turn mode every action is free and nothing is deducted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundTimer {
    max_ap: i32,
    ap: i32,
    turn_mode: bool,
}

impl RoundTimer {
    pub fn new(constants: &ActionPointConstants) -> Self {
        RoundTimer {
            max_ap: constants.base_action_points,
            ap: constants.base_action_points,
            turn_mode: false,
        }
    }

    /// Refill at the start of a turn
    pub fn reset(&mut self, stats: &StatBlock, constants: &ActionPointConstants) {
        self.max_ap = constants.base_action_points + stats.bonus_action_points() * 100;
        self.ap = self.max_ap;
    }

    pub fn set_turn_mode(&mut self, turn_mode: bool) {
        self.turn_mode = turn_mode;
    }

    pub fn turn_mode(&self) -> bool {
        self.turn_mode
    }

    pub fn ap(&self) -> i32 {
        self.ap
    }

    pub fn max_ap(&self) -> i32 {
        self.max_ap
    }

    pub fn can_perform(&self, cost: i32, helpless: bool) -> bool {
        if helpless {
            return false;
        }
        !self.turn_mode || self.ap >= cost
    }

    /// Deduct the cost of an action, in turn mode only
    pub fn perform(&mut self, cost: i32) {
        if self.turn_mode {
            self.ap -= cost;
        }
    }

    /// Action point cost of equipping an item
    pub fn equip_cost(item: &Item, stats: &StatBlock, constants: &ActionPointConstants) -> i32 {
        match item.item_type {
            ItemType::Weapon | ItemType::Shield => {
                scale_percent(constants.equip_item_cost, -stats.equip_hands_discount()).max(0)
            }
            ItemType::Armor => constants.equip_armor_cost,
            _ => constants.equip_item_cost,
        }
    }
}
