//! Prelude module for convenient imports
//!
//! ```rust
//! use creature_core::prelude::*;
//! ```

// Core types
pub use crate::bonus::{Bonus, BonusKind};
pub use crate::stat_block::StatBlock;
pub use crate::types::{AttributeScores, EquipSlot, ItemType, Size};

// Effects
pub use crate::effect::{Effect, EffectHooks, EffectId, HookContext};

// Creatures
pub use crate::creature::{ChangeKind, Creature, CreatureObserver};
pub use crate::equipment::{EquipError, EquipFailure};
pub use crate::item::Item;
pub use crate::vitality::{DamageOutcome, VitalStatus, VitalityState};

// Config
pub use crate::config::RuleData;
