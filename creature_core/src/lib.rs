//! creature_core - Effect, bonus, equipment and vitality engine for game creatures
//!
//! This library provides:
//! - BonusAggregate: Typed modifiers with per-kind stacking
//! - EffectSet: Timed and permanent effects with deferred hook commands
//! - EquipmentSlots: Twelve equip slots and the rules for filling them
//! - StatBlock: Derived stats rebuilt from prioritized sources
//! - VitalityState: Hit points, temporary hit points, dying and death
//! - Creature: Orchestration of all of the above against injected rule data

pub mod bonus;
pub mod config;
pub mod creature;
pub mod effect;
pub mod equipment;
pub mod item;
pub mod persistence;
pub mod prelude;
pub mod source;
pub mod stat_block;
pub mod timer;
pub mod types;
pub mod vitality;

// Re-export core types for convenience
pub use bonus::{Bonus, BonusAggregate, BonusKind, BonusValue, Stacking};
pub use config::{load_rules, parse_rules, ConfigError, RuleConstants, RuleData};
pub use creature::{ChangeKind, Creature, CreatureBuilder, CreatureError, CreatureObserver};
pub use effect::{Effect, EffectError, EffectHooks, EffectId, EffectSet, EffectState, HookCommand, HookContext};
pub use equipment::{EquipError, EquipFailure, EquipOutcome, EquipmentSlots, UnequipOutcome, Wielder};
pub use item::{ArmorProps, Item, ItemHooks, WeaponProps};
pub use persistence::CreatureRecord;
pub use source::{BaseStatsSource, GearSource, RoleSource, StatSource};
pub use stat_block::{CheckResult, Resistance, StatAccumulator, StatBlock, StatValue};
pub use timer::RoundTimer;
pub use types::{Attribute, AttributeScores, EntityRef, EquipSlot, Handedness, ItemType, Size, WeaponType};
pub use vitality::{DamageOutcome, Summoned, VitalStatus, VitalityState};
