//! Effects - Bundles of bonuses with a lifetime and lifecycle hooks

mod hooks;
mod set;

pub use hooks::{EffectHooks, HookCommand, HookContext};
pub use set::{EffectSet, MAX_HOOK_DEPTH};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::bonus::{Bonus, BonusAggregate};
use crate::types::EntityRef;

/// Identifier assigned to an effect by the set it is attached to
///
/// Ids grow monotonically within one set, so a lower id is an older effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EffectId(pub u64);

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle of an effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectState {
    Unapplied,
    Active,
    /// Terminal; a removed effect is never reattached
    Removed,
}

/// Effect set precondition failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EffectError {
    #[error("Effect is already applied or was removed")]
    AlreadyApplied,
    #[error("Effect {0} is not attached to this set")]
    NotFound(EffectId),
    #[error("Unknown effect template: {0}")]
    UnknownTemplate(String),
}

/// A time-bounded or permanent bundle of bonuses
pub struct Effect {
    id: Option<EffectId>,
    /// Template this effect was created from
    pub template_id: String,
    /// Display name
    pub name: String,
    bonuses: BonusAggregate,
    /// Rounds remaining, `None` for permanent effects
    duration: Option<u32>,
    state: EffectState,
    target: Option<EntityRef>,
    animations_active: bool,
    hooks: Option<Arc<dyn EffectHooks>>,
}

impl Effect {
    /// Create a permanent effect with no bonuses
    pub fn new(template_id: impl Into<String>, name: impl Into<String>) -> Self {
        Effect {
            id: None,
            template_id: template_id.into(),
            name: name.into(),
            bonuses: BonusAggregate::new(),
            duration: None,
            state: EffectState::Unapplied,
            target: None,
            animations_active: false,
            hooks: None,
        }
    }

    pub fn with_bonus(mut self, bonus: Bonus) -> Self {
        self.bonuses.add(bonus);
        self
    }

    pub fn with_bonuses(mut self, bonuses: &BonusAggregate) -> Self {
        self.bonuses.add_all(bonuses);
        self
    }

    /// Limit the effect to a number of rounds
    pub fn with_duration(mut self, rounds: u32) -> Self {
        self.duration = Some(rounds);
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn EffectHooks>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Id within the owning set, once applied
    pub fn id(&self) -> Option<EffectId> {
        self.id
    }

    pub fn state(&self) -> EffectState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == EffectState::Active
    }

    pub fn bonuses(&self) -> &BonusAggregate {
        &self.bonuses
    }

    pub(crate) fn bonuses_mut(&mut self) -> &mut BonusAggregate {
        &mut self.bonuses
    }

    /// Rounds remaining, `None` if permanent
    pub fn remaining(&self) -> Option<u32> {
        self.duration
    }

    pub fn is_permanent(&self) -> bool {
        self.duration.is_none()
    }

    pub fn is_expired(&self) -> bool {
        self.duration == Some(0)
    }

    pub fn target(&self) -> Option<&EntityRef> {
        self.target.as_ref()
    }

    pub fn animations_active(&self) -> bool {
        self.animations_active
    }

    pub(crate) fn hooks(&self) -> Option<Arc<dyn EffectHooks>> {
        self.hooks.clone()
    }

    pub(crate) fn attach(&mut self, id: EffectId, target: EntityRef) {
        self.id = Some(id);
        self.target = Some(target);
        self.state = EffectState::Active;
    }

    pub(crate) fn start_animations(&mut self) {
        self.animations_active = true;
    }

    pub(crate) fn end_animations(&mut self) {
        self.animations_active = false;
    }

    /// Decrement the remaining duration; permanent effects never change
    pub(crate) fn tick(&mut self, rounds: u32) {
        if let Some(remaining) = self.duration.as_mut() {
            *remaining = remaining.saturating_sub(rounds);
        }
    }

    pub(crate) fn detach(&mut self) {
        self.animations_active = false;
        self.target = None;
        self.state = EffectState::Removed;
    }
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Effect")
            .field("id", &self.id)
            .field("template_id", &self.template_id)
            .field("bonuses", &self.bonuses)
            .field("duration", &self.duration)
            .field("state", &self.state)
            .field("target", &self.target)
            .field("animations_active", &self.animations_active)
            .field("has_hooks", &self.hooks.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bonus::BonusKind;

    #[test]
    fn test_new_effect_is_unapplied() {
        let effect = Effect::new("bless", "Bless").with_bonus(Bonus::flat(BonusKind::Attack, 1));
        assert_eq!(effect.state(), EffectState::Unapplied);
        assert!(effect.id().is_none());
        assert!(effect.target().is_none());
        assert!(effect.is_permanent());
    }

    #[test]
    fn test_tick_saturates() {
        let mut effect = Effect::new("haste", "Haste").with_duration(2);
        effect.tick(1);
        assert_eq!(effect.remaining(), Some(1));
        effect.tick(5);
        assert_eq!(effect.remaining(), Some(0));
        assert!(effect.is_expired());
    }

    #[test]
    fn test_permanent_never_expires() {
        let mut effect = Effect::new("flaming", "Flaming");
        effect.tick(100);
        assert!(!effect.is_expired());
        assert_eq!(effect.remaining(), None);
    }
}
