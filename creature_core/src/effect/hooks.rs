//! Effect hooks and the deferred command queue they write to

use std::fmt;

use super::{Effect, EffectId};
use crate::types::EntityRef;

/// Script-side callbacks attached to an effect
///
/// Hooks never mutate the effect set directly. They queue commands on the
/// [`HookContext`], which the set executes once the current step is done.
pub trait EffectHooks: Send + Sync {
    /// Runs before the effect's bonuses become visible
    fn on_apply(&self, _effect: &Effect, _ctx: &mut HookContext) {}

    /// Runs while the effect's bonuses are still visible
    fn on_remove(&self, _effect: &Effect, _ctx: &mut HookContext) {}

    /// Runs once per elapse call, after the duration was decremented
    fn on_round_elapsed(&self, _effect: &Effect, _rounds: u32, _ctx: &mut HookContext) {}

    /// Runs before incoming damage is applied; may change the amount
    fn on_damaged(&self, _effect: &Effect, _damage: &mut i32, _ctx: &mut HookContext) {}
}

/// A deferred mutation requested by a hook
pub enum HookCommand {
    /// Attach a new effect to the set that ran the hook
    AddEffect(Effect),
    RemoveEffect(EffectId),
    /// Remove every effect created from this template
    RemoveTemplate(String),
    Heal(i32),
    Damage(i32),
    AddTemporaryHp(i32),
}

impl HookCommand {
    /// Commands that target the owner's vitality rather than its effects
    pub fn is_vitality(&self) -> bool {
        matches!(
            self,
            HookCommand::Heal(_) | HookCommand::Damage(_) | HookCommand::AddTemporaryHp(_)
        )
    }
}

impl fmt::Debug for HookCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookCommand::AddEffect(effect) => write!(f, "AddEffect({})", effect.template_id),
            HookCommand::RemoveEffect(id) => write!(f, "RemoveEffect({})", id),
            HookCommand::RemoveTemplate(id) => write!(f, "RemoveTemplate({})", id),
            HookCommand::Heal(n) => write!(f, "Heal({})", n),
            HookCommand::Damage(n) => write!(f, "Damage({})", n),
            HookCommand::AddTemporaryHp(n) => write!(f, "AddTemporaryHp({})", n),
        }
    }
}

/// Command queue handed to hooks
#[derive(Debug)]
pub struct HookContext {
    owner: EntityRef,
    commands: Vec<HookCommand>,
}

impl HookContext {
    pub fn new(owner: EntityRef) -> Self {
        HookContext {
            owner,
            commands: Vec::new(),
        }
    }

    /// Entity whose set is running the hook
    pub fn owner(&self) -> &EntityRef {
        &self.owner
    }

    pub fn add_effect(&mut self, effect: Effect) {
        self.commands.push(HookCommand::AddEffect(effect));
    }

    pub fn remove_effect(&mut self, id: EffectId) {
        self.commands.push(HookCommand::RemoveEffect(id));
    }

    pub fn remove_template(&mut self, template_id: impl Into<String>) {
        self.commands.push(HookCommand::RemoveTemplate(template_id.into()));
    }

    pub fn heal(&mut self, amount: i32) {
        self.commands.push(HookCommand::Heal(amount));
    }

    pub fn damage(&mut self, amount: i32) {
        self.commands.push(HookCommand::Damage(amount));
    }

    pub fn add_temporary_hp(&mut self, amount: i32) {
        self.commands.push(HookCommand::AddTemporaryHp(amount));
    }

    pub fn push(&mut self, command: HookCommand) {
        self.commands.push(command);
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn into_commands(self) -> Vec<HookCommand> {
        self.commands
    }
}
