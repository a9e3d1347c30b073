//! EffectSet - The ordered effects attached to one entity

use super::{Effect, EffectError, EffectId, EffectState, HookCommand, HookContext};
use crate::bonus::{BonusAggregate, BonusKind};
use crate::types::EntityRef;

/// Maximum generations of hook-triggered commands run by one operation
pub const MAX_HOOK_DEPTH: usize = 16;

/// Effects attached to a single creature or item, in the order they were added
///
/// Vitality commands queued by hooks are not executed here; they collect in
/// an outbox that the owner drains with [`EffectSet::drain_commands`].
#[derive(Debug)]
pub struct EffectSet {
    owner: EntityRef,
    effects: Vec<Effect>,
    next_id: u64,
    outbox: Vec<HookCommand>,
}

impl EffectSet {
    pub fn new(owner: EntityRef) -> Self {
        EffectSet {
            owner,
            effects: Vec::new(),
            next_id: 1,
            outbox: Vec::new(),
        }
    }

    pub fn owner(&self) -> &EntityRef {
        &self.owner
    }

    /// Attach and apply an effect
    pub fn add(&mut self, effect: Effect) -> Result<EffectId, EffectError> {
        if effect.state() != EffectState::Unapplied {
            tracing::warn!(template = %effect.template_id, owner = %self.owner, "refusing to apply an effect twice");
            return Err(EffectError::AlreadyApplied);
        }

        let mut ctx = HookContext::new(self.owner.clone());
        let id = self.attach(effect, &mut ctx);
        self.run_commands(ctx.into_commands());
        Ok(id)
    }

    /// Remove an effect, returning it in the `Removed` state
    pub fn remove(&mut self, id: EffectId) -> Result<Effect, EffectError> {
        let Some(index) = self.position(id) else {
            tracing::warn!(%id, owner = %self.owner, "removing an effect that is not attached");
            return Err(EffectError::NotFound(id));
        };

        let mut ctx = HookContext::new(self.owner.clone());
        let removed = self.detach_at(index, &mut ctx);
        self.run_commands(ctx.into_commands());
        Ok(removed)
    }

    /// Advance every effect by `rounds`, then remove the expired ones
    ///
    /// Effects added while this call runs are not ticked by it. Expired
    /// effects are removed oldest first. Returns the ids that expired.
    pub fn elapse_rounds(&mut self, rounds: u32) -> Vec<EffectId> {
        let snapshot: Vec<EffectId> = self.effects.iter().filter_map(Effect::id).collect();
        let mut ctx = HookContext::new(self.owner.clone());

        for id in &snapshot {
            if let Some(effect) = self.effects.iter_mut().find(|e| e.id() == Some(*id)) {
                effect.tick(rounds);
                if let Some(hooks) = effect.hooks() {
                    hooks.on_round_elapsed(effect, rounds, &mut ctx);
                }
            }
        }

        let mut expired = Vec::new();
        for id in snapshot {
            let Some(index) = self.position(id) else { continue };
            if self.effects[index].is_expired() {
                self.detach_at(index, &mut ctx);
                expired.push(id);
            }
        }

        self.run_commands(ctx.into_commands());
        expired
    }

    /// Force-remove every effect, oldest first
    ///
    /// Removal hooks run. Effects they try to add are discarded since the
    /// owner is going away; their vitality commands still reach the outbox.
    pub fn remove_all(&mut self) {
        let mut ctx = HookContext::new(self.owner.clone());
        while !self.effects.is_empty() {
            self.detach_at(0, &mut ctx);
        }

        for command in ctx.into_commands() {
            match command {
                HookCommand::AddEffect(effect) => {
                    tracing::debug!(template = %effect.template_id, "discarding effect added during teardown");
                }
                command if command.is_vitality() => self.outbox.push(command),
                _ => {}
            }
        }
    }

    /// Stop visual state of every effect without removing any
    pub fn end_all_animations(&mut self) {
        for effect in &mut self.effects {
            effect.end_animations();
        }
    }

    /// Run every effect's damage hook, oldest first, returning the final amount
    pub fn on_damaged(&mut self, amount: i32) -> i32 {
        let mut amount = amount;
        let mut ctx = HookContext::new(self.owner.clone());
        for effect in &self.effects {
            if let Some(hooks) = effect.hooks() {
                hooks.on_damaged(effect, &mut amount, &mut ctx);
            }
        }
        self.run_commands(ctx.into_commands());
        amount.max(0)
    }

    /// Reduce penalties of a kind by up to `amount`, oldest effects first
    ///
    /// Returns the part of `amount` that found no penalty to cancel.
    pub fn reduce_penalties(&mut self, kind: BonusKind, amount: i32) -> i32 {
        let mut left = amount.max(0);

        for effect in &mut self.effects {
            if left == 0 {
                break;
            }
            let bonuses = effect.bonuses_mut();
            for bonus in bonuses.iter_mut() {
                if left == 0 {
                    break;
                }
                if bonus.kind != kind || !bonus.is_penalty() {
                    continue;
                }
                let penalty = -bonus.amount();
                let cancelled = penalty.min(left);
                bonus.value = bonus.value.with_amount(-(penalty - cancelled));
                left -= cancelled;
            }
            bonuses.retain(|b| b.kind != kind || b.amount() != 0);
        }

        left
    }

    /// Strip every penalty of a kind from the attached effects
    pub fn remove_penalties_of_kind(&mut self, kind: BonusKind) {
        for effect in &mut self.effects {
            effect.bonuses_mut().retain(|b| b.kind != kind || !b.is_penalty());
        }
    }

    /// Union of the bonuses of every attached effect
    pub fn bonuses(&self) -> BonusAggregate {
        let mut all = BonusAggregate::new();
        for effect in &self.effects {
            all.add_all(effect.bonuses());
        }
        all
    }

    pub fn bonuses_of_kind(&self, kind: BonusKind) -> BonusAggregate {
        self.effects
            .iter()
            .flat_map(|e| e.bonuses().iter())
            .filter(|b| b.kind == kind)
            .cloned()
            .collect()
    }

    pub fn penalties_of_kind(&self, kind: BonusKind) -> BonusAggregate {
        self.effects
            .iter()
            .flat_map(|e| e.bonuses().iter())
            .filter(|b| b.kind == kind && b.is_penalty())
            .cloned()
            .collect()
    }

    pub fn effects_with_bonus_of_kind(&self, kind: BonusKind) -> impl Iterator<Item = &Effect> {
        self.effects.iter().filter(move |e| e.bonuses().contains_kind(kind))
    }

    pub fn contains_template(&self, template_id: &str) -> bool {
        self.effects.iter().any(|e| e.template_id == template_id)
    }

    pub fn get(&self, id: EffectId) -> Option<&Effect> {
        self.effects.iter().find(|e| e.id() == Some(id))
    }

    /// Attached effects, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Take the vitality commands queued by hooks
    pub fn drain_commands(&mut self) -> Vec<HookCommand> {
        std::mem::take(&mut self.outbox)
    }

    pub fn has_pending_commands(&self) -> bool {
        !self.outbox.is_empty()
    }

    fn position(&self, id: EffectId) -> Option<usize> {
        self.effects.iter().position(|e| e.id() == Some(id))
    }

    fn attach(&mut self, mut effect: Effect, ctx: &mut HookContext) -> EffectId {
        let id = EffectId(self.next_id);
        self.next_id += 1;

        effect.attach(id, self.owner.clone());
        if let Some(hooks) = effect.hooks() {
            hooks.on_apply(&effect, ctx);
        }
        effect.start_animations();
        self.effects.push(effect);
        id
    }

    fn detach_at(&mut self, index: usize, ctx: &mut HookContext) -> Effect {
        if let Some(hooks) = self.effects[index].hooks() {
            hooks.on_remove(&self.effects[index], ctx);
        }
        let mut effect = self.effects.remove(index);
        effect.detach();
        effect
    }

    fn run_commands(&mut self, mut commands: Vec<HookCommand>) {
        let mut depth = 0;

        while !commands.is_empty() {
            if depth >= MAX_HOOK_DEPTH {
                tracing::warn!(
                    owner = %self.owner,
                    dropped = commands.len(),
                    depth,
                    "hook chain too deep, dropping remaining commands"
                );
                return;
            }

            let mut ctx = HookContext::new(self.owner.clone());
            for command in commands {
                match command {
                    HookCommand::AddEffect(effect) => {
                        if effect.state() != EffectState::Unapplied {
                            tracing::warn!(template = %effect.template_id, "hook re-added an applied effect");
                            continue;
                        }
                        self.attach(effect, &mut ctx);
                    }
                    HookCommand::RemoveEffect(id) => match self.position(id) {
                        Some(index) => {
                            self.detach_at(index, &mut ctx);
                        }
                        None => tracing::debug!(%id, "hook removed an effect that is already gone"),
                    },
                    HookCommand::RemoveTemplate(template_id) => {
                        while let Some(index) =
                            self.effects.iter().position(|e| e.template_id == template_id)
                        {
                            self.detach_at(index, &mut ctx);
                        }
                    }
                    vitality => self.outbox.push(vitality),
                }
            }

            commands = ctx.into_commands();
            depth += 1;
        }
    }
}

impl Drop for EffectSet {
    fn drop(&mut self) {
        if !self.effects.is_empty() {
            self.remove_all();
        }
    }
}
