//! Creature - Ties effects, equipment, stats and vitality together
//!
//! Every mutation follows the same shape: change the owning component, run
//! the hook commands it queued, recompute the stat snapshot, reconcile
//! vitality against the previous snapshot, then notify observers.

use std::fmt;
use std::sync::Arc;

use rand::Rng;
use thiserror::Error;

use crate::config::{ActionPointConstants, RuleData};
use crate::effect::{Effect, EffectError, EffectId, EffectSet, HookCommand, MAX_HOOK_DEPTH};
use crate::equipment::{EquipError, EquipOutcome, EquipmentSlots, UnequipOutcome, Wielder};
use crate::item::Item;
use crate::source::{BaseStatsSource, GearSource, RoleSource, StatSource};
use crate::stat_block::{CheckResult, Resistance, StatBlock};
use crate::timer::RoundTimer;
use crate::types::{AttributeScores, EntityRef, EquipSlot, Size};
use crate::vitality::{DamageOutcome, Summoned, VitalStatus, VitalityState};

/// Failures building a creature from rule data
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CreatureError {
    #[error("Unknown race: {0}")]
    UnknownRace(String),
    #[error("Unknown role: {0}")]
    UnknownRole(String),
}

/// What a change notification is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Recomputed,
    Damaged,
    Healed,
    Equipped,
    Unequipped,
    EffectsChanged,
    Died,
    Raised,
}

/// Read-only subscriber to creature changes (UI, AI)
pub trait CreatureObserver: Send + Sync {
    fn on_creature_changed(&self, id: &str, kind: ChangeKind, stats: &StatBlock, vitality: &VitalityState);
}

/// Builder for [`Creature`]
pub struct CreatureBuilder {
    id: String,
    name: Option<String>,
    race_id: String,
    attributes: AttributeScores,
    roles: Vec<(String, u32)>,
    player_controlled: bool,
    experience: u32,
    rules: Arc<RuleData>,
}

impl CreatureBuilder {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_attributes(mut self, attributes: AttributeScores) -> Self {
        self.attributes = attributes;
        self
    }

    /// Add levels in a role; the first role added is the base role
    pub fn with_role(mut self, role_id: impl Into<String>, level: u32) -> Self {
        self.roles.push((role_id.into(), level));
        self
    }

    pub fn with_experience(mut self, experience: u32) -> Self {
        self.experience = experience;
        self
    }

    pub fn player_controlled(mut self) -> Self {
        self.player_controlled = true;
        self
    }

    /// Create the creature at full health
    pub fn build(self) -> Result<Creature, CreatureError> {
        let race = self
            .rules
            .race(&self.race_id)
            .ok_or_else(|| CreatureError::UnknownRace(self.race_id.clone()))?;
        if let Some((role_id, _)) = self.roles.iter().find(|(id, _)| self.rules.role(id).is_none()) {
            return Err(CreatureError::UnknownRole(role_id.clone()));
        }

        let mut creature = Creature::assemble(
            self.id.clone(),
            self.name.unwrap_or_else(|| self.id.clone()),
            BaseStatsSource::new(self.attributes, race),
            RoleSource::from_levels(&self.roles, &self.rules),
            self.rules.clone(),
        );
        creature.player_controlled = self.player_controlled;
        creature.experience = self.experience;
        creature.vitality = VitalityState::new(creature.stats.max_hp);
        Ok(creature)
    }
}

/// A creature and everything attached to it
///
/// Components are only mutated through the methods here, so the cached
/// [`StatBlock`] always matches the current effects and equipment.
pub struct Creature {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) rules: Arc<RuleData>,
    pub(crate) base: BaseStatsSource,
    pub(crate) roles: RoleSource,
    pub(crate) player_controlled: bool,
    pub(crate) experience: u32,
    pub(crate) effects: EffectSet,
    pub(crate) equipment: EquipmentSlots,
    pub(crate) vitality: VitalityState,
    pub(crate) timer: RoundTimer,
    pub(crate) stats: StatBlock,
    observers: Vec<Box<dyn CreatureObserver>>,
}

impl Creature {
    pub fn builder(id: impl Into<String>, race_id: impl Into<String>, rules: Arc<RuleData>) -> CreatureBuilder {
        CreatureBuilder {
            id: id.into(),
            name: None,
            race_id: race_id.into(),
            attributes: AttributeScores::uniform(10),
            roles: Vec::new(),
            player_controlled: false,
            experience: 0,
            rules,
        }
    }

    /// Wire up components and take a first snapshot without reconciling
    pub(crate) fn assemble(
        id: String,
        name: String,
        base: BaseStatsSource,
        roles: RoleSource,
        rules: Arc<RuleData>,
    ) -> Self {
        let mut creature = Creature {
            effects: EffectSet::new(EntityRef::Creature(id.clone())),
            timer: RoundTimer::new(&rules.constants.action_points),
            id,
            name,
            base,
            roles,
            player_controlled: false,
            experience: 0,
            equipment: EquipmentSlots::new(),
            vitality: VitalityState::new(0),
            stats: StatBlock::new(),
            observers: Vec::new(),
            rules,
        };
        creature.recompute_silently();
        creature.timer.reset(&creature.stats, &creature.rules.constants.action_points);
        creature
    }

    // === Accessors ===

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &RuleData {
        &self.rules
    }

    pub fn race_id(&self) -> &str {
        &self.base.race_id
    }

    /// Assigned attribute points, before race and bonuses
    pub fn assigned_attributes(&self) -> AttributeScores {
        self.base.attributes
    }

    pub fn roles(&self) -> &RoleSource {
        &self.roles
    }

    pub fn stats(&self) -> &StatBlock {
        &self.stats
    }

    pub fn vitality(&self) -> &VitalityState {
        &self.vitality
    }

    pub fn status(&self) -> VitalStatus {
        self.vitality.status()
    }

    pub fn effects(&self) -> &EffectSet {
        &self.effects
    }

    pub fn equipment(&self) -> &EquipmentSlots {
        &self.equipment
    }

    pub fn timer(&self) -> &RoundTimer {
        &self.timer
    }

    pub fn experience(&self) -> u32 {
        self.experience
    }

    pub fn set_experience(&mut self, experience: u32) {
        self.experience = experience;
    }

    pub fn is_player_controlled(&self) -> bool {
        self.player_controlled
    }

    pub fn size(&self) -> Size {
        self.stats.size
    }

    pub fn subscribe(&mut self, observer: Box<dyn CreatureObserver>) {
        self.observers.push(observer);
    }

    // === Stats ===

    /// Recompute the snapshot and reconcile hit points with it
    pub fn recompute_all(&mut self) {
        self.run_pending_commands();
        self.refresh();
        self.notify(ChangeKind::Recomputed);
    }

    /// Add role levels; unknown roles are rejected
    pub fn add_role_levels(&mut self, role_id: &str, levels: u32) -> Result<(), CreatureError> {
        let role = self
            .rules
            .role(role_id)
            .ok_or_else(|| CreatureError::UnknownRole(role_id.to_string()))?;
        self.roles.add_levels(role, levels);
        self.recompute_all();
        Ok(())
    }

    fn build_stats(&self) -> StatBlock {
        let gear: Vec<GearSource<'_>> = self
            .equipment
            .equipped()
            .map(|(slot, item)| GearSource::new(slot, item))
            .collect();

        let mut sources: Vec<&dyn StatSource> = Vec::with_capacity(gear.len() + 3);
        sources.push(&self.base);
        sources.push(&self.roles);
        sources.push(&self.effects);
        for source in &gear {
            sources.push(source);
        }

        let mut stats = StatBlock::new();
        stats.rebuild_from_sources(&sources, &self.rules.constants);
        stats
    }

    /// Replace the snapshot without applying any hit point deltas
    pub(crate) fn recompute_silently(&mut self) {
        self.stats = self.build_stats();
    }

    fn refresh(&mut self) {
        let next = self.build_stats();
        let previous = std::mem::replace(&mut self.stats, next);
        self.reconcile(&previous);
    }

    fn reconcile(&mut self, previous: &StatBlock) {
        let constants = &self.rules.constants.vitality;

        let temporary = self.stats.temporary_hp_bonus - previous.temporary_hp_bonus;
        if temporary > 0 {
            self.vitality.add_temporary_hp(temporary);
        } else if temporary < 0 {
            let amount = self.vitality.temporary_hp_removal(-temporary);
            if self.vitality.immortal {
                self.vitality.strip_temporary_hp(amount);
            } else if amount > 0 {
                self.vitality.take_damage(amount, self.player_controlled, constants);
            }
        }

        let con = self.stats.con_hp - previous.con_hp;
        if con > 0 {
            self.vitality.heal(con, self.stats.max_hp);
        } else if con < 0 {
            let outcome = self.vitality.take_damage(-con, self.player_controlled, constants);
            if outcome.is_killing_blow() {
                self.end_animations();
            }
        }

        self.vitality.clamp_to(self.stats.max_hp);
    }

    // === Effects ===

    pub fn apply_effect(&mut self, effect: Effect) -> Result<EffectId, EffectError> {
        let before = self.vitality.status();
        let id = self.effects.add(effect)?;
        self.settle(ChangeKind::EffectsChanged, before);
        Ok(id)
    }

    /// Instantiate a template from the rule data and apply it
    pub fn apply_template(&mut self, template_id: &str) -> Result<EffectId, EffectError> {
        let effect = self
            .rules
            .create_effect(template_id)
            .ok_or_else(|| EffectError::UnknownTemplate(template_id.to_string()))?;
        self.apply_effect(effect)
    }

    pub fn remove_effect(&mut self, id: EffectId) -> Result<Effect, EffectError> {
        let before = self.vitality.status();
        let removed = self.effects.remove(id)?;
        self.settle(ChangeKind::EffectsChanged, before);
        Ok(removed)
    }

    /// Advance one or more rounds
    ///
    /// Own effects elapse first, then the enchantments of equipped items.
    /// Returns the ids of the creature's own effects that expired.
    pub fn elapse_rounds(&mut self, rounds: u32, current_round: u32) -> Vec<EffectId> {
        let before = self.vitality.status();

        let expired = self.effects.elapse_rounds(rounds);
        for item in self.equipment.equipped_mut() {
            item.enchantments_mut().elapse_rounds(rounds);
        }
        self.run_pending_commands();

        if self.vitality.is_dying() && self.timer.turn_mode() {
            self.damage_pipeline(i32::try_from(rounds).unwrap_or(i32::MAX));
            self.run_pending_commands();
        }

        if self.vitality.check_summon_expiry(current_round, &self.rules.constants.vitality) {
            self.end_animations();
        }

        self.refresh();
        self.timer.reset(&self.stats, &self.rules.constants.action_points);
        self.notify(ChangeKind::Recomputed);
        self.notify_transition(ChangeKind::Recomputed, before);
        expired
    }

    // === Equipment ===

    /// Put an item in the inventory, returning its index
    pub fn add_to_inventory(&mut self, item: Item) -> usize {
        self.equipment.add_item(item)
    }

    /// Remove an unequipped item from the inventory
    pub fn take_from_inventory(&mut self, index: usize) -> Option<Item> {
        self.equipment.take_item(index)
    }

    pub fn can_equip(&self, index: usize) -> bool {
        let wielder = CreatureWielder {
            id: &self.id,
            stats: &self.stats,
            timer: &self.timer,
            constants: &self.rules.constants.action_points,
        };
        self.equipment
            .unequipped()
            .get(index)
            .map_or(false, |item| self.equipment.can_equip(item, &wielder))
    }

    /// Equip the inventory item at `index`, deducting its action point cost
    pub fn equip(&mut self, index: usize, slot_hint: Option<EquipSlot>) -> Result<EquipOutcome, EquipError> {
        let before = self.vitality.status();
        let wielder = CreatureWielder {
            id: &self.id,
            stats: &self.stats,
            timer: &self.timer,
            constants: &self.rules.constants.action_points,
        };
        let mut outcome = self.equipment.equip(index, slot_hint, &wielder)?;

        self.timer.perform(outcome.cost);
        self.execute_batch(std::mem::take(&mut outcome.commands));
        self.settle(ChangeKind::Equipped, before);
        Ok(outcome)
    }

    /// Equip an inventory item by id
    pub fn equip_item(&mut self, item_id: &str, slot_hint: Option<EquipSlot>) -> Result<EquipOutcome, EquipError> {
        let index = self
            .equipment
            .find_unequipped(item_id)
            .ok_or(EquipError::NotInInventory(self.equipment.unequipped().len()))?;
        self.equip(index, slot_hint)
    }

    pub fn unequip(&mut self, slot: EquipSlot) -> Result<UnequipOutcome, EquipError> {
        let before = self.vitality.status();
        let wielder = CreatureWielder {
            id: &self.id,
            stats: &self.stats,
            timer: &self.timer,
            constants: &self.rules.constants.action_points,
        };
        let mut outcome = self.equipment.unequip(slot, &wielder)?;

        self.execute_batch(std::mem::take(&mut outcome.commands));
        self.settle(ChangeKind::Unequipped, before);
        Ok(outcome)
    }

    // === Vitality ===

    /// Run the damage hooks, then apply the resulting amount
    pub fn take_damage(&mut self, amount: i32) -> DamageOutcome {
        let before = self.vitality.status();
        let outcome = self.damage_pipeline(amount);
        self.settle(ChangeKind::Damaged, before);
        outcome
    }

    /// Mitigate by the damage type's immunity and reduction, then take the rest
    pub fn take_typed_damage(&mut self, amount: i32, damage_type: &str) -> DamageOutcome {
        let before = self.vitality.status();
        let applied = self.stats.applied_damage(amount, damage_type);
        let mut outcome = self.damage_pipeline(applied);
        outcome.mitigated = amount.max(0) - applied;
        self.settle(ChangeKind::Damaged, before);
        outcome
    }

    /// Roll a resistance check with the creature's current resistances
    pub fn resistance_check(&self, resistance: Resistance, difficulty: i32, rng: &mut impl Rng) -> CheckResult {
        self.stats.resistance_check_with_rng(resistance, difficulty, rng)
    }

    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.vitality.status();
        let healed = self.vitality.heal(amount, self.stats.max_hp);
        self.settle(ChangeKind::Healed, before);
        healed
    }

    pub fn add_temporary_hp(&mut self, amount: i32) {
        let before = self.vitality.status();
        self.vitality.add_temporary_hp(amount);
        self.settle(ChangeKind::Healed, before);
    }

    /// Remove temporary HP through the damage pipeline
    pub fn remove_temporary_hp(&mut self, amount: i32) -> DamageOutcome {
        let before = self.vitality.status();
        let amount = self.vitality.temporary_hp_removal(amount);
        let outcome = if amount > 0 {
            self.damage_pipeline(amount)
        } else {
            DamageOutcome::unchanged(&self.vitality)
        };
        self.settle(ChangeKind::Damaged, before);
        outcome
    }

    /// Kill outright; immortal creatures ignore this
    pub fn kill(&mut self) -> bool {
        let before = self.vitality.status();
        let killed = self.vitality.kill(&self.rules.constants.vitality);
        if killed {
            self.end_animations();
            self.settle(ChangeKind::Died, before);
        }
        killed
    }

    /// Bring a dead creature back, applying the experience penalty
    pub fn raise(&mut self) -> bool {
        let before = self.vitality.status();
        let Some(penalty) =
            self.vitality
                .raise(self.stats.level, self.experience, &self.rules.constants.vitality)
        else {
            return false;
        };
        self.experience -= penalty;
        self.settle(ChangeKind::Raised, before);
        true
    }

    pub fn set_immortal(&mut self, immortal: bool) {
        self.vitality.immortal = immortal;
    }

    /// Mark as summoned for `duration` rounds starting at `start_round`
    pub fn summon(&mut self, start_round: u32, duration: u32) {
        self.vitality.summoned = Some(Summoned { start_round, duration });
    }

    /// Heal between encounters
    pub fn new_encounter(&mut self) {
        let before = self.vitality.status();
        self.timer.reset(&self.stats, &self.rules.constants.action_points);
        if !self.vitality.is_dead() && self.vitality.current_hp < self.stats.max_hp {
            let factor = self.rules.constants.vitality.outside_combat_healing_factor.max(1);
            self.vitality.heal(1 + self.stats.max_hp / factor, self.stats.max_hp);
        }
        self.settle(ChangeKind::Healed, before);
    }

    /// Full rest: one round passes, then a living creature is restored
    pub fn reset_all(&mut self, current_round: u32) {
        self.elapse_rounds(1, current_round);
        if !self.vitality.is_dead() {
            self.vitality.temporary_hp = 0;
            self.vitality.current_hp = self.stats.max_hp;
            self.vitality.dying = false;
            self.notify(ChangeKind::Healed);
        }
    }

    // === Turns ===

    pub fn set_turn_mode(&mut self, turn_mode: bool) {
        self.timer.set_turn_mode(turn_mode);
    }

    /// Refill action points for a new turn
    pub fn start_turn(&mut self) {
        self.timer.reset(&self.stats, &self.rules.constants.action_points);
    }

    /// Dying and dead creatures are always helpless
    pub fn is_helpless(&self) -> bool {
        self.vitality.dying || self.vitality.dead || self.stats.is_helpless()
    }

    pub fn is_immobilized(&self) -> bool {
        self.vitality.dying || self.vitality.dead || self.stats.is_immobilized()
    }

    pub fn can_perform(&self, cost: i32) -> bool {
        self.timer.can_perform(cost, self.is_helpless())
    }

    /// Spend action points on an action other than equipping
    pub fn perform(&mut self, cost: i32) -> bool {
        if !self.can_perform(cost) {
            return false;
        }
        self.timer.perform(cost);
        true
    }

    // === Internals ===

    fn damage_pipeline(&mut self, amount: i32) -> DamageOutcome {
        if self.vitality.is_dead() {
            return DamageOutcome::unchanged(&self.vitality);
        }
        let amount = self.effects.on_damaged(amount);
        let outcome = self
            .vitality
            .take_damage(amount, self.player_controlled, &self.rules.constants.vitality);
        if outcome.is_killing_blow() {
            self.end_animations();
        }
        outcome
    }

    fn end_animations(&mut self) {
        self.effects.end_all_animations();
        for item in self.equipment.equipped_mut() {
            item.enchantments_mut().end_all_animations();
        }
    }

    /// Drain and execute vitality commands queued by effect and item sets
    fn run_pending_commands(&mut self) {
        for _ in 0..MAX_HOOK_DEPTH {
            let mut commands = self.effects.drain_commands();
            for item in self.equipment.equipped_mut() {
                commands.extend(item.enchantments_mut().drain_commands());
            }
            if commands.is_empty() {
                return;
            }
            self.execute_batch(commands);
        }

        let mut dropped = self.effects.drain_commands().len();
        for item in self.equipment.equipped_mut() {
            dropped += item.enchantments_mut().drain_commands().len();
        }
        if dropped > 0 {
            tracing::warn!(creature = %self.id, dropped, "hook chain too deep, dropping remaining commands");
        }
    }

    /// Bring the snapshot up to date, then execute, so vitality commands see the current max HP
    fn execute_batch(&mut self, commands: Vec<HookCommand>) {
        if commands.is_empty() {
            return;
        }
        self.refresh();
        for command in commands {
            self.execute(command);
        }
    }

    fn execute(&mut self, command: HookCommand) {
        match command {
            HookCommand::AddEffect(effect) => {
                // Rejections are logged by the set
                let _ = self.effects.add(effect);
            }
            HookCommand::RemoveEffect(id) => {
                let _ = self.effects.remove(id);
            }
            HookCommand::RemoveTemplate(template_id) => {
                let ids: Vec<EffectId> = self
                    .effects
                    .iter()
                    .filter(|e| e.template_id == template_id)
                    .filter_map(Effect::id)
                    .collect();
                for id in ids {
                    let _ = self.effects.remove(id);
                }
            }
            HookCommand::Heal(amount) => {
                self.vitality.heal(amount, self.stats.max_hp);
            }
            HookCommand::Damage(amount) => {
                self.damage_pipeline(amount);
            }
            HookCommand::AddTemporaryHp(amount) => {
                self.vitality.add_temporary_hp(amount);
            }
        }
    }

    /// Finish a mutation: pending commands, recompute, notify
    fn settle(&mut self, kind: ChangeKind, before: VitalStatus) {
        self.run_pending_commands();
        self.refresh();
        self.notify(kind);
        self.notify_transition(kind, before);
    }

    fn notify_transition(&self, kind: ChangeKind, before: VitalStatus) {
        let after = self.vitality.status();
        if before != VitalStatus::Dead && after == VitalStatus::Dead && kind != ChangeKind::Died {
            self.notify(ChangeKind::Died);
        } else if before == VitalStatus::Dead && after != VitalStatus::Dead && kind != ChangeKind::Raised {
            self.notify(ChangeKind::Raised);
        }
    }

    fn notify(&self, kind: ChangeKind) {
        for observer in &self.observers {
            observer.on_creature_changed(&self.id, kind, &self.stats, &self.vitality);
        }
    }
}

impl fmt::Debug for Creature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Creature")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("race", &self.base.race_id)
            .field("level", &self.stats.level)
            .field("vitality", &self.vitality)
            .field("effects", &self.effects.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// Equipment-facing view of a creature
struct CreatureWielder<'a> {
    id: &'a str,
    stats: &'a StatBlock,
    timer: &'a RoundTimer,
    constants: &'a ActionPointConstants,
}

impl Wielder for CreatureWielder<'_> {
    fn id(&self) -> &str {
        self.id
    }

    fn size(&self) -> Size {
        self.stats.size
    }

    fn has_weapon_proficiency(&self, base_weapon: &str) -> bool {
        self.stats.has_weapon_proficiency(base_weapon)
    }

    fn has_armor_proficiency(&self, armor_type: &str) -> bool {
        self.stats.has_armor_proficiency(armor_type)
    }

    fn has_dual_wield_training(&self) -> bool {
        self.stats.has_dual_wield_training()
    }

    fn can_bypass_curses(&self) -> bool {
        self.stats.can_bypass_curses()
    }

    fn equip_cost(&self, item: &Item) -> i32 {
        RoundTimer::equip_cost(item, self.stats, self.constants)
    }

    fn can_afford(&self, cost: i32) -> bool {
        self.timer.can_perform(cost, false)
    }

    fn action_points(&self) -> i32 {
        self.timer.ap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bonus::{Bonus, BonusKind};
    use crate::effect::{EffectHooks, HookContext};
    use std::sync::Mutex;

    fn rules() -> Arc<RuleData> {
        Arc::new(RuleData::with_defaults())
    }

    fn fighter(level: u32) -> Creature {
        Creature::builder("hero", "human", rules())
            .with_role("fighter", level)
            .player_controlled()
            .build()
            .unwrap()
    }

    #[derive(Default)]
    struct Log(Mutex<Vec<ChangeKind>>);

    impl CreatureObserver for Arc<Log> {
        fn on_creature_changed(&self, _id: &str, kind: ChangeKind, _stats: &StatBlock, _vitality: &VitalityState) {
            self.0.lock().unwrap().push(kind);
        }
    }

    #[test]
    fn test_builder_starts_at_full_health() {
        let hero = fighter(3);
        assert_eq!(hero.stats().level, 3);
        assert_eq!(hero.stats().max_hp, 40);
        assert_eq!(hero.vitality().current_hp, 40);
        assert_eq!(hero.name(), "hero");
    }

    #[test]
    fn test_builder_rejects_unknown_data() {
        let err = Creature::builder("x", "dragon", rules()).build().unwrap_err();
        assert_eq!(err, CreatureError::UnknownRace("dragon".to_string()));

        let err = Creature::builder("x", "human", rules())
            .with_role("bard", 1)
            .build()
            .unwrap_err();
        assert_eq!(err, CreatureError::UnknownRole("bard".to_string()));
    }

    #[test]
    fn test_temporary_hp_bonus_reconciled() {
        let mut hero = fighter(1);
        let id = hero.apply_template("false_life").unwrap();
        assert_eq!(hero.vitality().temporary_hp, 10);

        hero.take_damage(4);
        assert_eq!(hero.vitality().temporary_hp, 6);
        assert_eq!(hero.vitality().current_hp, 20);

        hero.remove_effect(id).unwrap();
        assert_eq!(hero.vitality().temporary_hp, 0);
        assert_eq!(hero.vitality().current_hp, 20);
    }

    #[test]
    fn test_con_bonus_heals_and_damages() {
        let mut hero = fighter(3);
        let id = hero
            .apply_effect(Effect::new("toughness", "Toughness").with_bonus(Bonus::flat(BonusKind::Con, 3)))
            .unwrap();
        assert_eq!(hero.stats().max_hp, 43);
        assert_eq!(hero.vitality().current_hp, 43);

        hero.remove_effect(id).unwrap();
        assert_eq!(hero.stats().max_hp, 40);
        assert_eq!(hero.vitality().current_hp, 40);
    }

    #[test]
    fn test_recompute_is_stable() {
        let mut hero = fighter(2);
        hero.apply_template("false_life").unwrap();
        let stats = hero.stats().clone();
        let vitality = hero.vitality().clone();

        hero.recompute_all();
        hero.recompute_all();
        assert_eq!(hero.stats(), &stats);
        assert_eq!(hero.vitality(), &vitality);
    }

    #[test]
    fn test_effect_expires_with_rounds() {
        let mut hero = fighter(1);
        hero.apply_template("bless").unwrap();
        let attack = hero.stats().main_hand_attack;

        assert!(hero.elapse_rounds(4, 4).is_empty());
        assert_eq!(hero.stats().main_hand_attack, attack);
        assert_eq!(hero.elapse_rounds(1, 5).len(), 1);
        assert_eq!(hero.stats().main_hand_attack, attack - 5);
    }

    #[test]
    fn test_equip_deducts_action_points_in_turn_mode() {
        let mut hero = fighter(1);
        hero.apply_template("martial_training").unwrap();
        hero.set_turn_mode(true);
        hero.start_turn();

        let sword = hero.rules().create_item("longsword", "sword-1").unwrap();
        let index = hero.add_to_inventory(sword);
        assert!(hero.can_equip(index));
        let outcome = hero.equip(index, None).unwrap();
        assert_eq!(outcome.cost, 3000);
        assert_eq!(hero.timer().ap(), 7000);
        assert_eq!(hero.equipment().get(EquipSlot::MainHand).unwrap().id, "sword-1");
    }

    #[test]
    fn test_equipped_enchantments_count() {
        let mut hero = fighter(1);
        let ac = hero.stats().armor_class;

        let ring = hero.rules().create_item("ring_of_protection", "ring-1").unwrap();
        hero.add_to_inventory(ring);
        hero.equip_item("ring-1", None).unwrap();
        assert_eq!(hero.stats().armor_class, ac + 5);

        hero.unequip(EquipSlot::RingRight).unwrap();
        assert_eq!(hero.stats().armor_class, ac);
    }

    #[test]
    fn test_damage_hooks_and_queued_heal() {
        struct Ward;
        impl EffectHooks for Ward {
            fn on_damaged(&self, _effect: &Effect, damage: &mut i32, ctx: &mut HookContext) {
                *damage -= 2;
                ctx.heal(1);
            }
        }

        let mut hero = fighter(1);
        hero.apply_effect(Effect::new("ward", "Ward").with_hooks(Arc::new(Ward))).unwrap();
        let outcome = hero.take_damage(10);
        assert_eq!(outcome.requested, 8);
        assert_eq!(hero.vitality().current_hp, 13);
    }

    #[test]
    fn test_immortal_after_hooks() {
        let mut hero = fighter(1);
        hero.set_immortal(true);
        let outcome = hero.take_damage(500);
        assert_eq!(outcome.prevented, 500);
        assert_eq!(hero.vitality().current_hp, 20);
        assert!(!hero.kill());
    }

    #[test]
    fn test_raise_costs_experience() {
        let mut hero = Creature::builder("hero", "human", rules())
            .with_role("fighter", 2)
            .with_experience(500)
            .build()
            .unwrap();
        assert!(hero.kill());
        assert!(hero.raise());
        assert_eq!(hero.experience(), 300);
        assert_eq!(hero.vitality().current_hp, 1);
        assert!(!hero.raise());
    }

    #[test]
    fn test_dying_bleeds_in_turn_mode() {
        let mut hero = fighter(1);
        hero.take_damage(25);
        assert_eq!(hero.status(), VitalStatus::Dying);

        hero.elapse_rounds(1, 1);
        assert_eq!(hero.vitality().current_hp, -5);

        hero.set_turn_mode(true);
        hero.elapse_rounds(2, 3);
        assert_eq!(hero.vitality().current_hp, -7);
    }

    #[test]
    fn test_new_encounter_heals() {
        let mut hero = fighter(3);
        hero.take_damage(30);
        hero.new_encounter();
        assert_eq!(hero.vitality().current_hp, 21);

        hero.kill();
        hero.new_encounter();
        assert!(hero.vitality().is_dead());
    }

    #[test]
    fn test_reset_all_restores_the_living() {
        let mut hero = fighter(1);
        hero.add_temporary_hp(5);
        hero.take_damage(15);
        hero.reset_all(1);
        assert_eq!(hero.vitality().current_hp, 20);
        assert_eq!(hero.vitality().temporary_hp, 0);
    }

    #[test]
    fn test_observers_see_death() {
        let log = Arc::new(Log::default());
        let mut hero = Creature::builder("goblin", "human", rules())
            .with_role("fighter", 1)
            .build()
            .unwrap();
        hero.subscribe(Box::new(log.clone()));

        hero.take_damage(21);
        let kinds = log.0.lock().unwrap().clone();
        assert_eq!(kinds, vec![ChangeKind::Damaged, ChangeKind::Died]);
        assert!(hero.vitality().is_dead());
    }

    #[test]
    fn test_typed_damage_is_mitigated() {
        let mut hero = fighter(1);
        hero.apply_effect(
            Effect::new("fire_ward", "Fire Ward")
                .with_bonus(Bonus::flat(BonusKind::DamageImmunity, 50).with_subtype("fire"))
                .with_bonus(Bonus::flat(BonusKind::DamageReduction, 2).with_subtype("fire")),
        )
        .unwrap();

        let outcome = hero.take_typed_damage(10, "fire");
        assert_eq!(outcome.mitigated, 7);
        assert_eq!(outcome.applied, 3);
        assert_eq!(hero.vitality().current_hp, 17);

        let outcome = hero.take_typed_damage(10, "cold");
        assert_eq!(outcome.mitigated, 0);
        assert_eq!(hero.vitality().current_hp, 7);
    }

    #[test]
    fn test_dying_and_dead_are_helpless() {
        let mut hero = fighter(1);
        hero.set_turn_mode(true);
        hero.start_turn();
        assert!(hero.can_perform(1000));
        assert!(!hero.is_immobilized());

        hero.take_damage(25);
        assert_eq!(hero.status(), VitalStatus::Dying);
        assert!(hero.is_helpless());
        assert!(hero.is_immobilized());
        assert!(!hero.can_perform(1000));
        assert!(!hero.perform(1000));

        hero.kill();
        assert!(hero.is_helpless());
        assert!(!hero.can_perform(0));
    }

    #[test]
    fn test_temporary_hp_bonus_removed_while_immortal() {
        let mut hero = fighter(1);
        hero.set_immortal(true);
        let id = hero
            .apply_effect(Effect::new("false_life", "False Life").with_bonus(Bonus::flat(BonusKind::TemporaryHp, 5)))
            .unwrap();
        assert_eq!(hero.vitality().temporary_hp, 5);

        hero.remove_effect(id).unwrap();
        assert_eq!(hero.vitality().temporary_hp, 0);
        assert_eq!(hero.vitality().current_hp, 20);
    }

    #[test]
    fn test_hook_heal_sees_raised_max_hp() {
        struct Surge;
        impl EffectHooks for Surge {
            fn on_apply(&self, _effect: &Effect, ctx: &mut HookContext) {
                ctx.heal(100);
            }
        }

        let mut hero = fighter(1);
        hero.take_damage(5);
        hero.apply_effect(
            Effect::new("surge", "Surge")
                .with_bonus(Bonus::flat(BonusKind::MaxHp, 10))
                .with_hooks(Arc::new(Surge)),
        )
        .unwrap();
        assert_eq!(hero.stats().max_hp, 30);
        assert_eq!(hero.vitality().current_hp, 30);
    }

    #[test]
    fn test_huge_amounts_do_not_overflow() {
        let mut hero = fighter(1);
        hero.take_damage(25);
        hero.take_damage(i32::MAX);
        assert!(hero.vitality().is_dead());

        let mut hero = fighter(1);
        assert_eq!(hero.heal(i32::MAX), 0);
        assert_eq!(hero.vitality().current_hp, 20);
    }
}
