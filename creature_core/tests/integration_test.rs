//! Integration test: Build creature -> Apply effects -> Equip -> Take damage -> Save
//!
//! Exercises the engine end to end through the public `Creature` surface.

use creature_core::{
    bonus::{Bonus, BonusKind},
    config::RuleData,
    creature::Creature,
    effect::Effect,
    equipment::{EquipError, EquipFailure},
    persistence::CreatureRecord,
    types::EquipSlot,
    vitality::VitalStatus,
};
use std::sync::Arc;

/// Helper to print a separator
fn separator(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("  {}", title);
    println!("{}\n", "=".repeat(60));
}

/// Helper to print a creature summary
fn print_creature(creature: &Creature) {
    let stats = creature.stats();
    let vitality = creature.vitality();
    println!("  {} (level {})", creature.name(), stats.level);
    println!("    HP: {}/{} (+{} temp)", vitality.current_hp, stats.max_hp, vitality.temporary_hp);
    println!("    AC: {}  Attack: {}  Damage: {}%", stats.armor_class, stats.main_hand_attack, stats.main_hand_damage);
    for (slot, item) in creature.equipment().equipped() {
        println!("    {:?}: {}", slot, item.name);
    }
}

fn rules() -> Arc<RuleData> {
    Arc::new(RuleData::with_defaults())
}

fn hero(rules: Arc<RuleData>) -> Creature {
    let mut hero = Creature::builder("hero", "human", rules)
        .with_name("Hero")
        .with_role("fighter", 1)
        .player_controlled()
        .build()
        .unwrap();
    hero.apply_template("martial_training").unwrap();
    hero
}

fn give(creature: &mut Creature, template_id: &str, instance_id: &str) -> usize {
    let item = creature.rules().create_item(template_id, instance_id).unwrap();
    creature.add_to_inventory(item)
}

#[test]
fn test_max_hp_effect_round_trip() {
    separator("MaxHP effect");
    let mut hero = hero(rules());
    assert_eq!(hero.stats().max_hp, 20);
    assert_eq!(hero.vitality().current_hp, 20);

    let id = hero.apply_template("vigor").unwrap();
    print_creature(&hero);
    assert_eq!(hero.stats().max_hp, 25);
    assert_eq!(hero.vitality().current_hp, 20);

    hero.remove_effect(id).unwrap();
    assert_eq!(hero.stats().max_hp, 20);
    assert_eq!(hero.vitality().current_hp, 20);
}

#[test]
fn test_two_handed_weapon_evicts_off_hand() {
    separator("Two-handed eviction");
    let mut hero = hero(rules());

    let buckler = give(&mut hero, "buckler", "buckler-1");
    hero.equip(buckler, None).unwrap();
    assert_eq!(hero.equipment().get(EquipSlot::OffHand).unwrap().id, "buckler-1");
    let shielded_ac = hero.stats().armor_class;

    let greatsword = give(&mut hero, "greatsword", "greatsword-1");
    let outcome = hero.equip(greatsword, None).unwrap();
    print_creature(&hero);

    assert_eq!(outcome.evicted, vec![(EquipSlot::OffHand, "buckler-1".to_string())]);
    assert!(hero.equipment().get(EquipSlot::OffHand).is_none());
    assert_eq!(hero.equipment().slot_of("buckler-1"), None);
    assert!(hero.equipment().find_unequipped("buckler-1").is_some());
    assert!(hero.stats().armor_class < shielded_ac);

    let buckler = hero.equipment().find_unequipped("buckler-1").unwrap();
    let err = hero.equip(buckler, None).unwrap_err();
    assert_eq!(err, EquipError::HandsOccupied);
    assert_eq!(err.reason(), EquipFailure::Prerequisites);
}

#[test]
fn test_both_rings_cursed() {
    separator("Cursed rings");
    let mut hero = hero(rules());

    let first = give(&mut hero, "ring_of_binding", "binding-1");
    hero.equip(first, None).unwrap();
    let second = give(&mut hero, "ring_of_binding", "binding-2");
    hero.equip(second, None).unwrap();

    let stats_before = hero.stats().clone();
    let third = give(&mut hero, "ring_of_protection", "protection-1");
    let err = hero.equip(third, None).unwrap_err();

    assert_eq!(err.reason(), EquipFailure::Curse);
    assert_eq!(hero.equipment().get(EquipSlot::RingRight).unwrap().id, "binding-1");
    assert_eq!(hero.equipment().get(EquipSlot::RingLeft).unwrap().id, "binding-2");
    assert!(hero.equipment().find_unequipped("protection-1").is_some());
    assert_eq!(hero.stats(), &stats_before);

    assert_eq!(
        hero.unequip(EquipSlot::RingLeft).unwrap_err(),
        EquipError::CursedItem(EquipSlot::RingLeft)
    );

    hero.apply_effect(Effect::new("remove_curse", "Remove Curse").with_bonus(Bonus::flag(BonusKind::CurseBypass)))
        .unwrap();
    hero.unequip(EquipSlot::RingLeft).unwrap();
    assert!(hero.equipment().get(EquipSlot::RingLeft).is_none());
}

#[test]
fn test_insufficient_action_points_changes_nothing() {
    let mut hero = hero(rules());
    hero.set_turn_mode(true);
    hero.start_turn();
    assert!(hero.perform(8000));

    let sword = give(&mut hero, "longsword", "sword-1");
    assert!(!hero.can_equip(sword));
    let err = hero.equip(sword, None).unwrap_err();
    assert_eq!(err.reason(), EquipFailure::Resource);
    assert_eq!(hero.timer().ap(), 2000);
    assert!(hero.equipment().get(EquipSlot::MainHand).is_none());
}

#[test]
fn test_temporary_hp_absorbs_damage() {
    separator("Temporary HP");
    let mut hero = hero(rules());
    hero.add_temporary_hp(8);

    let outcome = hero.take_damage(5);
    println!("  {}", outcome.summary());
    assert_eq!(hero.vitality().current_hp, 20);
    assert_eq!(hero.vitality().temporary_hp, 3);

    let outcome = hero.remove_temporary_hp(10);
    assert_eq!(outcome.absorbed, 3);
    assert_eq!(hero.vitality().temporary_hp, 0);
    assert_eq!(hero.vitality().current_hp, 20);
}

#[test]
fn test_death_threshold_boundary() {
    let mut dying = hero(rules());
    dying.take_damage(39);
    assert_eq!(dying.vitality().current_hp, -19);
    assert_eq!(dying.status(), VitalStatus::Dying);

    let mut dead = hero(rules());
    dead.take_damage(40);
    assert_eq!(dead.vitality().current_hp, -20);
    assert_eq!(dead.status(), VitalStatus::Dead);

    let reported = dead.take_damage(10);
    assert_eq!(reported.applied, 0);
    assert_eq!(dead.heal(10), 0);
    assert_eq!(dead.vitality().current_hp, -20);
}

#[test]
fn test_immortal_never_leaves_alive() {
    let mut hero = hero(rules());
    hero.set_immortal(true);
    for amount in [1, 19, 20, 21, 1000] {
        let outcome = hero.take_damage(amount);
        assert_eq!(outcome.requested, amount);
        assert_eq!(hero.vitality().current_hp, 20);
        assert_eq!(hero.status(), VitalStatus::Alive);
    }
}

#[test]
fn test_summon_expires_on_time() {
    let mut summon = Creature::builder("wolf", "human", rules())
        .with_role("fighter", 1)
        .build()
        .unwrap();
    summon.set_immortal(true);
    summon.summon(10, 5);

    for round in 11..15 {
        summon.elapse_rounds(1, round);
        assert_eq!(summon.status(), VitalStatus::Alive, "round {}", round);
    }
    summon.elapse_rounds(1, 15);
    assert_eq!(summon.status(), VitalStatus::Dead);
    assert_eq!(summon.vitality().current_hp, -20);
}

#[test]
fn test_effects_tick_on_equipped_items_only() {
    let mut hero = hero(rules());
    let mut ring = hero.rules().create_item("ring_of_protection", "ring-1").unwrap();
    ring.enchant(Effect::new("glow", "Glow").with_duration(2)).unwrap();
    let index = hero.add_to_inventory(ring);

    hero.elapse_rounds(5, 5);
    assert_eq!(hero.equipment().unequipped()[index].enchantments().len(), 2);

    hero.equip(index, None).unwrap();
    hero.elapse_rounds(2, 7);
    let ring = hero.equipment().get(EquipSlot::RingRight).unwrap();
    assert_eq!(ring.enchantments().len(), 1);
}

#[test]
fn test_persistence_round_trip() {
    separator("Persistence");
    let rules = rules();
    let mut hero = hero(rules.clone());

    let sword = give(&mut hero, "longsword", "sword-1");
    hero.equip(sword, None).unwrap();
    give(&mut hero, "chain_mail", "mail-1");
    hero.apply_template("false_life").unwrap();
    hero.apply_template("bless").unwrap();
    hero.elapse_rounds(2, 2);
    hero.take_damage(13);
    print_creature(&hero);

    let json = serde_json::to_string_pretty(&hero.to_record()).unwrap();
    let record: CreatureRecord = serde_json::from_str(&json).unwrap();
    let loaded = Creature::from_record(&record, rules).unwrap();

    assert_eq!(loaded.vitality(), hero.vitality());
    assert_eq!(loaded.stats(), hero.stats());
    assert_eq!(loaded.equipment().get(EquipSlot::MainHand).unwrap().id, "sword-1");
    assert_eq!(loaded.equipment().unequipped().len(), 1);
    assert_eq!(loaded.effects().len(), hero.effects().len());
    assert_eq!(loaded.to_record(), record);
}
