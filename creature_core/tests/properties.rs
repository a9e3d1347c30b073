//! Property tests for effect bookkeeping and stat recomputation

use creature_core::{
    bonus::{Bonus, BonusAggregate, BonusKind},
    config::{RuleData, VitalityConstants},
    creature::Creature,
    effect::{Effect, EffectId, EffectSet},
    types::EntityRef,
    vitality::VitalityState,
};
use proptest::prelude::*;
use std::sync::Arc;

fn kind() -> impl Strategy<Value = BonusKind> {
    prop_oneof![
        Just(BonusKind::Attack),
        Just(BonusKind::MaxHp),
        Just(BonusKind::ArmorClass),
        Just(BonusKind::Str),
        Just(BonusKind::Con),
        Just(BonusKind::Dex),
        Just(BonusKind::TemporaryHp),
        Just(BonusKind::MentalResistance),
    ]
}

fn bonus() -> impl Strategy<Value = Bonus> {
    (kind(), -20i32..20, any::<bool>()).prop_map(|(kind, amount, percent)| {
        if percent {
            Bonus::percent(kind, amount)
        } else {
            Bonus::flat(kind, amount)
        }
    })
}

fn effect_bonuses() -> impl Strategy<Value = Vec<Vec<Bonus>>> {
    prop::collection::vec(prop::collection::vec(bonus(), 0..4), 0..6)
}

fn effect(i: usize, bonuses: &[Bonus], duration: Option<u32>) -> Effect {
    let mut effect = Effect::new(format!("effect_{}", i), "Generated");
    for bonus in bonuses {
        effect = effect.with_bonus(bonus.clone());
    }
    match duration {
        Some(rounds) => effect.with_duration(rounds),
        None => effect,
    }
}

fn sorted(aggregate: &BonusAggregate) -> Vec<Bonus> {
    let mut bonuses: Vec<Bonus> = aggregate.iter().cloned().collect();
    bonuses.sort_by_key(|b| format!("{:?}", b));
    bonuses
}

proptest! {
    /// Adding then removing effects returns the set's bonuses to where they were
    #[test]
    fn prop_add_remove_round_trip(
        existing in effect_bonuses(),
        added in effect_bonuses(),
        seed in any::<u64>(),
    ) {
        let mut set = EffectSet::new(EntityRef::Creature("c".to_string()));
        for (i, bonuses) in existing.iter().enumerate() {
            set.add(effect(i, bonuses, None)).unwrap();
        }
        let before = set.bonuses();

        let mut ids: Vec<EffectId> = added
            .iter()
            .enumerate()
            .map(|(i, bonuses)| set.add(effect(100 + i, bonuses, Some(3))).unwrap())
            .collect();
        if !ids.is_empty() {
            let len = ids.len();
            ids.rotate_left((seed as usize) % len);
        }
        for id in ids {
            set.remove(id).unwrap();
        }

        prop_assert_eq!(set.bonuses(), before);
        prop_assert_eq!(set.len(), existing.len());
    }

    /// Summing bonuses does not depend on the order they arrive in
    #[test]
    fn prop_aggregate_order_independent(bonuses in prop::collection::vec(bonus(), 0..12), seed in any::<u64>()) {
        let forward: BonusAggregate = bonuses.iter().cloned().collect();
        let mut shuffled = bonuses.clone();
        if !shuffled.is_empty() {
            let len = shuffled.len();
            shuffled.rotate_left((seed as usize) % len);
            shuffled.reverse();
        }
        let backward: BonusAggregate = shuffled.into_iter().collect();

        for kind in [BonusKind::Attack, BonusKind::MaxHp, BonusKind::Str, BonusKind::TemporaryHp] {
            prop_assert_eq!(forward.get(kind), backward.get(kind));
            prop_assert_eq!(forward.percent(kind), backward.percent(kind));
        }
        prop_assert_eq!(sorted(&forward), sorted(&backward));
    }

    /// Recomputing twice in a row changes neither stats nor vitality
    #[test]
    fn prop_recompute_idempotent(effects in effect_bonuses(), damage in 0i32..30) {
        let rules = Arc::new(RuleData::with_defaults());
        let mut creature = Creature::builder("c", "human", rules)
            .with_role("fighter", 3)
            .player_controlled()
            .build()
            .unwrap();
        for (i, bonuses) in effects.iter().enumerate() {
            creature.apply_effect(effect(i, bonuses, Some(4))).unwrap();
        }
        creature.take_damage(damage);

        creature.recompute_all();
        let stats = creature.stats().clone();
        let vitality = creature.vitality().clone();
        creature.recompute_all();

        prop_assert_eq!(creature.stats(), &stats);
        prop_assert_eq!(creature.vitality(), &vitality);
        prop_assert!(creature.vitality().current_hp <= creature.stats().max_hp);
    }

    /// Damage smaller than the temporary HP pool never reaches current HP
    #[test]
    fn prop_temporary_hp_absorbs(temporary in 1i32..100, damage in 0i32..100, hp in 1i32..50) {
        prop_assume!(damage < temporary);
        let mut vitality = VitalityState::new(hp);
        vitality.add_temporary_hp(temporary);

        vitality.take_damage(damage, true, &VitalityConstants::default());
        prop_assert_eq!(vitality.current_hp, hp);
        prop_assert_eq!(vitality.temporary_hp, temporary - damage);
    }
}
