//! DamageOutcome - What a single damage application did

use serde::{Deserialize, Serialize};

use super::{VitalStatus, VitalityState};

/// Result of applying damage to a [`VitalityState`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageOutcome {
    // === Damage Breakdown ===
    /// Removed by immunity and damage reduction before the hooks ran
    pub mitigated: i32,
    /// Amount after damage hooks, before immortality and absorption
    pub requested: i32,
    /// Suppressed by immortality
    pub prevented: i32,
    /// Taken by temporary hit points
    pub absorbed: i32,
    /// Taken from current hit points
    pub applied: i32,

    // === State Changes ===
    pub hp_before: i32,
    pub hp_after: i32,
    pub temporary_hp_before: i32,
    pub temporary_hp_after: i32,
    pub status_before: VitalStatus,
    pub status_after: VitalStatus,
}

impl DamageOutcome {
    pub(super) fn new(requested: i32, state: &VitalityState) -> Self {
        DamageOutcome {
            mitigated: 0,
            requested,
            prevented: 0,
            absorbed: 0,
            applied: 0,
            hp_before: state.current_hp,
            hp_after: state.current_hp,
            temporary_hp_before: state.temporary_hp,
            temporary_hp_after: state.temporary_hp,
            status_before: state.status(),
            status_after: state.status(),
        }
    }

    pub(super) fn finish(&mut self, state: &VitalityState) {
        self.hp_after = state.current_hp;
        self.temporary_hp_after = state.temporary_hp;
        self.status_after = state.status();
    }

    /// Outcome of a request that never reached the vitality state
    pub fn unchanged(state: &VitalityState) -> Self {
        Self::new(0, state)
    }

    pub fn is_killing_blow(&self) -> bool {
        self.status_before != VitalStatus::Dead && self.status_after == VitalStatus::Dead
    }

    pub fn hp_change(&self) -> i32 {
        self.hp_after.saturating_sub(self.hp_before)
    }

    pub fn summary(&self) -> String {
        let mut parts = Vec::new();

        if self.applied > 0 {
            parts.push(format!("{} damage taken", self.applied));
        }

        if self.absorbed > 0 {
            parts.push(format!("{} absorbed by temporary HP", self.absorbed));
        }

        if self.mitigated > 0 {
            parts.push(format!("{} mitigated", self.mitigated));
        }

        if self.prevented > 0 {
            parts.push(format!("{} prevented", self.prevented));
        }

        if self.is_killing_blow() {
            parts.push("FATAL".to_string());
        } else if self.status_before != VitalStatus::Dying && self.status_after == VitalStatus::Dying {
            parts.push("dying".to_string());
        }

        if parts.is_empty() {
            "No damage".to_string()
        } else {
            parts.join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VitalityConstants;

    #[test]
    fn test_summary() {
        let mut state = VitalityState::new(10);
        state.add_temporary_hp(3);
        let outcome = state.take_damage(8, true, &VitalityConstants::default());
        assert_eq!(outcome.summary(), "5 damage taken, 3 absorbed by temporary HP");
        assert_eq!(outcome.hp_change(), -5);
    }

    #[test]
    fn test_summary_fatal_and_empty() {
        let mut state = VitalityState::new(10);
        assert_eq!(DamageOutcome::unchanged(&state).summary(), "No damage");

        let outcome = state.take_damage(40, true, &VitalityConstants::default());
        assert_eq!(outcome.summary(), "40 damage taken, FATAL");
    }

    #[test]
    fn test_summary_dying() {
        let mut state = VitalityState::new(10);
        let outcome = state.take_damage(15, true, &VitalityConstants::default());
        assert_eq!(outcome.summary(), "15 damage taken, dying");
    }
}
