//! Vitality - Hit points, temporary hit points and the dying/dead state machine

mod outcome;

pub use outcome::DamageOutcome;

use serde::{Deserialize, Serialize};

use crate::config::VitalityConstants;

/// Coarse life state derived from the vitality flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VitalStatus {
    Alive,
    Dying,
    Dead,
}

/// Window during which a summoned creature exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summoned {
    pub start_round: u32,
    pub duration: u32,
}

impl Summoned {
    pub fn is_expired(&self, current_round: u32) -> bool {
        current_round >= self.start_round.saturating_add(self.duration)
    }
}

/// Hit point state of one creature
///
/// A dead creature has neither temporary HP nor the dying flag, and ignores
/// damage and healing until raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VitalityState {
    /// May be negative while dying or dead
    pub current_hp: i32,
    pub temporary_hp: i32,
    pub dying: bool,
    pub dead: bool,
    pub immortal: bool,
    pub summoned: Option<Summoned>,
}

impl VitalityState {
    /// Full health
    pub fn new(max_hp: i32) -> Self {
        VitalityState {
            current_hp: max_hp,
            temporary_hp: 0,
            dying: false,
            dead: false,
            immortal: false,
            summoned: None,
        }
    }

    pub fn status(&self) -> VitalStatus {
        if self.dead {
            VitalStatus::Dead
        } else if self.dying {
            VitalStatus::Dying
        } else {
            VitalStatus::Alive
        }
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn is_dying(&self) -> bool {
        self.dying
    }

    pub fn is_summoned(&self) -> bool {
        self.summoned.is_some()
    }

    /// Current plus temporary hit points; the dying and death bands use this
    pub fn total_hp(&self) -> i32 {
        self.current_hp.saturating_add(self.temporary_hp)
    }

    /// Apply damage whose amount has already been through the damage hooks
    ///
    /// Temporary HP absorbs first. A creature that reaches the dying band
    /// dies outright unless it is player controlled and not summoned.
    pub fn take_damage(&mut self, amount: i32, player_controlled: bool, constants: &VitalityConstants) -> DamageOutcome {
        let mut outcome = DamageOutcome::new(amount.max(0), self);
        if self.dead {
            outcome.finish(self);
            return outcome;
        }

        let mut left = if self.immortal { 0 } else { amount.max(0) };
        outcome.prevented = outcome.requested - left;

        let absorbed = left.min(self.temporary_hp);
        self.temporary_hp -= absorbed;
        left -= absorbed;
        outcome.absorbed = absorbed;

        self.current_hp = self.current_hp.saturating_sub(left);
        outcome.applied = left;

        let total = self.total_hp();
        if total <= constants.death_threshold {
            self.kill(constants);
        } else if total <= 0 {
            self.dying = true;
            if self.summoned.is_some() || !player_controlled {
                self.kill(constants);
            }
        }

        outcome.finish(self);
        if outcome.status_before != outcome.status_after {
            tracing::debug!(
                before = ?outcome.status_before,
                after = ?outcome.status_after,
                hp = self.current_hp,
                "vitality status changed"
            );
        }
        outcome
    }

    /// Heal up to `max_hp`, returning the hit points actually restored
    pub fn heal(&mut self, amount: i32, max_hp: i32) -> i32 {
        if self.dead || amount <= 0 {
            return 0;
        }
        let before = self.current_hp;
        self.current_hp = self.current_hp.saturating_add(amount).min(max_hp).max(before);
        if self.total_hp() > 0 {
            self.dying = false;
        }
        self.current_hp - before
    }

    /// Immortal creatures ignore this
    pub fn kill(&mut self, constants: &VitalityConstants) -> bool {
        if self.immortal {
            return false;
        }
        self.force_kill(constants)
    }

    /// Kill regardless of immortality
    pub fn force_kill(&mut self, constants: &VitalityConstants) -> bool {
        if self.dead {
            return false;
        }
        self.current_hp = self.current_hp.min(constants.death_threshold);
        self.dying = false;
        self.dead = true;
        self.temporary_hp = 0;
        tracing::debug!(hp = self.current_hp, "died");
        true
    }

    /// Bring a dead creature back, returning the experience it loses
    ///
    /// Returns `None` when the creature is not dead.
    pub fn raise(&mut self, level: u32, experience: u32, constants: &VitalityConstants) -> Option<u32> {
        if !self.dead {
            return None;
        }
        self.dead = false;
        self.dying = false;
        self.current_hp = constants.raise_hp;
        self.temporary_hp = 0;

        let penalty = level.saturating_mul(constants.death_xp_penalty_per_level);
        tracing::debug!(hp = self.current_hp, penalty, "raised");
        Some(penalty.min(experience))
    }

    pub fn add_temporary_hp(&mut self, amount: i32) {
        if self.dead || amount <= 0 {
            return;
        }
        self.temporary_hp = self.temporary_hp.saturating_add(amount);
        if self.total_hp() > 0 {
            self.dying = false;
        }
    }

    /// Amount of temporary HP a removal request actually takes away
    ///
    /// The removal itself goes through [`VitalityState::take_damage`].
    pub fn temporary_hp_removal(&self, amount: i32) -> i32 {
        amount.max(0).min(self.temporary_hp)
    }

    /// Take temporary HP away without going through damage, returning the amount removed
    pub fn strip_temporary_hp(&mut self, amount: i32) -> i32 {
        let removed = self.temporary_hp_removal(amount);
        self.temporary_hp -= removed;
        removed
    }

    /// Hard expiry for summoned creatures
    pub fn check_summon_expiry(&mut self, current_round: u32, constants: &VitalityConstants) -> bool {
        match self.summoned {
            Some(summon) if !self.dead && summon.is_expired(current_round) => {
                tracing::debug!(current_round, start = summon.start_round, duration = summon.duration, "summon expired");
                self.force_kill(constants)
            }
            _ => false,
        }
    }

    /// Clamp current HP after the maximum shrank
    pub fn clamp_to(&mut self, max_hp: i32) {
        if self.current_hp > max_hp {
            self.current_hp = max_hp;
        }
    }
}
