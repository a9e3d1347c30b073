//! RoleSource - Hit points and attack bonus from role levels

use crate::config::{RoleDef, RuleData};
use crate::source::StatSource;
use crate::stat_block::{RoleProgress, StatAccumulator};

/// Stats from the levels a creature holds in each role
///
/// The first role added is the base role and grants first-level hit points.
#[derive(Debug, Clone, Default)]
pub struct RoleSource {
    roles: Vec<RoleProgress>,
}

impl RoleSource {
    /// Create a role source with no levels
    pub fn new() -> Self {
        Self::default()
    }

    /// Add levels in a role (builder style)
    pub fn with_role(mut self, role: &RoleDef, level: u32) -> Self {
        self.add_levels(role, level);
        self
    }

    /// Resolve role ids against rule data, skipping unknown roles
    pub fn from_levels(levels: &[(String, u32)], rules: &RuleData) -> Self {
        let mut source = Self::new();
        for (role_id, level) in levels {
            match rules.role(role_id) {
                Some(role) => source.add_levels(role, *level),
                None => tracing::warn!(role = %role_id, "unknown role ignored"),
            }
        }
        source
    }

    /// Add levels, merging with an existing entry for the same role
    pub fn add_levels(&mut self, role: &RoleDef, level: u32) {
        if let Some(existing) = self.roles.iter_mut().find(|r| r.role_id == role.id) {
            existing.level += level;
            return;
        }
        self.roles.push(RoleProgress {
            role_id: role.id.clone(),
            level,
            level1_hp: role.level1_hp,
            hp_per_level: role.hp_per_level,
            attack_per_level: role.attack_per_level,
        });
    }

    /// Total character level
    pub fn level(&self) -> u32 {
        self.roles.iter().map(|r| r.level).sum()
    }

    pub fn roles(&self) -> &[RoleProgress] {
        &self.roles
    }
}

impl StatSource for RoleSource {
    fn id(&self) -> &str {
        "roles"
    }

    fn priority(&self) -> i32 {
        -50
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        stats.roles.extend(self.roles.iter().cloned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fighter() -> RoleDef {
        RoleDef {
            id: "fighter".to_string(),
            name: "Fighter".to_string(),
            level1_hp: 20,
            hp_per_level: 10,
            attack_per_level: 5,
        }
    }

    #[test]
    fn test_levels_merge() {
        let source = RoleSource::new().with_role(&fighter(), 2).with_role(&fighter(), 1);
        assert_eq!(source.roles().len(), 1);
        assert_eq!(source.level(), 3);
    }

    #[test]
    fn test_unknown_roles_skipped() {
        let rules = RuleData::with_defaults();
        let levels = vec![("fighter".to_string(), 2), ("bard".to_string(), 1)];
        let source = RoleSource::from_levels(&levels, &rules);
        assert_eq!(source.level(), 2);
    }

    #[test]
    fn test_apply_pushes_progress() {
        let source = RoleSource::new().with_role(&fighter(), 4);
        let mut acc = StatAccumulator::new();
        source.apply(&mut acc);
        assert_eq!(acc.roles.len(), 1);
        assert_eq!(acc.roles[0].level, 4);
    }
}
