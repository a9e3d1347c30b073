//! BonusAggregate - Ordered multiset of bonuses with per-kind queries

use serde::{Deserialize, Serialize};

use super::{Bonus, BonusKind, Stacking};

/// An ordered multiset of [`Bonus`] values
///
/// Queries without a subtype (`get`, `percent`, `has`) only see bonuses that
/// carry no subtype key; the `_sub` variants see bonuses with that key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BonusAggregate {
    bonuses: Vec<Bonus>,
}

impl BonusAggregate {
    pub fn new() -> Self {
        BonusAggregate { bonuses: Vec::new() }
    }

    /// Add a bonus (builder style)
    pub fn with(mut self, bonus: Bonus) -> Self {
        self.add(bonus);
        self
    }

    pub fn add(&mut self, bonus: Bonus) {
        self.bonuses.push(bonus);
    }

    pub fn add_all(&mut self, other: &BonusAggregate) {
        self.bonuses.extend(other.bonuses.iter().cloned());
    }

    /// Remove one matching instance
    ///
    /// The most recently added match is removed, so an add followed by a
    /// remove leaves the order of the other bonuses untouched. Returns false
    /// and leaves the aggregate unchanged if no instance matches.
    pub fn remove(&mut self, bonus: &Bonus) -> bool {
        match self.bonuses.iter().rposition(|b| b == bonus) {
            Some(index) => {
                self.bonuses.remove(index);
                true
            }
            None => {
                tracing::warn!(?bonus, "removing a bonus that was never added");
                false
            }
        }
    }

    /// Remove one instance of every bonus in `other`
    pub fn remove_all(&mut self, other: &BonusAggregate) {
        for bonus in other.bonuses.iter().rev() {
            self.remove(bonus);
        }
    }

    /// Flat total for an unkeyed kind, honoring its stacking rule
    pub fn get(&self, kind: BonusKind) -> i32 {
        self.fold_flat(kind, |b| b.subtype.is_none())
    }

    /// Flat total for a keyed kind
    pub fn get_sub(&self, kind: BonusKind, subtype: &str) -> i32 {
        self.fold_flat(kind, |b| b.matches_subtype(subtype))
    }

    /// Summed percentage for an unkeyed kind
    pub fn percent(&self, kind: BonusKind) -> i32 {
        self.sum_percent(kind, |b| b.subtype.is_none())
    }

    /// Summed percentage for a keyed kind
    pub fn percent_sub(&self, kind: BonusKind, subtype: &str) -> i32 {
        self.sum_percent(kind, |b| b.matches_subtype(subtype))
    }

    /// True if any unkeyed bonus of this kind is nonzero
    pub fn has(&self, kind: BonusKind) -> bool {
        self.bonuses
            .iter()
            .any(|b| b.kind == kind && b.subtype.is_none() && b.amount() != 0)
    }

    /// True if any bonus of this kind with this key is nonzero
    pub fn has_sub(&self, kind: BonusKind, subtype: &str) -> bool {
        self.bonuses
            .iter()
            .any(|b| b.kind == kind && b.matches_subtype(subtype) && b.amount() != 0)
    }

    /// All bonuses of one kind, keyed or not
    pub fn of_kind(&self, kind: BonusKind) -> BonusAggregate {
        BonusAggregate {
            bonuses: self.bonuses.iter().filter(|b| b.kind == kind).cloned().collect(),
        }
    }

    /// Negative bonuses of one kind
    pub fn penalties_of_kind(&self, kind: BonusKind) -> BonusAggregate {
        BonusAggregate {
            bonuses: self
                .bonuses
                .iter()
                .filter(|b| b.kind == kind && b.is_penalty())
                .cloned()
                .collect(),
        }
    }

    pub fn contains_kind(&self, kind: BonusKind) -> bool {
        self.bonuses.iter().any(|b| b.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bonus> {
        self.bonuses.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Bonus> {
        self.bonuses.iter_mut()
    }

    pub(crate) fn retain(&mut self, f: impl FnMut(&Bonus) -> bool) {
        self.bonuses.retain(f);
    }

    pub fn len(&self) -> usize {
        self.bonuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bonuses.is_empty()
    }

    fn fold_flat(&self, kind: BonusKind, filter: impl Fn(&Bonus) -> bool) -> i32 {
        let values = self
            .bonuses
            .iter()
            .filter(|b| b.kind == kind && !b.value.is_percent() && filter(b))
            .map(Bonus::amount);

        match kind.stacking() {
            Stacking::Additive => values.sum(),
            Stacking::Capped { min, max } => values.sum::<i32>().clamp(min, max),
            Stacking::Highest => values.max().unwrap_or(0),
        }
    }

    fn sum_percent(&self, kind: BonusKind, filter: impl Fn(&Bonus) -> bool) -> i32 {
        self.bonuses
            .iter()
            .filter(|b| b.kind == kind && b.value.is_percent() && filter(b))
            .map(Bonus::amount)
            .sum()
    }
}

impl FromIterator<Bonus> for BonusAggregate {
    fn from_iter<I: IntoIterator<Item = Bonus>>(iter: I) -> Self {
        BonusAggregate {
            bonuses: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a BonusAggregate {
    type Item = &'a Bonus;
    type IntoIter = std::slice::Iter<'a, Bonus>;

    fn into_iter(self) -> Self::IntoIter {
        self.bonuses.iter()
    }
}
