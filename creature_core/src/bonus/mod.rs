//! Bonuses - Typed numeric modifiers and their aggregate

mod aggregate;
mod kind;

pub use aggregate::BonusAggregate;
pub use kind::{BonusKind, Stacking};

use serde::{Deserialize, Serialize};

/// Amount carried by a bonus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusValue {
    /// Added to the base value
    Flat(i32),
    /// Percentage, summed per kind and applied once by the consumer
    Percent(i32),
}

impl BonusValue {
    pub fn amount(self) -> i32 {
        match self {
            BonusValue::Flat(v) | BonusValue::Percent(v) => v,
        }
    }

    pub fn is_percent(self) -> bool {
        matches!(self, BonusValue::Percent(_))
    }

    /// Same scale, different amount
    pub fn with_amount(self, amount: i32) -> BonusValue {
        match self {
            BonusValue::Flat(_) => BonusValue::Flat(amount),
            BonusValue::Percent(_) => BonusValue::Percent(amount),
        }
    }
}

/// A single typed modifier
///
/// Bonuses are plain values. Two bonuses are the same bonus exactly when
/// kind, subtype and value all match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bonus {
    pub kind: BonusKind,
    /// Subtype key (armor type, base weapon, damage type)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    pub value: BonusValue,
}

impl Bonus {
    /// Flat bonus with no subtype
    pub fn flat(kind: BonusKind, amount: i32) -> Self {
        Bonus {
            kind,
            subtype: None,
            value: BonusValue::Flat(amount),
        }
    }

    /// Percentage bonus with no subtype
    pub fn percent(kind: BonusKind, amount: i32) -> Self {
        Bonus {
            kind,
            subtype: None,
            value: BonusValue::Percent(amount),
        }
    }

    /// Capability bonus, present or absent
    pub fn flag(kind: BonusKind) -> Self {
        Bonus::flat(kind, 1)
    }

    /// Attach a subtype key
    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = Some(subtype.into());
        self
    }

    pub fn amount(&self) -> i32 {
        self.value.amount()
    }

    /// Negative bonuses count as penalties
    pub fn is_penalty(&self) -> bool {
        self.amount() < 0
    }

    pub fn matches_subtype(&self, subtype: &str) -> bool {
        self.subtype.as_deref() == Some(subtype)
    }
}
