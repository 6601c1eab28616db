//! Leg templates: the constraints a component must meet to fill one slot
//! of a combination.

use rust_decimal::Decimal;

use super::expiration::Period;
use super::types::{Component, InstrumentType};

/// Position direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    /// Long (ratio > 0).
    Positive,
    /// Short (ratio < 0).
    Negative,
}

/// Constraint on a component's ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatioConstraint {
    /// Ratio must equal this value exactly.
    Exact(Decimal),
    /// Ratio must have this sign; magnitude is free.
    Sign(Sign),
}

impl RatioConstraint {
    /// Whether `ratio` satisfies the constraint. A zero ratio has no sign.
    #[must_use]
    pub fn accepts(&self, ratio: Decimal) -> bool {
        match self {
            Self::Exact(expected) => *expected == ratio,
            Self::Sign(Sign::Positive) => ratio > Decimal::ZERO,
            Self::Sign(Sign::Negative) => ratio < Decimal::ZERO,
        }
    }
}

/// Constraint on a component's strike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrikeConstraint {
    /// Unconstrained.
    #[default]
    Any,
    /// Same label, same strike.
    Label(char),
    /// Strikes ordered consistently with the offsets.
    Offset(i32),
}

/// Constraint on a component's expiration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpirationConstraint {
    /// Unconstrained.
    #[default]
    Any,
    /// Same label, same expiration.
    Label(char),
    /// Expirations ordered consistently with the offsets.
    Offset(i32),
    /// Expiration lies `Period` away from the group's anchor leg.
    Period(Period),
}

/// One slot of a combination template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegTemplate {
    /// Required instrument type.
    pub instrument_type: InstrumentType,
    /// Ratio constraint.
    pub ratio: RatioConstraint,
    /// Strike constraint.
    pub strike: StrikeConstraint,
    /// Expiration constraint.
    pub expiration: ExpirationConstraint,
}

impl LegTemplate {
    /// A leg with only type and ratio constraints.
    #[must_use]
    pub const fn new(instrument_type: InstrumentType, ratio: RatioConstraint) -> Self {
        Self {
            instrument_type,
            ratio,
            strike: StrikeConstraint::Any,
            expiration: ExpirationConstraint::Any,
        }
    }

    /// Set the strike constraint.
    #[must_use]
    pub const fn with_strike(mut self, strike: StrikeConstraint) -> Self {
        self.strike = strike;
        self
    }

    /// Set the expiration constraint.
    #[must_use]
    pub const fn with_expiration(mut self, expiration: ExpirationConstraint) -> Self {
        self.expiration = expiration;
        self
    }

    /// Type and ratio check for a single component.
    ///
    /// Strike and expiration constraints need the rest of the group and are
    /// not consulted here.
    #[must_use]
    pub fn accepts(&self, component: &Component) -> bool {
        self.instrument_type.admits(component.instrument_type) && self.ratio.accepts(component.ratio)
    }
}
