//! Errors raised while building templates and parsing legs.
//!
//! Matching itself never fails: every check is a predicate and a basket
//! that satisfies nothing is simply unclassified.

use thiserror::Error;

/// Errors constructing a [`CombinationTemplate`](super::CombinationTemplate).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// Template name is empty.
    #[error("combination template name must not be empty")]
    EmptyName,

    /// Template declares no legs.
    #[error("combination template '{name}' has no legs")]
    NoLegs {
        /// Template name.
        name: String,
    },

    /// A `more` template was given more than one leg.
    #[error("combination template '{name}' uses cardinality 'more' with {count} legs (expected 1)")]
    MoreNeedsSingleLeg {
        /// Template name.
        name: String,
        /// Number of legs supplied.
        count: usize,
    },

    /// A `more` template requires at least one component.
    #[error("combination template '{name}' has min_count 0")]
    ZeroMinCount {
        /// Template name.
        name: String,
    },
}

/// Errors parsing a period such as `"1q"` or `"-2m"`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodParseError {
    /// Input was empty.
    #[error("period is empty")]
    Empty,

    /// Unit suffix is not one of `d`, `m`, `q`, `y`.
    #[error("unknown period unit in '{0}' (expected d, m, q or y)")]
    UnknownUnit(String),

    /// Count did not fit an `i32`.
    #[error("period count out of range in '{0}'")]
    CountOutOfRange(String),
}

/// Errors parsing a leg from its compact text form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComponentParseError {
    /// Wrong number of whitespace separated fields.
    #[error("expected '<TYPE> <RATIO> [<STRIKE>] <YYYY-MM-DD>', got {0} field(s)")]
    FieldCount(usize),

    /// Unknown instrument type code.
    #[error("unknown instrument type '{0}' (expected F, P or C)")]
    InstrumentType(String),

    /// Ratio is not a decimal number.
    #[error("invalid ratio '{0}'")]
    Ratio(String),

    /// Strike is not a decimal number.
    #[error("invalid strike '{0}'")]
    Strike(String),

    /// Expiration is not a valid calendar date.
    #[error("invalid expiration '{0}' (expected YYYY-MM-DD)")]
    Expiration(String),
}
