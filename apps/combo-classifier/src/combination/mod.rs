//! Combination templates and the matching engine.
//!
//! A combination template is a named, ordered list of leg templates plus a
//! cardinality policy. Classifying a basket means finding the first
//! template in the library whose legs the basket can fill, and reporting
//! which slot each component fills:
//! - `More`: one or more repeats of a single leg (e.g. a futures pack)
//! - `Fixed`: exactly one component per leg (e.g. a straddle)
//! - `Multiply`: whole groups of the legs (e.g. a quarterly strip)

mod classifier;
mod error;
mod expiration;
mod leg;
mod matcher;
mod template;
mod types;

// Core types
pub use expiration::{Expiration, Period, PeriodUnit};
pub use types::{Component, InstrumentType};

// Templates
pub use leg::{ExpirationConstraint, LegTemplate, RatioConstraint, Sign, StrikeConstraint};
pub use template::{Cardinality, CombinationTemplate};

// Matching
pub use classifier::{Classification, Classifier, UNCLASSIFIED};
pub use matcher::{fast_check, final_check, match_template};

// Errors
pub use error::{ComponentParseError, PeriodParseError, TemplateError};
