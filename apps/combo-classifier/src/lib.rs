// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_pass_by_value
    )
)]

//! Combo Classifier - Rust Core Library
//!
//! Structural classification of futures and options baskets.
//!
//! Given an unordered basket of legs, the classifier finds the first
//! combination template in its library (spread, straddle, strip, ...) that
//! the basket fits, and reports which slot of the template each leg fills.
//!
//! # Modules
//!
//! - `combination`: components, leg and combination templates, the
//!   matching engine, and the classifier
//! - `library`: YAML template library loading
//! - `config`: runtime configuration (library path, leg ceiling, logging)
//! - `telemetry`: tracing subscriber setup
//!
//! # Example
//!
//! ```rust,ignore
//! use combo_classifier::{Classifier, Component};
//!
//! let classifier = Classifier::load_or_empty("etc/combinations.yaml");
//! let basket: Vec<Component> = ["C 1 100 2010-09-17", "P 1 100 2010-09-17"]
//!     .iter()
//!     .map(|leg| leg.parse())
//!     .collect::<Result<_, _>>()?;
//!
//! let result = classifier.classify(&basket);
//! println!("{} {:?}", result.name(), result.roles());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Combination templates and the matching engine.
pub mod combination;

/// Runtime configuration.
pub mod config;

/// Template library loading.
pub mod library;

/// Tracing setup.
pub mod telemetry;

pub use combination::{
    Cardinality, Classification, Classifier, CombinationTemplate, Component, Expiration,
    ExpirationConstraint, InstrumentType, LegTemplate, Period, PeriodUnit, RatioConstraint, Sign,
    StrikeConstraint, UNCLASSIFIED,
};
pub use library::{LibraryError, load_library, parse_library};
