//! Named combination templates.

use serde::{Deserialize, Serialize};

use super::error::TemplateError;
use super::leg::LegTemplate;

/// How many components a template needs and how they are grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum Cardinality {
    /// At least `min_count` components, each matching the single leg.
    More {
        /// Minimum basket size.
        min_count: usize,
    },
    /// Exactly one component per leg.
    Fixed,
    /// A positive multiple of the leg count; each group matches the legs.
    Multiply,
}

/// A named, ordered set of leg templates plus a cardinality policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinationTemplate {
    name: String,
    legs: Vec<LegTemplate>,
    cardinality: Cardinality,
}

impl CombinationTemplate {
    /// Build a template.
    ///
    /// `More` templates take exactly one leg and a non-zero `min_count`;
    /// every template needs a name and at least one leg.
    pub fn new(
        name: impl Into<String>,
        legs: Vec<LegTemplate>,
        cardinality: Cardinality,
    ) -> Result<Self, TemplateError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(TemplateError::EmptyName);
        }
        if legs.is_empty() {
            return Err(TemplateError::NoLegs { name });
        }
        if let Cardinality::More { min_count } = cardinality {
            if legs.len() != 1 {
                return Err(TemplateError::MoreNeedsSingleLeg {
                    count: legs.len(),
                    name,
                });
            }
            if min_count == 0 {
                return Err(TemplateError::ZeroMinCount { name });
            }
        }

        Ok(Self {
            name,
            legs,
            cardinality,
        })
    }

    /// Template name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Leg templates in slot order.
    #[must_use]
    pub fn legs(&self) -> &[LegTemplate] {
        &self.legs
    }

    /// Cardinality policy.
    #[must_use]
    pub const fn cardinality(&self) -> Cardinality {
        self.cardinality
    }
}
