//! Classifying a basket against an ordered template library.

use serde::{Deserialize, Serialize};

use super::matcher::match_template;
use super::template::CombinationTemplate;
use super::types::Component;

/// Name reported for a basket no template matches.
pub const UNCLASSIFIED: &str = "Unclassified";

/// Outcome of classifying one basket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Classification {
    /// The first template that matched.
    Matched {
        /// Template name.
        name: String,
        /// 1-based slot of each input component, parallel to the input.
        roles: Vec<usize>,
    },
    /// No template matched.
    Unclassified,
}

impl Classification {
    /// Template name, or [`UNCLASSIFIED`].
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Matched { name, .. } => name,
            Self::Unclassified => UNCLASSIFIED,
        }
    }

    /// Role assignment; empty when unclassified.
    #[must_use]
    pub fn roles(&self) -> &[usize] {
        match self {
            Self::Matched { roles, .. } => roles,
            Self::Unclassified => &[],
        }
    }

    /// Whether a template matched.
    #[must_use]
    pub const fn is_matched(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }
}

/// Ordered library of combination templates.
///
/// Templates are tried in library order and the first match wins; there is
/// no ranking by specificity. The library is immutable once built and can
/// be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    templates: Vec<CombinationTemplate>,
    max_legs: Option<usize>,
}

impl Classifier {
    /// Create a classifier over `templates`, in priority order.
    #[must_use]
    pub const fn new(templates: Vec<CombinationTemplate>) -> Self {
        Self {
            templates,
            max_legs: None,
        }
    }

    /// Refuse to search baskets with more than `max_legs` components.
    ///
    /// Matching is factorial in the basket size; larger baskets are
    /// reported unclassified.
    #[must_use]
    pub const fn with_max_legs(mut self, max_legs: usize) -> Self {
        self.max_legs = Some(max_legs);
        self
    }

    /// Templates in priority order.
    #[must_use]
    pub fn templates(&self) -> &[CombinationTemplate] {
        &self.templates
    }

    /// Number of templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the library is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Classify a basket.
    #[must_use]
    pub fn classify(&self, components: &[Component]) -> Classification {
        if let Some(max_legs) = self.max_legs {
            if components.len() > max_legs {
                tracing::warn!(
                    legs = components.len(),
                    max_legs,
                    "Basket exceeds leg ceiling, skipping classification"
                );
                return Classification::Unclassified;
            }
        }

        for template in &self.templates {
            if let Some(roles) = match_template(template, components) {
                tracing::debug!(
                    template = template.name(),
                    legs = components.len(),
                    ?roles,
                    "Basket matched"
                );
                return Classification::Matched {
                    name: template.name().to_string(),
                    roles,
                };
            }
            tracing::trace!(template = template.name(), "Template rejected basket");
        }

        tracing::debug!(
            legs = components.len(),
            templates = self.templates.len(),
            "Basket unclassified"
        );
        Classification::Unclassified
    }
}
