//! Loading the combination template library.
//!
//! Libraries are YAML documents listing templates in priority order:
//!
//! ```yaml
//! combinations:
//!   - name: Straddle
//!     cardinality: fixed
//!     legs:
//!       - { type: C, ratio: "+", strike: A, expiration: A }
//!       - { type: P, ratio: "+", strike: A, expiration: A }
//!   - name: Futures Pack
//!     cardinality: more
//!     min_count: 2
//!     legs:
//!       - { type: F, ratio: "+" }
//! ```
//!
//! Leg fields:
//! - `type`: `F`, `P`, `C`, or `O` (put or call)
//! - `ratio`: `"+"` / `"-"` for a sign, or an exact number
//! - `strike` / `expiration`: a one-character label
//! - `strike_offset` / `expiration_offset`: an integer offset or a run of
//!   `+`/`-` signs; `expiration_offset` also takes a period such as `1q`,
//!   `3m`, `-1y` or `10d`

mod schema;

use std::path::Path;

use thiserror::Error;

use crate::combination::{Classifier, CombinationTemplate, TemplateError};
use schema::LibraryDocument;

/// Errors loading a template library.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// Failed to read the library file.
    #[error("Failed to read library file '{path}': {source}")]
    ReadError {
        /// Path to the library file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse library YAML.
    #[error("Failed to parse library YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// An entry could not be resolved into a template.
    #[error("Invalid combination '{name}': {reason}")]
    InvalidEntry {
        /// Combination name.
        name: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The resolved template was rejected.
    #[error("Invalid combination template: {0}")]
    Template(#[from] TemplateError),
}

/// Parse a library from a YAML string.
pub fn parse_library(yaml: &str) -> Result<Vec<CombinationTemplate>, LibraryError> {
    let document: LibraryDocument = serde_yaml_bw::from_str(yaml)?;
    document
        .combinations
        .into_iter()
        .map(schema::CombinationEntry::resolve)
        .collect()
}

/// Load a library from a YAML file.
pub fn load_library(path: impl AsRef<Path>) -> Result<Vec<CombinationTemplate>, LibraryError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| LibraryError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    let templates = parse_library(&contents)?;
    tracing::debug!(
        path = %path.display(),
        templates = templates.len(),
        "Loaded combination library"
    );
    Ok(templates)
}

impl Classifier {
    /// Build a classifier from a library file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LibraryError> {
        load_library(path).map(Self::new)
    }

    /// Build a classifier from a library file, falling back to an empty
    /// library (every basket unclassified) if the file cannot be loaded.
    #[must_use]
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(classifier) => classifier,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Combination library unavailable, all baskets will be unclassified"
                );
                Self::default()
            }
        }
    }
}
