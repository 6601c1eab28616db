//! Template library and matching limits.

use serde::{Deserialize, Serialize};

/// Where the combination library lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Path to the YAML template library.
    #[serde(default = "default_library_path")]
    pub path: String,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            path: default_library_path(),
        }
    }
}

/// Matching limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Largest basket the permutation search will attempt.
    #[serde(default = "default_max_legs")]
    pub max_legs: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            max_legs: default_max_legs(),
        }
    }
}

pub(crate) fn default_library_path() -> String {
    "etc/combinations.yaml".to_string()
}

pub(crate) const fn default_max_legs() -> usize {
    10
}
