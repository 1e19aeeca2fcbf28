//! Checker options.

use serde::Deserialize;
use tiger_types::MAX_ERRORS;

/// Knobs for one semantic-analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// How many diagnostics [`Diagnostics`](tiger_types::Diagnostics) keeps.
    /// Later ones are only counted.
    pub max_errors: usize,
}

impl CheckerConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// A collector honouring `max_errors`.
    pub fn diagnostics(&self) -> tiger_types::Diagnostics {
        tiger_types::Diagnostics::with_limit(self.max_errors)
    }
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            max_errors: MAX_ERRORS,
        }
    }
}
