//! Layer name normalization.
//!
//! Names are compared through a key produced by [`NameNormalizer::key`].
//! Only case folding and (optionally) surrounding whitespace are handled;
//! punctuation is compared as-is.

use serde::{Deserialize, Serialize};

/// Canonicalize a layer name for comparison.
///
/// Returns `name` unchanged when `case_sensitive` is true, otherwise its
/// lowercase form.
pub fn normalize(name: &str, case_sensitive: bool) -> String {
    if case_sensitive {
        name.to_string()
    } else {
        name.to_lowercase()
    }
}

/// Name comparison policy shared by schema aliases and file layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameNormalizer {
    /// Compare names exactly instead of lowercasing them.
    pub case_sensitive: bool,
    /// Strip leading and trailing whitespace before comparison.
    pub trim_whitespace: bool,
}

impl Default for NameNormalizer {
    fn default() -> Self {
        Self::case_insensitive()
    }
}

impl NameNormalizer {
    #[must_use]
    pub const fn case_sensitive() -> Self {
        Self {
            case_sensitive: true,
            trim_whitespace: false,
        }
    }

    #[must_use]
    pub const fn case_insensitive() -> Self {
        Self {
            case_sensitive: false,
            trim_whitespace: false,
        }
    }

    /// Enable or disable whitespace trimming.
    #[must_use]
    pub const fn with_trim_whitespace(mut self, enable: bool) -> Self {
        self.trim_whitespace = enable;
        self
    }

    /// Comparison key for `name`.
    pub fn key(&self, name: &str) -> String {
        let name = if self.trim_whitespace {
            name.trim()
        } else {
            name
        };
        normalize(name, self.case_sensitive)
    }
}
