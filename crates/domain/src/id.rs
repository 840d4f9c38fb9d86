//! Stable identifiers derived from controller names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Prefix shared by every persisted-state key.
pub const STORAGE_PREFIX: &str = "dryplug";

/// Convert a display name into an identifier-safe slug.
///
/// Lowercases the input, replaces every character outside `[a-z0-9_]`
/// with `_`, and strips leading/trailing underscores.
#[must_use]
pub fn slugify(name: &str) -> String {
    let replaced: String = name
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    replaced.trim_matches('_').to_string()
}

/// Stable per-controller identifier, the slug of its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControllerKey(String);

impl ControllerKey {
    /// Derive the key from a controller name.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnsluggableName`] when the slug is empty
    /// (e.g. a name made only of punctuation).
    pub fn from_name(name: &str) -> Result<Self, ValidationError> {
        let slug = slugify(name);
        if slug.is_empty() {
            return Err(ValidationError::UnsluggableName(name.to_string()));
        }
        Ok(Self(slug))
    }

    /// Borrow the slug.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key under which the engine state is persisted.
    #[must_use]
    pub fn storage_key(&self) -> String {
        format!("{STORAGE_PREFIX}_{}", self.0)
    }

    /// Unique id of the status indicator exposed for this controller.
    #[must_use]
    pub fn status_unique_id(&self) -> String {
        format!("{STORAGE_PREFIX}_status_{}", self.0)
    }
}

/// Parses an existing key verbatim. Unlike [`ControllerKey::from_name`],
/// the input must already be a slug.
impl FromStr for ControllerKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || slugify(s) != s {
            return Err(ValidationError::InvalidKey(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for ControllerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
