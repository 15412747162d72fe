//! Store configuration.
//!
//! The configuration determines which namespace of a multilingual
//! embedding table is loaded and how duplicate terms are treated. It
//! can be read from TOML:
//!
//! ```
//! use conceptvec::config::{DuplicatePolicy, StoreConfig};
//!
//! let config = StoreConfig::from_toml_str(r#"
//! namespace = "/c/de/"
//! duplicates = "keep_first"
//! "#).unwrap();
//!
//! assert_eq!(config.namespace, "/c/de/");
//! assert_eq!(config.duplicates, DuplicatePolicy::KeepFirst);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Namespace of English ConceptNet terms.
pub const DEFAULT_NAMESPACE: &str = "/c/en/";

/// Treatment of terms that occur more than once in a namespace.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Fail construction with `Error::DuplicateTerm`.
    Reject,

    /// Keep the first occurrence of a term.
    KeepFirst,

    /// Keep the last occurrence of a term. The term retains the
    /// position of its first occurrence in the vocabulary.
    KeepLast,
}

impl Default for DuplicatePolicy {
    fn default() -> Self {
        DuplicatePolicy::Reject
    }
}

/// Configuration of an embedding store.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Prefix of the qualified terms to keep. The prefix is stripped
    /// from the terms in the vocabulary.
    pub namespace: String,

    pub duplicates: DuplicatePolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            namespace: DEFAULT_NAMESPACE.to_owned(),
            duplicates: DuplicatePolicy::default(),
        }
    }
}

impl StoreConfig {
    /// Construct a configuration for the given namespace.
    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        StoreConfig {
            namespace: namespace.into(),
            ..StoreConfig::default()
        }
    }

    /// Parse a configuration from a TOML string.
    ///
    /// Missing fields take their default values.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        Ok(toml::from_str(toml)?)
    }

    /// Read a configuration from a TOML file.
    pub fn read_toml(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|e| {
            Error::read_error(
                format!("Cannot read configuration from {}", path.display()),
                e,
            )
        })?;
        Self::from_toml_str(&data)
    }
}
