//! Per-call configuration for the JSON facade.
//!
//! Both option sets are plain `Copy` values passed by value into each call.
//! They also derive serde so a host application can carry them inside its
//! own config file; missing fields fall back to the defaults below.

use serde::{Deserialize, Serialize};

/// Controls the layout of serialized output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializeOptions {
    /// Multi-line output with a two-space indent.
    pub prettify: bool,
    /// Omit object fields whose value is `null`.
    pub exclude_null_fields: bool,
}

impl SerializeOptions {
    pub fn with_prettify(mut self, prettify: bool) -> Self {
        self.prettify = prettify;
        self
    }

    pub fn with_exclude_null_fields(mut self, exclude: bool) -> Self {
        self.exclude_null_fields = exclude;
        self
    }
}

/// Controls parser leniency. Both flags default to `true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeserializeOptions {
    /// Match object keys against struct fields ignoring letter case.
    pub case_insensitive_keys: bool,
    /// Accept a comma directly before `}` or `]`.
    pub allow_trailing_commas: bool,
}

impl Default for DeserializeOptions {
    fn default() -> Self {
        Self {
            case_insensitive_keys: true,
            allow_trailing_commas: true,
        }
    }
}

impl DeserializeOptions {
    /// Plain RFC 8259 parsing with exact key matching.
    pub fn strict() -> Self {
        Self {
            case_insensitive_keys: false,
            allow_trailing_commas: false,
        }
    }

    pub fn with_case_insensitive_keys(mut self, enabled: bool) -> Self {
        self.case_insensitive_keys = enabled;
        self
    }

    pub fn with_trailing_commas(mut self, enabled: bool) -> Self {
        self.allow_trailing_commas = enabled;
        self
    }
}
