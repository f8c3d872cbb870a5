//! Thin facade over `serde_json` with per-call layout and leniency flags.
//!
//! Every function is stateless. Errors come back as [`JsonError`] so callers
//! can tell a bad document from a missing or unreadable file.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::errors::{JsonError, Result};
use crate::options::{DeserializeOptions, SerializeOptions};

mod keys;
mod lenient;
mod nulls;

/// Serialize a value to a JSON string.
///
/// Fields are emitted in declaration order. Pretty output uses a two-space
/// indent.
pub fn serialize<T: Serialize + ?Sized>(value: &T, options: SerializeOptions) -> Result<String> {
    let text = if options.exclude_null_fields {
        let tree = to_value(value, options)?;
        write_text(&tree, options.prettify)
    } else {
        write_text(value, options.prettify)
    };
    text.map_err(JsonError::Serialization)
}

/// Serialize a value to compact UTF-8 JSON bytes.
pub fn serialize_to_bytes<T: Serialize + ?Sized>(
    value: &T,
    exclude_null_fields: bool,
) -> Result<Vec<u8>> {
    let bytes = if exclude_null_fields {
        let tree = to_value(
            value,
            SerializeOptions::default().with_exclude_null_fields(true),
        )?;
        serde_json::to_vec(&tree)
    } else {
        serde_json::to_vec(value)
    };
    bytes.map_err(JsonError::Serialization)
}

/// Deserialize JSON text or bytes into a value.
///
/// Unknown fields are ignored. Fields missing from the document keep their
/// default when the target type is annotated with `#[serde(default)]`.
pub fn deserialize<T: DeserializeOwned>(
    source: impl AsRef<[u8]>,
    options: DeserializeOptions,
) -> Result<T> {
    let bytes = lenient::strip_bom(source.as_ref());
    let bytes = if options.allow_trailing_commas {
        lenient::remove_trailing_commas(bytes)
    } else {
        Cow::Borrowed(bytes)
    };

    let parsed = if options.case_insensitive_keys {
        serde_json::from_slice::<Value>(&bytes).and_then(keys::from_value)
    } else {
        serde_json::from_slice(&bytes)
    };
    parsed.map_err(JsonError::Parse)
}

/// Read a JSON file and deserialize it with the default leniency.
pub fn deserialize_from_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    deserialize_from_file_with(path, DeserializeOptions::default())
}

/// Read a JSON file and deserialize it with explicit options.
///
/// The file is read fully before parsing. A missing path is reported as
/// [`JsonError::FileNotFound`] before any read is attempted.
pub fn deserialize_from_file_with<T: DeserializeOwned>(
    path: impl AsRef<Path>,
    options: DeserializeOptions,
) -> Result<T> {
    let path = path.as_ref();
    match path.try_exists() {
        Ok(true) => {}
        Ok(false) => {
            return Err(JsonError::FileNotFound {
                path: path.to_path_buf(),
            })
        }
        Err(e) => return Err(JsonError::from_io(path, e)),
    }

    let bytes = fs::read(path).map_err(|e| JsonError::from_io(path, e))?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Read JSON file");

    deserialize(&bytes, options)
}

/// Convert a value to a `serde_json::Value`, honouring `exclude_null_fields`.
pub fn to_value<T: Serialize + ?Sized>(value: &T, options: SerializeOptions) -> Result<Value> {
    let mut tree = serde_json::to_value(value).map_err(JsonError::Serialization)?;
    if options.exclude_null_fields {
        nulls::strip_null_fields(&mut tree);
    }
    Ok(tree)
}

/// Convert a `serde_json::Value` into a typed value, honouring
/// `case_insensitive_keys`.
pub fn from_value<T: DeserializeOwned>(value: Value, options: DeserializeOptions) -> Result<T> {
    let parsed = if options.case_insensitive_keys {
        keys::from_value(value)
    } else {
        serde_json::from_value(value)
    };
    parsed.map_err(JsonError::Parse)
}

fn write_text<T: Serialize + ?Sized>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}
