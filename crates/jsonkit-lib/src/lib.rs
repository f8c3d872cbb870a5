// jsonkit-lib: convenience facade over serde_json

pub mod errors;
pub mod json;
pub mod logger;
pub mod options;

pub use errors::{ErrorKind, JsonError, Result};
pub use json::{
    deserialize, deserialize_from_file, deserialize_from_file_with, from_value, serialize,
    serialize_to_bytes, to_value,
};
pub use options::{DeserializeOptions, SerializeOptions};
