//! JSON wire format.
//!
//! Messages travel as JSON objects keyed by lowerCamelCase field names; the
//! schema field name is accepted on input as well. Field masks travel as a
//! comma-separated path string. 64-bit integers are written as strings and
//! bytes as base64, and unpopulated fields are left out on output.

mod decode;
mod encode;

#[cfg(test)]
mod tests;

pub use decode::{decode_message, decode_value};
pub use encode::{encode_error, encode_message, to_json_string};

use fieldgate_core::{error::Error, message::MessageError};
use thiserror::Error as ThisError;

///
/// WireError
///

#[derive(Debug, ThisError)]
pub enum WireError {
    #[error("invalid base64 at '{path}'")]
    Base64 { path: String },

    #[error(transparent)]
    Message(#[from] MessageError),

    #[error("malformed JSON: {0}")]
    Syntax(String),

    #[error("invalid value at '{path}': expected {expected}, found {found}")]
    Type {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("unknown field '{key}' in '{message}'")]
    UnknownField { message: &'static str, key: String },
}

impl From<WireError> for Error {
    fn from(err: WireError) -> Self {
        Self::decode(err.to_string())
    }
}

const fn json_label(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
