//! Message capability: descriptor-driven field access.
//!
//! Redactors and the codec never inspect concrete types; they walk the
//! descriptor and read/write fields by position through [`Message`].

mod dynamic;


pub use dynamic::DynamicMessage;

use crate::{
    error::{Error, ErrorClass, ErrorOrigin},
    model::message::MessageDescriptor,
    value::Value,
};
use thiserror::Error as ThisError;

///
/// MessageError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum MessageError {
    #[error("message type mismatch: expected '{expected}', found '{found}'")]
    DescriptorMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("field index {index} out of range for '{message}'")]
    IndexOutOfRange { message: &'static str, index: usize },

    #[error("type mismatch on '{message}.{field}': expected {expected}, found {found}")]
    TypeMismatch {
        message: &'static str,
        field: &'static str,
        expected: String,
        found: &'static str,
    },

    #[error("field '{field}' not found in '{message}'")]
    UnknownField { message: &'static str, field: String },
}

impl From<MessageError> for Error {
    fn from(err: MessageError) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Service, err.to_string())
    }
}

///
/// Message
///
/// Capability exposed by every message-shaped type: its descriptor plus
/// positional get/set. Positions index `descriptor().fields`.
///

pub trait Message {
    fn descriptor(&self) -> &'static MessageDescriptor;

    /// Current value at `index`, `None` when out of range.
    fn get_field(&self, index: usize) -> Option<Value>;

    /// Replace the value at `index`; the value must conform to the field kind.
    fn set_field(&mut self, index: usize, value: Value) -> Result<(), MessageError>;

    /// Reset the field at `index` to its zero value.
    fn clear_field(&mut self, index: usize) -> Result<(), MessageError> {
        let descriptor = self.descriptor();
        let field = descriptor
            .field(index)
            .ok_or(MessageError::IndexOutOfRange {
                message: descriptor.name,
                index,
            })?;

        self.set_field(index, Value::zero(&field.kind))
    }

    /// Copy into the generic representation.
    fn to_dynamic(&self) -> DynamicMessage {
        let descriptor = self.descriptor();
        let mut out = DynamicMessage::new(descriptor);

        for index in 0..descriptor.len() {
            if let Some(value) = self.get_field(index) {
                out.put(index, value);
            }
        }

        out
    }
}

/// Check `value` against the field at `index` of `descriptor`.
pub(crate) fn check_field(
    descriptor: &'static MessageDescriptor,
    index: usize,
    value: &Value,
) -> Result<(), MessageError> {
    let field = descriptor
        .field(index)
        .ok_or(MessageError::IndexOutOfRange {
            message: descriptor.name,
            index,
        })?;

    if value.conforms_to(&field.kind) {
        Ok(())
    } else {
        Err(MessageError::TypeMismatch {
            message: descriptor.name,
            field: field.name,
            expected: field.kind.to_string(),
            found: value.label(),
        })
    }
}
