//! Core engine for fieldgate: schema descriptors, the message capability,
//! field-level read/write redaction and the document codec.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod codec;
pub mod error;
pub mod message;
pub mod model;
pub mod obs;
pub mod policy;
pub mod serialize;
pub mod types;
pub mod value;
pub mod visitor;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

///
/// Prelude
///
/// Domain vocabulary only. Errors, codecs and serializers stay in their
/// modules.
///

pub mod prelude {
    pub use crate::{
        message::{DynamicMessage, Message},
        model::{
            field::{Coercion, FieldDescriptor, FieldKind, ScalarType, StorageOptions},
            message::{FIELD_MASK, MessageDescriptor},
        },
        policy::{CallerContext, FieldMask},
        types::ObjectId,
        value::Value,
    };
}
