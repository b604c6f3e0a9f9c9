//! Document codec.
//!
//! Translates between messages and the store's native document form,
//! applying per-field storage keys and identifier coercion. Both directions
//! are single-pass recursive transforms over the descriptor.

mod decode;
mod document;
mod encode;
mod error;


pub use decode::decode;
pub use document::{DocValue, Document};
pub use encode::encode;
pub use error::CodecError;
