mod cbor;

use crate::error::{Error, ErrorClass, ErrorOrigin};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error as ThisError;

/// Default upper bound on one stored document.
pub const MAX_DOCUMENT_BYTES: usize = 4 * 1024 * 1024;

///
/// SerializeError
///

#[derive(Debug, ThisError)]
pub enum SerializeError {
    #[error("serialize error: {0}")]
    Serialize(String),

    #[error("deserialize error: {0}")]
    Deserialize(String),

    #[error("payload of {len} bytes exceeds limit of {max_bytes} bytes")]
    SizeLimitExceeded { len: usize, max_bytes: usize },
}

impl From<SerializeError> for Error {
    fn from(err: SerializeError) -> Self {
        let class = match err {
            SerializeError::Deserialize(_) => ErrorClass::Corruption,
            SerializeError::Serialize(_) | SerializeError::SizeLimitExceeded { .. } => {
                ErrorClass::Internal
            }
        };

        Self::new(class, ErrorOrigin::Serialize, err.to_string())
    }
}

/// Serialize a value to CBOR, refusing output above `max_bytes`.
pub fn serialize_bounded<T>(value: &T, max_bytes: usize) -> Result<Vec<u8>, SerializeError>
where
    T: Serialize,
{
    let bytes = cbor::serialize(value)?;
    if bytes.len() > max_bytes {
        return Err(SerializeError::SizeLimitExceeded {
            len: bytes.len(),
            max_bytes,
        });
    }

    Ok(bytes)
}

/// Serialize a value to CBOR under [`MAX_DOCUMENT_BYTES`].
pub fn serialize<T>(value: &T) -> Result<Vec<u8>, SerializeError>
where
    T: Serialize,
{
    serialize_bounded(value, MAX_DOCUMENT_BYTES)
}

/// Deserialize a value produced by [`serialize`].
pub fn deserialize<T>(bytes: &[u8]) -> Result<T, SerializeError>
where
    T: DeserializeOwned,
{
    cbor::deserialize_bounded(bytes, MAX_DOCUMENT_BYTES)
}

/// Deserialize with an explicit size limit.
pub fn deserialize_bounded<T>(bytes: &[u8], max_bytes: usize) -> Result<T, SerializeError>
where
    T: DeserializeOwned,
{
    cbor::deserialize_bounded(bytes, max_bytes)
}
