pub(crate) mod generator;

use derive_more::{Deref, Display};
use serde::{Deserialize, Serialize, Serializer, de::Deserializer};
use serde_bytes::{ByteBuf, Bytes};
use std::str::FromStr;
use thiserror::Error as ThisError;
use ulid::Ulid as WrappedUlid;

///
/// ObjectIdError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum ObjectIdError {
    #[error("invalid object id string: '{0}'")]
    InvalidString(String),

    #[error("invalid object id length: {len} bytes")]
    InvalidSize { len: usize },

    #[error("monotonic error - overflow")]
    GeneratorOverflow,
}

///
/// ObjectId
///
/// Store-native document identifier: a 128-bit ULID.
/// Text form is the 26-character Crockford base32 string, stored form is
/// the raw 16 bytes.
///

#[derive(Clone, Copy, Debug, Deref, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct ObjectId(WrappedUlid);

impl ObjectId {
    pub const STORED_SIZE: usize = 16;

    #[must_use]
    pub const fn nil() -> Self {
        Self(WrappedUlid::nil())
    }

    #[must_use]
    pub const fn from_parts(timestamp_ms: u64, random: u128) -> Self {
        Self(WrappedUlid::from_parts(timestamp_ms, random))
    }

    /// generate
    /// Next id from the process-wide monotonic generator.
    pub fn generate() -> Result<Self, ObjectIdError> {
        generator::generate()
    }

    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(WrappedUlid::from_bytes(bytes))
    }

    pub fn try_from_bytes(bytes: &[u8]) -> Result<Self, ObjectIdError> {
        if bytes.len() != Self::STORED_SIZE {
            return Err(ObjectIdError::InvalidSize { len: bytes.len() });
        }

        let mut array = [0u8; 16];
        array.copy_from_slice(bytes);

        Ok(Self::from_bytes(array))
    }

    #[must_use]
    pub const fn from_u128(n: u128) -> Self {
        Self(WrappedUlid::from_bytes(n.to_be_bytes()))
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0 == WrappedUlid::nil()
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::nil()
    }
}

impl From<WrappedUlid> for ObjectId {
    fn from(ulid: WrappedUlid) -> Self {
        Self(ulid)
    }
}

impl FromStr for ObjectId {
    type Err = ObjectIdError;

    fn from_str(encoded: &str) -> Result<Self, Self::Err> {
        WrappedUlid::from_string(encoded)
            .map(Self)
            .map_err(|_| ObjectIdError::InvalidString(encoded.to_string()))
    }
}

impl TryFrom<&[u8]> for ObjectId {
    type Error = ObjectIdError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::try_from_bytes(bytes)
    }
}

// Stored form is the raw 16 bytes, not the text form.
impl Serialize for ObjectId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Bytes::new(&self.0.to_bytes()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bytes = ByteBuf::deserialize(deserializer)?;

        Self::try_from_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}

///
/// TESTS
///
