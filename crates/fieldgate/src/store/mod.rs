//! Document store boundary.
//!
//! The service only ever reads and writes whole documents by key. Every
//! call carries a [`Deadline`]; an expired deadline fails the call as a
//! transient timeout.

mod memory;

pub use memory::MemoryStore;

use derive_more::Display;
use fieldgate_core::{
    codec::{DocValue, Document},
    error::{Error, ErrorClass, ErrorOrigin},
    serialize::SerializeError,
    types::ObjectId,
};
use std::time::{Duration, Instant};
use thiserror::Error as ThisError;

/// Reserved document key holding the optimistic-concurrency counter.
pub const VERSION_KEY: &str = "_version";

///
/// StoreError
///

#[derive(Debug, ThisError)]
pub enum StoreError {
    #[error("version conflict on '{key}': expected {expected}, found {found:?}")]
    Conflict {
        key: ObjectId,
        expected: MatchCondition,
        found: Option<i64>,
    },

    #[error("stored document is corrupt: {0}")]
    Corrupt(String),

    #[error("store deadline exceeded")]
    Timeout,

    #[error("document of {len} bytes exceeds limit of {max_bytes} bytes")]
    TooLarge { len: usize, max_bytes: usize },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Conflict { .. } => ErrorClass::Conflict,
            Self::Corrupt(_) => ErrorClass::Corruption,
            Self::Timeout | Self::Unavailable(_) => ErrorClass::Transient,
            Self::TooLarge { .. } => ErrorClass::Internal,
        }
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Self::new(err.class(), ErrorOrigin::Store, err.to_string())
    }
}

impl From<SerializeError> for StoreError {
    fn from(err: SerializeError) -> Self {
        match err {
            SerializeError::SizeLimitExceeded { len, max_bytes } => {
                Self::TooLarge { len, max_bytes }
            }
            other => Self::Corrupt(other.to_string()),
        }
    }
}

///
/// MatchCondition
///
/// Precondition an upsert must satisfy against the currently stored
/// document.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum MatchCondition {
    /// Write unconditionally.
    #[display("any")]
    Any,
    /// Only create; fail if the key already exists.
    #[display("absent")]
    Absent,
    /// Only replace a document whose `_version` equals the given value.
    #[display("version {_0}")]
    Version(i64),
}

impl MatchCondition {
    /// Whether a document currently at `found` satisfies the condition.
    /// `None` means no document; a document without a counter is at 0.
    #[must_use]
    pub const fn accepts(self, found: Option<i64>) -> bool {
        match (self, found) {
            (Self::Any, _) | (Self::Absent, None) => true,
            (Self::Version(expected), Some(actual)) => expected == actual,
            (Self::Absent, Some(_)) | (Self::Version(_), None) => false,
        }
    }
}

///
/// UpsertResult
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct UpsertResult {
    pub created_new_key: bool,
}

///
/// Deadline
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Deadline {
    // None when the timeout does not fit in an Instant
    at: Option<Instant>,
}

impl Deadline {
    #[must_use]
    pub fn after(timeout: Duration) -> Self {
        Self {
            at: Instant::now().checked_add(timeout),
        }
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.at.is_some_and(|at| Instant::now() >= at)
    }

    /// Fail with [`StoreError::Timeout`] once the deadline has passed.
    pub fn check(&self) -> Result<(), StoreError> {
        if self.is_expired() {
            Err(StoreError::Timeout)
        } else {
            Ok(())
        }
    }
}

///
/// DocumentStore
///

pub trait DocumentStore: Send + Sync {
    fn fetch_by_key(
        &self,
        key: &ObjectId,
        deadline: Deadline,
    ) -> Result<Option<Document>, StoreError>;

    fn upsert_by_key(
        &self,
        key: &ObjectId,
        doc: Document,
        condition: MatchCondition,
        deadline: Deadline,
    ) -> Result<UpsertResult, StoreError>;
}

/// Version counter of a stored document.
#[must_use]
pub fn document_version(doc: &Document) -> i64 {
    doc.get(VERSION_KEY).and_then(DocValue::as_int).unwrap_or(0)
}
