use crate::store::{
    Deadline, DocumentStore, MatchCondition, StoreError, UpsertResult, document_version,
};
use fieldgate_core::{
    codec::Document,
    serialize::{MAX_DOCUMENT_BYTES, deserialize_bounded, serialize_bounded},
    types::ObjectId,
};
use std::{
    collections::BTreeMap,
    sync::{Mutex, PoisonError},
};

///
/// MemoryStore
///
/// Process-local store keeping each document as CBOR bytes.
/// The version check and the write happen under one lock.
///

pub struct MemoryStore {
    docs: Mutex<BTreeMap<ObjectId, Vec<u8>>>,
    max_document_bytes: usize,
}

impl MemoryStore {
    #[must_use]
    pub const fn new() -> Self {
        Self::with_max_document_bytes(MAX_DOCUMENT_BYTES)
    }

    #[must_use]
    pub const fn with_max_document_bytes(max_document_bytes: usize) -> Self {
        Self {
            docs: Mutex::new(BTreeMap::new()),
            max_document_bytes,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<ObjectId, Vec<u8>>> {
        self.docs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Document, StoreError> {
        deserialize_bounded(bytes, self.max_document_bytes).map_err(StoreError::from)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for MemoryStore {
    fn fetch_by_key(
        &self,
        key: &ObjectId,
        deadline: Deadline,
    ) -> Result<Option<Document>, StoreError> {
        deadline.check()?;

        let docs = self.lock();
        deadline.check()?;

        docs.get(key).map(|bytes| self.decode(bytes)).transpose()
    }

    fn upsert_by_key(
        &self,
        key: &ObjectId,
        doc: Document,
        condition: MatchCondition,
        deadline: Deadline,
    ) -> Result<UpsertResult, StoreError> {
        deadline.check()?;
        let bytes = serialize_bounded(&doc, self.max_document_bytes)?;

        let mut docs = self.lock();
        deadline.check()?;

        let found = docs
            .get(key)
            .map(|existing| self.decode(existing).map(|d| document_version(&d)))
            .transpose()?;

        if !condition.accepts(found) {
            return Err(StoreError::Conflict {
                key: *key,
                expected: condition,
                found,
            });
        }

        deadline.check()?;
        docs.insert(*key, bytes);

        Ok(UpsertResult {
            created_new_key: found.is_none(),
        })
    }
}

///
/// TESTS
///
