//! Request handlers.
//!
//! Within one request the order is fixed: write redaction, persistence,
//! read redaction. Unauthorized fields are dropped, never rejected; drops
//! surface only as trace events.

mod collection;


pub use collection::Collection;

use crate::{
    config::ServiceConfig,
    store::{Deadline, DocumentStore, MatchCondition, VERSION_KEY, document_version},
    wire::{decode_message, to_json_string},
};
use fieldgate_core::{
    codec::{CodecError, DocValue, Document, decode, encode},
    error::{Error, ErrorOrigin},
    message::{DynamicMessage, Message},
    obs::{self, TraceEvent, TraceSink},
    policy::{CallerContext, FieldMask, RedactionReport, merge_into, redact_for_read_with_report},
    types::ObjectId,
};

///
/// Service
///
/// Fetch and upsert handlers for one collection over a document store.
///

pub struct Service<S> {
    store: S,
    collection: Collection,
    config: ServiceConfig,
    trace: Option<&'static dyn TraceSink>,
}

impl<S: DocumentStore> Service<S> {
    #[must_use]
    pub const fn new(store: S, collection: Collection, config: ServiceConfig) -> Self {
        Self {
            store,
            collection,
            config,
            trace: None,
        }
    }

    /// Install a trace sink receiving every event of every request.
    #[must_use]
    pub fn with_trace(mut self, sink: &'static dyn TraceSink) -> Self {
        self.trace = Some(sink);
        self
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub const fn collection(&self) -> &Collection {
        &self.collection
    }

    #[must_use]
    pub const fn config(&self) -> &ServiceConfig {
        &self.config
    }

    ///
    /// handle_fetch
    ///
    /// Load the entity stored under `id` and clear every field `caller`
    /// may not read.
    ///
    pub fn handle_fetch(&self, id: &str, caller: &CallerContext) -> Result<DynamicMessage, Error> {
        self.traced(|| {
            let key = parse_key(id)?;
            let doc = self
                .fetch_document(&key)?
                .ok_or_else(|| Error::not_found(key))?;

            let mut entity = self.decode_stored(&doc)?;
            self.redact(&mut entity, caller)?;

            Ok(entity)
        })
    }

    ///
    /// handle_upsert
    ///
    /// Merge the masked, writable fields of `request` over the stored
    /// entity (or a zero entity when there is none) and persist the result.
    /// Without `id` a fresh key is generated. The stored entity comes back
    /// read-redacted for `caller`.
    ///
    pub fn handle_upsert(
        &self,
        id: Option<&str>,
        request: &dyn Message,
        mask: &FieldMask,
        caller: &CallerContext,
    ) -> Result<DynamicMessage, Error> {
        self.traced(|| {
            let key = match id {
                Some(id) => parse_key(id)?,
                None => ObjectId::generate()
                    .map_err(|e| Error::internal(ErrorOrigin::Service, e.to_string()))?,
            };

            let (baseline, version) = match self.fetch_document(&key)? {
                Some(doc) => (self.decode_stored(&doc)?, Some(document_version(&doc))),
                None => (DynamicMessage::new(self.collection.entity), None),
            };

            let entity = self.write_redact(request, mask, caller, baseline)?;
            let mut entity = self.persist(&key, entity, version)?;
            self.redact(&mut entity, caller)?;

            Ok(entity)
        })
    }

    /// JSON form of [`Self::handle_fetch`].
    pub fn fetch_json(&self, id: &str, caller: &CallerContext) -> Result<String, Error> {
        self.handle_fetch(id, caller).map(|entity| to_json_string(&entity))
    }

    /// JSON form of [`Self::handle_upsert`]; the mask is read from the
    /// envelope's mask carrier field.
    pub fn upsert_json(
        &self,
        id: Option<&str>,
        body: &str,
        caller: &CallerContext,
    ) -> Result<String, Error> {
        let request = self.traced(|| Ok(decode_message(body, self.collection.request)?))?;
        let mask = FieldMask::find_in(&request).unwrap_or_default();

        self.handle_upsert(id, &request, &mask, caller)
            .map(|entity| to_json_string(&entity))
    }

    // merge the request envelope over the baseline and unwrap the entity
    fn write_redact(
        &self,
        request: &dyn Message,
        mask: &FieldMask,
        caller: &CallerContext,
        baseline: DynamicMessage,
    ) -> Result<DynamicMessage, Error> {
        let name = self.collection.name;
        self.emit(
            mask.unresolved(request.descriptor())
                .into_iter()
                .map(|path| TraceEvent::MaskPathIgnored {
                    collection: name,
                    path: path.to_string(),
                }),
        );

        let mut envelope = self.collection.wrap(baseline)?;
        let mut report = RedactionReport::new();
        merge_into(request, mask, caller, &mut envelope, &mut report)?;
        self.emit(TraceEvent::dropped(name, &report));

        Ok(self.collection.unwrap_entity(envelope))
    }

    // write under the next version; a concurrent writer surfaces as a conflict
    fn persist(
        &self,
        key: &ObjectId,
        mut entity: DynamicMessage,
        version: Option<i64>,
    ) -> Result<DynamicMessage, Error> {
        self.collection.set_id(&mut entity, key.to_string())?;

        let next = version.map_or(1, |v| v.saturating_add(1));
        let condition = version.map_or(MatchCondition::Absent, MatchCondition::Version);

        let mut doc = encode(&entity)?;
        doc.insert(VERSION_KEY, DocValue::Int64(next));

        // never retried: the version check makes a blind replay unsafe
        let result = self.store.upsert_by_key(key, doc, condition, self.deadline())?;

        self.emit([TraceEvent::Upsert {
            collection: self.collection.name,
            created: result.created_new_key,
            version: next,
        }]);

        Ok(entity)
    }

    fn fetch_document(&self, key: &ObjectId) -> Result<Option<Document>, Error> {
        let attempts = self.config.fetch_attempts();
        let mut attempt = 1;

        loop {
            match self.store.fetch_by_key(key, self.deadline()) {
                Ok(doc) => {
                    self.emit([TraceEvent::Fetch {
                        collection: self.collection.name,
                        found: doc.is_some(),
                        attempts: attempt,
                    }]);

                    return Ok(doc);
                }
                Err(err) => {
                    let err = Error::from(err);
                    if !err.is_transient() || attempt >= attempts {
                        return Err(err);
                    }

                    self.emit([TraceEvent::Retry {
                        collection: self.collection.name,
                        attempt,
                        class: err.class,
                    }]);
                    attempt += 1;
                }
            }
        }
    }

    // a bad identifier at rest is corruption, not a caller error
    fn decode_stored(&self, doc: &Document) -> Result<DynamicMessage, Error> {
        decode(doc, self.collection.entity).map_err(|err: CodecError| {
            if err.is_format() {
                Error::corruption(ErrorOrigin::Codec, err.to_string())
            } else {
                err.into()
            }
        })
    }

    fn redact(&self, entity: &mut DynamicMessage, caller: &CallerContext) -> Result<(), Error> {
        let mut report = RedactionReport::new();
        redact_for_read_with_report(entity, caller, &mut report)?;
        self.emit(TraceEvent::redacted(self.collection.name, &report));

        Ok(())
    }

    fn deadline(&self) -> Deadline {
        Deadline::after(self.config.store_timeout())
    }

    fn traced<T>(&self, f: impl FnOnce() -> Result<T, Error>) -> Result<T, Error> {
        let result = f();
        if let Err(err) = &result {
            self.emit([TraceEvent::error(self.collection.name, err)]);
        }

        result
    }

    fn emit<I>(&self, events: I)
    where
        I: IntoIterator<Item = TraceEvent>,
    {
        obs::emit(self.trace, events);
    }
}

fn parse_key(id: &str) -> Result<ObjectId, Error> {
    id.parse::<ObjectId>()
        .map_err(|e| Error::format(ErrorOrigin::Service, e.to_string()))
}
