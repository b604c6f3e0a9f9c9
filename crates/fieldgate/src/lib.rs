//! ## Crate layout
//! - `core`: descriptors, messages, redaction and the document codec.
//! - `config`: service configuration.
//! - `store`: document store boundary and an in-memory implementation.
//! - `wire`: JSON encoding of messages and errors.
//! - `service`: fetch and upsert handlers tying the pieces together.

pub use fieldgate_core as core;

pub mod config;
pub mod service;
pub mod store;
pub mod wire;

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use fieldgate_core::error::{Error, ErrorClass, ErrorOrigin};

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        config::ServiceConfig,
        core::prelude::*,
        service::{Collection, Service},
        store::{DocumentStore, MatchCondition, MemoryStore},
    };
}
