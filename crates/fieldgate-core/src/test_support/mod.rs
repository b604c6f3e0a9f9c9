//! Shared fixtures for the crate's own tests and for downstream crates
//! that enable the `test-support` feature.

pub mod credentials;
pub mod fixtures;

use crate::{
    obs::{TraceEvent, TraceSink},
    policy::CallerContext,
};
use std::sync::{Mutex, PoisonError};

pub const ADMIN: &str = "ADMIN";
pub const USER: &str = "USER";
pub const BILLING: &str = "BILLING";

/// Caller holding exactly `roles`.
#[must_use]
pub fn caller(roles: &[&str]) -> CallerContext {
    roles.iter().copied().collect()
}

///
/// RecordingSink
///
/// Trace sink buffering every event for later assertions.
/// Intended to live in a `static` so it can be installed as `&'static`.
///

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<TraceEvent>>,
}

impl RecordingSink {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    /// Drain and return buffered events.
    pub fn take(&self) -> Vec<TraceEvent> {
        let mut events = self.events.lock().unwrap_or_else(PoisonError::into_inner);

        std::mem::take(&mut *events)
    }
}

impl TraceSink for RecordingSink {
    fn on_event(&self, event: &TraceEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
