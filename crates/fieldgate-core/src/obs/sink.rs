use crate::{
    error::{Error, ErrorClass, ErrorOrigin},
    policy::{RedactionReason, RedactionReport},
};

///
/// TraceSink
///

pub trait TraceSink: Send + Sync {
    fn on_event(&self, event: &TraceEvent);
}

///
/// TraceEvent
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TraceEvent {
    /// A requested write was dropped by the write-path redactor.
    FieldDropped {
        collection: &'static str,
        path: String,
        reason: RedactionReason,
    },
    /// A stored value was cleared by the read-path redactor.
    FieldRedacted {
        collection: &'static str,
        path: String,
        reason: RedactionReason,
    },
    /// A mask path that names no field of the request type.
    MaskPathIgnored {
        collection: &'static str,
        path: String,
    },
    Fetch {
        collection: &'static str,
        found: bool,
        attempts: u32,
    },
    Upsert {
        collection: &'static str,
        created: bool,
        version: i64,
    },
    Retry {
        collection: &'static str,
        attempt: u32,
        class: ErrorClass,
    },
    Error {
        collection: &'static str,
        class: ErrorClass,
        origin: ErrorOrigin,
    },
}

impl TraceEvent {
    /// One `FieldDropped` event per report entry.
    pub fn dropped<'a>(
        collection: &'static str,
        report: &'a RedactionReport,
    ) -> impl Iterator<Item = Self> + 'a {
        report.entries().iter().map(move |r| Self::FieldDropped {
            collection,
            path: r.path.clone(),
            reason: r.reason,
        })
    }

    /// One `FieldRedacted` event per report entry.
    pub fn redacted<'a>(
        collection: &'static str,
        report: &'a RedactionReport,
    ) -> impl Iterator<Item = Self> + 'a {
        report.entries().iter().map(move |r| Self::FieldRedacted {
            collection,
            path: r.path.clone(),
            reason: r.reason,
        })
    }

    #[must_use]
    pub const fn error(collection: &'static str, err: &Error) -> Self {
        Self::Error {
            collection,
            class: err.class,
            origin: err.origin,
        }
    }
}

/// Deliver `events` to `sink` when one is installed.
pub fn emit<I>(sink: Option<&'static dyn TraceSink>, events: I)
where
    I: IntoIterator<Item = TraceEvent>,
{
    if let Some(sink) = sink {
        for event in events {
            sink.on_event(&event);
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ADMIN, RecordingSink};

    #[test]
    fn report_entries_become_events() {
        let mut report = RedactionReport::new();
        report.record("secret".to_string(), RedactionReason::MissingRole(ADMIN));
        report.record("id".to_string(), RedactionReason::Readonly);

        let events: Vec<_> = TraceEvent::dropped("people", &report).collect();

        assert_eq!(events.len(), 2);
        assert_eq!(
            events[1],
            TraceEvent::FieldDropped {
                collection: "people",
                path: "id".to_string(),
                reason: RedactionReason::Readonly,
            }
        );
    }

    #[test]
    fn emit_without_sink_is_a_no_op() {
        static SINK: RecordingSink = RecordingSink::new();
        let event = TraceEvent::Fetch {
            collection: "people",
            found: false,
            attempts: 1,
        };

        emit(None, [event.clone()]);
        emit(Some(&SINK), [event.clone()]);

        assert_eq!(SINK.take(), vec![event]);
    }
}
