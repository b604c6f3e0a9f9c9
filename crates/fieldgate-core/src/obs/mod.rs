//! Observability boundary.
//!
//! Tracing is optional and injected by the caller. With no sink installed
//! nothing is built or emitted.

mod sink;

pub use sink::{TraceEvent, TraceSink, emit};
