//! Logging infrastructure: structured progress tracing.
//!
//! Provides [`JsonlProgressLogger`], a JSONL file writer that implements
//! the [`ProgressSink`](autologic_application::ProgressSink) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlProgressLogger;
