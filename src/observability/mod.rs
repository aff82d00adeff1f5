//! OpenTelemetry tracing exported to a local OTLP JSON file.
//!
//! ```text
//! tracing macros → tracing-opentelemetry → SDK tracer provider → FileSpanExporter → docseek-otlp.json
//! ```
//!
//! The filter level comes from the `trace_level` plugin option (default
//! `info`). The trace file lives in the plugin data directory and rotates at
//! 10 MB, keeping three backups.
//!
//! - `init`: subscriber setup
//! - `tracer`: tracer provider and the file span exporter
//! - `span_formatter`: OTLP JSON encoding of span batches
//! - `file_writer`: size-rotated line writer
//! - `context`: trace ids propagated through outbound search requests

mod context;
mod file_writer;
mod init;
mod span_formatter;
mod tracer;

pub use context::TraceContext;
pub use init::init_tracing;
