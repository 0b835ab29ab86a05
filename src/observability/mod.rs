//! OpenTelemetry-based observability with file-based trace export.
//!
//! Spans recorded through `tracing` are bridged into OpenTelemetry and written
//! as OTLP-JSON lines to `skiphire-otlp.json` in the data directory, so they
//! can be replayed into any OTLP collector later:
//!
//! ```text
//! tracing → tracing-opentelemetry → SDK tracer provider → FileSpanExporter → skiphire-otlp.json
//! ```
//!
//! The file rotates at 10 MB and keeps three numbered backups.
//!
//! # Configuration
//!
//! The filter comes from `RUST_LOG` if set, else `trace_level` in the
//! [`Config`](crate::Config), else `info`.
//!
//! # Modules
//!
//! - `init`: Subscriber setup and the span exporter
//! - `otlp`: OTLP-JSON encoding
//! - `rotating_file`: Size-rotated line sink

mod init;
mod otlp;
mod rotating_file;

pub use init::{create_tracer_provider, init_tracing, shutdown_tracing, TRACE_FILE_NAME};
pub use rotating_file::{RotatingFile, RotationPolicy};
