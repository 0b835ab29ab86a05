//! Subscriber setup and the file-backed span exporter.

use super::otlp::OtlpEncoder;
use super::rotating_file::{RotatingFile, RotationPolicy};
use crate::domain::error::Result;
use crate::Config;
use futures_util::future::BoxFuture;
use opentelemetry::trace::{TraceError, TracerProvider as _};
use opentelemetry::KeyValue;
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// File name of the trace log inside the data directory.
pub const TRACE_FILE_NAME: &str = "skiphire-otlp.json";

const SERVICE_NAME: &str = "skiphire";
const DEFAULT_LEVEL: &str = "info";

/// Writes each exported batch as one OTLP-JSON line.
struct FileSpanExporter {
    file: RotatingFile,
    encoder: OtlpEncoder,
    is_shutdown: AtomicBool,
}

impl SpanExporter for FileSpanExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        let result = if self.is_shutdown.load(Ordering::SeqCst) {
            Err(TraceError::from("exporter is shut down"))
        } else {
            let line = self.encoder.encode_batch(&batch).to_string();
            self.file
                .append_line(&line)
                .map_err(|e| TraceError::from(e.to_string()))
        };

        Box::pin(std::future::ready(result))
    }

    fn shutdown(&mut self) {
        self.is_shutdown.store(true, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for FileSpanExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSpanExporter")
            .field("file", &self.file)
            .field("is_shutdown", &self.is_shutdown)
            .finish_non_exhaustive()
    }
}

/// Builds a tracer provider exporting synchronously to `trace_file`.
#[must_use]
pub fn create_tracer_provider(trace_file: PathBuf, policy: RotationPolicy) -> TracerProvider {
    let resource = Resource::new(vec![
        KeyValue::new("service.name", SERVICE_NAME),
        KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
    ]);

    let exporter = FileSpanExporter {
        file: RotatingFile::new(trace_file, policy),
        encoder: OtlpEncoder::new(resource.clone()),
        is_shutdown: AtomicBool::new(false),
    };

    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}

/// Installs the global subscriber, exporting spans under `data_dir`.
///
/// `RUST_LOG` wins over `config.trace_level`, which wins over `info`. Calling
/// this twice leaves the first subscriber in place. Returns the provider so
/// the caller can flush it on exit.
///
/// # Errors
///
/// Returns [`SkipHireError::Io`](crate::domain::SkipHireError::Io) if the
/// data directory cannot be created.
pub fn init_tracing(config: &Config, data_dir: &Path) -> Result<TracerProvider> {
    std::fs::create_dir_all(data_dir)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(config.trace_level.as_deref().unwrap_or(DEFAULT_LEVEL))
    });

    let provider = create_tracer_provider(data_dir.join(TRACE_FILE_NAME), RotationPolicy::default());
    let otel_layer = OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME));

    if tracing_subscriber::registry()
        .with(filter)
        .with(otel_layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("global subscriber already installed");
    }

    Ok(provider)
}

/// Flushes and shuts down `provider`, logging a failure.
///
/// Returns whether the shutdown succeeded.
pub fn shutdown_tracing(provider: &TracerProvider) -> bool {
    match provider.shutdown() {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "failed to shut down tracer provider");
            eprintln!("skiphire: flushing traces: {e}");
            false
        }
    }
}
