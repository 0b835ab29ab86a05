//! Worker implementation for catalog fetches.
//!
//! The worker owns the [`CatalogClient`] (and with it the fetch cache), so
//! cache state lives on exactly one thread. Each message is handled inside a
//! span linked to the span that posted it.

use crate::catalog::CatalogClient;
use crate::worker::{WorkerMessage, WorkerResponse};

/// Worker-side state for handling catalog requests.
#[derive(Debug)]
pub struct CatalogWorker {
    client: CatalogClient,
}

impl CatalogWorker {
    #[must_use]
    pub const fn new(client: CatalogClient) -> Self {
        Self { client }
    }

    /// Fetches the catalog and converts the outcome into a response.
    fn handle_fetch_catalog(&mut self, request_id: u64, key: crate::domain::LocationKey, force: bool) -> WorkerResponse {
        match self.client.fetch(&key, force) {
            Ok(outcome) => {
                tracing::debug!(
                    request_id = request_id,
                    skip_count = outcome.skips.len(),
                    from_cache = outcome.from_cache,
                    "catalog fetch successful"
                );
                WorkerResponse::CatalogLoaded {
                    request_id,
                    key,
                    skips: outcome.skips,
                    from_cache: outcome.from_cache,
                }
            }
            Err(error) => {
                tracing::debug!(request_id = request_id, error = %error, kind = ?error.kind, "catalog fetch failed");
                WorkerResponse::CatalogFailed {
                    request_id,
                    key,
                    error,
                }
            }
        }
    }

    /// Attaches the parent trace context from a message to the current thread.
    ///
    /// Returns a context guard that must be held for the duration of the
    /// operation.
    fn attach_parent_trace_context(message: &WorkerMessage) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

        let trace_context = message.trace_context()?;

        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let span_context = SpanContext::new(
            trace_id,
            span_id,
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );

        let otel_context = opentelemetry::Context::current().with_remote_span_context(span_context);

        Some(otel_context.attach())
    }

    /// Processes a worker message and returns the response to post back.
    pub fn handle_message(&mut self, message: WorkerMessage) -> WorkerResponse {
        let _context_guard = Self::attach_parent_trace_context(&message);

        let span = tracing::debug_span!("worker_handle_message", message_type = ?message);
        let _guard = span.entered();

        match message {
            WorkerMessage::FetchCatalog {
                request_id,
                key,
                force,
                ..
            } => self.handle_fetch_catalog(request_id, key, force),
        }
    }
}
