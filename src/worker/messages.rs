//! Worker thread message types for cross-thread communication.
//!
//! This module defines the request and response protocol between the session
//! thread and the background catalog worker. Every request carries the id the
//! session assigned to it; responses echo that id so the session can discard
//! results for fetches it has since superseded. Requests also carry a
//! [`TraceContext`] so worker spans join the trace that asked for them.

use crate::domain::{FetchError, LocationKey, Skip};

/// Distributed tracing context for cross-thread span propagation.
///
/// Captures the current trace and span IDs from OpenTelemetry to maintain
/// trace continuity when passing messages to the worker thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Parent span ID for linking spans across threads.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Creates a trace context from the current tracing span.
    ///
    /// Returns `None` if the current span context is invalid, which is the
    /// case whenever no OpenTelemetry layer is installed.
    #[must_use]
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let span = tracing::Span::current();

        let otel_context = span.context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if span_context.is_valid() {
            let trace_id = format!("{:032x}", span_context.trace_id());
            let parent_span_id = format!("{:016x}", span_context.span_id());

            tracing::trace!(
                trace_id = %trace_id,
                parent_span_id = %parent_span_id,
                "capturing trace context"
            );

            Some(Self {
                trace_id,
                parent_span_id,
            })
        } else {
            None
        }
    }
}

/// Generates `WorkerMessage` constructors that attach the current trace context.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message with current trace context")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    fetch_catalog(FetchCatalog { request_id: u64, key: LocationKey, force: bool }),
}

/// Messages sent from the session thread to the worker thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerMessage {
    /// Fetch the catalog for a location.
    FetchCatalog {
        /// Session-assigned id, echoed in the response.
        request_id: u64,

        key: LocationKey,

        /// Bypass a fresh cache entry (manual retry).
        force: bool,

        /// Trace context for linking spans across threads.
        trace_context: Option<TraceContext>,
    },
}

impl WorkerMessage {
    /// The trace context carried by any variant.
    #[must_use]
    pub const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::FetchCatalog { trace_context, .. } => trace_context.as_ref(),
        }
    }
}

/// Responses sent from the worker thread back to the session thread.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerResponse {
    /// The catalog for `key` is available.
    CatalogLoaded {
        request_id: u64,
        key: LocationKey,
        skips: Vec<Skip>,
        /// Served from a fresh cache entry without a network call.
        from_cache: bool,
    },

    /// Fetching the catalog for `key` failed after retries.
    CatalogFailed {
        request_id: u64,
        key: LocationKey,
        error: FetchError,
    },
}

impl WorkerResponse {
    #[must_use]
    pub const fn request_id(&self) -> u64 {
        match self {
            Self::CatalogLoaded { request_id, .. } | Self::CatalogFailed { request_id, .. } => *request_id,
        }
    }

    #[must_use]
    pub const fn key(&self) -> &LocationKey {
        match self {
            Self::CatalogLoaded { key, .. } | Self::CatalogFailed { key, .. } => key,
        }
    }
}
