//! Background worker thread for catalog fetches.
//!
//! Network I/O, backoff sleeps and the fetch cache all live on the worker
//! thread so the session thread never blocks. Results come back as
//! [`WorkerResponse`]s tagged with the request id the session assigned.
//!
//! # Architecture
//!
//! - `messages`: Request/response protocol types with trace context propagation
//! - `handler`: Worker implementation and message processing logic
//! - `runtime`: Thread and channel plumbing

pub mod handler;
pub mod messages;
pub mod runtime;

pub use handler::CatalogWorker;
pub use messages::{TraceContext, WorkerMessage, WorkerResponse};
pub use runtime::WorkerHandle;
