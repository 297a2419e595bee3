//! # Observability Module
//!
//! Observability for the Roster node:
//!
//! - **Structured Logging**: pretty or JSON logs with request IDs and context
//! - **Prometheus Metrics**: HTTP and user-count metrics
//! - **Request Tracing**: Request ID propagation across all operations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use axum::{middleware, Router};
//! use roster_node::observability::{init_logging, request_id_middleware, LogFormat};
//!
//! init_logging("info", LogFormat::Json);
//!
//! let app: Router<()> = Router::new()
//!     .layer(middleware::from_fn(request_id_middleware));
//! ```

mod logging;
mod metrics;
pub mod middleware;

pub use logging::{default_directive, init_logging, LogFormat};
pub use metrics::{normalize_path, ActiveRequest, MetricsState};
pub use middleware::{metrics_middleware, request_id_middleware, RequestId, REQUEST_ID_HEADER};
