//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Renderer, session layer, navigation controller produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (signal counters, sub-request counters, render latency)
//!
//! Consumers:
//!     → stdout (fmt subscriber)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log line via the trace span
//! - Metric updates are fire-and-forget; no recorder installed means no-op

pub mod logging;
pub mod metrics;
