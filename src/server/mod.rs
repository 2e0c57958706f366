//! Server-side modal rendering subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → session.rs (attach Session unless already attached)
//!     → handler extracts ModalRequest (request.rs)
//!     → renderer.rs
//!         marker present → template.rs → ModalSignal::Content
//!         marker absent  → template.rs → sub-request with ModalOverlay
//!                          → pipeline.rs (same page router, inline)
//!                          → background page renders overlay on itself
//!     → response
//! ```
//!
//! # Design Decisions
//! - Stateless per request; continuity lives in the client and the marker
//! - Request context is an explicit argument, never ambient
//! - Sub-requests share the caller's session by reference

pub mod error;
pub mod pipeline;
pub mod renderer;
pub mod request;
pub mod session;
pub mod template;

pub use error::RenderError;
pub use pipeline::PagePipeline;
pub use renderer::ModalRenderer;
pub use request::{modal_root_for, ModalOverlay, ModalRequest};
pub use session::{session_middleware, Session, SessionStore};
pub use template::{TemplateEngine, TemplateError, TemplateRegistry};
