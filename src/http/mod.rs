//! HTTP application subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware layers, graceful shutdown)
//!     → session layer → page handlers (pages.rs)
//!     → server::ModalRenderer (fragment, sub-request or signal)
//!     → response
//! ```

pub mod pages;
pub mod server;

pub use server::{build_app, AppState, HttpServer};
