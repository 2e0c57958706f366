//! Modal-over-page navigation library.
//!
//! Server side: route handlers call [`server::ModalRenderer`] to answer a
//! marked request with a fragment or an unmarked one with the full background
//! page. Client side: [`client::NavigationController`] fetches fragments and
//! keeps history consistent.

pub mod client;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod protocol;
pub mod server;

pub use client::NavigationController;
pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use server::ModalRenderer;
