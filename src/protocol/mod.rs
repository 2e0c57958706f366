//! Wire contract shared by the server renderer and the client controller.
//!
//! # Data Flow
//! ```text
//! Client load()
//!     → marker.rs (append `_modal` to the request URL)
//!     → HTTP request
//! Server renderer
//!     → marker.rs (presence test on the query string)
//!     → signal.rs (ModalSignal → response body or header)
//!     → HTTP response
//! Client load()
//!     → signal.rs (headers + body → ModalSignal)
//!     → DOM / history mutation
//! ```
//!
//! # Design Decisions
//! - One tagged enum for every response outcome, encoded and decoded here
//! - Header names and DOM attribute names live next to each other so both
//!   halves agree on spelling

pub mod dom;
pub mod headers;
pub mod marker;
pub mod signal;

pub use headers::{X_MODAL_CALLBACK, X_MODAL_REDIRECT, X_MODAL_REDIRECT_SELF};
pub use marker::{has_marker, MODAL_MARKER};
pub use signal::ModalSignal;
