//! Response headers carrying out-of-band modal signals.
//!
//! A response carrying one of these headers has an empty body. When more than
//! one is present the client honours them in declaration order below.

use axum::http::HeaderName;

/// Abandon the modal and navigate the whole browser to the header value.
pub const X_MODAL_REDIRECT: HeaderName = HeaderName::from_static("x-modal-redirect");

/// Re-fetch the modal at the header value, keeping the background page.
pub const X_MODAL_REDIRECT_SELF: HeaderName = HeaderName::from_static("x-modal-redirect-self");

/// Opaque client-side payload. Sent with `204 No Content`.
pub const X_MODAL_CALLBACK: HeaderName = HeaderName::from_static("x-modal-callback");

/// Content type used for non-GET modal form bodies.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
