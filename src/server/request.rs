//! Explicit per-request context for the renderer.
//!
//! Handlers receive a [`ModalRequest`] as an extractor and pass it into every
//! renderer call, so there is no ambient "current request" to be missing.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, Uri},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::protocol::{dom, marker};
use crate::server::session::Session;

/// Metadata attached to a background sub-request.
///
/// The background page reads it to render the modal fragment on top of
/// itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalOverlay {
    /// URI of the background page being rendered.
    pub background: String,
    /// Rendered modal fragment.
    pub content: String,
}

impl ModalOverlay {
    /// Template context form: `{ "background": ..., "content": ... }`.
    pub fn to_context(&self) -> Value {
        json!({ "background": self.background, "content": self.content })
    }

    /// Root element markup hosting the fragment, ready for the client.
    pub fn root_element(&self) -> String {
        dom::modal_root(Some(&self.background), &self.content)
    }
}

/// Root element markup for a page that may or may not carry an overlay.
pub fn modal_root_for(overlay: Option<&ModalOverlay>) -> String {
    match overlay {
        Some(overlay) => overlay.root_element(),
        None => dom::modal_root(None, ""),
    }
}

/// The request facts the renderer branches on.
#[derive(Debug, Clone)]
pub struct ModalRequest {
    uri: Uri,
    marked: bool,
    session: Option<Session>,
    overlay: Option<ModalOverlay>,
}

impl ModalRequest {
    pub fn from_parts(parts: &Parts) -> Self {
        Self {
            marked: marker::has_marker(parts.uri.query()),
            uri: parts.uri.clone(),
            session: parts.extensions.get::<Session>().cloned(),
            overlay: parts.extensions.get::<ModalOverlay>().cloned(),
        }
    }

    /// True if the client asked for the fragment only.
    pub fn is_modal(&self) -> bool {
        self.marked
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Present when this request is a background sub-request.
    pub fn overlay(&self) -> Option<&ModalOverlay> {
        self.overlay.as_ref()
    }
}

impl<S> FromRequestParts<S> for ModalRequest
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts))
    }
}
