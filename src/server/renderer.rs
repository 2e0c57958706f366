//! Server-side modal rendering.
//!
//! # Responsibilities
//! - Render the modal fragment for a request
//! - Return the fragment alone for marked requests
//! - Compose background page + fragment through a sub-request otherwise
//! - Emit redirect, self-redirect and callback signals
//!
//! # Design Decisions
//! - Every operation takes the [`ModalRequest`] explicitly
//! - Exactly one [`ModalSignal`] (or one sub-request response) per call
//! - The sub-request is awaited in the caller's task and returned verbatim

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    http::{header::LOCATION, HeaderValue, Method, Request, StatusCode, Uri},
    response::Response,
};
use serde_json::Value;

use crate::observability::metrics;
use crate::protocol::ModalSignal;
use crate::server::error::RenderError;
use crate::server::pipeline::PagePipeline;
use crate::server::request::{ModalOverlay, ModalRequest};
use crate::server::template::TemplateEngine;

/// Produces modal responses. Cheap to clone; share it through handler state.
#[derive(Clone)]
pub struct ModalRenderer {
    templates: Arc<dyn TemplateEngine>,
    pipeline: PagePipeline,
}

impl ModalRenderer {
    pub fn new(templates: Arc<dyn TemplateEngine>, pipeline: PagePipeline) -> Self {
        Self { templates, pipeline }
    }

    /// Render `template` as a modal over the page at `background_uri`.
    ///
    /// A marked request gets the fragment. Anything else gets the background
    /// page, rendered by a sub-request that carries the fragment as a
    /// [`ModalOverlay`] extension and shares the caller's session.
    pub async fn render(
        &self,
        request: &ModalRequest,
        background_uri: &str,
        template: &str,
        context: &Value,
    ) -> Result<Response, RenderError> {
        let start = Instant::now();
        let fragment = self.templates.render(template, context)?;

        if request.is_modal() {
            tracing::debug!(
                uri = %request.uri(),
                template = %template,
                "Returning modal fragment"
            );
            let response = self.signal(ModalSignal::Content(fragment))?;
            metrics::record_render(start);
            return Ok(response);
        }

        if request.overlay().is_some() {
            return Err(RenderError::NestedSubRequest {
                background: background_uri.to_string(),
            });
        }

        let uri: Uri = background_uri
            .parse()
            .map_err(|source| RenderError::InvalidBackgroundUri {
                uri: background_uri.to_string(),
                source,
            })?;

        let mut sub_request = Request::new(Body::empty());
        *sub_request.method_mut() = Method::GET;
        *sub_request.uri_mut() = uri;
        sub_request.extensions_mut().insert(ModalOverlay {
            background: background_uri.to_string(),
            content: fragment,
        });
        if let Some(session) = request.session() {
            sub_request.extensions_mut().insert(session.clone());
        }

        tracing::debug!(
            uri = %request.uri(),
            background = %background_uri,
            template = %template,
            "Dispatching background sub-request"
        );
        metrics::record_subrequest();

        let response = self.pipeline.dispatch(sub_request).await?;
        metrics::record_render(start);
        Ok(response)
    }

    /// Leave the modal for `url`.
    ///
    /// Marked requests get a header-only 200 so the client can perform a
    /// full navigation itself; others get a plain 302.
    pub fn redirect(&self, request: &ModalRequest, url: &str) -> Result<Response, RenderError> {
        if request.is_modal() {
            return self.signal(ModalSignal::Redirect(url.to_string()));
        }
        found(url)
    }

    /// Reload the modal from `url`, keeping the background page.
    pub fn redirect_modal(&self, request: &ModalRequest, url: &str) -> Result<Response, RenderError> {
        if request.is_modal() {
            return self.signal(ModalSignal::SelfRedirect(url.to_string()));
        }
        found(url)
    }

    /// Send an opaque payload to client-side code with no content change.
    pub fn callback(&self, payload: &str) -> Result<Response, RenderError> {
        self.signal(ModalSignal::Callback(payload.to_string()))
    }

    fn signal(&self, signal: ModalSignal) -> Result<Response, RenderError> {
        let kind = signal.kind();
        let response = signal.into_response()?;
        metrics::record_signal(kind);
        Ok(response)
    }
}

fn found(url: &str) -> Result<Response, RenderError> {
    let location = HeaderValue::from_str(url)?;
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::FOUND;
    response.headers_mut().insert(LOCATION, location);
    Ok(response)
}

impl std::fmt::Debug for ModalRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModalRenderer")
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}
