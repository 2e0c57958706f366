//! The request pipeline that background sub-requests run through.
//!
//! The router that serves ordinary pages is also the one that renders the
//! background page for a modal-only URL. Handlers need a handle to it before
//! it exists, so the handle is created empty and the finished router is
//! installed once at startup.

use std::sync::{Arc, OnceLock};

use axum::{
    body::Body,
    http::Request,
    response::Response,
    Router,
};
use tower::ServiceExt;

use crate::server::error::RenderError;

#[derive(Clone, Default)]
pub struct PagePipeline {
    router: Arc<OnceLock<Router>>,
}

impl PagePipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the fully layered page router.
    pub fn install(&self, router: Router) -> Result<(), RenderError> {
        self.router
            .set(router)
            .map_err(|_| RenderError::PipelineAlreadyInstalled)
    }

    pub fn is_installed(&self) -> bool {
        self.router.get().is_some()
    }

    /// Run a request through the page router and wait for its response.
    ///
    /// The call is awaited inline by the caller's task; nothing is spawned.
    pub async fn dispatch(&self, request: Request<Body>) -> Result<Response, RenderError> {
        let router = self
            .router
            .get()
            .ok_or(RenderError::PipelineUnavailable)?
            .clone();

        match router.oneshot(request).await {
            Ok(response) => Ok(response),
            Err(never) => match never {},
        }
    }
}

impl std::fmt::Debug for PagePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagePipeline")
            .field("installed", &self.is_installed())
            .finish()
    }
}
