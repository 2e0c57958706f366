//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Assemble page routes, session layer and cross-cutting middleware
//! - Install the finished router as the sub-request pipeline
//! - Bind to a listener and shut down gracefully

use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::http::pages;
use crate::lifecycle::shutdown;
use crate::server::{
    session_middleware, ModalRenderer, PagePipeline, RenderError, SessionStore, TemplateEngine,
};

/// Application state injected into page handlers.
#[derive(Clone)]
pub struct AppState {
    pub renderer: ModalRenderer,
    pub templates: Arc<dyn TemplateEngine>,
}

/// Build the fully layered application router.
///
/// The same router is installed as the renderer's sub-request pipeline, so a
/// background page rendered for a modal goes through every layer an ordinary
/// page does.
#[allow(deprecated)]
pub fn build_app(
    config: &AppConfig,
    templates: Arc<dyn TemplateEngine>,
    pages: Router<AppState>,
) -> Result<Router, RenderError> {
    let pipeline = PagePipeline::new();
    let state = AppState {
        renderer: ModalRenderer::new(templates.clone(), pipeline.clone()),
        templates,
    };
    let sessions = SessionStore::from_config(&config.session);

    let router = pages
        .with_state(state)
        .layer(middleware::from_fn_with_state(sessions, session_middleware))
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

    pipeline.install(router.clone())?;
    Ok(router)
}

/// HTTP server for the modal-aware pages.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a server with the bundled item pages.
    pub fn new(config: AppConfig) -> Result<Self, RenderError> {
        Self::with_pages(config, Arc::new(pages::templates()), pages::routes())
    }

    /// Create a server with caller-supplied pages and templates.
    pub fn with_pages(
        config: AppConfig,
        templates: Arc<dyn TemplateEngine>,
        pages: Router<AppState>,
    ) -> Result<Self, RenderError> {
        let router = build_app(&config, templates, pages)?;
        Ok(Self { router, config })
    }

    /// Clone of the application router, for in-process dispatch.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Serve on `listener` until the shutdown receiver fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown_rx))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
