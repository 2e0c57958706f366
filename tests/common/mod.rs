//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::COOKIE, Request},
    response::{Html, Response},
    routing::{get as get_route, post},
    Extension, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tower::ServiceExt;

use modal_overlay::config::AppConfig;
use modal_overlay::http::{AppState, HttpServer};
use modal_overlay::lifecycle::Shutdown;
use modal_overlay::server::{modal_root_for, ModalRequest, RenderError, TemplateRegistry};

/// Counts how often the background page handler runs.
#[derive(Clone, Default)]
pub struct BackgroundHits(Arc<AtomicUsize>);

impl BackgroundHits {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

pub fn scenario_templates() -> TemplateRegistry {
    TemplateRegistry::new()
        .with_template("home", "<main>home of {{ user }}</main>{{ modal_root|raw }}")
        .with_template("item_list_modal", "<div>{{ count }}</div>")
}

/// Routes with one of each renderer outcome.
///
/// - `GET /`: background page, shows the session user and the modal root
/// - `GET /items`: modal over `/`, stores `user` in the session first
/// - `GET /go-away`: redirect to `/login`
/// - `GET /reload`: self-redirect to `/items`
/// - `POST /done`: callback `done`
/// - `GET /loop`: modal whose background is itself
pub fn scenario_routes(hits: BackgroundHits) -> Router<AppState> {
    Router::new()
        .route("/", get_route(home))
        .route("/items", get_route(items))
        .route("/go-away", get_route(go_away))
        .route("/reload", get_route(reload))
        .route("/done", post(done))
        .route("/loop", get_route(looping))
        .layer(Extension(hits))
}

async fn home(
    State(state): State<AppState>,
    Extension(hits): Extension<BackgroundHits>,
    request: ModalRequest,
) -> Result<Html<String>, RenderError> {
    hits.0.fetch_add(1, Ordering::SeqCst);
    let user = request
        .session()
        .and_then(|s| s.get("user"))
        .and_then(|v| v.as_str().map(str::to_owned))
        .unwrap_or_else(|| "nobody".to_string());
    let context = json!({ "user": user, "modal_root": modal_root_for(request.overlay()) });
    Ok(Html(state.templates.render("home", &context)?))
}

async fn items(
    State(state): State<AppState>,
    request: ModalRequest,
) -> Result<Response, RenderError> {
    if let Some(session) = request.session() {
        session.insert("user", json!("ada"));
    }
    state
        .renderer
        .render(&request, "/", "item_list_modal", &json!({ "count": 3 }))
        .await
}

async fn go_away(State(state): State<AppState>, request: ModalRequest) -> Result<Response, RenderError> {
    state.renderer.redirect(&request, "/login")
}

async fn reload(State(state): State<AppState>, request: ModalRequest) -> Result<Response, RenderError> {
    state.renderer.redirect_modal(&request, "/items")
}

async fn done(State(state): State<AppState>) -> Result<Response, RenderError> {
    state.renderer.callback("done")
}

async fn looping(State(state): State<AppState>, request: ModalRequest) -> Result<Response, RenderError> {
    state
        .renderer
        .render(&request, "/loop", "item_list_modal", &json!({ "count": 0 }))
        .await
}

/// Scenario app plus its background counter.
pub fn scenario_app() -> (Router, BackgroundHits) {
    let hits = BackgroundHits::default();
    let server = HttpServer::with_pages(
        AppConfig::default(),
        Arc::new(scenario_templates()),
        scenario_routes(hits.clone()),
    )
    .unwrap();
    (server.router(), hits)
}

/// Bundled item pages, in process.
pub fn demo_app() -> Router {
    HttpServer::new(AppConfig::default()).unwrap().router()
}

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Serve the bundled pages on an ephemeral port.
pub async fn spawn_demo_server() -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(AppConfig::default()).unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });
    (addr, shutdown)
}
