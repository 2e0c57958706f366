//! Fetch seam.
//!
//! [`HttpTransport`] talks to a real server over `reqwest`, with a cookie
//! store so the session survives across loads. [`RouterTransport`] sends the
//! same requests straight into an axum router in-process.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Body,
    http::{
        header::{CONTENT_TYPE, COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue, Method, Request, StatusCode,
    },
    Router,
};
use tower::ServiceExt;
use url::{Position, Url};

use crate::config::ClientConfig;
use crate::protocol::headers::FORM_CONTENT_TYPE;

/// A request as issued by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub method: Method,
    pub url: Url,
    /// Form-urlencoded body. Never set for GET.
    pub body: Option<String>,
}

/// A fully read response.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("in-process dispatch failed: {0}")]
    Dispatch(String),
}

pub trait Transport {
    fn fetch(
        &self,
        request: FetchRequest,
    ) -> impl Future<Output = Result<FetchResponse, TransportError>> + Send;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client })
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, TransportError> {
        let mut builder = self.client.request(request.method, request.url);
        if let Some(body) = request.body {
            builder = builder.header(CONTENT_TYPE, FORM_CONTENT_TYPE).body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;

        Ok(FetchResponse {
            status,
            headers,
            body,
        })
    }
}

/// In-process transport over an axum router.
///
/// Keeps the last `Set-Cookie` pair and replays it, which is enough for a
/// single session cookie.
#[derive(Clone)]
pub struct RouterTransport {
    router: Router,
    cookie: Arc<Mutex<Option<String>>>,
}

impl RouterTransport {
    pub fn new(router: Router) -> Self {
        Self {
            router,
            cookie: Arc::new(Mutex::new(None)),
        }
    }

    fn stored_cookie(&self) -> Option<String> {
        self.cookie.lock().ok().and_then(|c| c.clone())
    }

    fn remember_cookie(&self, headers: &HeaderMap) {
        let pair = headers
            .get(SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|pair| pair.trim().to_string());

        if let (Some(pair), Ok(mut slot)) = (pair, self.cookie.lock()) {
            *slot = Some(pair);
        }
    }
}

impl Transport for RouterTransport {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, TransportError> {
        let mut builder = Request::builder()
            .method(request.method)
            .uri(&request.url[Position::BeforePath..]);

        if let Some(cookie) = self.stored_cookie() {
            let value = HeaderValue::from_str(&cookie)
                .map_err(|e| TransportError::Dispatch(e.to_string()))?;
            builder = builder.header(COOKIE, value);
        }

        let body = match request.body {
            Some(body) => {
                builder = builder.header(CONTENT_TYPE, FORM_CONTENT_TYPE);
                Body::from(body)
            }
            None => Body::empty(),
        };
        let http_request = builder
            .body(body)
            .map_err(|e| TransportError::Dispatch(e.to_string()))?;

        let response = match self.router.clone().oneshot(http_request).await {
            Ok(response) => response,
            Err(never) => match never {},
        };

        let (parts, body) = response.into_parts();
        self.remember_cookie(&parts.headers);
        let bytes = axum::body::to_bytes(body, usize::MAX)
            .await
            .map_err(|e| TransportError::Dispatch(e.to_string()))?;

        Ok(FetchResponse {
            status: parts.status,
            headers: parts.headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

impl std::fmt::Debug for RouterTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterTransport")
            .field("cookie", &self.stored_cookie())
            .finish_non_exhaustive()
    }
}
