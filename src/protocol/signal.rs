//! The single outcome of a renderer invocation.

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::Response,
};
use axum::http::header::InvalidHeaderValue;
use serde::{Deserialize, Serialize};

use crate::protocol::headers::{X_MODAL_CALLBACK, X_MODAL_REDIRECT, X_MODAL_REDIRECT_SELF};

/// What the server tells the client controller to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ModalSignal {
    /// Modal fragment HTML, carried in the body.
    Content(String),
    /// Leave the modal and load the URL as a full page.
    Redirect(String),
    /// Load the modal again from the URL.
    SelfRedirect(String),
    /// Opaque payload for client-side code; no content change.
    Callback(String),
}

impl ModalSignal {
    /// Short label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ModalSignal::Content(_) => "content",
            ModalSignal::Redirect(_) => "redirect",
            ModalSignal::SelfRedirect(_) => "self_redirect",
            ModalSignal::Callback(_) => "callback",
        }
    }

    /// Encode as an HTTP response.
    ///
    /// Header signals carry an empty body. Fails if the URL or payload is not
    /// a valid header value.
    pub fn into_response(self) -> Result<Response, InvalidHeaderValue> {
        let (status, header, value) = match self {
            ModalSignal::Content(html) => {
                let mut response = Response::new(Body::from(html));
                response.headers_mut().insert(
                    CONTENT_TYPE,
                    HeaderValue::from_static("text/html; charset=utf-8"),
                );
                return Ok(response);
            }
            ModalSignal::Redirect(url) => (StatusCode::OK, X_MODAL_REDIRECT, url),
            ModalSignal::SelfRedirect(url) => (StatusCode::OK, X_MODAL_REDIRECT_SELF, url),
            ModalSignal::Callback(payload) => (StatusCode::NO_CONTENT, X_MODAL_CALLBACK, payload),
        };

        let value = HeaderValue::from_str(&value)?;
        let mut response = Response::new(Body::empty());
        *response.status_mut() = status;
        response.headers_mut().insert(header, value);
        Ok(response)
    }

    /// Decode the header signals of a response, if any.
    ///
    /// Presence is what counts: a header whose value is not valid UTF-8 is
    /// decoded lossily rather than ignored.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let read = |name: &HeaderName| {
            headers
                .get(name)
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        };

        if let Some(url) = read(&X_MODAL_REDIRECT) {
            return Some(ModalSignal::Redirect(url));
        }
        if let Some(url) = read(&X_MODAL_REDIRECT_SELF) {
            return Some(ModalSignal::SelfRedirect(url));
        }
        read(&X_MODAL_CALLBACK).map(ModalSignal::Callback)
    }

    /// Decode a complete response. Without a header signal the body is the
    /// fragment, even when empty.
    pub fn decode(headers: &HeaderMap, body: String) -> Self {
        Self::from_headers(headers).unwrap_or(ModalSignal::Content(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_response() {
        let response = ModalSignal::Content("<p>x</p>".into()).into_response().unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(X_MODAL_REDIRECT).is_none());
    }

    #[test]
    fn test_header_signals_have_expected_status() {
        let redirect = ModalSignal::Redirect("/login".into()).into_response().unwrap();
        assert_eq!(redirect.status(), StatusCode::OK);
        assert_eq!(redirect.headers()[X_MODAL_REDIRECT], "/login");

        let own = ModalSignal::SelfRedirect("/items/1".into()).into_response().unwrap();
        assert_eq!(own.status(), StatusCode::OK);
        assert_eq!(own.headers()[X_MODAL_REDIRECT_SELF], "/items/1");

        let callback = ModalSignal::Callback(r#"{"action":"close"}"#.into()).into_response().unwrap();
        assert_eq!(callback.status(), StatusCode::NO_CONTENT);
        assert_eq!(callback.headers()[X_MODAL_CALLBACK], r#"{"action":"close"}"#);
    }

    #[test]
    fn test_invalid_header_value_is_rejected() {
        assert!(ModalSignal::Redirect("/bad\nurl".into()).into_response().is_err());
    }

    #[test]
    fn test_decode_precedence() {
        let mut headers = HeaderMap::new();
        headers.insert(X_MODAL_CALLBACK, HeaderValue::from_static("cb"));
        headers.insert(X_MODAL_REDIRECT_SELF, HeaderValue::from_static("/self"));
        assert_eq!(ModalSignal::decode(&headers, String::new()), ModalSignal::SelfRedirect("/self".into()));

        headers.insert(X_MODAL_REDIRECT, HeaderValue::from_static("/away"));
        assert_eq!(ModalSignal::decode(&headers, String::new()), ModalSignal::Redirect("/away".into()));
    }

    #[test]
    fn test_decode_without_headers_is_content() {
        let headers = HeaderMap::new();
        assert_eq!(ModalSignal::decode(&headers, String::new()), ModalSignal::Content(String::new()));
        assert_eq!(ModalSignal::decode(&headers, "<b>".into()), ModalSignal::Content("<b>".into()));
    }
}
