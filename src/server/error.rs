//! Renderer error type.

use axum::{
    http::{header::InvalidHeaderValue, uri::InvalidUri, StatusCode},
    response::{IntoResponse, Response},
};

use crate::server::template::TemplateError;

/// Misuse or misconfiguration detected while producing a modal response.
///
/// None of these has a meaningful degraded mode; they become a 500.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(#[from] TemplateError),
    #[error("sub-request pipeline is not installed")]
    PipelineUnavailable,
    #[error("sub-request pipeline is already installed")]
    PipelineAlreadyInstalled,
    #[error("background sub-request for {background:?} tried to dispatch another sub-request")]
    NestedSubRequest { background: String },
    #[error("invalid background URI {uri:?}: {source}")]
    InvalidBackgroundUri {
        uri: String,
        #[source]
        source: InvalidUri,
    },
    #[error("value cannot be sent as a header: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),
}

impl IntoResponse for RenderError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Modal rendering failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Modal rendering failed").into_response()
    }
}
