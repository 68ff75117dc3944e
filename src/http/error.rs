//! Mapping of handler errors onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::lightweight::ProxyError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("authentication required")]
    Unauthorized,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Proxy(#[from] ProxyError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) | ApiError::Proxy(ProxyError::NotFound { .. }) => {
                StatusCode::NOT_FOUND
            }
            ApiError::BadRequest(_)
            | ApiError::Proxy(ProxyError::UnknownField { .. })
            | ApiError::Proxy(ProxyError::ReadOnlyField { .. })
            | ApiError::Proxy(ProxyError::InvalidValue { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Proxy(_) | ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
