//! Common types and utilities for API endpoints.

use std::error::Error;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for API operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Errors indicating malformed or illegal requests.
    #[error("{0}")]
    Client(String),

    /// The requested post does not exist.
    #[error("Blog not found")]
    NotFound,

    /// Server errors, indicating that something went wrong when executing a request.
    ///
    /// The message is shown to clients. The cause is logged and reported in the response's cause
    /// chain.
    #[error("{message}")]
    Server {
        message: &'static str,
        #[source]
        cause: Box<dyn Error + Send + Sync>,
    },
}

impl ApiError {
    /// Creates a server error with a client-facing message.
    pub fn server<E>(message: &'static str, cause: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        ApiError::Server {
            message,
            cause: Box::new(cause),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Client(rejection.body_text())
    }
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// A JSON error response returned by the API.
#[derive(Serialize, Deserialize, Debug)]
pub struct ApiErrorResponse {
    /// The main error message.
    pub message: String,
    /// Chain of error causes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<String>,
}

impl ApiErrorResponse {
    /// Creates an error response from an error, extracting the full cause chain.
    pub fn from_error<E: Error + ?Sized>(error: &E) -> Self {
        let message = error.to_string();

        let mut causes = Vec::new();
        let mut source = error.source();
        while let Some(s) = source {
            causes.push(s.to_string());
            source = s.source();
        }

        Self { message, causes }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Client(message) => {
                tracing::debug!("bad request: {message}");
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Server { .. } => {
                tracing::error!(error = &self as &dyn Error, "error handling request");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ApiErrorResponse::from_error(&self);
        (status, Json(body)).into_response()
    }
}
