//! Axum-specific error types and mappings.
//!
//! Maps `ReaderError`, `LibraryError` and request-body rejections to HTTP
//! status codes and `{ "error", "status" }` JSON bodies.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use readaloud_core::{LibraryError, ReaderError};
use serde::Serialize;
use thiserror::Error;

/// Axum-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request (invalid input or missing precondition).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error, including an uninitialised speech engine.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    status: u16,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = ErrorBody {
            error: message,
            status: status.as_u16(),
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<ReaderError> for HttpError {
    fn from(err: ReaderError) -> Self {
        match err {
            ReaderError::NotFound(path) => {
                tracing::debug!(path = %path.display(), "Book not found");
                Self::NotFound("Book not found".to_owned())
            }
            ReaderError::NoBookSelected => Self::BadRequest(err.to_string()),
            ReaderError::ServiceUnavailable | ReaderError::Extraction(_) => {
                Self::Internal(err.to_string())
            }
        }
    }
}

impl From<LibraryError> for HttpError {
    fn from(err: LibraryError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_reader_error_status_mapping() {
        let cases = [
            (ReaderError::NotFound(PathBuf::from("/x.pdf")), StatusCode::NOT_FOUND),
            (ReaderError::NoBookSelected, StatusCode::BAD_REQUEST),
            (ReaderError::ServiceUnavailable, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            let response = HttpError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn test_messages_match_client_expectations() {
        assert_eq!(
            HttpError::from(ReaderError::ServiceUnavailable).to_string(),
            "Internal error: TTS engine not initialized"
        );
        assert!(matches!(
            HttpError::from(ReaderError::NotFound(PathBuf::from("/x.pdf"))),
            HttpError::NotFound(msg) if msg == "Book not found"
        ));
    }
}
