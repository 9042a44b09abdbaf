//! Error types for the Paperdesk server

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::annotations::AnnotationError;
use crate::document::DocumentError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Document(#[from] DocumentError),

    #[error("{0}")]
    Annotation(#[from] AnnotationError),

    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("Document task failed: {}", err))
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

/// Status and error kind for a document failure
fn classify(err: &DocumentError) -> (StatusCode, &'static str) {
    match err {
        DocumentError::Load(_) | DocumentError::Structure(_) => {
            (StatusCode::UNPROCESSABLE_ENTITY, "invalid_document")
        }
        DocumentError::Encrypted => (StatusCode::UNPROCESSABLE_ENTITY, "encrypted_document"),
        DocumentError::UnsupportedEncryption(_) => {
            (StatusCode::UNPROCESSABLE_ENTITY, "unsupported_encryption")
        }
        DocumentError::WrongPassword => (StatusCode::FORBIDDEN, "wrong_password"),
        DocumentError::NotEncrypted
        | DocumentError::PageOutOfRange { .. }
        | DocumentError::InvalidRange(_)
        | DocumentError::DocumentCount { .. } => (StatusCode::BAD_REQUEST, "bad_request"),
        DocumentError::Content(_) | DocumentError::Serialize(_) | DocumentError::Io(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "document_error")
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large", msg.clone())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Document(e) => {
                let (status, kind) = classify(e);
                if status.is_server_error() {
                    tracing::error!("Document error: {}", e);
                } else {
                    tracing::debug!("Rejected document request: {}", e);
                }
                (status, kind, e.to_string())
            }
            AppError::Annotation(e) => match e {
                AnnotationError::Load(inner) => {
                    let (status, kind) = classify(inner);
                    tracing::debug!("Annotation input rejected: {}", inner);
                    (status, kind, e.to_string())
                }
                AnnotationError::Render(_) | AnnotationError::Serialize(_) => {
                    tracing::error!("Annotation error: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "annotation_error",
                        "Failed to produce annotated document".to_string(),
                    )
                }
            },
            AppError::Multipart(e) => {
                let status = e.status();
                let kind = if status == StatusCode::PAYLOAD_TOO_LARGE {
                    "payload_too_large"
                } else {
                    "bad_request"
                };
                tracing::debug!("Multipart error: {}", e);
                (status, kind, e.body_text())
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
            details: if cfg!(debug_assertions) {
                Some(self.to_string())
            } else {
                None
            },
        });

        (status, body).into_response()
    }
}
