//! Route modules for Paperdesk Server

pub mod annotate;
pub mod form;
pub mod health;
pub mod toolbox;

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{header, response::Builder, StatusCode},
    response::Response,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::{AppError, Result};
use crate::state::AppState;

pub(crate) const PDF_CONTENT_TYPE: &str = "application/pdf";
pub(crate) const ZIP_CONTENT_TYPE: &str = "application/zip";

/// Build the full application router
pub fn app(state: AppState) -> Router {
    let body_limit = state.limits().max_upload_bytes();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers(Any);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/v1/health", get(health::health_check))
        .nest("/api/v1", api_router())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/annotate", post(annotate::annotate_document))
        .route("/merge", post(toolbox::merge_documents))
        .route("/split", post(toolbox::split_document))
        .route("/compress", post(toolbox::compress_document))
        .route("/decrypt", post(toolbox::decrypt_document))
        .route("/inspect", post(toolbox::inspect_document))
}

/// Response builder for a file download
pub(crate) fn attachment(content_type: &'static str, filename: &str) -> Builder {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )
}

pub(crate) fn with_body(builder: Builder, bytes: Vec<u8>) -> Result<Response> {
    builder
        .header(header::CONTENT_LENGTH, bytes.len())
        .body(Body::from(bytes))
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// Run synchronous document work on the blocking pool
pub(crate) async fn blocking<T, E, F>(work: F) -> Result<T>
where
    F: FnOnce() -> std::result::Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<AppError> + Send + 'static,
{
    tokio::task::spawn_blocking(work).await?.map_err(Into::into)
}
