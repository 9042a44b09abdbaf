//! Annotation burn-in endpoint
//!
//! `POST /api/v1/annotate` with a `file` part and an `annotations` JSON part.
//! Responds with the annotated PDF; the batch outcome is reported in the
//! `x-annotations-applied` and `x-annotations-skipped` headers.

use axum::{extract::Multipart, extract::State, response::Response};

use crate::annotations::{self, parse_annotations};
use crate::document::PdfStore;
use crate::error::{AppError, Result};
use crate::state::AppState;

use super::form::UploadForm;
use super::{attachment, blocking, with_body, PDF_CONTENT_TYPE};

pub async fn annotate_document(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response> {
    let mut form = UploadForm::read(multipart).await?;
    let file = form.single_file()?;

    let payload = form
        .text("annotations")
        .ok_or_else(|| AppError::BadRequest("Missing 'annotations' field".to_string()))?;
    let batch = parse_annotations(payload)
        .map_err(|e| AppError::BadRequest(format!("Invalid annotations payload: {}", e)))?;

    let max = state.limits().max_annotations;
    if batch.len() > max {
        return Err(AppError::PayloadTooLarge(format!(
            "{} annotations exceeds the limit of {}",
            batch.len(),
            max
        )));
    }

    tracing::debug!(
        "Annotating {:?} ({} bytes) with {} annotations",
        file.filename,
        file.bytes.len(),
        batch.len()
    );

    let filename = format!("{}-annotated.pdf", file.stem());
    let annotated =
        blocking(move || annotations::annotate(&PdfStore, &file.bytes, &batch)).await?;

    with_body(
        attachment(PDF_CONTENT_TYPE, &filename)
            .header("x-annotations-applied", annotated.report.applied)
            .header("x-annotations-skipped", annotated.report.skipped.len()),
        annotated.bytes,
    )
}
