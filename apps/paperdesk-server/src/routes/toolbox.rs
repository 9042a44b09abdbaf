//! Whole-document endpoints: merge, split, compress, decrypt, inspect

use axum::{
    extract::{Multipart, State},
    response::Response,
    Json,
};

use crate::document::DocumentInfo;
use crate::error::Result;
use crate::state::AppState;
use crate::tools::{self, SplitOutput};

use super::form::UploadForm;
use super::{attachment, blocking, with_body, PDF_CONTENT_TYPE, ZIP_CONTENT_TYPE};

/// `POST /api/v1/merge`: every file part, in upload order
pub async fn merge_documents(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response> {
    let form = UploadForm::read(multipart).await?;
    let max = state.limits().max_merge_files;
    let documents: Vec<_> = form.files.into_iter().map(|file| file.bytes).collect();

    tracing::debug!("Merging {} documents", documents.len());
    let merged = blocking(move || tools::merge(&documents, max)).await?;

    with_body(attachment(PDF_CONTENT_TYPE, "merged.pdf"), merged)
}

/// `POST /api/v1/split`: optional `ranges` like `1-3,5,8-`
pub async fn split_document(multipart: Multipart) -> Result<Response> {
    let mut form = UploadForm::read(multipart).await?;
    let file = form.single_file()?;
    let ranges = form.text("ranges").map(str::to_string);
    let stem = file.stem();

    let (output, filename) = blocking(move || {
        let parts = tools::split(&file.bytes, ranges.as_deref())?;
        let filename = match parts.as_slice() {
            [only] => format!("{}-{}.pdf", stem, only.range),
            _ => format!("{}-split.zip", stem),
        };
        SplitOutput::package(parts, &stem).map(|output| (output, filename))
    })
    .await?;

    match output {
        SplitOutput::Single(bytes) => with_body(attachment(PDF_CONTENT_TYPE, &filename), bytes),
        SplitOutput::Archive(bytes) => with_body(attachment(ZIP_CONTENT_TYPE, &filename), bytes),
    }
}

/// `POST /api/v1/compress`
pub async fn compress_document(multipart: Multipart) -> Result<Response> {
    let mut form = UploadForm::read(multipart).await?;
    let file = form.single_file()?;
    let filename = format!("{}-compressed.pdf", file.stem());

    let compressed = blocking(move || tools::compress(&file.bytes)).await?;
    tracing::info!(
        "Compressed {} -> {} bytes",
        compressed.original_size,
        compressed.compressed_size
    );

    with_body(
        attachment(PDF_CONTENT_TYPE, &filename)
            .header("x-original-size", compressed.original_size)
            .header("x-compressed-size", compressed.compressed_size),
        compressed.bytes,
    )
}

/// `POST /api/v1/decrypt`: optional `password`, empty by default
pub async fn decrypt_document(multipart: Multipart) -> Result<Response> {
    let mut form = UploadForm::read(multipart).await?;
    let file = form.single_file()?;
    let password = form.text("password").unwrap_or_default().to_string();
    let filename = format!("{}-decrypted.pdf", file.stem());

    let decrypted = blocking(move || tools::decrypt(&file.bytes, &password)).await?;

    with_body(attachment(PDF_CONTENT_TYPE, &filename), decrypted)
}

/// `POST /api/v1/inspect`
pub async fn inspect_document(multipart: Multipart) -> Result<Json<DocumentInfo>> {
    let mut form = UploadForm::read(multipart).await?;
    let file = form.single_file()?;

    let info = blocking(move || tools::inspect(&file.bytes)).await?;
    Ok(Json(info))
}
