//! Multipart upload parsing shared by all document endpoints

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::Multipart;

use crate::error::{AppError, Result};

/// Part names that carry document files
const FILE_FIELDS: [&str; 4] = ["file", "files", "files[]", "pdf"];

/// One uploaded document
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: Option<String>,
    pub bytes: Bytes,
}

impl UploadedFile {
    /// Filename without directory or `.pdf` extension, safe for a header value
    pub fn stem(&self) -> String {
        let name = self
            .filename
            .as_deref()
            .and_then(|name| name.rsplit(['/', '\\']).next())
            .unwrap_or("");
        let name = name
            .strip_suffix(".pdf")
            .or_else(|| name.strip_suffix(".PDF"))
            .unwrap_or(name);

        let stem: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ' '))
            .collect();
        let stem = stem.trim();

        if stem.is_empty() {
            "document".to_string()
        } else {
            stem.to_string()
        }
    }
}

/// All parts of a multipart request, files in upload order
#[derive(Debug, Default)]
pub struct UploadForm {
    pub files: Vec<UploadedFile>,
    fields: HashMap<String, String>,
}

impl UploadForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or("").to_string();

            if FILE_FIELDS.contains(&name.as_str()) {
                let filename = field.file_name().map(|s| s.to_string());
                let bytes = field.bytes().await?;
                tracing::debug!(
                    "Received file part '{}': {:?}, {} bytes",
                    name,
                    filename,
                    bytes.len()
                );
                form.files.push(UploadedFile { filename, bytes });
            } else {
                let value = field.text().await?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// Text part by name
    pub fn text(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// The first uploaded file
    pub fn single_file(&mut self) -> Result<UploadedFile> {
        if self.files.is_empty() {
            tracing::warn!("No file field found in multipart upload");
            return Err(AppError::BadRequest(
                "No file provided. Use field name 'file' or 'pdf'".to_string(),
            ));
        }
        Ok(self.files.remove(0))
    }
}
