use lopdf::Document;

use crate::document::{objects, DocumentError, DocumentInfo, PageGeometry, Result};

/// Page count and page sizes, used by clients to size annotation canvases
///
/// Encrypted documents are reported as such, without page information.
pub fn inspect(bytes: &[u8]) -> Result<DocumentInfo> {
    let doc = Document::load_mem(bytes).map_err(|e| DocumentError::Load(e.to_string()))?;

    if doc.is_encrypted() {
        return Ok(DocumentInfo {
            page_count: 0,
            pages: Vec::new(),
            encrypted: true,
        });
    }

    let pages = doc
        .get_pages()
        .into_values()
        .map(|id| {
            let [x0, y0, x1, y1] = objects::media_box(&doc, id)?;
            Ok(PageGeometry::new(x1 - x0, y1 - y0))
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!("Inspected document: {} pages", pages.len());

    Ok(DocumentInfo {
        page_count: pages.len(),
        pages,
        encrypted: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::fixtures::{pdf_with_pages, rc4_encrypted};

    #[test]
    fn test_inspect_sizes_in_order() {
        let pdf = pdf_with_pages(&[(600.0, 800.0), (842.0, 595.0)]);
        let info = inspect(&pdf).unwrap();

        assert_eq!(info.page_count, 2);
        assert!(!info.encrypted);
        assert_eq!(
            info.pages,
            vec![PageGeometry::new(600.0, 800.0), PageGeometry::new(842.0, 595.0)]
        );
    }

    #[test]
    fn test_inspect_serializes_camel_case() {
        let info = inspect(&pdf_with_pages(&[(100.0, 200.0)])).unwrap();
        let json = serde_json::to_value(&info).unwrap();

        assert_eq!(json["pageCount"], 1);
        assert_eq!(json["pages"][0]["width"], 100.0);
        assert_eq!(json["encrypted"], false);
    }

    #[test]
    fn test_inspect_rejects_garbage() {
        assert!(matches!(inspect(b"GIF89a"), Err(DocumentError::Load(_))));
    }

    #[test]
    fn test_inspect_flags_encrypted_document() {
        let info = inspect(rc4_encrypted()).unwrap();

        assert!(info.encrypted);
        assert_eq!(info.page_count, 0);
        assert!(info.pages.is_empty());
    }
}
