//! Concatenate documents into one

use lopdf::{dictionary, Document, Object, ObjectId};

use crate::document::{objects, DocumentError, Result};

use super::{load_plain, save};

pub const MIN_MERGE_DOCUMENTS: usize = 2;

/// Merge documents in the order given
///
/// Each source is renumbered into its own id range and its page objects are
/// re-parented under one new page tree. Source catalogs, page trees and
/// outlines are dropped.
pub fn merge<B: AsRef<[u8]>>(documents: &[B], max_documents: usize) -> Result<Vec<u8>> {
    if documents.len() < MIN_MERGE_DOCUMENTS || documents.len() > max_documents {
        return Err(DocumentError::DocumentCount {
            count: documents.len(),
            min: MIN_MERGE_DOCUMENTS,
            max: max_documents,
        });
    }

    let mut merged = Document::with_version("1.7");
    let mut page_ids: Vec<ObjectId> = Vec::new();
    let mut max_id = 1;

    for (position, bytes) in documents.iter().enumerate() {
        let mut doc = load_plain(bytes.as_ref()).map_err(|e| match e {
            DocumentError::Load(msg) => {
                DocumentError::Load(format!("document {}: {}", position + 1, msg))
            }
            other => other,
        })?;

        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;

        let source_pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
        for &page_id in &source_pages {
            objects::materialize_inherited(&mut doc, page_id)?;
        }
        page_ids.extend(source_pages);

        for (id, object) in doc.objects {
            match objects::type_name(&object) {
                Some("Catalog" | "Pages" | "Outlines" | "Outline") => {}
                _ => {
                    merged.objects.insert(id, object);
                }
            }
        }
    }

    merged.max_id = max_id;
    let pages_id = merged.new_object_id();

    for &page_id in &page_ids {
        merged
            .get_dictionary_mut(page_id)
            .map_err(objects::structure_error)?
            .set("Parent", Object::Reference(pages_id));
    }

    let count = page_ids.len() as i64;
    merged.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|&id| Object::Reference(id)).collect::<Vec<_>>(),
            "Count" => count,
        }),
    );
    let catalog_id = merged.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    merged.trailer.set("Root", Object::Reference(catalog_id));

    merged.prune_objects();
    merged.renumber_objects();
    merged.compress();

    tracing::info!(
        "Merged {} documents into {} pages",
        documents.len(),
        page_ids.len()
    );

    save(&mut merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::fixtures::{contents_decode, page_widths, pdf, pdf_with_pages};
    use lopdf::Stream;

    /// Page tree where MediaBox and Resources live only on the Pages node
    fn pdf_with_inherited_box(width: f64) -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let content = doc.add_object(Stream::new(dictionary! {}, b"0 g 0 0 5 5 re f".to_vec()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "Contents" => Object::Reference(content),
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_id)],
                "Count" => 1,
                "MediaBox" => vec![0.into(), 0.into(), width.into(), 500.into()],
                "Resources" => dictionary! {},
            }),
        );
        let catalog = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog));

        let mut out = Vec::new();
        doc.save_to(&mut out).unwrap();
        out
    }

    #[test]
    fn test_merge_keeps_input_order() {
        let first = pdf_with_pages(&[(100.0, 100.0), (200.0, 100.0)]);
        let second = pdf_with_pages(&[(300.0, 100.0)]);

        let merged = merge(&[first, second], 20).unwrap();

        assert_eq!(page_widths(&merged), vec![100.0, 200.0, 300.0]);
        assert!(contents_decode(&merged));
    }

    #[test]
    fn test_merge_materializes_inherited_attributes() {
        let merged = merge(&[pdf_with_inherited_box(400.0), pdf(1)], 20).unwrap();

        let doc = Document::load_mem(&merged).unwrap();
        let first = doc.get_pages()[&1];
        let page = doc.get_dictionary(first).unwrap();
        assert!(page.has(b"MediaBox"));
        assert!(page.has(b"Resources"));
        assert_eq!(page_widths(&merged), vec![400.0, 612.0]);
    }

    #[test]
    fn test_merge_requires_two_to_max_documents() {
        assert!(matches!(
            merge(&[pdf(1)], 20),
            Err(DocumentError::DocumentCount { count: 1, .. })
        ));
        assert!(matches!(
            merge(&[pdf(1), pdf(1), pdf(1)], 2),
            Err(DocumentError::DocumentCount { count: 3, max: 2, .. })
        ));
    }

    #[test]
    fn test_merge_names_the_broken_document() {
        let err = merge(&[pdf(1), b"oops".to_vec()], 20).unwrap_err();
        match err {
            DocumentError::Load(msg) => assert!(msg.starts_with("document 2")),
            other => panic!("expected load error, got {:?}", other),
        }
    }
}
