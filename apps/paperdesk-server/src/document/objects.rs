//! Low-level lopdf object helpers
//!
//! Reference resolution and page-tree inheritance shared by the store and the
//! toolbox operations.

use lopdf::{Document, Object, ObjectId};

use super::error::{DocumentError, Result};
use super::types::FALLBACK_PAGE_SIZE;

/// Bound on Parent-chain walks so cyclic page trees cannot hang a request
const MAX_TREE_DEPTH: usize = 32;

/// Page attributes a page may inherit from its ancestors in the page tree
pub(crate) const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

pub(crate) fn structure_error(err: lopdf::Error) -> DocumentError {
    DocumentError::Structure(err.to_string())
}

/// Follow a single indirect reference
pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Result<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).map_err(|e| {
            DocumentError::Structure(format!("Reference {:?} not found: {}", id, e))
        }),
        other => Ok(other),
    }
}

/// Numeric value of an Integer or Real object
pub(crate) fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(v) => Some(*v as f64),
        Object::Real(v) => Some(*v as f64),
        _ => None,
    }
}

/// `/Type` name of a dictionary object
pub(crate) fn type_name(obj: &Object) -> Option<&str> {
    obj.as_dict().ok()?.get(b"Type").ok()?.as_name_str().ok()
}

/// Look up `key` on the page, then on each ancestor Pages node
pub(crate) fn inherited(doc: &Document, page_id: ObjectId, key: &[u8]) -> Result<Option<Object>> {
    let mut current = page_id;

    for _ in 0..MAX_TREE_DEPTH {
        let dict = doc.get_dictionary(current).map_err(structure_error)?;
        if let Ok(value) = dict.get(key) {
            return Ok(Some(value.clone()));
        }
        match dict.get(b"Parent").and_then(Object::as_reference) {
            Ok(parent) => current = parent,
            Err(_) => return Ok(None),
        }
    }

    Ok(None)
}

/// Effective MediaBox as `[x0, y0, x1, y1]` with `x0 < x1` and `y0 < y1`
///
/// Missing or unusable boxes fall back to US Letter at the origin.
pub(crate) fn media_box(doc: &Document, page_id: ObjectId) -> Result<[f64; 4]> {
    let fallback = [0.0, 0.0, FALLBACK_PAGE_SIZE.width, FALLBACK_PAGE_SIZE.height];

    let Some(value) = inherited(doc, page_id, b"MediaBox")? else {
        return Ok(fallback);
    };
    let items = match resolve(doc, &value)? {
        Object::Array(items) if items.len() == 4 => items,
        _ => return Ok(fallback),
    };

    let mut coords = [0.0; 4];
    for (slot, item) in coords.iter_mut().zip(items) {
        match resolve(doc, item).ok().and_then(number) {
            Some(v) if v.is_finite() => *slot = v,
            _ => return Ok(fallback),
        }
    }

    let [ax, ay, bx, by] = coords;
    let normalized = [ax.min(bx), ay.min(by), ax.max(bx), ay.max(by)];
    if normalized[2] - normalized[0] <= 0.0 || normalized[3] - normalized[1] <= 0.0 {
        return Ok(fallback);
    }
    Ok(normalized)
}

/// Copy inherited attributes onto the page itself
///
/// Needed before a page is detached from its original page tree.
pub(crate) fn materialize_inherited(doc: &mut Document, page_id: ObjectId) -> Result<()> {
    for key in INHERITABLE_KEYS {
        let has_own = doc
            .get_dictionary(page_id)
            .map_err(structure_error)?
            .has(key);
        if has_own {
            continue;
        }
        if let Some(value) = inherited(doc, page_id, key)? {
            doc.get_dictionary_mut(page_id)
                .map_err(structure_error)?
                .set(key.to_vec(), value);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    fn inherited_tree() -> (Document, ObjectId) {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_id)],
                "Count" => 1,
                "MediaBox" => vec![0.into(), 0.into(), 300.into(), 400.into()],
                "Rotate" => 90,
            }),
        );
        (doc, page_id)
    }

    #[test]
    fn test_media_box_inherited_from_parent() {
        let (doc, page_id) = inherited_tree();
        assert_eq!(media_box(&doc, page_id).unwrap(), [0.0, 0.0, 300.0, 400.0]);
    }

    #[test]
    fn test_media_box_fallback_and_normalization() {
        let mut doc = Document::with_version("1.7");
        let bare = doc.add_object(dictionary! { "Type" => "Page" });
        assert_eq!(media_box(&doc, bare).unwrap(), [0.0, 0.0, 612.0, 792.0]);

        let flipped = doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => vec![200.into(), 100.into(), 0.into(), 0.into()],
        });
        assert_eq!(media_box(&doc, flipped).unwrap(), [0.0, 0.0, 200.0, 100.0]);
    }

    #[test]
    fn test_materialize_inherited() {
        let (mut doc, page_id) = inherited_tree();
        materialize_inherited(&mut doc, page_id).unwrap();

        let page = doc.get_dictionary(page_id).unwrap();
        assert!(page.has(b"MediaBox"));
        assert_eq!(page.get(b"Rotate").unwrap().as_i64().unwrap(), 90);
        assert!(!page.has(b"Resources"));
    }

    #[test]
    fn test_type_name() {
        let obj = Object::Dictionary(dictionary! { "Type" => "Catalog" });
        assert_eq!(type_name(&obj), Some("Catalog"));
        assert_eq!(type_name(&Object::Integer(1)), None);
    }
}
