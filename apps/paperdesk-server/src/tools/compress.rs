use serde::Serialize;

use crate::document::Result;

use super::{load_plain, save};

/// Compression outcome
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Compressed {
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub original_size: usize,
    pub compressed_size: usize,
}

/// Rewrite a document as small as lopdf can make it
///
/// Unreferenced objects and empty streams are dropped, objects renumbered and
/// streams Flate-compressed. When that does not shrink the file the input is
/// returned unchanged.
pub fn compress(bytes: &[u8]) -> Result<Compressed> {
    let original_size = bytes.len();
    let mut doc = load_plain(bytes)?;

    let pruned = doc.prune_objects().len();
    let emptied = doc.delete_zero_length_streams().len();
    doc.renumber_objects();
    doc.compress();

    let rewritten = save(&mut doc)?;
    tracing::debug!(
        "Compression pass: pruned {} objects, removed {} empty streams",
        pruned,
        emptied
    );

    let bytes = if rewritten.len() < original_size {
        rewritten
    } else {
        tracing::debug!("Rewrite is not smaller, keeping original");
        bytes.to_vec()
    };

    Ok(Compressed {
        original_size,
        compressed_size: bytes.len(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentError;
    use crate::tools::fixtures::{contents_decode, pdf};
    use lopdf::{dictionary, Document, Stream};

    /// A document padded with unreferenced, uncompressed streams
    fn bloated_pdf() -> Vec<u8> {
        let mut doc = Document::load_mem(&pdf(1)).unwrap();
        for _ in 0..20 {
            doc.add_object(Stream::new(dictionary! {}, vec![b'A'; 4096]).with_compression(false));
        }
        doc.add_object(Stream::new(dictionary! {}, Vec::new()));
        let mut out = Vec::new();
        doc.save_to(&mut out).unwrap();
        out
    }

    #[test]
    fn test_compress_shrinks_bloated_document() {
        let input = bloated_pdf();
        let result = compress(&input).unwrap();

        assert_eq!(result.original_size, input.len());
        assert!(result.compressed_size < result.original_size);
        assert_eq!(result.compressed_size, result.bytes.len());
        assert!(contents_decode(&result.bytes));
    }

    #[test]
    fn test_compress_never_grows() {
        let input = pdf(1);
        let result = compress(&input).unwrap();
        assert!(result.compressed_size <= result.original_size);
    }

    #[test]
    fn test_compress_rejects_garbage() {
        assert!(matches!(compress(b"nope"), Err(DocumentError::Load(_))));
    }
}
