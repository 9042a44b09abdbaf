//! Whole-document toolbox operations
//!
//! Merge, split, compress, decrypt and inspect. Each operation takes PDF bytes
//! and returns new bytes (or a summary); none of them keeps state between
//! calls. They are synchronous and CPU bound, so the HTTP layer runs them on
//! the blocking pool.

mod compress;
mod decrypt;
mod inspect;
mod merge;
mod split;

pub use compress::{compress, Compressed};
pub use decrypt::decrypt;
pub use inspect::inspect;
pub use merge::{merge, MIN_MERGE_DOCUMENTS};
pub use split::{parse_page_ranges, split, PageRange, SplitPart, SplitOutput};

use lopdf::Document;

use crate::document::{DocumentError, Result};

/// Parse bytes into an unencrypted lopdf document
pub(crate) fn load_plain(bytes: &[u8]) -> Result<Document> {
    let doc = Document::load_mem(bytes).map_err(|e| DocumentError::Load(e.to_string()))?;
    if doc.is_encrypted() {
        return Err(DocumentError::Encrypted);
    }
    Ok(doc)
}

pub(crate) fn save(doc: &mut Document) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| DocumentError::Serialize(e.to_string()))?;
    Ok(buffer)
}
