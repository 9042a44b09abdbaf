//! Document traits
//!
//! The capability boundary between the annotation pipeline and whatever engine
//! actually owns the document bytes. Tests substitute recording fakes.

use super::error::Result;
use super::types::{LineCap, PageGeometry, PagePoint, PageRect, Rgb};

/// Drawing primitives on the pages of an open document
///
/// Calls targeting the same page must stack in call order: a later draw
/// occludes an earlier one.
pub trait PageCanvas {
    /// Fill `rect` with `color`, composited at `opacity` (0.0-1.0)
    fn draw_filled_rect(
        &mut self,
        page_index: usize,
        rect: PageRect,
        color: Rgb,
        opacity: f64,
    ) -> Result<()>;

    /// Stroke an open polyline through `points` in order
    fn draw_stroked_path(
        &mut self,
        page_index: usize,
        points: &[PagePoint],
        color: Rgb,
        stroke_width: f64,
        line_cap: LineCap,
    ) -> Result<()>;
}

/// An open document: inspection, mutation and serialization
pub trait DocumentHandle: PageCanvas {
    /// Number of pages
    fn page_count(&self) -> usize;

    /// Size of the page at zero-based `index`
    fn page_geometry(&self, index: usize) -> Result<PageGeometry>;

    /// Write the document, including every accumulated mutation, to bytes
    fn serialize(&mut self) -> Result<Vec<u8>>;
}

/// Opens documents from raw bytes
pub trait DocumentStore {
    type Handle: DocumentHandle;

    /// Decode `bytes`; fails for corrupt or encrypted input
    fn load(&self, bytes: &[u8]) -> Result<Self::Handle>;
}
