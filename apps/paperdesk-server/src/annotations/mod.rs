//! Annotation burn-in
//!
//! Takes the marks a user drew over a rendered page (highlights and freehand
//! strokes, in canvas pixels) and writes them permanently into the PDF.
//!
//! ```text
//! JSON payload ──parse_annotations──▶ [Annotation]
//!                                          │ normalize (page range)
//!                                          ▼
//!                              map_rect / map_path (canvas -> page)
//!                                          │
//!                                          ▼
//!                        PageCanvas draw calls ──▶ serialize
//! ```

mod apply;
mod geometry;
mod normalize;
mod types;

pub use apply::{
    annotate, apply, apply_annotations, Annotated, AnnotationError, ApplyReport,
    HIGHLIGHT_OPACITY, STROKE_LINE_CAP,
};
pub use geometry::{map_path, map_point, map_rect};
pub use normalize::{normalize, Normalized, SkipReason, SkippedAnnotation, Targeted};
pub use types::{
    parse_annotations, Annotation, CanvasPoint, CanvasRect, CanvasSize, FreehandStroke, Highlight,
    DEFAULT_STROKE_WIDTH,
};
