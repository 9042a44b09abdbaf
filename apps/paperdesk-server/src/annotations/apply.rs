//! Mutation applier and the annotate pipeline
//!
//! load -> normalize -> map + draw (in list order) -> serialize. Annotations
//! that cannot be drawn are skipped; only store failures abort the request.

use serde::Serialize;
use thiserror::Error;

use crate::document::{
    DocumentError, DocumentHandle, DocumentStore, LineCap, PagePoint, PageRect, PdfStore,
};

use super::geometry::{map_path, map_rect};
use super::normalize::{normalize, SkipReason, SkippedAnnotation};
use super::types::Annotation;

/// Fixed compositing opacity of highlights
pub const HIGHLIGHT_OPACITY: f64 = 0.3;

/// Cap style of freehand strokes
pub const STROKE_LINE_CAP: LineCap = LineCap::Round;

/// Largest magnitude lopdf can write, its reals being `f32`
const MAX_PDF_NUMBER: f64 = f32::MAX as f64;

fn representable(value: f64) -> bool {
    value.is_finite() && value.abs() <= MAX_PDF_NUMBER
}

fn rect_is_representable(rect: &PageRect) -> bool {
    [rect.x, rect.y, rect.width, rect.height]
        .into_iter()
        .all(representable)
}

fn path_is_representable(points: &[PagePoint], stroke_width: f64) -> bool {
    representable(stroke_width)
        && points
            .iter()
            .all(|point| representable(point.x) && representable(point.y))
}

/// Failures that prevent any output document from being produced
#[derive(Debug, Error)]
pub enum AnnotationError {
    #[error("Could not open document: {0}")]
    Load(#[source] DocumentError),

    #[error("Could not draw annotations: {0}")]
    Render(#[source] DocumentError),

    #[error("Could not write annotated document: {0}")]
    Serialize(#[source] DocumentError),
}

/// What happened to a batch
#[derive(Debug, Clone, Default, Serialize)]
pub struct ApplyReport {
    pub applied: usize,
    pub skipped: Vec<SkippedAnnotation>,
}

/// Annotated output plus the batch report
#[derive(Debug)]
pub struct Annotated {
    pub bytes: Vec<u8>,
    pub report: ApplyReport,
}

/// Draw every applicable annotation onto an open document, in list order
///
/// Later annotations on a page are drawn over earlier ones.
pub fn apply<H: DocumentHandle>(
    handle: &mut H,
    annotations: &[Annotation],
) -> Result<ApplyReport, DocumentError> {
    let normalized = normalize(annotations, handle.page_count());
    let mut report = ApplyReport {
        applied: 0,
        skipped: normalized.skipped,
    };

    for target in normalized.accepted {
        let page = handle.page_geometry(target.page_index)?;

        match target.annotation {
            Annotation::Highlight(highlight) => {
                let rect = map_rect(highlight.rect, highlight.canvas_size, page);
                if !rect_is_representable(&rect) {
                    tracing::debug!("Skipping highlight #{}: {:?}", target.position, rect);
                    report.skipped.push(SkippedAnnotation {
                        position: target.position,
                        reason: SkipReason::NonFiniteGeometry,
                    });
                    continue;
                }
                handle.draw_filled_rect(
                    target.page_index,
                    rect,
                    highlight.color,
                    HIGHLIGHT_OPACITY,
                )?;
            }
            Annotation::Freehand(stroke) if stroke.points.len() < 2 => {
                tracing::debug!(
                    "Skipping stroke #{} with {} point(s)",
                    target.position,
                    stroke.points.len()
                );
                report.skipped.push(SkippedAnnotation {
                    position: target.position,
                    reason: SkipReason::TooFewPoints,
                });
                continue;
            }
            Annotation::Freehand(stroke) => {
                let points = map_path(&stroke.points, stroke.canvas_size, page);
                if !path_is_representable(&points, stroke.stroke_width) {
                    tracing::debug!(
                        "Skipping stroke #{}: width {} or points out of range",
                        target.position,
                        stroke.stroke_width
                    );
                    report.skipped.push(SkippedAnnotation {
                        position: target.position,
                        reason: SkipReason::NonFiniteGeometry,
                    });
                    continue;
                }
                handle.draw_stroked_path(
                    target.page_index,
                    &points,
                    stroke.color,
                    stroke.stroke_width,
                    STROKE_LINE_CAP,
                )?;
            }
            Annotation::Unsupported { kind, .. } => {
                tracing::debug!(
                    "Skipping annotation #{} of unsupported kind {:?}",
                    target.position,
                    kind
                );
                report.skipped.push(SkippedAnnotation {
                    position: target.position,
                    reason: SkipReason::UnknownKind,
                });
                continue;
            }
        }
        report.applied += 1;
    }

    report.skipped.sort_by_key(|s| s.position);
    Ok(report)
}

/// Run the full pipeline against any document store
pub fn annotate<S: DocumentStore>(
    store: &S,
    document_bytes: &[u8],
    annotations: &[Annotation],
) -> Result<Annotated, AnnotationError> {
    let mut handle = store.load(document_bytes).map_err(AnnotationError::Load)?;
    let report = apply(&mut handle, annotations).map_err(AnnotationError::Render)?;
    let bytes = handle.serialize().map_err(AnnotationError::Serialize)?;

    tracing::info!(
        "Annotated document: {} applied, {} skipped, {} bytes",
        report.applied,
        report.skipped.len(),
        bytes.len()
    );

    Ok(Annotated { bytes, report })
}

/// Apply annotations to a PDF and return the resulting bytes
pub fn apply_annotations(
    document_bytes: &[u8],
    annotations: &[Annotation],
) -> Result<Vec<u8>, AnnotationError> {
    annotate(&PdfStore, document_bytes, annotations).map(|annotated| annotated.bytes)
}
