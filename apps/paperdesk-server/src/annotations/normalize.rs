//! Input normalization
//!
//! Selects the annotations that target an existing page. Everything else is
//! recorded as skipped; nothing here fails.

use serde::Serialize;

use super::types::Annotation;

/// Why an annotation was not drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    /// No usable `pageIndex`
    MissingPage,
    /// `pageIndex` negative or not below the page count
    PageOutOfRange,
    /// A stroke needs at least two points to be visible
    TooFewPoints,
    /// Kind is not highlight or freehand
    UnknownKind,
    /// Mapped coordinates or stroke width overflow a PDF number
    NonFiniteGeometry,
}

/// An annotation excluded from drawing, by its position in the input list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedAnnotation {
    pub position: usize,
    pub reason: SkipReason,
}

/// An annotation whose page exists
#[derive(Debug, Clone, Copy)]
pub struct Targeted<'a> {
    pub position: usize,
    pub page_index: usize,
    pub annotation: &'a Annotation,
}

/// The in-range subsequence of a batch, in input order
#[derive(Debug, Default)]
pub struct Normalized<'a> {
    pub accepted: Vec<Targeted<'a>>,
    pub skipped: Vec<SkippedAnnotation>,
}

/// Keep the annotations with `0 <= pageIndex < page_count`
pub fn normalize(annotations: &[Annotation], page_count: usize) -> Normalized<'_> {
    let mut normalized = Normalized::default();

    for (position, annotation) in annotations.iter().enumerate() {
        let page_index = match annotation.page_index() {
            None => Err(SkipReason::MissingPage),
            Some(index) => usize::try_from(index)
                .ok()
                .filter(|&i| i < page_count)
                .ok_or(SkipReason::PageOutOfRange),
        };

        match page_index {
            Ok(page_index) => normalized.accepted.push(Targeted {
                position,
                page_index,
                annotation,
            }),
            Err(reason) => {
                tracing::debug!(
                    "Skipping {} annotation #{}: {:?} (page {:?} of {})",
                    annotation.kind(),
                    position,
                    reason,
                    annotation.page_index(),
                    page_count
                );
                normalized.skipped.push(SkippedAnnotation { position, reason });
            }
        }
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on_page(page_index: Option<i64>) -> Annotation {
        Annotation::Unsupported {
            kind: Some("sticker".to_string()),
            page_index,
        }
    }

    #[test]
    fn test_keeps_in_range_in_order() {
        let annotations = vec![on_page(Some(1)), on_page(Some(0)), on_page(Some(1))];
        let normalized = normalize(&annotations, 2);

        let pages: Vec<usize> = normalized.accepted.iter().map(|t| t.page_index).collect();
        let positions: Vec<usize> = normalized.accepted.iter().map(|t| t.position).collect();
        assert_eq!(pages, vec![1, 0, 1]);
        assert_eq!(positions, vec![0, 1, 2]);
        assert!(normalized.skipped.is_empty());
    }

    #[test]
    fn test_skips_out_of_range_and_missing() {
        let annotations = vec![
            on_page(Some(-1)),
            on_page(Some(2)),
            on_page(None),
            on_page(Some(1)),
            on_page(Some(i64::MAX)),
        ];
        let normalized = normalize(&annotations, 2);

        assert_eq!(normalized.accepted.len(), 1);
        assert_eq!(normalized.accepted[0].position, 3);
        assert_eq!(
            normalized.skipped,
            vec![
                SkippedAnnotation { position: 0, reason: SkipReason::PageOutOfRange },
                SkippedAnnotation { position: 1, reason: SkipReason::PageOutOfRange },
                SkippedAnnotation { position: 2, reason: SkipReason::MissingPage },
                SkippedAnnotation { position: 4, reason: SkipReason::PageOutOfRange },
            ]
        );
    }

    #[test]
    fn test_empty_document_accepts_nothing() {
        let annotations = vec![on_page(Some(0))];
        assert!(normalize(&annotations, 0).accepted.is_empty());
    }
}
