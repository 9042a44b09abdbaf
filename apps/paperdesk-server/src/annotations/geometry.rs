//! Canvas space to page space mapping
//!
//! Canvas space has its origin at the top-left with Y growing downward, in
//! pixels of the surface the user drew on. Page space has its origin at the
//! bottom-left with Y growing upward, in page points. The mapping is a
//! per-page scale plus vertical flip; aspect ratio differences stretch.

use crate::document::{PageGeometry, PagePoint, PageRect};

use super::types::{CanvasPoint, CanvasRect, CanvasSize};

fn is_degenerate(canvas: CanvasSize) -> bool {
    !(canvas.width.is_finite() && canvas.height.is_finite())
        || canvas.width == 0.0
        || canvas.height == 0.0
}

/// Map one canvas point onto the page
///
/// A zero-sized (or non-finite) canvas maps every point to the page origin.
pub fn map_point(point: CanvasPoint, canvas: CanvasSize, page: PageGeometry) -> PagePoint {
    if is_degenerate(canvas) {
        return PagePoint::ORIGIN;
    }
    PagePoint {
        x: (point.x / canvas.width) * page.width,
        y: page.height - (point.y / canvas.height) * page.height,
    }
}

/// Map a canvas rectangle onto the page
///
/// Both corners are mapped independently; since the flip inverts vertical
/// order, the bottom-right corner supplies the page-space origin Y.
pub fn map_rect(rect: CanvasRect, canvas: CanvasSize, page: PageGeometry) -> PageRect {
    if is_degenerate(canvas) {
        return PageRect::default();
    }

    let top_left = map_point(CanvasPoint::new(rect.x, rect.y), canvas, page);
    let bottom_right = map_point(
        CanvasPoint::new(rect.x + rect.width, rect.y + rect.height),
        canvas,
        page,
    );

    PageRect {
        x: top_left.x,
        y: top_left.y.min(bottom_right.y),
        width: (rect.width / canvas.width) * page.width,
        height: (top_left.y - bottom_right.y).abs(),
    }
}

/// Map a stroke's points, preserving their order
pub fn map_path(points: &[CanvasPoint], canvas: CanvasSize, page: PageGeometry) -> Vec<PagePoint> {
    points
        .iter()
        .map(|&point| map_point(point, canvas, page))
        .collect()
}
