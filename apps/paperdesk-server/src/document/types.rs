//! Core document types
//!
//! The vocabulary shared between the annotation pipeline and a document store.
//! All coordinates here are in page space: origin bottom-left, Y increasing
//! upward, units are PDF points (72 points = 1 inch).

use serde::{Deserialize, Serialize};

/// Page size used when a page carries no usable MediaBox (US Letter)
pub const FALLBACK_PAGE_SIZE: PageGeometry = PageGeometry {
    width: 612.0,
    height: 792.0,
};

/// Size of a single page in page space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
}

impl PageGeometry {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A point in page space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PagePoint {
    pub x: f64,
    pub y: f64,
}

impl PagePoint {
    /// The page origin (bottom-left corner)
    pub const ORIGIN: PagePoint = PagePoint { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in page space, anchored at its bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PageRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// RGB color with each channel in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    /// Opaque yellow (#FFFF00), the highlighter default
    pub const YELLOW: Rgb = Rgb {
        r: 1.0,
        g: 1.0,
        b: 0.0,
    };

    /// Build a color from channels, rejecting anything outside [0, 1]
    pub fn try_new(r: f64, g: f64, b: f64) -> Option<Self> {
        let valid = |c: f64| c.is_finite() && (0.0..=1.0).contains(&c);
        if valid(r) && valid(g) && valid(b) {
            Some(Self { r, g, b })
        } else {
            None
        }
    }

    /// Parse `#RRGGBB` or `#RGB` (leading `#` optional)
    pub fn from_hex(color: &str) -> Option<Self> {
        let hex = color.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v as f64 / 255.0);

        match hex.len() {
            6 => Some(Self {
                r: channel(&hex[0..2])?,
                g: channel(&hex[2..4])?,
                b: channel(&hex[4..6])?,
            }),
            3 => {
                let short = |i: usize| channel(&hex[i..i + 1].repeat(2));
                Some(Self {
                    r: short(0)?,
                    g: short(1)?,
                    b: short(2)?,
                })
            }
            _ => None,
        }
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::YELLOW
    }
}

/// Stroke end cap style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

impl LineCap {
    /// Operand of the PDF `J` operator
    pub fn pdf_style(self) -> i64 {
        match self {
            LineCap::Butt => 0,
            LineCap::Round => 1,
            LineCap::Square => 2,
        }
    }
}

/// Summary of a document's page structure
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    pub page_count: usize,
    /// Page sizes in order (index 0 = first page)
    pub pages: Vec<PageGeometry>,
    pub encrypted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_colors() {
        assert_eq!(Rgb::from_hex("#FF0000"), Some(Rgb { r: 1.0, g: 0.0, b: 0.0 }));
        assert_eq!(Rgb::from_hex("00ff00"), Some(Rgb { r: 0.0, g: 1.0, b: 0.0 }));
        assert_eq!(Rgb::from_hex("#ff0"), Some(Rgb::YELLOW));
        assert_eq!(Rgb::from_hex("#12345"), None);
        assert_eq!(Rgb::from_hex("#GGGGGG"), None);
        assert_eq!(Rgb::from_hex("#ééé"), None);
    }

    #[test]
    fn test_channel_bounds() {
        assert!(Rgb::try_new(0.0, 0.5, 1.0).is_some());
        assert!(Rgb::try_new(1.2, 0.0, 0.0).is_none());
        assert!(Rgb::try_new(-0.1, 0.0, 0.0).is_none());
        assert!(Rgb::try_new(f64::NAN, 0.0, 0.0).is_none());
    }

    #[test]
    fn test_line_cap_operands() {
        assert_eq!(LineCap::Butt.pdf_style(), 0);
        assert_eq!(LineCap::Round.pdf_style(), 1);
        assert_eq!(LineCap::Square.pdf_style(), 2);
    }
}
