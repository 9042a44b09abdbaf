//! Annotation types
//!
//! Annotations arrive from the editor as loosely-typed JSON. Every field is
//! read best-effort: a malformed value falls back to that field's default
//! instead of rejecting the batch, and an entry whose kind is unknown becomes
//! [`Annotation::Unsupported`] so it can be skipped later.

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;

use crate::document::Rgb;

/// Stroke width used when none (or a non-positive one) is supplied
pub const DEFAULT_STROKE_WIDTH: f64 = 3.0;

/// Size of the on-screen drawing surface, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A point in canvas space (origin top-left, Y down)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CanvasPoint {
    pub x: f64,
    pub y: f64,
}

impl CanvasPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl<'de> Deserialize<'de> for CanvasPoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum PointInput {
            Object { x: f64, y: f64 },
            Pair([f64; 2]),
        }

        Ok(match PointInput::deserialize(deserializer)? {
            PointInput::Object { x, y } => CanvasPoint { x, y },
            PointInput::Pair([x, y]) => CanvasPoint { x, y },
        })
    }
}

/// A rectangle in canvas space, anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct CanvasRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A semi-transparent filled rectangle
#[derive(Debug, Clone, PartialEq)]
pub struct Highlight {
    pub page_index: Option<i64>,
    pub canvas_size: CanvasSize,
    pub rect: CanvasRect,
    pub color: Rgb,
}

/// A hand-drawn open polyline
#[derive(Debug, Clone, PartialEq)]
pub struct FreehandStroke {
    pub page_index: Option<i64>,
    pub canvas_size: CanvasSize,
    pub points: Vec<CanvasPoint>,
    pub color: Rgb,
    pub stroke_width: f64,
}

/// One user-created mark
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawAnnotation")]
pub enum Annotation {
    Highlight(Highlight),
    Freehand(FreehandStroke),
    /// Unrecognized or missing kind; never drawn
    Unsupported {
        kind: Option<String>,
        page_index: Option<i64>,
    },
}

impl Annotation {
    /// Zero-based target page as supplied by the client
    pub fn page_index(&self) -> Option<i64> {
        match self {
            Annotation::Highlight(h) => h.page_index,
            Annotation::Freehand(s) => s.page_index,
            Annotation::Unsupported { page_index, .. } => *page_index,
        }
    }

    /// Short kind label for logs
    pub fn kind(&self) -> &str {
        match self {
            Annotation::Highlight(_) => "highlight",
            Annotation::Freehand(_) => "freehand",
            Annotation::Unsupported { kind, .. } => kind.as_deref().unwrap_or("unknown"),
        }
    }
}

/// Parse an editor payload: an array of annotations, or `{"annotations": [...]}`
///
/// Only a payload that is not JSON, or has no list at the top, is an error.
/// Entries that are not objects become unsupported annotations.
pub fn parse_annotations(payload: &str) -> Result<Vec<Annotation>, serde_json::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Payload {
        List(Vec<serde_json::Value>),
        Wrapped { annotations: Vec<serde_json::Value> },
    }

    let entries = match serde_json::from_str::<Payload>(payload)? {
        Payload::List(entries) | Payload::Wrapped { annotations: entries } => entries,
    };

    Ok(entries
        .into_iter()
        .map(|entry| {
            serde_json::from_value(entry).unwrap_or(Annotation::Unsupported {
                kind: None,
                page_index: None,
            })
        })
        .collect())
}

/// Wire shape with every field optional and individually lenient
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawAnnotation {
    #[serde(rename = "type", alias = "kind", deserialize_with = "lenient")]
    kind: Option<String>,
    #[serde(alias = "page", deserialize_with = "lenient")]
    page_index: Option<i64>,
    #[serde(alias = "sourceCanvasSize", deserialize_with = "lenient")]
    canvas_size: Option<CanvasSize>,
    #[serde(deserialize_with = "lenient")]
    color: Option<ColorInput>,
    #[serde(deserialize_with = "lenient")]
    rect: Option<CanvasRect>,
    #[serde(deserialize_with = "lenient")]
    points: Option<Vec<serde_json::Value>>,
    #[serde(deserialize_with = "lenient")]
    stroke_width: Option<f64>,
}

/// Accepted color spellings
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ColorInput {
    Hex(String),
    Triple([f64; 3]),
    Channels { r: f64, g: f64, b: f64 },
}

impl ColorInput {
    fn resolve(self) -> Option<Rgb> {
        match self {
            ColorInput::Hex(hex) => Rgb::from_hex(&hex),
            ColorInput::Triple([r, g, b]) | ColorInput::Channels { r, g, b } => {
                Rgb::try_new(r, g, b)
            }
        }
    }
}

/// Deserialize a field, turning any type mismatch into `None`
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn normalize_kind(kind: &str) -> String {
    kind.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl From<RawAnnotation> for Annotation {
    fn from(raw: RawAnnotation) -> Self {
        let color = raw
            .color
            .and_then(ColorInput::resolve)
            .unwrap_or(Rgb::YELLOW);
        let canvas_size = raw.canvas_size.unwrap_or_default();

        match raw.kind.as_deref().map(normalize_kind).as_deref() {
            Some("highlight") => Annotation::Highlight(Highlight {
                page_index: raw.page_index,
                canvas_size,
                rect: raw.rect.unwrap_or_default(),
                color,
            }),
            Some("freehand" | "freehandstroke" | "draw" | "pen" | "ink") => {
                let points = raw
                    .points
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|p| serde_json::from_value(p).ok())
                    .collect();
                let stroke_width = raw
                    .stroke_width
                    .filter(|w| w.is_finite() && *w > 0.0)
                    .unwrap_or(DEFAULT_STROKE_WIDTH);

                Annotation::Freehand(FreehandStroke {
                    page_index: raw.page_index,
                    canvas_size,
                    points,
                    color,
                    stroke_width,
                })
            }
            _ => Annotation::Unsupported {
                kind: raw.kind,
                page_index: raw.page_index,
            },
        }
    }
}
