//! lopdf-backed document store
//!
//! Draw calls are buffered per page as content-stream operations and written
//! out once, at serialization time, as a single overlay stream per page.

use std::collections::BTreeMap;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

use super::error::{DocumentError, Result};
use super::objects::{self, structure_error};
use super::traits::{DocumentHandle, DocumentStore, PageCanvas};
use super::types::{LineCap, PageGeometry, PagePoint, PageRect, Rgb};

/// Opens PDF documents with lopdf
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfStore;

impl DocumentStore for PdfStore {
    type Handle = PdfDocument;

    fn load(&self, bytes: &[u8]) -> Result<PdfDocument> {
        PdfDocument::from_bytes(bytes)
    }
}

/// An open PDF with pending drawing operations
pub struct PdfDocument {
    doc: Document,
    pages: Vec<PageSlot>,
    overlays: BTreeMap<usize, PageOverlay>,
}

struct PageSlot {
    id: ObjectId,
    /// `[x0, y0, x1, y1]`, normalized
    media_box: [f64; 4],
}

#[derive(Default)]
struct PageOverlay {
    operations: Vec<Operation>,
    /// Opacity in thousandths -> ExtGState resource name
    graphics_states: BTreeMap<u32, String>,
}

impl PageOverlay {
    fn graphics_state(&mut self, opacity: f64) -> String {
        let key = (opacity * 1000.0).round() as u32;
        self.graphics_states
            .entry(key)
            .or_insert_with(|| format!("PdGs{}", key))
            .clone()
    }
}

impl PdfDocument {
    /// Parse a document from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let doc = Document::load_mem(bytes).map_err(|e| DocumentError::Load(e.to_string()))?;
        if doc.is_encrypted() {
            return Err(DocumentError::Encrypted);
        }
        Self::from_document(doc)
    }

    /// Wrap an already parsed document
    pub fn from_document(doc: Document) -> Result<Self> {
        let pages = doc
            .get_pages()
            .into_values()
            .map(|id| {
                Ok(PageSlot {
                    id,
                    media_box: objects::media_box(&doc, id)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if pages.is_empty() {
            return Err(DocumentError::Load("Document has no pages".to_string()));
        }

        Ok(Self {
            doc,
            pages,
            overlays: BTreeMap::new(),
        })
    }

    fn check_page(&self, page_index: usize) -> Result<&PageSlot> {
        self.pages
            .get(page_index)
            .ok_or(DocumentError::PageOutOfRange {
                index: page_index,
                count: self.pages.len(),
            })
    }

    fn overlay_mut(&mut self, page_index: usize) -> Result<&mut PageOverlay> {
        self.check_page(page_index)?;
        Ok(self.overlays.entry(page_index).or_default())
    }

    /// Write a page's buffered operations into its content and resources
    fn flush_overlay(&mut self, page_index: usize, overlay: PageOverlay) -> Result<()> {
        let PageOverlay {
            operations: drawn,
            graphics_states,
        } = overlay;
        let (page_id, [x0, y0, _, _]) = {
            let slot = self.check_page(page_index)?;
            (slot.id, slot.media_box)
        };

        let mut operations = Vec::with_capacity(drawn.len() + 3);
        operations.push(Operation::new("q", vec![]));
        if x0 != 0.0 || y0 != 0.0 {
            operations.push(Operation::new(
                "cm",
                vec![1.into(), 0.into(), 0.into(), 1.into(), x0.into(), y0.into()],
            ));
        }
        operations.extend(drawn);
        operations.push(Operation::new("Q", vec![]));

        let encoded = Content { operations }
            .encode()
            .map_err(|e| DocumentError::Content(e.to_string()))?;

        let existing = self.existing_contents(page_id)?;
        let mut contents = Vec::with_capacity(existing.len() + 2);
        let mut overlay_bytes = Vec::with_capacity(encoded.len() + 4);

        // Isolate the original content so its graphics state cannot leak into ours.
        // Streams are concatenated byte-wise, so every boundary needs whitespace.
        if !existing.is_empty() {
            let save_id = self
                .doc
                .add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
            contents.push(Object::Reference(save_id));
            contents.extend(existing);
            overlay_bytes.extend_from_slice(b"\nQ\n");
        }
        overlay_bytes.extend(encoded);
        overlay_bytes.push(b'\n');

        let overlay_id = self
            .doc
            .add_object(Stream::new(Dictionary::new(), overlay_bytes));
        contents.push(Object::Reference(overlay_id));

        self.register_graphics_states(page_id, &graphics_states)?;
        self.doc
            .get_dictionary_mut(page_id)
            .map_err(structure_error)?
            .set("Contents", Object::Array(contents));

        Ok(())
    }

    /// Content stream references of a page, flattened
    fn existing_contents(&self, page_id: ObjectId) -> Result<Vec<Object>> {
        let page = self.doc.get_dictionary(page_id).map_err(structure_error)?;
        let contents = match page.get(b"Contents") {
            Ok(Object::Reference(id)) => match self.doc.get_object(*id) {
                Ok(Object::Array(items)) => items.clone(),
                _ => vec![Object::Reference(*id)],
            },
            Ok(Object::Array(items)) => items.clone(),
            _ => Vec::new(),
        };
        Ok(contents)
    }

    fn register_graphics_states(
        &mut self,
        page_id: ObjectId,
        states: &BTreeMap<u32, String>,
    ) -> Result<()> {
        if states.is_empty() {
            return Ok(());
        }

        let entries: Vec<(String, ObjectId)> = states
            .iter()
            .map(|(key, name)| {
                let alpha = *key as f64 / 1000.0;
                let id = self.doc.add_object(dictionary! {
                    "Type" => "ExtGState",
                    "ca" => alpha,
                    "CA" => alpha,
                });
                (name.clone(), id)
            })
            .collect();

        let ext_g_state = self.ext_g_state_mut(page_id)?;
        for (name, id) in entries {
            ext_g_state.set(name, Object::Reference(id));
        }
        Ok(())
    }

    /// The page's own Resources dictionary, created from inherited values if absent
    fn resources_mut(&mut self, page_id: ObjectId) -> Result<&mut Dictionary> {
        let current = self
            .doc
            .get_dictionary(page_id)
            .map_err(structure_error)?
            .get(b"Resources")
            .ok()
            .cloned();

        match current {
            Some(Object::Reference(id)) => {
                return self.doc.get_dictionary_mut(id).map_err(structure_error);
            }
            Some(Object::Dictionary(_)) => {}
            _ => {
                let inherited = match objects::inherited(&self.doc, page_id, b"Resources")? {
                    Some(Object::Reference(id)) => self
                        .doc
                        .get_dictionary(id)
                        .map(|d| d.clone())
                        .unwrap_or_else(|_| Dictionary::new()),
                    Some(Object::Dictionary(dict)) => dict,
                    _ => Dictionary::new(),
                };
                self.doc
                    .get_dictionary_mut(page_id)
                    .map_err(structure_error)?
                    .set("Resources", Object::Dictionary(inherited));
            }
        }

        self.doc
            .get_dictionary_mut(page_id)
            .map_err(structure_error)?
            .get_mut(b"Resources")
            .and_then(Object::as_dict_mut)
            .map_err(structure_error)
    }

    fn ext_g_state_mut(&mut self, page_id: ObjectId) -> Result<&mut Dictionary> {
        let current = self
            .resources_mut(page_id)?
            .get(b"ExtGState")
            .ok()
            .cloned();

        match current {
            Some(Object::Reference(id)) => {
                return self.doc.get_dictionary_mut(id).map_err(structure_error);
            }
            Some(Object::Dictionary(_)) => {}
            _ => {
                self.resources_mut(page_id)?
                    .set("ExtGState", Object::Dictionary(Dictionary::new()));
            }
        }

        self.resources_mut(page_id)?
            .get_mut(b"ExtGState")
            .and_then(Object::as_dict_mut)
            .map_err(structure_error)
    }
}

fn color_operands(color: Rgb) -> Vec<Object> {
    vec![color.r.into(), color.g.into(), color.b.into()]
}

impl PageCanvas for PdfDocument {
    fn draw_filled_rect(
        &mut self,
        page_index: usize,
        rect: PageRect,
        color: Rgb,
        opacity: f64,
    ) -> Result<()> {
        let opacity = if opacity.is_finite() {
            opacity.clamp(0.0, 1.0)
        } else {
            1.0
        };
        let overlay = self.overlay_mut(page_index)?;
        let state = overlay.graphics_state(opacity);

        overlay.operations.extend([
            Operation::new("q", vec![]),
            Operation::new("gs", vec![Object::Name(state.into_bytes())]),
            Operation::new("rg", color_operands(color)),
            Operation::new(
                "re",
                vec![
                    rect.x.into(),
                    rect.y.into(),
                    rect.width.into(),
                    rect.height.into(),
                ],
            ),
            Operation::new("f", vec![]),
            Operation::new("Q", vec![]),
        ]);
        Ok(())
    }

    fn draw_stroked_path(
        &mut self,
        page_index: usize,
        points: &[PagePoint],
        color: Rgb,
        stroke_width: f64,
        line_cap: LineCap,
    ) -> Result<()> {
        self.check_page(page_index)?;
        let Some((first, rest)) = points.split_first() else {
            return Ok(());
        };
        if rest.is_empty() {
            return Ok(());
        }

        let overlay = self.overlay_mut(page_index)?;

        overlay.operations.extend([
            Operation::new("q", vec![]),
            Operation::new("RG", color_operands(color)),
            Operation::new("w", vec![stroke_width.into()]),
            Operation::new("J", vec![line_cap.pdf_style().into()]),
            Operation::new("m", vec![first.x.into(), first.y.into()]),
        ]);
        overlay
            .operations
            .extend(rest.iter().map(|p| Operation::new("l", vec![p.x.into(), p.y.into()])));
        overlay.operations.extend([
            Operation::new("S", vec![]),
            Operation::new("Q", vec![]),
        ]);
        Ok(())
    }
}

impl DocumentHandle for PdfDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_geometry(&self, index: usize) -> Result<PageGeometry> {
        let [x0, y0, x1, y1] = self.check_page(index)?.media_box;
        Ok(PageGeometry::new(x1 - x0, y1 - y0))
    }

    fn serialize(&mut self) -> Result<Vec<u8>> {
        let overlays = std::mem::take(&mut self.overlays);
        for (page_index, overlay) in overlays {
            self.flush_overlay(page_index, overlay)?;
        }

        let mut buffer = Vec::new();
        self.doc
            .save_to(&mut buffer)
            .map_err(|e| DocumentError::Serialize(e.to_string()))?;
        Ok(buffer)
    }
}
