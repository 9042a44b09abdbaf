//! Document store abstraction
//!
//! The annotation pipeline and the toolbox operations talk to documents
//! through the traits in this module.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │        annotations::annotate pipeline        │
//! └──────────────────────────────────────────────┘
//!                        │ DocumentStore / DocumentHandle / PageCanvas
//!           ┌────────────┴────────────┐
//!           ▼                         ▼
//!   ┌──────────────┐          ┌──────────────┐
//!   │   PdfStore   │          │ test fakes   │
//!   │   (lopdf)    │          │ (recording)  │
//!   └──────────────┘          └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use paperdesk_server::document::{DocumentHandle, DocumentStore, PdfStore};
//!
//! let mut doc = PdfStore.load(&bytes)?;
//! let size = doc.page_geometry(0)?;
//! let out = doc.serialize()?;
//! ```

mod error;
pub(crate) mod objects;
mod pdf;
mod traits;
mod types;

pub use error::{DocumentError, Result};
pub use pdf::{PdfDocument, PdfStore};
pub use traits::{DocumentHandle, DocumentStore, PageCanvas};
pub use types::{
    DocumentInfo, LineCap, PageGeometry, PagePoint, PageRect, Rgb, FALLBACK_PAGE_SIZE,
};
