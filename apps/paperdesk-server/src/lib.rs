//! Paperdesk Server Library
//!
//! A self-hosted PDF toolbox. The main server binary is in main.rs.
//!
//! # Modules
//!
//! - `annotations`: Burn editor highlights and freehand strokes into a PDF
//! - `document`: Document store abstraction and the lopdf implementation
//! - `tools`: Merge, split, compress, decrypt and inspect
//! - `routes`: HTTP endpoints

pub mod annotations;
pub mod config;
pub mod document;
pub mod error;
pub mod routes;
pub mod state;
pub mod tools;

pub use routes::app;
