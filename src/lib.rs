//! Rule-driven page composition for existing PDF documents
//!
//! This crate walks a source document page by page and, for each page,
//! decides whether to copy it, splice in all pages of a second document,
//! stamp another document's first page underneath it as a background, or
//! draw content (text, flowed multi-cell text, images) on top of it.
//! Where an action fires is controlled by a location selector: a 1-based
//! page number or one of the sentinel rules (last page, each page, odd
//! pages, even pages).
//!
//! Parsing and serializing the PDF object model is delegated to `lopdf`;
//! rectangular text extraction is delegated to a `pdftotext` binary on the
//! PATH.

mod builder;
mod constants;
mod document;
mod emitter;
mod extract;
mod location;
mod options;
mod signature;
mod types;

pub use builder::{BuilderKind, DocumentBuilder, StandardBuilder, Template, VectorBuilder};
pub use document::Document;
pub use location::{Location, PageActions, SelectorFamily};
pub use options::*;
pub use types::*;
