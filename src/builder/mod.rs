//! Builder variants behind a capability interface
//!
//! The composition drivers hold a `dyn DocumentBuilder`. The standard
//! builder covers templates, text and raster images; the vector-capable
//! builder additionally renders SVG images and can apply a signature
//! envelope. The factory picks the concrete builder per operation, by file
//! extension for image drawing.

mod session;
mod standard;
mod vector;

pub use session::Template;
pub use standard::StandardBuilder;
pub use vector::VectorBuilder;

pub(crate) use session::{BuilderSession, SignatureRefs};

use crate::options::{CellStyle, ImagePlacement, SignatureOptions, TextStyle};
use crate::types::{ComposeError, Orientation, Result};
use std::path::Path;

/// The builder capability interface.
///
/// All state lives in the shared [`BuilderSession`]; concrete builders
/// override the operations they support beyond the common core.
pub trait DocumentBuilder {
    fn session(&mut self) -> &mut BuilderSession;
    fn session_ref(&self) -> &BuilderSession;

    fn supports_vector_images(&self) -> bool {
        false
    }

    fn supports_signature(&self) -> bool {
        false
    }

    /// Make subsequent imports resolve against `path`
    fn select_source(&mut self, path: &Path) -> Result<()> {
        self.session().select_source(path)
    }

    /// Page count of the currently selected source
    fn source_page_count(&self) -> Result<usize> {
        self.session_ref().source_page_count()
    }

    /// Import a page of the selected source as a template
    fn import_page(&mut self, page: usize) -> Result<Template> {
        self.session().import_page(page)
    }

    /// Append a page of the given geometry; it becomes the current page
    fn new_page(&mut self, orientation: Orientation, width: f32, height: f32) {
        self.session().new_page(orientation, width, height);
    }

    /// Composite a template onto the current page at origin
    fn stamp(&mut self, template: &Template) -> Result<()> {
        self.session().stamp(template)
    }

    fn set_text_style(&mut self, style: &TextStyle) {
        self.session().set_text_style(style);
    }

    fn set_cursor(&mut self, x: f32, y: f32) {
        self.session().set_cursor(x, y);
    }

    fn write_text(&mut self, text: &str) -> Result<()> {
        self.session().write_text(text)
    }

    fn write_multicell(&mut self, text: &str, cell: &CellStyle) -> Result<()> {
        self.session().write_multicell(text, cell)
    }

    fn place_raster_image(&mut self, path: &Path, placement: &ImagePlacement) -> Result<()> {
        self.session().place_raster_image(path, placement)
    }

    fn place_vector_image(&mut self, _path: &Path, _placement: &ImagePlacement) -> Result<()> {
        Err(ComposeError::Unsupported("vector images"))
    }

    fn apply_signature(&mut self, _options: &SignatureOptions) -> Result<()> {
        Err(ComposeError::Unsupported("signatures"))
    }

    /// Flush the composed document to `path`
    fn write_to(&mut self, path: &Path) -> Result<()> {
        self.session().write_to(path)
    }
}

/// Factory for the concrete builder variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderKind {
    Standard,
    Vector,
}

impl BuilderKind {
    /// Pick the builder required to draw `path`: `.svg` (case-insensitive)
    /// needs the vector-capable builder
    pub fn for_image(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => BuilderKind::Vector,
            _ => BuilderKind::Standard,
        }
    }

    pub fn create(self) -> Box<dyn DocumentBuilder> {
        match self {
            BuilderKind::Standard => Box::new(StandardBuilder::new()),
            BuilderKind::Vector => Box::new(VectorBuilder::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn picks_vector_builder_for_svg() {
        assert_eq!(
            BuilderKind::for_image(&PathBuf::from("logo.svg")),
            BuilderKind::Vector
        );
        assert_eq!(
            BuilderKind::for_image(&PathBuf::from("LOGO.SVG")),
            BuilderKind::Vector
        );
        assert_eq!(
            BuilderKind::for_image(&PathBuf::from("photo.png")),
            BuilderKind::Standard
        );
        assert_eq!(
            BuilderKind::for_image(&PathBuf::from("no_extension")),
            BuilderKind::Standard
        );
    }

    #[test]
    fn capabilities_follow_the_variant() {
        let standard = BuilderKind::Standard.create();
        assert!(!standard.supports_vector_images());
        assert!(!standard.supports_signature());

        let vector = BuilderKind::Vector.create();
        assert!(vector.supports_vector_images());
        assert!(vector.supports_signature());
    }
}
