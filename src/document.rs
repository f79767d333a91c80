//! The public document handle and its composition drivers
//!
//! Every driver follows the same skeleton: create a builder, select the
//! primary source, read its page count, traverse the pages consulting the
//! selector for each one, then flush to the output path. An empty output
//! path means "overwrite the original input file".

use crate::builder::{BuilderKind, DocumentBuilder, StandardBuilder};
use crate::emitter::{apply_overlay, emit_page, splice};
use crate::extract;
use crate::location::{Location, SelectorFamily};
use crate::options::{CellStyle, ImagePlacement, SignatureOptions, TextStyle, TextRegion};
use crate::types::{ComposeError, Result};
use std::path::{Path, PathBuf};

/// A handle to a PDF file on disk.
///
/// The handle itself is read-only; every operation writes a new document
/// to its output path.
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
}

impl Document {
    /// Insert after the last page
    pub const AT_THE_END: i64 = -1;
    /// Act on the last page
    pub const ON_LAST_PAGE: i64 = -1;
    /// Insert after every page
    pub const AFTER_EACH_PAGE: i64 = -2;
    /// Act on every page
    pub const ON_EACH_PAGE: i64 = -2;
    /// Insert after every odd page
    pub const AFTER_ODD_PAGES: i64 = -3;
    /// Act on every odd page
    pub const ON_ODD_PAGES: i64 = -3;
    /// Insert after every even page
    pub const AFTER_EVEN_PAGES: i64 = -4;
    /// Act on every even page
    pub const ON_EVEN_PAGES: i64 = -4;

    /// Open a document; fails when `path` does not exist
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ComposeError::NotFound(path.to_path_buf()));
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of pages in the document
    pub fn page_count(&self) -> Result<usize> {
        let mut builder = StandardBuilder::new();
        builder.select_source(&self.path)?;
        builder.source_page_count()
    }

    /// Extract the text inside a rectangular region of a rendered page.
    ///
    /// Requires a `pdftotext` binary on the PATH. A successful run that
    /// finds no text returns an empty string.
    pub fn extract_text(&self, region: &TextRegion) -> Result<String> {
        extract::extract_text(&self.path, region)
    }

    /// Copy pages `first..=last` into a new document at `out`
    pub fn extract_page_range(
        &self,
        first: usize,
        last: usize,
        out: impl AsRef<Path>,
    ) -> Result<()> {
        let mut builder = BuilderKind::Standard.create();
        builder.select_source(&self.path)?;
        let count = builder.source_page_count()?;
        if last < first {
            return Err(ComposeError::InvalidArgument(format!(
                "invalid page range {first}..{last}"
            )));
        }
        if first < 1 || first > count {
            return Err(ComposeError::PageRange { page: first, count });
        }
        if last > count {
            return Err(ComposeError::PageRange { page: last, count });
        }
        log::debug!("extracting pages {first}..={last} of {:?}", self.path);
        for page in first..=last {
            emit_page(&mut *builder, &self.path, page)?;
        }
        builder.write_to(&self.resolve_output(out))
    }

    /// Copy the listed pages, in order and with duplicates preserved, into
    /// a new document at `out`
    pub fn extract_page_list(&self, list: &[usize], out: impl AsRef<Path>) -> Result<()> {
        let mut builder = BuilderKind::Standard.create();
        builder.select_source(&self.path)?;
        log::debug!("extracting {} pages of {:?}", list.len(), self.path);
        for &page in list {
            emit_page(&mut *builder, &self.path, page)?;
        }
        builder.write_to(&self.resolve_output(out))
    }

    /// Splice every page of `file_to_insert` into this document at the
    /// point selected by `location`
    pub fn insert_pages(
        &self,
        file_to_insert: impl AsRef<Path>,
        location: i64,
        out: impl AsRef<Path>,
    ) -> Result<()> {
        let secondary = file_to_insert.as_ref();
        let location = Location::from_raw(location)?;
        let mut builder = BuilderKind::Standard.create();
        builder.select_source(&self.path)?;
        let count = builder.source_page_count()?;
        location.validate_page(count)?;
        log::debug!(
            "inserting {:?} into {:?} at {:?}",
            secondary,
            self.path,
            location
        );
        for page in 1..=count {
            let actions = location.actions(SelectorFamily::Insertion, page, count);
            if actions.insert_before {
                splice(&mut *builder, secondary, &self.path)?;
            }
            emit_page(&mut *builder, &self.path, page)?;
            if actions.insert_after {
                splice(&mut *builder, secondary, &self.path)?;
            }
        }
        builder.write_to(&self.resolve_output(out))
    }

    /// Stamp the first page of `background_pdf` underneath the selected
    /// pages.
    ///
    /// Pages with a background take the background's geometry, not the
    /// primary's.
    pub fn add_background(
        &self,
        background_pdf: impl AsRef<Path>,
        location: i64,
        out: impl AsRef<Path>,
    ) -> Result<()> {
        let background = background_pdf.as_ref();
        let location = Location::from_raw(location)?;
        let mut builder = BuilderKind::Standard.create();
        builder.select_source(&self.path)?;
        let count = builder.source_page_count()?;
        location.validate_page(count)?;
        for page in 1..=count {
            let actions = location.actions(SelectorFamily::Overlay, page, count);
            if actions.overlay {
                log::debug!("page {page}: background geometry from {:?}", background);
                emit_page(&mut *builder, background, 1)?;
                apply_overlay(&mut *builder, &self.path, page)?;
            } else {
                emit_page(&mut *builder, &self.path, page)?;
            }
        }
        builder.write_to(&self.resolve_output(out))
    }

    /// Write a single text run on the selected pages
    pub fn write_text(
        &self,
        text: &str,
        style: &TextStyle,
        location: i64,
        out: impl AsRef<Path>,
    ) -> Result<()> {
        let location = Location::from_raw(location)?;
        let mut builder = BuilderKind::Standard.create();
        builder.select_source(&self.path)?;
        let count = builder.source_page_count()?;
        location.validate_page(count)?;
        for page in 1..=count {
            emit_page(&mut *builder, &self.path, page)?;
            if location
                .actions(SelectorFamily::Overlay, page, count)
                .overlay
            {
                builder.set_text_style(style);
                builder.write_text(text)?;
            }
        }
        builder.write_to(&self.resolve_output(out))
    }

    /// Write flowed multi-cell text on the selected pages
    pub fn write_multicell_text(
        &self,
        text: &str,
        style: &TextStyle,
        cell: &CellStyle,
        location: i64,
        out: impl AsRef<Path>,
    ) -> Result<()> {
        let location = Location::from_raw(location)?;
        let mut builder = BuilderKind::Standard.create();
        builder.select_source(&self.path)?;
        let count = builder.source_page_count()?;
        location.validate_page(count)?;
        for page in 1..=count {
            emit_page(&mut *builder, &self.path, page)?;
            if location
                .actions(SelectorFamily::Overlay, page, count)
                .overlay
            {
                builder.set_text_style(style);
                builder.write_multicell(text, cell)?;
            }
        }
        builder.write_to(&self.resolve_output(out))
    }

    /// Draw a raster or vector image on the selected pages.
    ///
    /// The builder variant is chosen up front by file extension: `.svg`
    /// (case-insensitive) selects the vector-capable builder.
    pub fn draw_image(
        &self,
        image_path: impl AsRef<Path>,
        placement: &ImagePlacement,
        location: i64,
        out: impl AsRef<Path>,
    ) -> Result<()> {
        let image = image_path.as_ref();
        if !image.exists() {
            return Err(ComposeError::NotFound(image.to_path_buf()));
        }
        let location = Location::from_raw(location)?;
        let kind = BuilderKind::for_image(image);
        let mut builder = kind.create();
        builder.select_source(&self.path)?;
        let count = builder.source_page_count()?;
        location.validate_page(count)?;
        for page in 1..=count {
            emit_page(&mut *builder, &self.path, page)?;
            if location
                .actions(SelectorFamily::Overlay, page, count)
                .overlay
            {
                match kind {
                    BuilderKind::Vector => builder.place_vector_image(image, placement)?,
                    BuilderKind::Standard => builder.place_raster_image(image, placement)?,
                }
            }
        }
        builder.write_to(&self.resolve_output(out))
    }

    /// Copy all pages and apply a digital signature envelope
    pub fn sign(&self, options: &SignatureOptions, out: impl AsRef<Path>) -> Result<()> {
        let mut builder = BuilderKind::Vector.create();
        builder.select_source(&self.path)?;
        let count = builder.source_page_count()?;
        log::debug!("signing {} pages of {:?}", count, self.path);
        for page in 1..=count {
            emit_page(&mut *builder, &self.path, page)?;
        }
        builder.apply_signature(options)?;
        builder.write_to(&self.resolve_output(out))
    }

    /// The empty path means "overwrite the original input file"
    fn resolve_output(&self, out: impl AsRef<Path>) -> PathBuf {
        let out = out.as_ref();
        if out.as_os_str().is_empty() {
            self.path.clone()
        } else {
            out.to_path_buf()
        }
    }
}
