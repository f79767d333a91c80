//! The mutable composition target shared by all builder variants
//!
//! A session owns the output `lopdf::Document`, the currently selected
//! source file and an ordered list of pending pages. Source pages are
//! imported as Form XObjects and stamped onto pending pages via content
//! stream operators; the pages tree, catalog and info dictionary are
//! assembled when the session is flushed.

use crate::constants::{CHAR_WIDTH_RATIO, DEFAULT_PAGE_DIMENSIONS, LINE_HEIGHT_FACTOR};
use crate::options::{Align, CellStyle, ImagePlacement, TextStyle};
use crate::types::{ComposeError, Orientation, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// A source page imported into the output document as a Form XObject.
///
/// Templates carry the intrinsic geometry of the page they were parsed
/// from; stamp them immediately after import.
#[derive(Debug, Clone, Copy)]
pub struct Template {
    pub(crate) xobject: ObjectId,
    pub width: f32,
    pub height: f32,
    pub orientation: Orientation,
}

/// The currently selected source file
struct SourceDocument {
    path: PathBuf,
    doc: Document,
    page_ids: Vec<ObjectId>,
    /// Source object id -> output object id, for resource deep copies
    copies: HashMap<ObjectId, ObjectId>,
}

/// A pending output page, materialized at flush time
struct PageState {
    width: f32,
    height: f32,
    content: String,
    xobjects: Dictionary,
    fonts: Dictionary,
    font_names: HashMap<&'static str, String>,
    template_count: usize,
    image_count: usize,
}

impl PageState {
    fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            content: String::new(),
            xobjects: Dictionary::new(),
            fonts: Dictionary::new(),
            font_names: HashMap::new(),
            template_count: 0,
            image_count: 0,
        }
    }
}

/// Signature objects wired into the page tree at flush time
#[derive(Debug, Clone, Copy)]
pub(crate) struct SignatureRefs {
    pub(crate) field: ObjectId,
    pub(crate) sig: ObjectId,
    pub(crate) certification: bool,
}

pub struct BuilderSession {
    doc: Document,
    pages_id: ObjectId,
    pages: Vec<PageState>,
    source: Option<SourceDocument>,
    style: TextStyle,
    font_ids: HashMap<&'static str, ObjectId>,
    signature: Option<SignatureRefs>,
}

impl BuilderSession {
    pub(crate) fn new() -> Self {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            pages: Vec::new(),
            source: None,
            style: TextStyle::default(),
            font_ids: HashMap::new(),
            signature: None,
        }
    }

    /// Make subsequent imports resolve against `path`. Idempotent on the
    /// same path; switching drops the previous source's copy cache.
    pub(crate) fn select_source(&mut self, path: &Path) -> Result<()> {
        if self
            .source
            .as_ref()
            .is_some_and(|s| s.path.as_path() == path)
        {
            return Ok(());
        }
        if !path.exists() {
            return Err(ComposeError::NotFound(path.to_path_buf()));
        }
        let doc = Document::load(path)?;
        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
        log::debug!("selected source {:?} ({} pages)", path, page_ids.len());
        self.source = Some(SourceDocument {
            path: path.to_path_buf(),
            doc,
            page_ids,
            copies: HashMap::new(),
        });
        Ok(())
    }

    pub(crate) fn source_page_count(&self) -> Result<usize> {
        self.source
            .as_ref()
            .map(|s| s.page_ids.len())
            .ok_or_else(|| ComposeError::InvalidArgument("no source selected".to_string()))
    }

    /// Import page `page` (1-based) of the selected source as a template
    pub(crate) fn import_page(&mut self, page: usize) -> Result<Template> {
        let source = self
            .source
            .as_mut()
            .ok_or_else(|| ComposeError::InvalidArgument("no source selected".to_string()))?;
        let count = source.page_ids.len();
        if page < 1 || page > count {
            return Err(ComposeError::PageRange { page, count });
        }
        let page_id = source.page_ids[page - 1];
        let (width, height) = page_dimensions(&source.doc, page_id)?;
        let xobject = import_page_xobject(&mut self.doc, &source.doc, page_id, &mut source.copies)?;
        Ok(Template {
            xobject,
            width,
            height,
            orientation: Orientation::from_size(width, height),
        })
    }

    /// Append a page of the given geometry; it becomes the current page
    pub(crate) fn new_page(&mut self, orientation: Orientation, width: f32, height: f32) {
        let (width, height) = match orientation {
            Orientation::Portrait if width > height => (height, width),
            Orientation::Landscape if height > width => (height, width),
            _ => (width, height),
        };
        self.pages.push(PageState::new(width, height));
    }

    /// Composite a template onto the current page at origin
    pub(crate) fn stamp(&mut self, template: &Template) -> Result<()> {
        let page = self.pages.last_mut().ok_or(ComposeError::NoCurrentPage)?;
        let name = format!("T{}", page.template_count);
        page.template_count += 1;
        page.xobjects
            .set(name.as_bytes(), Object::Reference(template.xobject));
        let _ = writeln!(page.content, "q 1 0 0 1 0 0 cm /{} Do Q", name);
        Ok(())
    }

    pub(crate) fn set_text_style(&mut self, style: &TextStyle) {
        self.style = style.clone();
    }

    pub(crate) fn set_cursor(&mut self, x: f32, y: f32) {
        self.style.pos = (x, y);
    }

    /// Write a single text run at the cursor
    pub(crate) fn write_text(&mut self, text: &str) -> Result<()> {
        let style = self.style.clone();
        let font = self.ensure_font(&style)?;
        let page = self.pages.last_mut().ok_or(ComposeError::NoCurrentPage)?;
        let (r, g, b) = style.color.normalized();
        let x = style.pos.0;
        // Caller positions are top-left origin; the baseline sits one font
        // size below the given top edge.
        let y = page.height - style.pos.1 - style.size;
        let _ = writeln!(
            page.content,
            "BT /{} {} Tf {} {} {} rg {} {} Td ({}) Tj ET",
            font,
            style.size,
            r,
            g,
            b,
            x,
            y,
            escape_pdf_text(text)
        );
        Ok(())
    }

    /// Write flowed text bounded by `cell.w` x `cell.h` at the cursor
    pub(crate) fn write_multicell(&mut self, text: &str, cell: &CellStyle) -> Result<()> {
        if cell.w <= 0.0 || cell.h <= 0.0 {
            return Err(ComposeError::InvalidArgument(
                "cell dimensions must be positive".to_string(),
            ));
        }
        let style = self.style.clone();
        let font = self.ensure_font(&style)?;
        let page = self.pages.last_mut().ok_or(ComposeError::NoCurrentPage)?;

        let (x, top) = style.pos;
        let y0 = page.height - top;
        let line_height = style.size * LINE_HEIGHT_FACTOR;
        let lines = wrap_text(text, cell.w, style.size);
        let max_lines = ((cell.h / line_height).floor() as usize).max(1);

        if cell.fill {
            let _ = writeln!(
                page.content,
                "q 1 1 1 rg {} {} {} {} re f Q",
                x,
                y0 - cell.h,
                cell.w,
                cell.h
            );
        }
        if cell.border > 0.0 {
            let _ = writeln!(
                page.content,
                "q {} w 0 0 0 RG {} {} {} {} re S Q",
                cell.border,
                x,
                y0 - cell.h,
                cell.w,
                cell.h
            );
        }

        let (r, g, b) = style.color.normalized();
        let _ = writeln!(page.content, "BT /{} {} Tf {} {} {} rg", font, style.size, r, g, b);
        let shown = lines.len().min(max_lines);
        for (idx, line) in lines.iter().take(shown).enumerate() {
            let line_width = text_width(line, style.size);
            let last = idx + 1 == shown;
            let (tx, word_spacing) = match cell.align {
                Align::Left => (x, 0.0),
                Align::Center => (x + (cell.w - line_width).max(0.0) / 2.0, 0.0),
                Align::Right => (x + (cell.w - line_width).max(0.0), 0.0),
                Align::Justify => {
                    let spaces = line.matches(' ').count();
                    if last || spaces == 0 {
                        (x, 0.0)
                    } else {
                        (x, ((cell.w - line_width) / spaces as f32).max(0.0))
                    }
                }
            };
            let ty = y0 - line_height * (idx as f32 + 1.0) + (line_height - style.size) / 2.0;
            let _ = writeln!(
                page.content,
                "{} Tw 1 0 0 1 {} {} Tm ({}) Tj",
                word_spacing,
                tx,
                ty,
                escape_pdf_text(line)
            );
        }
        // Word spacing is text state, not scoped by BT/ET
        page.content.push_str("0 Tw ET\n");
        Ok(())
    }

    /// Composite a raster image onto the current page
    pub(crate) fn place_raster_image(
        &mut self,
        path: &Path,
        placement: &ImagePlacement,
    ) -> Result<()> {
        if self.pages.is_empty() {
            return Err(ComposeError::NoCurrentPage);
        }
        let (w, h) = resolve_image_size(path, placement)?;
        let stream = lopdf::xobject::image(path)?;
        let id = self.doc.add_object(stream);
        // Image XObjects are unit squares; the cm matrix carries the size
        self.place_xobject(id, placement.x, placement.y, w, h, h)
    }

    /// Register an XObject on the current page and emit its placement ops.
    ///
    /// `height_pt` converts the top-left `y_top` into PDF user space;
    /// `scale_x`/`scale_y` are the factors of the `cm` matrix.
    pub(crate) fn place_xobject(
        &mut self,
        id: ObjectId,
        x: f32,
        y_top: f32,
        scale_x: f32,
        scale_y: f32,
        height_pt: f32,
    ) -> Result<()> {
        let page = self.pages.last_mut().ok_or(ComposeError::NoCurrentPage)?;
        let name = format!("I{}", page.image_count);
        page.image_count += 1;
        page.xobjects.set(name.as_bytes(), Object::Reference(id));
        let y = page.height - y_top - height_pt;
        let _ = writeln!(
            page.content,
            "q {} 0 0 {} {} {} cm /{} Do Q",
            scale_x, scale_y, x, y, name
        );
        Ok(())
    }

    pub(crate) fn add_stream(&mut self, dict: Dictionary, content: Vec<u8>) -> ObjectId {
        self.doc.add_object(Stream::new(dict, content))
    }

    pub(crate) fn doc_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub(crate) fn set_signature(&mut self, refs: SignatureRefs) {
        self.signature = Some(refs);
    }

    /// Flush to disk
    pub(crate) fn write_to(&mut self, path: &Path) -> Result<()> {
        let bytes = self.render()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Materialize the pending pages and serialize the document
    pub(crate) fn render(&mut self) -> Result<Vec<u8>> {
        let pages: Vec<PageState> = self.pages.drain(..).collect();
        let mut kids = Vec::with_capacity(pages.len());
        let mut page_ids = Vec::with_capacity(pages.len());

        for page in pages {
            let content_id = self
                .doc
                .add_object(Stream::new(Dictionary::new(), page.content.into_bytes()));

            let mut resources = Dictionary::new();
            if !page.xobjects.is_empty() {
                resources.set("XObject", Object::Dictionary(page.xobjects));
            }
            if !page.fonts.is_empty() {
                resources.set("Font", Object::Dictionary(page.fonts));
            }

            let mut page_dict = Dictionary::new();
            page_dict.set("Type", Object::Name(b"Page".to_vec()));
            page_dict.set("Parent", Object::Reference(self.pages_id));
            page_dict.set(
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(page.width),
                    Object::Real(page.height),
                ]),
            );
            page_dict.set("Contents", Object::Reference(content_id));
            page_dict.set("Resources", Object::Dictionary(resources));

            let page_id = self.doc.add_object(page_dict);
            page_ids.push(page_id);
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        let pages_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(kids)),
            ("Count", Object::Integer(count)),
        ]);
        self.doc
            .objects
            .insert(self.pages_id, Object::Dictionary(pages_dict));

        let mut catalog = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(self.pages_id)),
        ]);

        if let Some(sig) = self.signature {
            self.wire_signature(sig, &page_ids, &mut catalog)?;
        }

        let catalog_id = self.doc.add_object(catalog);
        self.doc.trailer.set("Root", catalog_id);

        let date = chrono::Utc::now().format("D:%Y%m%d%H%M%SZ").to_string();
        let info_id = self.doc.add_object(Dictionary::from_iter(vec![
            ("Producer", Object::string_literal("pdf-compose")),
            ("CreationDate", Object::string_literal(date.clone())),
            ("ModDate", Object::string_literal(date)),
        ]));
        self.doc.trailer.set("Info", info_id);

        self.doc.compress();
        let mut buffer = Vec::new();
        self.doc.save_to(&mut buffer)?;
        Ok(buffer)
    }

    /// Attach the signature field to the first page and the catalog
    fn wire_signature(
        &mut self,
        sig: SignatureRefs,
        page_ids: &[ObjectId],
        catalog: &mut Dictionary,
    ) -> Result<()> {
        let first = *page_ids
            .first()
            .ok_or(ComposeError::NoCurrentPage)?;
        if let Object::Dictionary(page_dict) = self.doc.get_object_mut(first)? {
            page_dict.set("Annots", Object::Array(vec![Object::Reference(sig.field)]));
        }
        if let Object::Dictionary(field_dict) = self.doc.get_object_mut(sig.field)? {
            field_dict.set("P", Object::Reference(first));
        }
        let mut acroform = Dictionary::new();
        acroform.set("Fields", Object::Array(vec![Object::Reference(sig.field)]));
        acroform.set("SigFlags", Object::Integer(3));
        catalog.set("AcroForm", Object::Dictionary(acroform));
        if sig.certification {
            let mut perms = Dictionary::new();
            perms.set("DocMDP", Object::Reference(sig.sig));
            catalog.set("Perms", Object::Dictionary(perms));
        }
        Ok(())
    }

    /// Register the base-14 font for `style` on the current page and
    /// return its resource name
    fn ensure_font(&mut self, style: &TextStyle) -> Result<String> {
        let base = base_font(style);
        let font_id = match self.font_ids.get(base) {
            Some(&id) => id,
            None => {
                let mut dict = Dictionary::new();
                dict.set("Type", Object::Name(b"Font".to_vec()));
                dict.set("Subtype", Object::Name(b"Type1".to_vec()));
                dict.set("BaseFont", Object::Name(base.as_bytes().to_vec()));
                dict.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
                let id = self.doc.add_object(dict);
                self.font_ids.insert(base, id);
                id
            }
        };
        let page = self.pages.last_mut().ok_or(ComposeError::NoCurrentPage)?;
        if let Some(name) = page.font_names.get(base) {
            return Ok(name.clone());
        }
        let name = format!("F{}", page.font_names.len() + 1);
        page.fonts.set(name.as_bytes(), Object::Reference(font_id));
        page.font_names.insert(base, name.clone());
        Ok(name)
    }
}

/// Map a family/style pair onto a base-14 font name
fn base_font(style: &TextStyle) -> &'static str {
    let bold = style.style.contains('B');
    let italic = style.style.contains('I');
    match style.font.as_str() {
        "serif" | "times" => match (bold, italic) {
            (false, false) => "Times-Roman",
            (true, false) => "Times-Bold",
            (false, true) => "Times-Italic",
            (true, true) => "Times-BoldItalic",
        },
        "monospace" | "courier" => match (bold, italic) {
            (false, false) => "Courier",
            (true, false) => "Courier-Bold",
            (false, true) => "Courier-Oblique",
            (true, true) => "Courier-BoldOblique",
        },
        _ => match (bold, italic) {
            (false, false) => "Helvetica",
            (true, false) => "Helvetica-Bold",
            (false, true) => "Helvetica-Oblique",
            (true, true) => "Helvetica-BoldOblique",
        },
    }
}

/// Estimate the rendered width of a text run
pub(crate) fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * CHAR_WIDTH_RATIO
}

/// Word wrap `text` to fit within `max_width` points.
///
/// Explicit newlines start new lines; words wider than the cell are broken
/// at character boundaries.
pub(crate) fn wrap_text(text: &str, max_width: f32, size: f32) -> Vec<String> {
    let space_width = text_width(" ", size);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_width: f32 = 0.0;

        for word in paragraph.split_whitespace() {
            let word_width = text_width(word, size);

            if word_width > max_width {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0.0;
                }
                for c in word.chars() {
                    let char_width = text_width("x", size);
                    if current_width + char_width > max_width && !current.is_empty() {
                        lines.push(std::mem::take(&mut current));
                        current_width = 0.0;
                    }
                    current.push(c);
                    current_width += char_width;
                }
                continue;
            }

            if current.is_empty() {
                current = word.to_string();
                current_width = word_width;
            } else if current_width + space_width + word_width <= max_width {
                current.push(' ');
                current.push_str(word);
                current_width += space_width + word_width;
            } else {
                lines.push(std::mem::take(&mut current));
                current = word.to_string();
                current_width = word_width;
            }
        }

        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Escape special characters for a PDF literal string
pub(crate) fn escape_pdf_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 4);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

/// Resolve the final placement size of a raster image
fn resolve_image_size(path: &Path, placement: &ImagePlacement) -> Result<(f32, f32)> {
    if placement.w > 0.0 && placement.h > 0.0 {
        return Ok((placement.w, placement.h));
    }
    let (px_w, px_h) = image::image_dimensions(path).map_err(|e| {
        ComposeError::InvalidArgument(format!("cannot read image {}: {}", path.display(), e))
    })?;
    let (iw, ih) = (px_w as f32, px_h as f32);
    Ok(match (placement.w > 0.0, placement.h > 0.0) {
        (true, false) => (placement.w, placement.w * ih / iw),
        (false, true) => (placement.h * iw / ih, placement.h),
        _ => (iw, ih),
    })
}

// =============================================================================
// Page import
// =============================================================================

/// Create a Form XObject in `output` from a page of `source`.
///
/// Resources are deep-copied through `copies` so shared objects are copied
/// once per source.
fn import_page_xobject(
    output: &mut Document,
    source: &Document,
    page_id: ObjectId,
    copies: &mut HashMap<ObjectId, ObjectId>,
) -> Result<ObjectId> {
    let page_dict = source.get_dictionary(page_id)?;

    let media_box = page_dict
        .get(b"MediaBox")
        .and_then(|obj| obj.as_array())
        .ok()
        .cloned()
        .unwrap_or_else(default_media_box);

    let content_data = page_content(source, page_dict)?;

    let mut xobject_dict = Dictionary::new();
    xobject_dict.set("Type", Object::Name(b"XObject".to_vec()));
    xobject_dict.set("Subtype", Object::Name(b"Form".to_vec()));
    xobject_dict.set("BBox", Object::Array(media_box));
    xobject_dict.set("FormType", Object::Integer(1));

    if let Ok(resources) = page_dict.get(b"Resources") {
        xobject_dict.set("Resources", copy_object(output, source, resources, copies)?);
    }

    Ok(output.add_object(Stream::new(xobject_dict, content_data)))
}

fn default_media_box() -> Vec<Object> {
    vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Real(DEFAULT_PAGE_DIMENSIONS.0),
        Object::Real(DEFAULT_PAGE_DIMENSIONS.1),
    ]
}

/// Concatenated, decompressed content stream data of a page
fn page_content(doc: &Document, page_dict: &Dictionary) -> Result<Vec<u8>> {
    let contents = match page_dict.get(b"Contents") {
        Ok(c) => c,
        Err(_) => return Ok(Vec::new()),
    };

    match contents {
        Object::Reference(id) => single_content_stream(doc, *id),
        Object::Array(refs) => {
            let mut result = Vec::new();
            for obj in refs {
                if let Object::Reference(id) = obj {
                    result.extend_from_slice(&single_content_stream(doc, *id)?);
                    result.push(b'\n');
                }
            }
            Ok(result)
        }
        _ => Ok(Vec::new()),
    }
}

fn single_content_stream(doc: &Document, id: ObjectId) -> Result<Vec<u8>> {
    if let Ok(stream) = doc.get_object(id)?.as_stream() {
        Ok(stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone()))
    } else {
        Ok(Vec::new())
    }
}

/// Deep copy an object from `source` into `output`, following references
fn copy_object(
    output: &mut Document,
    source: &Document,
    obj: &Object,
    copies: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Object> {
    match obj {
        Object::Reference(id) => {
            if let Some(&new_id) = copies.get(id) {
                return Ok(Object::Reference(new_id));
            }
            let referenced = source.get_object(*id)?;
            let copied = copy_object(output, source, referenced, copies)?;
            let new_id = output.add_object(copied);
            copies.insert(*id, new_id);
            Ok(Object::Reference(new_id))
        }
        Object::Dictionary(dict) => {
            let mut new_dict = Dictionary::new();
            for (key, value) in dict.iter() {
                new_dict.set(key.clone(), copy_object(output, source, value, copies)?);
            }
            Ok(Object::Dictionary(new_dict))
        }
        Object::Array(arr) => {
            let new_arr: Result<Vec<_>> = arr
                .iter()
                .map(|item| copy_object(output, source, item, copies))
                .collect();
            Ok(Object::Array(new_arr?))
        }
        Object::Stream(stream) => {
            let mut new_dict = Dictionary::new();
            for (key, value) in stream.dict.iter() {
                new_dict.set(key.clone(), copy_object(output, source, value, copies)?);
            }
            Ok(Object::Stream(Stream {
                dict: new_dict,
                content: stream.content.clone(),
                allows_compression: stream.allows_compression,
                start_position: None,
            }))
        }
        _ => Ok(obj.clone()),
    }
}

/// Source page dimensions (width, height) in points
fn page_dimensions(doc: &Document, page_id: ObjectId) -> Result<(f32, f32)> {
    let page_dict = doc.get_dictionary(page_id)?;

    if let Ok(mb) = page_dict.get(b"MediaBox").and_then(|obj| obj.as_array()) {
        if mb.len() == 4 {
            let x0 = extract_number(&mb[0]).unwrap_or(0.0);
            let y0 = extract_number(&mb[1]).unwrap_or(0.0);
            let x1 = extract_number(&mb[2]).unwrap_or(DEFAULT_PAGE_DIMENSIONS.0);
            let y1 = extract_number(&mb[3]).unwrap_or(DEFAULT_PAGE_DIMENSIONS.1);
            return Ok((x1 - x0, y1 - y0));
        }
    }
    Ok(DEFAULT_PAGE_DIMENSIONS)
}

fn extract_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_preserves_words() {
        let lines = wrap_text("Hello world this is a test", 100.0, 12.0);
        assert!(lines.len() >= 2, "text should wrap into multiple lines");
        assert_eq!(lines.join(" "), "Hello world this is a test");
    }

    #[test]
    fn wrap_empty_text() {
        let lines = wrap_text("", 200.0, 12.0);
        assert_eq!(lines, vec![String::new()]);
    }

    #[test]
    fn wrap_breaks_long_words() {
        let lines = wrap_text("Superlongword", 24.0, 12.0);
        assert!(lines.len() >= 2, "long word should be broken across lines");
        assert_eq!(lines.concat(), "Superlongword");
    }

    #[test]
    fn wrap_honors_newlines() {
        let lines = wrap_text("one\ntwo", 500.0, 12.0);
        assert_eq!(lines, vec!["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn escapes_pdf_strings() {
        assert_eq!(escape_pdf_text("Hello"), "Hello");
        assert_eq!(escape_pdf_text("Hello (World)"), "Hello \\(World\\)");
        assert_eq!(escape_pdf_text("a\\b"), "a\\\\b");
        assert_eq!(escape_pdf_text("Line1\nLine2"), "Line1\\nLine2");
    }

    #[test]
    fn base_fonts_cover_families_and_styles() {
        let style = TextStyle::default();
        assert_eq!(base_font(&style), "Helvetica");
        assert_eq!(base_font(&style.clone().with_style("B")), "Helvetica-Bold");
        let serif = TextStyle::default().with_font("serif");
        assert_eq!(base_font(&serif), "Times-Roman");
        assert_eq!(
            base_font(&serif.with_style("BI")),
            "Times-BoldItalic"
        );
        let mono = TextStyle::default().with_font("monospace").with_style("I");
        assert_eq!(base_font(&mono), "Courier-Oblique");
    }

    #[test]
    fn orientation_swaps_mismatched_geometry() {
        let mut session = BuilderSession::new();
        session.new_page(Orientation::Landscape, 612.0, 792.0);
        let page = session.pages.last().unwrap();
        assert_eq!((page.width, page.height), (792.0, 612.0));
    }
}
