//! The vector-capable builder: everything the standard builder does, plus
//! SVG image rendering and the signature envelope
//!
//! SVG files are parsed with `usvg` and converted into a Form XObject of
//! PDF path operators. Solid fills and strokes are honored; gradients,
//! patterns, clip paths, embedded rasters and text nodes are skipped.

use super::session::BuilderSession;
use super::DocumentBuilder;
use crate::options::{ImagePlacement, SignatureOptions};
use crate::signature;
use crate::types::{ComposeError, Result};
use lopdf::{Dictionary, Object};
use std::fmt::Write as _;
use std::path::Path;
use usvg::tiny_skia_path::PathSegment;

pub struct VectorBuilder {
    session: BuilderSession,
    signature: Option<SignatureOptions>,
}

impl VectorBuilder {
    pub fn new() -> Self {
        Self {
            session: BuilderSession::new(),
            signature: None,
        }
    }
}

impl Default for VectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentBuilder for VectorBuilder {
    fn session(&mut self) -> &mut BuilderSession {
        &mut self.session
    }

    fn session_ref(&self) -> &BuilderSession {
        &self.session
    }

    fn supports_vector_images(&self) -> bool {
        true
    }

    fn supports_signature(&self) -> bool {
        true
    }

    fn place_vector_image(&mut self, path: &Path, placement: &ImagePlacement) -> Result<()> {
        let data = std::fs::read(path)?;
        let tree = usvg::Tree::from_data(&data, &usvg::Options::default()).map_err(|e| {
            ComposeError::InvalidArgument(format!("cannot parse SVG {}: {e}", path.display()))
        })?;
        let svg_w = tree.size().width();
        let svg_h = tree.size().height();

        let mut ops = String::new();
        render_group(tree.root(), svg_h, &mut ops);

        let mut dict = Dictionary::new();
        dict.set("Type", Object::Name(b"XObject".to_vec()));
        dict.set("Subtype", Object::Name(b"Form".to_vec()));
        dict.set("FormType", Object::Integer(1));
        dict.set(
            "BBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(svg_w),
                Object::Real(svg_h),
            ]),
        );
        let id = self.session.add_stream(dict, ops.into_bytes());

        let (w, h) = match (placement.w > 0.0, placement.h > 0.0) {
            (true, true) => (placement.w, placement.h),
            (true, false) => (placement.w, placement.w * svg_h / svg_w),
            (false, true) => (placement.h * svg_w / svg_h, placement.h),
            (false, false) => (svg_w, svg_h),
        };
        self.session
            .place_xobject(id, placement.x, placement.y, w / svg_w, h / svg_h, h)
    }

    fn apply_signature(&mut self, options: &SignatureOptions) -> Result<()> {
        self.signature = Some(options.clone());
        Ok(())
    }

    fn write_to(&mut self, path: &Path) -> Result<()> {
        match self.signature.take() {
            None => self.session.write_to(path),
            Some(options) => {
                let refs = signature::prepare(self.session.doc_mut(), &options)?;
                self.session.set_signature(refs);
                let bytes = self.session.render()?;
                let signed = signature::finalize(bytes, &options)?;
                std::fs::write(path, signed)?;
                Ok(())
            }
        }
    }
}

// =============================================================================
// SVG tree conversion
// =============================================================================

fn render_group(group: &usvg::Group, svg_height: f32, ops: &mut String) {
    for node in group.children() {
        match node {
            usvg::Node::Group(g) => render_group(g, svg_height, ops),
            usvg::Node::Path(p) => render_path(p, svg_height, ops),
            // Embedded rasters and text nodes are not rendered
            usvg::Node::Image(_) | usvg::Node::Text(_) => {}
        }
    }
}

fn render_path(path: &usvg::Path, svg_height: f32, ops: &mut String) {
    let transform = path.abs_transform();
    // SVG is y-down, PDF user space is y-up
    let map = |x: f32, y: f32| -> (f32, f32) {
        let tx = transform.sx * x + transform.kx * y + transform.tx;
        let ty = transform.ky * x + transform.sy * y + transform.ty;
        (tx, svg_height - ty)
    };

    let mut segments = String::new();
    let mut current = (0.0f32, 0.0f32);
    let mut subpath_start = current;
    for segment in path.data().segments() {
        match segment {
            PathSegment::MoveTo(p) => {
                let (x, y) = map(p.x, p.y);
                let _ = writeln!(segments, "{} {} m", x, y);
                current = (p.x, p.y);
                subpath_start = current;
            }
            PathSegment::LineTo(p) => {
                let (x, y) = map(p.x, p.y);
                let _ = writeln!(segments, "{} {} l", x, y);
                current = (p.x, p.y);
            }
            PathSegment::QuadTo(q, p) => {
                // Promote the quadratic to an equivalent cubic
                let c1 = (
                    current.0 + 2.0 / 3.0 * (q.x - current.0),
                    current.1 + 2.0 / 3.0 * (q.y - current.1),
                );
                let c2 = (
                    p.x + 2.0 / 3.0 * (q.x - p.x),
                    p.y + 2.0 / 3.0 * (q.y - p.y),
                );
                let (x1, y1) = map(c1.0, c1.1);
                let (x2, y2) = map(c2.0, c2.1);
                let (x, y) = map(p.x, p.y);
                let _ = writeln!(segments, "{} {} {} {} {} {} c", x1, y1, x2, y2, x, y);
                current = (p.x, p.y);
            }
            PathSegment::CubicTo(p1, p2, p) => {
                let (x1, y1) = map(p1.x, p1.y);
                let (x2, y2) = map(p2.x, p2.y);
                let (x, y) = map(p.x, p.y);
                let _ = writeln!(segments, "{} {} {} {} {} {} c", x1, y1, x2, y2, x, y);
                current = (p.x, p.y);
            }
            PathSegment::Close => {
                segments.push_str("h\n");
                current = subpath_start;
            }
        }
    }

    let fill = path
        .fill()
        .and_then(|f| solid_color(f.paint()).map(|c| (c, f.rule())));
    let stroke = path
        .stroke()
        .and_then(|s| solid_color(s.paint()).map(|c| (c, s.width().get())));
    if fill.is_none() && stroke.is_none() {
        return;
    }

    ops.push_str("q\n");
    if let Some(((r, g, b), _)) = fill {
        let _ = writeln!(ops, "{} {} {} rg", r, g, b);
    }
    if let Some(((r, g, b), width)) = stroke {
        let _ = writeln!(ops, "{} {} {} RG", r, g, b);
        let _ = writeln!(ops, "{} w", width);
    }
    ops.push_str(&segments);
    let even_odd = matches!(fill, Some((_, usvg::FillRule::EvenOdd)));
    let paint_op = match (fill.is_some(), stroke.is_some()) {
        (true, true) => {
            if even_odd {
                "B*"
            } else {
                "B"
            }
        }
        (true, false) => {
            if even_odd {
                "f*"
            } else {
                "f"
            }
        }
        (false, true) => "S",
        (false, false) => "n",
    };
    let _ = writeln!(ops, "{}", paint_op);
    ops.push_str("Q\n");
}

/// Solid paint components scaled to 0.0-1.0; gradients and patterns yield
/// `None` and the path is skipped
fn solid_color(paint: &usvg::Paint) -> Option<(f32, f32, f32)> {
    match paint {
        usvg::Paint::Color(c) => Some((
            c.red as f32 / 255.0,
            c.green as f32 / 255.0,
            c.blue as f32 / 255.0,
        )),
        _ => None,
    }
}
