//! Typed configuration records for the drawing and signing operations

use crate::types::{Color, ComposeError, Rect, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[cfg(feature = "serde")]
use std::path::Path;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Horizontal alignment of flowed multi-cell text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Align {
    Left,
    Center,
    Right,
    /// Stretch word spacing so every full line spans the cell width
    #[default]
    Justify,
}

impl Align {
    /// Parse the single-letter flag form (`L`, `C`, `R`, `J`)
    pub fn from_flag(flag: &str) -> Result<Self> {
        match flag {
            "L" => Ok(Align::Left),
            "C" => Ok(Align::Center),
            "R" => Ok(Align::Right),
            "J" => Ok(Align::Justify),
            other => Err(ComposeError::InvalidArgument(format!(
                "unknown alignment flag {other:?}"
            ))),
        }
    }
}

/// Style for positioned text runs
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TextStyle {
    /// Font family: `sans-serif`, `serif` or `monospace` (base-14 fonts)
    pub font: String,
    /// Style flags: empty, `B`, `I` or `BI`
    pub style: String,
    pub color: Color,
    /// Font size in points
    pub size: f32,
    /// Position of the text, top-left origin, in page points
    pub pos: (f32, f32),
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font: "sans-serif".to_string(),
            style: String::new(),
            color: Color::BLACK,
            size: 12.0,
            pos: (0.0, 0.0),
        }
    }
}

impl TextStyle {
    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = font.into();
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_pos(mut self, x: f32, y: f32) -> Self {
        self.pos = (x, y);
        self
    }

    /// Load a style from a JSON file
    #[cfg(feature = "serde")]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ComposeError::InvalidArgument(format!("failed to parse style: {e}")))
    }

    /// Save a style to a JSON file
    #[cfg(feature = "serde")]
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ComposeError::InvalidArgument(format!("failed to serialize style: {e}")))?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Bounds and decoration of a flowed multi-cell text block
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CellStyle {
    /// Cell width in points
    pub w: f32,
    /// Cell height in points; lines that would overflow are dropped
    pub h: f32,
    /// Border line width in points, 0 for no border
    pub border: f32,
    pub align: Align,
    /// Paint a white background behind the cell
    pub fill: bool,
}

impl Default for CellStyle {
    fn default() -> Self {
        Self {
            w: 0.0,
            h: 0.0,
            border: 0.0,
            align: Align::Justify,
            fill: false,
        }
    }
}

impl CellStyle {
    pub fn new(w: f32, h: f32) -> Self {
        Self {
            w,
            h,
            ..Self::default()
        }
    }

    pub fn with_border(mut self, border: f32) -> Self {
        self.border = border;
        self
    }

    pub fn with_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn with_fill(mut self, fill: bool) -> Self {
        self.fill = fill;
        self
    }
}

/// Placement of an image on a page, top-left origin.
///
/// Zero width/height resolve from the image's intrinsic pixel size at
/// 72 dpi; when exactly one of them is zero it is derived proportionally.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ImagePlacement {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl ImagePlacement {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }
}

/// A rectangular region of a rendered page to extract text from
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TextRegion {
    /// Crop rectangle in points at `dpi`
    pub rect: Rect,
    /// 1-based page number
    pub page: usize,
    /// Rendering resolution
    pub dpi: u32,
}

impl Default for TextRegion {
    fn default() -> Self {
        Self {
            rect: Rect::default(),
            page: 1,
            dpi: 72,
        }
    }
}

impl TextRegion {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            ..Self::default()
        }
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }
}

/// Credentials and metadata for the signing operation.
///
/// Certificate and key are paths to PEM or DER encoded files; the optional
/// extra-certs bundle is appended to the embedded chain.
#[derive(Clone)]
pub struct SignatureOptions {
    pub certificate: PathBuf,
    pub private_key: PathBuf,
    /// Password for an encrypted private key; empty for unencrypted keys
    pub password: String,
    pub extra_certs: Option<PathBuf>,
    /// DocMDP permission level for certification signatures (1-3)
    pub cert_type: i32,
    /// Free-form entries copied into the signature dictionary
    /// (`Name`, `Location`, `Reason`, `ContactInfo`)
    pub info: BTreeMap<String, String>,
    /// An approval signature leaves out the DocMDP certification reference
    pub approval: bool,
}

impl SignatureOptions {
    pub fn new(certificate: impl Into<PathBuf>, private_key: impl Into<PathBuf>) -> Self {
        Self {
            certificate: certificate.into(),
            private_key: private_key.into(),
            password: String::new(),
            extra_certs: None,
            cert_type: 2,
            info: BTreeMap::new(),
            approval: false,
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    pub fn with_extra_certs(mut self, path: impl Into<PathBuf>) -> Self {
        self.extra_certs = Some(path.into());
        self
    }

    pub fn with_cert_type(mut self, cert_type: i32) -> Self {
        self.cert_type = cert_type;
        self
    }

    pub fn with_info(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.info.insert(key.into(), value.into());
        self
    }

    pub fn with_approval(mut self, approval: bool) -> Self {
        self.approval = approval;
        self
    }
}

impl std::fmt::Debug for SignatureOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureOptions")
            .field("certificate", &self.certificate)
            .field("private_key", &self.private_key)
            .field("password", &"[REDACTED]")
            .field("extra_certs", &self.extra_certs)
            .field("cert_type", &self.cert_type)
            .field("info", &self.info)
            .field("approval", &self.approval)
            .finish()
    }
}
