use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("page {page} out of range 1..={count}")]
    PageRange { page: usize, count: usize },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("text extraction failed: {0}")]
    ExternalTool(String),
    #[error("signing failed: {0}")]
    Signature(String),
    #[error("no page to draw on")]
    NoCurrentPage,
    #[error("not supported by this builder: {0}")]
    Unsupported(&'static str),
}

pub type Result<T> = std::result::Result<T, ComposeError>;

/// Page orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Portrait: height >= width
    #[default]
    Portrait,
    /// Landscape: width > height
    Landscape,
}

impl Orientation {
    /// Derive the orientation from a page size in points
    pub fn from_size(width: f32, height: f32) -> Self {
        if width > height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }
}

/// An axis-aligned rectangle in points, top-left origin
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.x < 0.0 || self.y < 0.0 || self.w < 0.0 || self.h < 0.0 {
            return Err(ComposeError::InvalidArgument(format!(
                "rectangle has negative components: {:?}",
                self
            )));
        }
        Ok(())
    }
}

/// An RGB color with 0-255 components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Components scaled to the 0.0-1.0 range used by PDF color operators
    pub(crate) fn normalized(self) -> (f32, f32, f32) {
        (
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        )
    }
}
