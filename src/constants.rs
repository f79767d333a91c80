//! Shared constants for page composition

/// Default page width in points (US Letter)
pub(crate) const DEFAULT_PAGE_WIDTH_PT: f32 = 612.0;

/// Default page height in points (US Letter)
pub(crate) const DEFAULT_PAGE_HEIGHT_PT: f32 = 792.0;

/// Default page dimensions as tuple (width, height)
pub(crate) const DEFAULT_PAGE_DIMENSIONS: (f32, f32) =
    (DEFAULT_PAGE_WIDTH_PT, DEFAULT_PAGE_HEIGHT_PT);

/// Approximate character width ratio for the base-14 fonts
pub(crate) const CHAR_WIDTH_RATIO: f32 = 0.5;

/// Line height as a multiple of font size
pub(crate) const LINE_HEIGHT_FACTOR: f32 = 1.25;
