//! Page emitter policy over the builder interface

use crate::builder::DocumentBuilder;
use crate::types::Result;
use std::path::Path;

/// Import page `page` of `source`, append a page of matching geometry and
/// stamp the template onto it.
///
/// Selecting the source here is idempotent, so callers that already
/// selected it pay nothing.
pub(crate) fn emit_page(
    builder: &mut dyn DocumentBuilder,
    source: &Path,
    page: usize,
) -> Result<()> {
    builder.select_source(source)?;
    let template = builder.import_page(page)?;
    builder.new_page(template.orientation, template.width, template.height);
    builder.stamp(&template)
}

/// Stamp page `page` of `source` onto the current page without creating a
/// new one
pub(crate) fn apply_overlay(
    builder: &mut dyn DocumentBuilder,
    source: &Path,
    page: usize,
) -> Result<()> {
    builder.select_source(source)?;
    let template = builder.import_page(page)?;
    builder.stamp(&template)
}

/// Splice every page of `secondary` into the output, then re-select
/// `primary`
pub(crate) fn splice(
    builder: &mut dyn DocumentBuilder,
    secondary: &Path,
    primary: &Path,
) -> Result<()> {
    builder.select_source(secondary)?;
    let count = builder.source_page_count()?;
    for page in 1..=count {
        emit_page(builder, secondary, page)?;
    }
    builder.select_source(primary)
}
