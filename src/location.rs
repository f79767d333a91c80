//! The selector language that decides on which source pages an action fires
//!
//! At the API boundary a location is a signed integer: positive values name
//! a 1-based page, negative values are sentinel rules. Internally the value
//! is parsed into a tagged [`Location`] so the traversal code never touches
//! raw integers.

use crate::types::{ComposeError, Result};

/// Raw sentinel: act after the last page / on the last page
pub(crate) const AT_THE_END: i64 = -1;
/// Raw sentinel: act after every page / on every page
pub(crate) const AFTER_EACH_PAGE: i64 = -2;
/// Raw sentinel: act after odd pages / on odd pages
pub(crate) const AFTER_ODD_PAGES: i64 = -3;
/// Raw sentinel: act after even pages / on even pages
pub(crate) const AFTER_EVEN_PAGES: i64 = -4;

/// A parsed location selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// A specific 1-based page number
    AtPage(usize),
    /// The last page (insertion: after it; overlay: on it)
    AtEnd,
    /// Every page
    EachPage,
    /// Every odd page
    OddPages,
    /// Every even page
    EvenPages,
}

/// Which operation family is consulting the selector.
///
/// Insertion splices pages and always copies the current page; overlay adds
/// content to the page being emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorFamily {
    Insertion,
    Overlay,
}

/// The actions to take for one traversal step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageActions {
    /// Splice the secondary document before emitting this page
    pub insert_before: bool,
    /// Splice the secondary document after emitting this page
    pub insert_after: bool,
    /// Draw/stamp on this page
    pub overlay: bool,
    /// Emit the page without overlaying
    pub emit_plain: bool,
}

impl Location {
    /// Parse the integer boundary form.
    ///
    /// Positive values become [`Location::AtPage`]; recognized negative
    /// sentinels map to their variants; anything else is rejected.
    pub fn from_raw(raw: i64) -> Result<Self> {
        match raw {
            n if n >= 1 => Ok(Location::AtPage(n as usize)),
            AT_THE_END => Ok(Location::AtEnd),
            AFTER_EACH_PAGE => Ok(Location::EachPage),
            AFTER_ODD_PAGES => Ok(Location::OddPages),
            AFTER_EVEN_PAGES => Ok(Location::EvenPages),
            other => Err(ComposeError::InvalidArgument(format!(
                "unrecognized location selector {other}"
            ))),
        }
    }

    /// Check a page-number selector against the source page count
    pub fn validate_page(&self, count: usize) -> Result<()> {
        if let Location::AtPage(page) = *self {
            if page < 1 || page > count {
                return Err(ComposeError::PageRange { page, count });
            }
        }
        Ok(())
    }

    /// Evaluate the selector for traversal step `page` of `count`.
    ///
    /// A page-number selector is matched first and the sentinel branches are
    /// not consulted for that page. In the insertion family the page itself
    /// is always copied; in the overlay family `emit_plain` is the
    /// complement of `overlay`.
    pub fn actions(&self, family: SelectorFamily, page: usize, count: usize) -> PageActions {
        let matched = match *self {
            // The specific page number takes precedence; sentinel branches
            // are not consulted for this page.
            Location::AtPage(n) => {
                return match family {
                    SelectorFamily::Insertion => PageActions {
                        insert_before: n == page,
                        emit_plain: true,
                        ..PageActions::default()
                    },
                    SelectorFamily::Overlay => PageActions {
                        overlay: n == page,
                        emit_plain: n != page,
                        ..PageActions::default()
                    },
                };
            }
            Location::AtEnd => page == count,
            Location::EachPage => true,
            Location::OddPages => page % 2 == 1,
            Location::EvenPages => page % 2 == 0,
        };

        match family {
            SelectorFamily::Insertion => PageActions {
                insert_after: matched,
                emit_plain: true,
                ..PageActions::default()
            },
            SelectorFamily::Overlay => PageActions {
                overlay: matched,
                emit_plain: !matched,
                ..PageActions::default()
            },
        }
    }
}
