//! Page identifiers and the deferred navigation slot.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Identifier a page is registered under. Unique per [`crate::PageManager`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageId(pub u16);

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for PageId {
    fn from(id: u16) -> Self {
        Self(id)
    }
}

/// Handle for requesting a page switch from inside a touch handler.
///
/// Holds a single pending slot shared with the [`crate::PageManager`] that
/// created it. The slot is drained once per tick, after the touch dispatch
/// pass has returned. A second request before the drain replaces the first.
#[derive(Clone, Debug, Default)]
pub struct Navigator {
    pending: Rc<Cell<Option<PageId>>>,
}

impl Navigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for `id` to become the active page at the end of this tick.
    /// The id is checked against the registry when the slot is drained.
    pub fn request(&self, id: PageId) {
        if let Some(previous) = self.pending.replace(Some(id))
            && previous != id
        {
            log::debug!("Navigation request for page {id} replaces pending page {previous}");
        } else {
            log::debug!("Deferred navigation to page {id}");
        }
    }

    /// Page waiting to be shown, if any.
    #[must_use]
    pub fn pending(&self) -> Option<PageId> {
        self.pending.get()
    }

    /// Drop the pending request without applying it.
    pub fn cancel(&self) {
        self.pending.set(None);
    }

    pub(crate) fn take(&self) -> Option<PageId> {
        self.pending.take()
    }
}
