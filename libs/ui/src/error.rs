use crate::navigation::PageId;
use embedded_graphics::primitives::Rectangle;
use thiserror::Error;

/// Recoverable failures reported by the page engine. None of them leave
/// the engine in a partially updated state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UiError {
    #[error("Missing collaborator: {0}")]
    MissingCollaborator(&'static str),
    #[error("Page id {0} is already registered")]
    DuplicatePage(PageId),
    #[error("No page registered with id {0}")]
    UnknownPage(PageId),
    #[error("Page {0} was dropped while still registered")]
    PageDropped(PageId),
    #[error("Page {0} is already borrowed")]
    PageBusy(PageId),
    #[error("Page index {0} is out of range")]
    IndexOutOfRange(usize),
    #[error("Page manager is not initialized")]
    NotInitialized,
    #[error("Page '{0}' has not been built yet")]
    NotBuilt(String),
    #[error("Widget at {bounds:?} lies outside the content area of page '{page}'")]
    OutsideContentArea { page: String, bounds: Rectangle },
}

pub type UiResult<T> = Result<T, UiError>;
