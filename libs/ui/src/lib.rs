//! Touchscreen UI engine for the handset controller.
//!
//! A flat widget registry routes touch samples and runs redraw passes, a
//! page manager switches between pages with a build-once lifecycle, and a
//! chrome layout draws the header and footer around whichever page is
//! active. Navigation requested from inside a touch handler is deferred
//! until the dispatch pass has returned.

pub mod chrome;
pub mod error;
pub mod fonts;
pub mod input;
pub mod manager;
pub mod navigation;
pub mod page_manager;
pub mod pages;
pub mod status;
pub mod test_utils;
pub mod theme;
pub mod widget;
pub mod widgets;

// Re-export commonly used types
pub use chrome::{ChromeLayout, ChromeSettings};
pub use error::{UiError, UiResult};
pub use input::{JoystickPosition, TouchEvent, TouchPhase, TouchSample, TouchSource};
pub use manager::UiManager;
pub use navigation::{Navigator, PageId};
pub use page_manager::PageManager;
pub use pages::{BackButton, Page, PageCore, PageRef};
pub use status::{PowerSnapshot, PowerStatus};
pub use widget::{Color, Element, Surface, WeakWidget, Widget, WidgetRef, WidgetState};
