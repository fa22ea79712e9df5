//! Page trait and the lifecycle state every page embeds.
//!
//! A page goes Unbuilt -> Hidden -> Visible and back to Hidden, never to
//! Unbuilt again. [`Page::build`] runs once, right before the first show,
//! and creates the page's content widgets through
//! [`PageCore::add_content_element`]. The [`crate::PageManager`] drives every
//! transition.

use crate::chrome::{ChromeLayout, ChromeSettings, contains_rect};
use crate::error::{UiError, UiResult};
use crate::input::JoystickPosition;
use crate::manager::UiManager;
use crate::navigation::PageId;
use crate::theme;
use crate::widget::{Color, Surface, WidgetRef};
use embedded_graphics::primitives::Rectangle;
use std::cell::RefCell;
use std::rc::Rc;

/// Owning handle to a page, held by the host.
pub type PageRef<D> = Rc<RefCell<dyn Page<D>>>;

/// Back button configuration. Rendered and handled by the chrome.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BackButton {
    pub enabled: bool,
    pub target: Option<PageId>,
}

/// A full screen of content below the header and above the footer.
pub trait Page<D: Surface> {
    fn core(&self) -> &PageCore<D>;

    fn core_mut(&mut self) -> &mut PageCore<D>;

    /// Create the content widgets. Called at most once, before the first
    /// show, with the page already marked as built.
    fn build(&mut self, ui: &mut UiManager<D>) -> UiResult<()>;

    /// Per-tick hook, only called while the page is visible.
    fn update(&mut self) {}

    /// Called after the page became visible.
    fn on_show(&mut self) {}

    /// Called after the page was hidden.
    fn on_hide(&mut self) {}

    /// Joystick sample forwarded by [`crate::PageManager::update_joystick`].
    fn handle_joystick(&mut self, _position: JoystickPosition) {}

    fn name(&self) -> &str {
        self.core().name()
    }

    fn is_visible(&self) -> bool {
        self.core().is_visible()
    }
}

pub struct PageCore<D: Surface> {
    name: String,
    visible: bool,
    built: bool,
    content_area: Rectangle,
    background: Color,
    back: BackButton,
    content: Vec<WidgetRef<D>>,
}

impl<D: Surface> PageCore<D> {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            visible: false,
            built: false,
            content_area: ChromeSettings::default().content_area(),
            background: theme::CONTENT_BACKGROUND,
            back: BackButton::default(),
            content: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn is_built(&self) -> bool {
        self.built
    }

    #[must_use]
    pub fn content_area(&self) -> Rectangle {
        self.content_area
    }

    #[must_use]
    pub fn back_button(&self) -> BackButton {
        self.back
    }

    /// Store the back button intent. Takes effect the next time the page
    /// is shown.
    pub fn set_back_button(&mut self, enabled: bool, target: Option<PageId>) {
        self.back = BackButton { enabled, target };
    }

    #[must_use]
    pub fn content(&self) -> &[WidgetRef<D>] {
        &self.content
    }

    /// Take ownership of `widget` and register it with `ui`.
    ///
    /// Only valid once the page is built, and only for widgets inside the
    /// content area. The widget inherits the page's visibility.
    pub fn add_content_element(
        &mut self,
        ui: &mut UiManager<D>,
        widget: WidgetRef<D>,
    ) -> UiResult<()> {
        if !self.built {
            return Err(UiError::NotBuilt(self.name.clone()));
        }
        let bounds = widget.borrow().bounds();
        if !contains_rect(&self.content_area, &bounds) {
            log::warn!(
                "Page '{}': widget at {:?} is outside the content area {:?}",
                self.name,
                bounds,
                self.content_area
            );
            return Err(UiError::OutsideContentArea {
                page: self.name.clone(),
                bounds,
            });
        }
        widget.borrow_mut().set_visible(self.visible);
        ui.add(widget.clone());
        self.content.push(widget);
        Ok(())
    }

    /// Deregister and drop every content widget.
    pub fn release(&mut self, ui: &mut UiManager<D>) {
        for widget in self.content.drain(..) {
            ui.remove(&widget);
        }
    }

    pub(crate) fn bind_content_area(&mut self, area: Rectangle) {
        self.content_area = area;
    }

    pub(crate) fn mark_built(&mut self) {
        self.built = true;
    }

    pub(crate) fn show(&mut self, ui: &mut UiManager<D>, chrome: &ChromeLayout) {
        ui.fill_area(self.content_area, self.background);
        chrome.refresh(self);
        for widget in &self.content {
            let mut widget = widget.borrow_mut();
            widget.set_visible(true);
            widget.set_needs_redraw(true);
        }
        self.visible = true;
    }

    pub(crate) fn hide(&mut self) {
        self.visible = false;
        for widget in &self.content {
            widget.borrow_mut().set_visible(false);
        }
    }
}

/// Run `build` if the page has never been built.
pub(crate) fn ensure_built<D: Surface, P: Page<D> + ?Sized>(
    page: &mut P,
    ui: &mut UiManager<D>,
) -> UiResult<()> {
    if page.core().is_built() {
        return Ok(());
    }
    log::debug!("Building page '{}'", page.name());
    page.core_mut().mark_built();
    page.build(ui)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ProbeWidget, RecordingDisplay};
    use crate::widget::Element;
    use embedded_graphics::prelude::{Point, Size};

    type Core = PageCore<RecordingDisplay>;

    fn probe_at(x: i32, y: i32) -> Rc<RefCell<ProbeWidget>> {
        Rc::new(RefCell::new(ProbeWidget::new(Rectangle::new(
            Point::new(x, y),
            Size::new(20, 20),
        ))))
    }

    #[test]
    fn adding_content_before_build_fails() {
        let mut ui = UiManager::without_touch();
        let mut core = Core::new("Home");
        let result = core.add_content_element(&mut ui, probe_at(10, 50));
        assert_eq!(result, Err(UiError::NotBuilt("Home".into())));
        assert!(ui.is_empty());
    }

    #[test]
    fn content_outside_the_area_is_rejected() {
        let mut ui = UiManager::without_touch();
        let mut core = Core::new("Home");
        core.mark_built();
        let header_widget = probe_at(10, 10);
        let result = core.add_content_element(&mut ui, header_widget.clone());
        assert!(matches!(result, Err(UiError::OutsideContentArea { .. })));
        assert!(ui.is_empty());
        assert!(core.content().is_empty());
    }

    #[test]
    fn content_inherits_hidden_state() {
        let mut ui = UiManager::without_touch();
        let mut core = Core::new("Home");
        core.mark_built();
        let w = probe_at(10, 50);
        core.add_content_element(&mut ui, w.clone()).unwrap();
        assert!(!w.borrow().is_visible());
        assert_eq!(ui.len(), 1);
        assert_eq!(core.content().len(), 1);
    }

    #[test]
    fn hide_propagates_to_content() {
        let mut ui = UiManager::without_touch();
        let mut core = Core::new("Home");
        core.mark_built();
        core.visible = true;
        let w = probe_at(10, 50);
        core.add_content_element(&mut ui, w.clone()).unwrap();
        assert!(w.borrow().is_visible());
        core.hide();
        assert!(!core.is_visible());
        assert!(!w.borrow().is_visible());
    }

    #[test]
    fn release_deregisters_and_drops_content() {
        let mut ui = UiManager::without_touch();
        let mut core = Core::new("Home");
        core.mark_built();
        let w = probe_at(10, 50);
        core.add_content_element(&mut ui, w.clone()).unwrap();
        core.release(&mut ui);
        assert!(ui.is_empty());
        assert_eq!(Rc::strong_count(&w), 1);
    }

    #[test]
    fn back_button_is_stored() {
        let mut core = Core::new("Remote");
        core.set_back_button(true, Some(PageId(0)));
        assert_eq!(
            core.back_button(),
            BackButton {
                enabled: true,
                target: Some(PageId(0)),
            }
        );
    }
}
