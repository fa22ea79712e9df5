//! Page navigator: page registry, navigation and the per-tick entry points.
//!
//! The manager owns the widget registry and the chrome layout. Pages are
//! owned by the host; the manager keeps weak handles in insertion order,
//! which is also the order `next_page`/`previous_page` walk through.

use crate::chrome::{ChromeLayout, ChromeSettings};
use crate::error::{UiError, UiResult};
use crate::input::JoystickPosition;
use crate::manager::UiManager;
use crate::navigation::{Navigator, PageId};
use crate::pages::{Page, PageRef, ensure_built};
use crate::status::PowerStatus;
use crate::theme;
use crate::widget::Surface;
use embedded_graphics::primitives::Rectangle;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

struct PageEntry<D: Surface> {
    id: PageId,
    page: Weak<RefCell<dyn Page<D>>>,
}

pub struct PageManager<D: Surface> {
    ui: UiManager<D>,
    settings: ChromeSettings,
    chrome: Option<ChromeLayout>,
    pages: Vec<PageEntry<D>>,
    current: Option<usize>,
    navigator: Navigator,
}

impl<D: Surface> PageManager<D> {
    #[must_use]
    pub fn new(ui: UiManager<D>, settings: ChromeSettings) -> Self {
        Self {
            ui,
            settings,
            chrome: None,
            pages: Vec::new(),
            current: None,
            navigator: Navigator::new(),
        }
    }

    /// Build the chrome layout. Calling it again replaces the chrome
    /// widgets with fresh ones.
    pub fn init(&mut self, power: Option<Rc<dyn PowerStatus>>) -> UiResult<()> {
        let Some(power) = power else {
            log::error!("PageManager: init without a power status source");
            return Err(UiError::MissingCollaborator("power status"));
        };

        if let Some(old) = self.chrome.take() {
            log::warn!("PageManager: already initialized, rebuilding chrome");
            old.release(&mut self.ui);
        }

        let chrome = ChromeLayout::new(
            &mut self.ui,
            self.settings.clone(),
            power,
            self.navigator.clone(),
        );

        if let Some(page) = self.current_page()
            && let Ok(page) = page.try_borrow()
        {
            chrome.refresh(page.core());
        }

        self.chrome = Some(chrome);
        log::info!("PageManager initialized");
        Ok(())
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.chrome.is_some()
    }

    /// Register `page` under `id` and bind the content area into it.
    pub fn add_page(&mut self, page: PageRef<D>, id: PageId) -> UiResult<()> {
        if self.index_of(id).is_some() {
            log::warn!("PageManager: page id {id} is already registered");
            return Err(UiError::DuplicatePage(id));
        }
        let Ok(mut borrowed) = page.try_borrow_mut() else {
            return Err(UiError::PageBusy(id));
        };
        borrowed
            .core_mut()
            .bind_content_area(self.settings.content_area());
        log::debug!("PageManager: added page '{}' as {id}", borrowed.name());
        drop(borrowed);

        self.pages.push(PageEntry {
            id,
            page: Rc::downgrade(&page),
        });
        Ok(())
    }

    /// Hide the current page and show page `id`, building it first if it
    /// has never been shown. On error nothing changes.
    ///
    /// Needs `&mut self`, so it cannot run from inside a touch handler;
    /// handlers use [`Navigator::request`] instead.
    pub fn show_page(&mut self, id: PageId) -> UiResult<()> {
        let Some(chrome) = self.chrome.as_ref() else {
            log::warn!("PageManager: show_page({id}) before init");
            return Err(UiError::NotInitialized);
        };
        let Some(index) = self.index_of(id) else {
            log::warn!("PageManager: no page with id {id}");
            return Err(UiError::UnknownPage(id));
        };
        let target = self.pages[index]
            .page
            .upgrade()
            .ok_or(UiError::PageDropped(id))?;
        let mut target = target.try_borrow_mut().map_err(|_| UiError::PageBusy(id))?;

        ensure_built(&mut *target, &mut self.ui)?;

        if let Some(current) = self.current
            && current != index
            && let Some(old) = self.pages[current].page.upgrade()
        {
            match old.try_borrow_mut() {
                Ok(mut old) => {
                    old.core_mut().hide();
                    old.on_hide();
                }
                Err(_) => log::warn!("PageManager: current page is busy, cannot hide it"),
            }
        }

        target.core_mut().show(&mut self.ui, chrome);
        target.on_show();
        self.current = Some(index);
        log::info!("Showing page '{}' ({id})", target.name());
        Ok(())
    }

    /// Queue a switch to page `id` for the end of the next touch dispatch.
    /// Replaces any earlier pending request.
    pub fn show_page_deferred(&mut self, id: PageId) -> UiResult<()> {
        if self.index_of(id).is_none() {
            log::warn!("PageManager: deferred request for unknown page {id}");
            return Err(UiError::UnknownPage(id));
        }
        self.navigator.request(id);
        Ok(())
    }

    pub fn show_page_by_index(&mut self, index: usize) -> UiResult<()> {
        let id = self
            .pages
            .get(index)
            .map(|entry| entry.id)
            .ok_or(UiError::IndexOutOfRange(index))?;
        self.show_page(id)
    }

    /// Show the page after the current one, wrapping to the first.
    pub fn next_page(&mut self) -> UiResult<()> {
        if self.pages.is_empty() {
            return Ok(());
        }
        let next = self.current.map_or(0, |i| (i + 1) % self.pages.len());
        self.show_page_by_index(next)
    }

    /// Show the page before the current one, wrapping to the last.
    pub fn previous_page(&mut self) -> UiResult<()> {
        let len = self.pages.len();
        if len == 0 {
            return Ok(());
        }
        let previous = self.current.map_or(len - 1, |i| (i + len - 1) % len);
        self.show_page_by_index(previous)
    }

    /// One tick: touch dispatch, then any pending navigation, then the
    /// visible page's update and the chrome status poll.
    pub fn update(&mut self) {
        if self.chrome.is_none() {
            return;
        }

        self.ui.dispatch_touch();

        if let Some(id) = self.navigator.take() {
            if self.index_of(id).is_none() {
                log::warn!("PageManager: dropping deferred request for unknown page {id}");
            } else if let Err(err) = self.show_page(id) {
                log::warn!("PageManager: deferred navigation to {id} failed: {err}");
            }
        }

        if let Some(page) = self.current_page()
            && let Ok(mut page) = page.try_borrow_mut()
            && page.is_visible()
        {
            page.update();
        }

        if let Some(chrome) = self.chrome.as_ref() {
            chrome.refresh_status();
        }
    }

    /// Dirty-only redraw of chrome and content.
    pub fn draw(&mut self, display: &mut D) -> Result<(), D::Error> {
        if self.chrome.is_none() {
            return Ok(());
        }
        self.ui.redraw_dirty(display)
    }

    /// Clear the screen and redraw every visible widget.
    pub fn draw_full(&mut self, display: &mut D) -> Result<(), D::Error> {
        if self.chrome.is_none() {
            return Ok(());
        }
        self.ui.clear_screen(theme::CONTENT_BACKGROUND);
        self.ui.redraw_all(display)
    }

    /// Forward a joystick sample to every registered page.
    pub fn update_joystick(&mut self, position: JoystickPosition) {
        for entry in &self.pages {
            if let Some(page) = entry.page.upgrade()
                && let Ok(mut page) = page.try_borrow_mut()
            {
                page.handle_joystick(position);
            }
        }
    }

    /// Footer status text. Ignored before init.
    pub fn set_status(&mut self, text: &str) {
        if let Some(chrome) = self.chrome.as_ref() {
            chrome.set_status(text);
        }
    }

    #[must_use]
    pub fn current_page(&self) -> Option<PageRef<D>> {
        self.current
            .and_then(|index| self.pages.get(index))
            .and_then(|entry| entry.page.upgrade())
    }

    #[must_use]
    pub fn current_page_id(&self) -> Option<PageId> {
        self.current
            .and_then(|index| self.pages.get(index))
            .map(|entry| entry.id)
    }

    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    #[must_use]
    pub fn page(&self, id: PageId) -> Option<PageRef<D>> {
        self.index_of(id)
            .and_then(|index| self.pages[index].page.upgrade())
    }

    /// Registered ids in navigation order.
    #[must_use]
    pub fn page_ids(&self) -> Vec<PageId> {
        self.pages.iter().map(|entry| entry.id).collect()
    }

    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Registered page waiting to be shown at the next tick. A request for
    /// an id that is not registered is never reported and is dropped at
    /// the drain.
    #[must_use]
    pub fn pending_page(&self) -> Option<PageId> {
        self.navigator
            .pending()
            .filter(|&id| self.index_of(id).is_some())
    }

    /// Handle for requesting navigation from widget callbacks.
    #[must_use]
    pub fn navigator(&self) -> Navigator {
        self.navigator.clone()
    }

    #[must_use]
    pub fn content_area(&self) -> Rectangle {
        self.settings.content_area()
    }

    #[must_use]
    pub fn chrome(&self) -> Option<&ChromeLayout> {
        self.chrome.as_ref()
    }

    #[must_use]
    pub fn ui(&self) -> &UiManager<D> {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut UiManager<D> {
        &mut self.ui
    }

    fn index_of(&self, id: PageId) -> Option<usize> {
        self.pages.iter().position(|entry| entry.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FixedPower, RecordingDisplay, TestPage};

    type Manager = PageManager<RecordingDisplay>;

    fn manager() -> Manager {
        let mut pm = PageManager::new(UiManager::without_touch(), ChromeSettings::default());
        pm.init(Some(Rc::new(FixedPower::new(80, false)))).unwrap();
        pm
    }

    #[test]
    fn update_and_draw_before_init_do_nothing() {
        let mut pm: Manager =
            PageManager::new(UiManager::without_touch(), ChromeSettings::default());
        pm.update();
        let mut display = RecordingDisplay::default();
        pm.draw(&mut display).unwrap();
        assert_eq!(display.pixels, 0);
        assert!(display.fills.is_empty());
    }

    #[test]
    fn reinit_replaces_chrome_widgets() {
        let mut pm = manager();
        let before = pm.ui().len();
        pm.init(Some(Rc::new(FixedPower::new(10, true)))).unwrap();
        assert_eq!(pm.ui().len(), before);
    }

    #[test]
    fn show_page_binds_chrome_title_and_back_target() {
        let mut pm = manager();
        let home = Rc::new(RefCell::new(TestPage::new("Home")));
        let info = Rc::new(RefCell::new(
            TestPage::new("Info").with_back_button(PageId(0)),
        ));
        pm.add_page(home.clone(), PageId(0)).unwrap();
        pm.add_page(info.clone(), PageId(4)).unwrap();

        pm.show_page(PageId(4)).unwrap();
        let chrome = pm.chrome().unwrap();
        assert_eq!(chrome.title(), "Info");
        assert_eq!(chrome.back_target(), Some(PageId(0)));

        pm.show_page(PageId(0)).unwrap();
        assert_eq!(pm.chrome().unwrap().back_target(), None);
    }

    #[test]
    fn show_page_queues_content_clear() {
        let mut pm = manager();
        let home = Rc::new(RefCell::new(TestPage::new("Home")));
        pm.add_page(home.clone(), PageId(0)).unwrap();
        let mut display = RecordingDisplay::default();
        pm.draw(&mut display).unwrap();
        display.fills.clear();

        pm.show_page(PageId(0)).unwrap();
        pm.draw(&mut display).unwrap();
        assert_eq!(
            display.fills.first(),
            Some(&(pm.content_area(), theme::CONTENT_BACKGROUND))
        );
    }

    #[test]
    fn draw_full_clears_screen_first() {
        let mut pm = manager();
        let mut display = RecordingDisplay::default();
        pm.draw_full(&mut display).unwrap();
        assert_eq!(display.clears, vec![theme::CONTENT_BACKGROUND]);
    }

    #[test]
    fn joystick_reaches_every_page() {
        let mut pm = manager();
        let a = Rc::new(RefCell::new(TestPage::new("A")));
        let b = Rc::new(RefCell::new(TestPage::new("B")));
        pm.add_page(a.clone(), PageId(0)).unwrap();
        pm.add_page(b.clone(), PageId(1)).unwrap();
        pm.update_joystick(JoystickPosition::new(20, -30));
        assert_eq!(a.borrow().joystick, vec![JoystickPosition::new(20, -30)]);
        assert_eq!(b.borrow().joystick, vec![JoystickPosition::new(20, -30)]);
    }

    #[test]
    fn status_text_goes_to_the_footer() {
        let mut pm = manager();
        pm.set_status("Link up");
        assert_eq!(pm.chrome().unwrap().status(), "Link up");
    }

    #[test]
    fn dropped_page_cannot_be_shown() {
        let mut pm = manager();
        {
            let gone = Rc::new(RefCell::new(TestPage::new("Gone")));
            pm.add_page(gone.clone(), PageId(3)).unwrap();
        }
        assert_eq!(pm.show_page(PageId(3)), Err(UiError::PageDropped(PageId(3))));
        assert_eq!(pm.current_page_id(), None);
    }
}
