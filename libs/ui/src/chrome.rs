//! Header and footer drawn around every page.
//!
//! The chrome owns its widgets and registers them once, at
//! [`crate::PageManager::init`]. Pages never touch the header or footer
//! bands; they get the content area in between.

use crate::fonts::FontSize;
use crate::manager::UiManager;
use crate::navigation::{Navigator, PageId};
use crate::pages::PageCore;
use crate::status::PowerStatus;
use crate::theme;
use crate::widget::{Element, Surface};
use crate::widgets::{BatteryIcon, Button, Label, Panel};
use embedded_graphics::{
    prelude::{Point, Size},
    primitives::Rectangle,
    text::Alignment,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub const SCREEN_WIDTH: u32 = 480;
pub const SCREEN_HEIGHT: u32 = 320;
pub const HEADER_HEIGHT: u32 = 40;
pub const FOOTER_HEIGHT: u32 = 40;

const BACK_BUTTON_SIZE: Size = Size::new(40, 32);
const BATTERY_WIDTH: u32 = 110;
const MARGIN: i32 = 4;

/// Screen geometry and fixed footer text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChromeSettings {
    pub screen: Size,
    pub header_height: u32,
    pub footer_height: u32,
    /// Shown at the left of the footer.
    pub version: String,
}

impl Default for ChromeSettings {
    fn default() -> Self {
        Self {
            screen: Size::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            header_height: HEADER_HEIGHT,
            footer_height: FOOTER_HEIGHT,
            version: format!("v{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ChromeSettings {
    /// The band between header and footer, shared by every page.
    #[must_use]
    pub fn content_area(&self) -> Rectangle {
        let height = self
            .screen
            .height
            .saturating_sub(self.header_height + self.footer_height);
        Rectangle::new(
            Point::new(0, self.header_height.cast_signed()),
            Size::new(self.screen.width, height),
        )
    }

    fn header_area(&self) -> Rectangle {
        Rectangle::new(
            Point::zero(),
            Size::new(self.screen.width, self.header_height),
        )
    }

    fn footer_area(&self) -> Rectangle {
        let top = self.screen.height.saturating_sub(self.footer_height);
        Rectangle::new(
            Point::new(0, top.cast_signed()),
            Size::new(self.screen.width, self.footer_height),
        )
    }
}

/// Whether `inner` lies entirely inside `outer`. Empty rectangles count as
/// inside when their origin does.
#[must_use]
pub fn contains_rect(outer: &Rectangle, inner: &Rectangle) -> bool {
    let outer_right = outer.top_left.x + outer.size.width.cast_signed();
    let outer_bottom = outer.top_left.y + outer.size.height.cast_signed();
    let inner_right = inner.top_left.x + inner.size.width.cast_signed();
    let inner_bottom = inner.top_left.y + inner.size.height.cast_signed();
    inner.top_left.x >= outer.top_left.x
        && inner.top_left.y >= outer.top_left.y
        && inner_right <= outer_right
        && inner_bottom <= outer_bottom
}

pub struct ChromeLayout {
    settings: ChromeSettings,
    header: Rc<RefCell<Panel>>,
    title: Rc<RefCell<Label>>,
    back: Rc<RefCell<Button>>,
    battery: Rc<RefCell<BatteryIcon>>,
    footer: Rc<RefCell<Panel>>,
    version: Rc<RefCell<Label>>,
    status: Rc<RefCell<Label>>,
    back_target: Rc<Cell<Option<PageId>>>,
    power: Rc<dyn PowerStatus>,
}

impl ChromeLayout {
    /// Create the header and footer widgets and register them with `ui`.
    pub fn new<D: Surface>(
        ui: &mut UiManager<D>,
        settings: ChromeSettings,
        power: Rc<dyn PowerStatus>,
        navigator: Navigator,
    ) -> Self {
        let header_area = settings.header_area();
        let footer_area = settings.footer_area();
        let width = settings.screen.width.cast_signed();

        let header = Rc::new(RefCell::new(Panel::new(
            header_area,
            theme::HEADER_BACKGROUND,
        )));

        let back_target: Rc<Cell<Option<PageId>>> = Rc::new(Cell::new(None));
        let target = back_target.clone();
        let back_top = (header_area.size.height.saturating_sub(BACK_BUTTON_SIZE.height) / 2)
            .cast_signed();
        let back = Rc::new(RefCell::new(
            Button::at(
                Rectangle::new(Point::new(MARGIN, back_top), BACK_BUTTON_SIZE),
                "<",
            )
            .with_font(FontSize::Title)
            .on_click(move || {
                if let Some(id) = target.get() {
                    navigator.request(id);
                }
            }),
        ));
        back.borrow_mut().set_visible(false);

        let title_left = MARGIN * 2 + BACK_BUTTON_SIZE.width.cast_signed();
        let title_width = (width - title_left - BATTERY_WIDTH.cast_signed() - MARGIN).max(0);
        let title = Rc::new(RefCell::new(
            Label::new(
                Rectangle::new(
                    Point::new(title_left, 0),
                    Size::new(title_width.cast_unsigned(), header_area.size.height),
                ),
                "",
            )
            .with_font(FontSize::Title)
            .with_background(Some(theme::HEADER_BACKGROUND)),
        ));

        let battery = Rc::new(RefCell::new(BatteryIcon::new(Rectangle::new(
            Point::new(width - BATTERY_WIDTH.cast_signed() - MARGIN, 0),
            Size::new(BATTERY_WIDTH, header_area.size.height),
        ))));

        let footer = Rc::new(RefCell::new(Panel::new(
            footer_area,
            theme::FOOTER_BACKGROUND,
        )));
        let half = Size::new(settings.screen.width / 2, footer_area.size.height);
        let version = Rc::new(RefCell::new(
            Label::new(Rectangle::new(footer_area.top_left, half), &settings.version)
                .with_font(FontSize::Small)
                .with_color(theme::TEXT_DISABLED)
                .with_background(Some(theme::FOOTER_BACKGROUND)),
        ));
        let status = Rc::new(RefCell::new(
            Label::new(
                Rectangle::new(
                    footer_area.top_left + Point::new(half.width.cast_signed(), 0),
                    half,
                ),
                "",
            )
            .with_font(FontSize::Small)
            .with_alignment(Alignment::Right)
            .with_background(Some(theme::FOOTER_BACKGROUND)),
        ));

        // Panels first so the dirty pass paints text on top of them.
        ui.add(header.clone());
        ui.add(title.clone());
        ui.add(back.clone());
        ui.add(battery.clone());
        ui.add(footer.clone());
        ui.add(version.clone());
        ui.add(status.clone());

        let chrome = Self {
            settings,
            header,
            title,
            back,
            battery,
            footer,
            version,
            status,
            back_target,
            power,
        };
        chrome.refresh_status();
        log::debug!(
            "ChromeLayout: content area {:?}",
            chrome.settings.content_area()
        );
        chrome
    }

    #[must_use]
    pub fn content_area(&self) -> Rectangle {
        self.settings.content_area()
    }

    #[must_use]
    pub fn settings(&self) -> &ChromeSettings {
        &self.settings
    }

    /// Update the title and back button for `page` and repaint the header.
    pub fn refresh<D: Surface>(&self, page: &PageCore<D>) {
        let back = page.back_button();
        let target = if back.enabled { back.target } else { None };
        self.back_target.set(target);

        self.header.borrow_mut().set_needs_redraw(true);
        {
            let mut title = self.title.borrow_mut();
            title.set_text(page.name());
            title.set_needs_redraw(true);
        }
        {
            let mut button = self.back.borrow_mut();
            button.set_visible(target.is_some());
            button.set_needs_redraw(true);
        }
        self.battery.borrow_mut().set_needs_redraw(true);
        self.refresh_status();
    }

    /// Poll the power source. The battery icon is only redrawn when the
    /// reading would look different.
    pub fn refresh_status(&self) {
        let snapshot = self.power.snapshot();
        self.battery.borrow_mut().set_snapshot(snapshot);
    }

    pub fn set_status(&self, text: &str) {
        self.status.borrow_mut().set_text(text);
    }

    /// Current footer status text.
    #[must_use]
    pub fn status(&self) -> String {
        self.status.borrow().text().to_string()
    }

    #[must_use]
    pub fn title(&self) -> String {
        self.title.borrow().text().to_string()
    }

    /// Page the back button leads to, if it is shown.
    #[must_use]
    pub fn back_target(&self) -> Option<PageId> {
        self.back_target.get()
    }

    #[must_use]
    pub fn back_button(&self) -> Rc<RefCell<Button>> {
        self.back.clone()
    }

    /// Deregister every chrome widget from `ui`.
    pub fn release<D: Surface>(&self, ui: &mut UiManager<D>) {
        ui.remove(&self.header);
        ui.remove(&self.title);
        ui.remove(&self.back);
        ui.remove(&self.battery);
        ui.remove(&self.footer);
        ui.remove(&self.version);
        ui.remove(&self.status);
    }
}
