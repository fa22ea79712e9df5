//! Start page: one button per page and a one-line link summary.

use super::{CONNECTION, INFO, REMOTE, due, place, small_label};
use crate::link::{LinkSnapshot, WirelessLink};
use embedded_graphics::{
    prelude::{Point, Size},
    text::Alignment,
};
use handset_ui::{
    Navigator, Page, PageCore, PageId, Surface, UiManager, UiResult,
    fonts::FontSize,
    theme,
    widgets::{Button, Label, arrange_row},
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

const BUTTON_SIZE: Size = Size::new(140, 60);
const BUTTON_SPACING: i32 = 20;

const DESTINATIONS: [(&str, PageId); 3] = [
    ("Remote", REMOTE),
    ("Connection", CONNECTION),
    ("Info", INFO),
];

pub struct HomePage<D: Surface> {
    core: PageCore<D>,
    navigator: Navigator,
    link: Rc<dyn WirelessLink>,
    summary: Option<Rc<RefCell<Label>>>,
    last_refresh: Option<Instant>,
}

impl<D: Surface> HomePage<D> {
    pub fn new(navigator: Navigator, link: Rc<dyn WirelessLink>) -> Self {
        Self {
            core: PageCore::new("Home"),
            navigator,
            link,
            summary: None,
            last_refresh: None,
        }
    }

    fn show_link(&self, snapshot: &LinkSnapshot) {
        let Some(summary) = &self.summary else {
            return;
        };
        let mut summary = summary.borrow_mut();
        if snapshot.connected {
            summary.set_text(&format!(
                "Link: connected, {} dBm, {} pkt/s",
                snapshot.rssi, snapshot.send_rate
            ));
            summary.set_color(theme::GREEN);
        } else if snapshot.pairing {
            summary.set_text("Link: pairing...");
            summary.set_color(theme::YELLOW);
        } else {
            summary.set_text("Link: not connected");
            summary.set_color(theme::RED);
        }
    }
}

impl<D: Surface> Page<D> for HomePage<D> {
    fn core(&self) -> &PageCore<D> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PageCore<D> {
        &mut self.core
    }

    fn build(&mut self, ui: &mut UiManager<D>) -> UiResult<()> {
        let area = self.core.content_area();
        let width = area.size.width;

        let heading = Label::new(place(area, 0, 10, width, 36), "Handset Controller")
            .with_font(FontSize::Title)
            .with_alignment(Alignment::Center);
        self.core
            .add_content_element(ui, Rc::new(RefCell::new(heading)))?;

        let mut buttons: Vec<Button> = DESTINATIONS
            .iter()
            .map(|&(text, target)| {
                let navigator = self.navigator.clone();
                Button::new(BUTTON_SIZE, text).on_click(move || navigator.request(target))
            })
            .collect();
        let row_width = BUTTON_SIZE.width.cast_signed() * 3 + BUTTON_SPACING * 2;
        let left = (width.cast_signed() - row_width) / 2;
        arrange_row(&mut buttons, area.top_left + Point::new(left, 80), BUTTON_SPACING);
        for button in buttons {
            self.core
                .add_content_element(ui, Rc::new(RefCell::new(button)))?;
        }

        let summary = Rc::new(RefCell::new(
            small_label(place(area, 0, 180, width, 28), "Link: not connected")
                .with_alignment(Alignment::Center)
                .with_color(theme::RED),
        ));
        self.core.add_content_element(ui, summary.clone())?;
        self.summary = Some(summary);
        Ok(())
    }

    fn update(&mut self) {
        if due(&mut self.last_refresh, Instant::now()) {
            let snapshot = self.link.snapshot();
            self.show_link(&snapshot);
        }
    }
}
