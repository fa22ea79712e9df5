//! Connection page: pairing state, peer address, signal strength and
//! packet heartbeat.

use super::{HOME, due, place, signal_color, small_label};
use crate::link::{LinkSnapshot, WirelessLink, format_mac, rssi_percent};
use embedded_graphics::prelude::{Point, Size};
use handset_ui::{
    Page, PageCore, Surface, UiManager, UiResult, WidgetRef,
    fonts::FontSize,
    theme,
    widgets::{Button, Label, Panel, ProgressBar, arrange_row},
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

const BUTTON_SIZE: Size = Size::new(140, 50);
const VALUE_X: i32 = 140;

struct Widgets {
    status: Rc<RefCell<Label>>,
    peer: Rc<RefCell<Label>>,
    signal: Rc<RefCell<ProgressBar>>,
    rssi: Rc<RefCell<Label>>,
    heartbeat: Rc<RefCell<Panel>>,
    last_packet: Rc<RefCell<Label>>,
}

pub struct ConnectionPage<D: Surface> {
    core: PageCore<D>,
    link: Rc<dyn WirelessLink>,
    widgets: Option<Widgets>,
    heartbeat_on: bool,
    last_refresh: Option<Instant>,
}

/// Age of the last packet for display.
fn packet_age(age: Option<Duration>) -> String {
    match age {
        None => "never".to_string(),
        Some(age) if age < Duration::from_secs(1) => format!("{} ms ago", age.as_millis()),
        Some(age) => format!("{} s ago", age.as_secs()),
    }
}

impl<D: Surface> ConnectionPage<D> {
    pub fn new(link: Rc<dyn WirelessLink>) -> Self {
        let mut core = PageCore::new("Connection");
        core.set_back_button(true, Some(HOME));
        Self {
            core,
            link,
            widgets: None,
            heartbeat_on: false,
            last_refresh: None,
        }
    }

    fn show_link(&mut self, snapshot: &LinkSnapshot) {
        let Some(widgets) = &self.widgets else {
            return;
        };

        let (text, color) = if snapshot.connected {
            ("Connected", theme::GREEN)
        } else if snapshot.pairing {
            ("Pairing...", theme::YELLOW)
        } else if snapshot.paired {
            ("Paired, no signal", theme::ORANGE)
        } else {
            ("Not paired", theme::RED)
        };
        let mut status = widgets.status.borrow_mut();
        status.set_text(text);
        status.set_color(color);

        let peer = snapshot
            .peer
            .as_ref()
            .map_or_else(|| "--:--:--:--:--:--".to_string(), format_mac);
        widgets.peer.borrow_mut().set_text(&peer);

        let mut signal = widgets.signal.borrow_mut();
        signal.set_value(rssi_percent(snapshot.rssi));
        signal.set_color(signal_color(snapshot.rssi));
        let rssi = if snapshot.connected {
            format!("{} dBm", snapshot.rssi)
        } else {
            "--- dBm".to_string()
        };
        widgets.rssi.borrow_mut().set_text(&rssi);

        widgets
            .last_packet
            .borrow_mut()
            .set_text(&packet_age(snapshot.last_packet_age));

        // Blinks while packets arrive, dark otherwise.
        self.heartbeat_on = snapshot.connected && !self.heartbeat_on;
        widgets.heartbeat.borrow_mut().set_color(if self.heartbeat_on {
            theme::GREEN
        } else {
            theme::DARK_GRAY
        });
    }
}

impl<D: Surface> Page<D> for ConnectionPage<D> {
    fn core(&self) -> &PageCore<D> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PageCore<D> {
        &mut self.core
    }

    fn build(&mut self, ui: &mut UiManager<D>) -> UiResult<()> {
        let area = self.core.content_area();
        let value_width = area.size.width.saturating_sub(VALUE_X.cast_unsigned() + 10);

        let widgets = Widgets {
            status: Rc::new(RefCell::new(
                Label::new(place(area, VALUE_X, 6, value_width, 24), "Not paired")
                    .with_color(theme::RED),
            )),
            peer: Rc::new(RefCell::new(
                Label::new(place(area, VALUE_X, 36, value_width, 24), "--:--:--:--:--:--")
                    .with_font(FontSize::Mono),
            )),
            signal: Rc::new(RefCell::new(ProgressBar::new(place(
                area, VALUE_X, 68, 220, 20,
            )))),
            rssi: Rc::new(RefCell::new(small_label(
                place(area, VALUE_X + 230, 66, 100, 24),
                "--- dBm",
            ))),
            heartbeat: Rc::new(RefCell::new(Panel::new(
                place(area, VALUE_X, 100, 16, 16),
                theme::DARK_GRAY,
            ))),
            last_packet: Rc::new(RefCell::new(small_label(
                place(area, VALUE_X, 126, value_width, 24),
                "never",
            ))),
        };

        let mut content: Vec<WidgetRef<D>> = [
            (6, "Status:"),
            (36, "Peer MAC:"),
            (66, "Signal:"),
            (96, "Heartbeat:"),
            (126, "Last packet:"),
        ]
        .into_iter()
        .map(|(y, text)| -> WidgetRef<D> {
            Rc::new(RefCell::new(small_label(place(area, 10, y, 120, 24), text)))
        })
        .collect();
        let handles: [WidgetRef<D>; 6] = [
            widgets.status.clone(),
            widgets.peer.clone(),
            widgets.signal.clone(),
            widgets.rssi.clone(),
            widgets.heartbeat.clone(),
            widgets.last_packet.clone(),
        ];
        content.extend(handles);

        let pair_link = self.link.clone();
        let drop_link = self.link.clone();
        let mut buttons = [
            Button::new(BUTTON_SIZE, "Pair").on_click(move || pair_link.start_pairing()),
            Button::new(BUTTON_SIZE, "Disconnect").on_click(move || drop_link.disconnect()),
        ];
        let row_width = BUTTON_SIZE.width.cast_signed() * 2 + 20;
        let left = (area.size.width.cast_signed() - row_width) / 2;
        arrange_row(&mut buttons, area.top_left + Point::new(left, 168), 20);
        for button in buttons {
            content.push(Rc::new(RefCell::new(button)));
        }

        for widget in content {
            self.core.add_content_element(ui, widget)?;
        }
        self.widgets = Some(widgets);
        Ok(())
    }

    fn update(&mut self) {
        if due(&mut self.last_refresh, Instant::now()) {
            let snapshot = self.link.snapshot();
            self.show_link(&snapshot);
        }
    }

    fn on_show(&mut self) {
        // Show fresh values right away instead of up to one refresh late.
        self.last_refresh = None;
    }
}

#[cfg(test)]
mod tests {
    use super::super::CONNECTION;
    use super::super::harness::{Manager, manager, shared, tap};
    use super::*;
    use crate::link::StaticLink;
    use handset_ui::Element;
    use handset_ui::test_utils::{RecordingDisplay, ScriptedTouch};

    type Connection = ConnectionPage<RecordingDisplay>;

    fn shown(link: Rc<StaticLink>) -> (Manager, ScriptedTouch, Rc<RefCell<Connection>>) {
        let (mut pm, touch) = manager();
        let page = shared(Connection::new(link));
        pm.add_page(page.clone(), CONNECTION).unwrap();
        pm.show_page(CONNECTION).unwrap();
        (pm, touch, page)
    }

    #[test]
    fn packet_age_formats() {
        assert_eq!(packet_age(None), "never");
        assert_eq!(packet_age(Some(Duration::from_millis(15))), "15 ms ago");
        assert_eq!(packet_age(Some(Duration::from_millis(2500))), "2 s ago");
    }

    #[test]
    fn pair_button_starts_pairing() {
        let link = Rc::new(StaticLink::default());
        let (mut pm, touch, _page) = shown(link.clone());
        // Pair is the left button: x 90..230, y 208..258
        tap(&mut pm, &touch, 160, 230);
        assert_eq!(link.pairing_requests.get(), 1);
        assert_eq!(pm.current_page_id(), Some(CONNECTION));
    }

    #[test]
    fn connected_link_fills_the_readouts() {
        let link = Rc::new(StaticLink::connected(-75));
        let (mut pm, _, page) = shown(link);
        pm.update();

        let page = page.borrow();
        let widgets = page.widgets.as_ref().unwrap();
        assert_eq!(widgets.status.borrow().text(), "Connected");
        assert_eq!(widgets.peer.borrow().text(), "24:6F:28:0A:B1:3C");
        assert_eq!(widgets.signal.borrow().value(), 50);
        assert_eq!(widgets.rssi.borrow().text(), "-75 dBm");
        assert_eq!(widgets.last_packet.borrow().text(), "12 ms ago");
        assert!(page.heartbeat_on);
    }

    #[test]
    fn disconnect_button_drops_the_link() {
        let link = Rc::new(StaticLink::connected(-50));
        let (mut pm, touch, page) = shown(link.clone());
        tap(&mut pm, &touch, 320, 230);
        assert!(!link.snapshot().connected);

        page.borrow_mut().last_refresh = None;
        pm.update();
        let page = page.borrow();
        let widgets = page.widgets.as_ref().unwrap();
        assert_eq!(widgets.status.borrow().text(), "Paired, no signal");
        assert_eq!(widgets.rssi.borrow().text(), "--- dBm");
        assert!(!page.heartbeat_on);
        assert!(widgets.heartbeat.borrow().is_visible());
    }
}
