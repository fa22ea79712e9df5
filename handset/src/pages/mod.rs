//! Pages of the handset UI.

pub mod connection;
pub mod home;
pub mod info;
pub mod remote;

pub use connection::ConnectionPage;
pub use home::HomePage;
pub use info::InfoPage;
pub use remote::RemotePage;

use embedded_graphics::{
    prelude::{Point, Size},
    primitives::Rectangle,
};
use handset_ui::{Color, PageId, fonts::FontSize, theme, widgets::Label};
use std::time::{Duration, Instant};

pub const HOME: PageId = PageId(0);
pub const REMOTE: PageId = PageId(1);
pub const CONNECTION: PageId = PageId(2);
pub const INFO: PageId = PageId(4);

/// Every page id, in registration order.
pub const ALL: [PageId; 4] = [HOME, REMOTE, CONNECTION, INFO];

/// Smallest content area every page layout fits in.
pub const MIN_CONTENT: Size = Size::new(480, 240);

/// Interval between link and battery readouts on a page.
pub const STATUS_REFRESH: Duration = Duration::from_millis(500);

/// Whether a periodic refresh is due at `now`. Records `now` when it is.
pub(crate) fn due(last: &mut Option<Instant>, now: Instant) -> bool {
    match *last {
        Some(previous) if now.saturating_duration_since(previous) < STATUS_REFRESH => false,
        _ => {
            *last = Some(now);
            true
        }
    }
}

/// Rectangle at (`x`, `y`) relative to the top left of `area`.
pub(crate) fn place(area: Rectangle, x: i32, y: i32, width: u32, height: u32) -> Rectangle {
    Rectangle::new(area.top_left + Point::new(x, y), Size::new(width, height))
}

pub(crate) fn small_label(bounds: Rectangle, text: &str) -> Label {
    Label::new(bounds, text).with_font(FontSize::Small)
}

/// Colour for a signal strength in dBm.
#[must_use]
pub fn signal_color(rssi: i8) -> Color {
    match rssi {
        -60.. => theme::GREEN,
        -70..=-61 => theme::YELLOW,
        -80..=-71 => theme::ORANGE,
        _ => theme::RED,
    }
}

#[cfg(test)]
pub(crate) mod harness {
    use handset_ui::test_utils::{FixedPower, RecordingDisplay, ScriptedTouch};
    use handset_ui::{ChromeSettings, PageManager, UiManager};
    use std::cell::RefCell;
    use std::rc::Rc;

    pub type Manager = PageManager<RecordingDisplay>;

    pub fn shared<T>(value: T) -> Rc<RefCell<T>> {
        Rc::new(RefCell::new(value))
    }

    /// Initialized manager on a 480x320 recording display.
    pub fn manager() -> (Manager, ScriptedTouch) {
        let touch = ScriptedTouch::new();
        let ui = UiManager::new(Box::new(touch.clone()));
        let mut manager = PageManager::new(ui, ChromeSettings::default());
        manager
            .init(Some(Rc::new(FixedPower::new(64, false))))
            .unwrap();
        (manager, touch)
    }

    /// Tap at (`x`, `y`) and run the two ticks the press and release take.
    pub fn tap(manager: &mut Manager, touch: &ScriptedTouch, x: i32, y: i32) {
        touch.tap(x, y);
        manager.update();
        manager.update();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_is_due_first_time_then_throttled() {
        let start = Instant::now();
        let mut last = None;
        assert!(due(&mut last, start));
        assert!(!due(&mut last, start + Duration::from_millis(100)));
        assert!(due(&mut last, start + STATUS_REFRESH));
    }

    #[test]
    fn signal_colors() {
        assert_eq!(signal_color(-45), theme::GREEN);
        assert_eq!(signal_color(-60), theme::GREEN);
        assert_eq!(signal_color(-65), theme::YELLOW);
        assert_eq!(signal_color(-80), theme::ORANGE);
        assert_eq!(signal_color(-95), theme::RED);
    }

    #[test]
    fn every_page_fits_the_smallest_content_area() {
        use crate::link::StaticLink;
        use handset_ui::test_utils::{FixedPower, RecordingDisplay};
        use std::rc::Rc;

        let (mut pm, _) = harness::manager();
        assert_eq!(pm.content_area().size, MIN_CONTENT);

        let link = Rc::new(StaticLink::connected(-60));
        let pages: [handset_ui::PageRef<RecordingDisplay>; 4] = [
            harness::shared(HomePage::<RecordingDisplay>::new(pm.navigator(), link.clone())),
            harness::shared(RemotePage::<RecordingDisplay>::new(
                link.clone(),
                Rc::new(FixedPower::new(50, false)),
            )),
            harness::shared(ConnectionPage::<RecordingDisplay>::new(link)),
            harness::shared(InfoPage::<RecordingDisplay>::new("Handset Controller")),
        ];
        for (page, id) in pages.iter().zip(ALL) {
            pm.add_page(page.clone(), id).unwrap();
            pm.show_page(id).unwrap();
            assert_eq!(pm.current_page_id(), Some(id));
        }
    }

    #[test]
    fn page_ids_are_unique() {
        for (i, a) in ALL.iter().enumerate() {
            assert!(ALL[i + 1..].iter().all(|b| a != b));
        }
    }
}
