//! Remote control page: joystick gauge, motor outputs and the handset
//! battery, with a link status row on top.

use super::{HOME, due, place, signal_color, small_label};
use crate::link::{LinkSnapshot, WirelessLink};
use crate::widgets::JoystickView;
use embedded_graphics::{primitives::Rectangle, text::Alignment};
use handset_ui::{
    Color, JoystickPosition, Page, PageCore, PowerSnapshot, PowerStatus, Surface, UiManager,
    UiResult, WidgetRef, theme,
    widgets::{Label, ProgressBar},
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

/// Motor output below this magnitude is shown as idle.
const MOTOR_DEADBAND: i16 = 10;

/// Differential drive mix of a joystick position: (left, right), each in
/// -100..=100.
#[must_use]
pub fn mix(position: JoystickPosition) -> (i16, i16) {
    let (x, y) = (position.x(), position.y());
    let max = JoystickPosition::MAX;
    ((y + x).clamp(-max, max), (y - x).clamp(-max, max))
}

/// Bar fill for a motor output: -100 is empty, 0 is half, 100 is full.
fn motor_bar_value(output: i16) -> u8 {
    u8::try_from((output.clamp(-100, 100) + 100) / 2).unwrap_or(0)
}

fn motor_color(output: i16) -> Color {
    if output > MOTOR_DEADBAND {
        theme::GREEN
    } else if output < -MOTOR_DEADBAND {
        theme::ORANGE
    } else {
        theme::GRAY
    }
}

struct MotorRow {
    bar: Rc<RefCell<ProgressBar>>,
    value: Rc<RefCell<Label>>,
}

impl MotorRow {
    fn new(area: Rectangle, y: i32) -> Self {
        let mut bar = ProgressBar::new(place(area, 200, y, 190, 22)).with_color(theme::GRAY);
        bar.set_value(motor_bar_value(0));
        Self {
            bar: Rc::new(RefCell::new(bar)),
            value: Rc::new(RefCell::new(
                small_label(place(area, 400, y, 60, 22), "0").with_alignment(Alignment::Center),
            )),
        }
    }

    fn show(&self, output: i16) {
        let mut bar = self.bar.borrow_mut();
        bar.set_value(motor_bar_value(output));
        bar.set_color(motor_color(output));
        self.value.borrow_mut().set_text(&output.to_string());
    }
}

struct Widgets {
    link_state: Rc<RefCell<Label>>,
    rssi: Rc<RefCell<Label>>,
    rate: Rc<RefCell<Label>>,
    joystick: Rc<RefCell<JoystickView>>,
    axis_x: Rc<RefCell<Label>>,
    axis_y: Rc<RefCell<Label>>,
    left: MotorRow,
    right: MotorRow,
    battery: Rc<RefCell<ProgressBar>>,
    volts: Rc<RefCell<Label>>,
}

pub struct RemotePage<D: Surface> {
    core: PageCore<D>,
    link: Rc<dyn WirelessLink>,
    power: Rc<dyn PowerStatus>,
    position: JoystickPosition,
    widgets: Option<Widgets>,
    last_refresh: Option<Instant>,
}

impl<D: Surface> RemotePage<D> {
    pub fn new(link: Rc<dyn WirelessLink>, power: Rc<dyn PowerStatus>) -> Self {
        let mut core = PageCore::new("Remote Control");
        core.set_back_button(true, Some(HOME));
        Self {
            core,
            link,
            power,
            position: JoystickPosition::default(),
            widgets: None,
            last_refresh: None,
        }
    }

    /// Push the latest joystick sample into the gauge, axis labels and
    /// motor bars. Only touches widgets when the position changed.
    fn show_joystick(&self) {
        let Some(widgets) = &self.widgets else {
            return;
        };
        let position = self.position;
        if widgets.joystick.borrow().position() == position {
            return;
        }
        widgets.joystick.borrow_mut().set_position(position);
        widgets
            .axis_x
            .borrow_mut()
            .set_text(&format!("X: {}", position.x()));
        widgets
            .axis_y
            .borrow_mut()
            .set_text(&format!("Y: {}", position.y()));
        let (left, right) = mix(position);
        widgets.left.show(left);
        widgets.right.show(right);
    }

    fn show_link(&self, snapshot: &LinkSnapshot) {
        let Some(widgets) = &self.widgets else {
            return;
        };
        let mut state = widgets.link_state.borrow_mut();
        let mut rssi = widgets.rssi.borrow_mut();
        if snapshot.connected {
            state.set_text("CONNECTED");
            state.set_color(theme::GREEN);
            rssi.set_text(&format!("RSSI: {} dBm", snapshot.rssi));
            rssi.set_color(signal_color(snapshot.rssi));
        } else {
            state.set_text("DISCONNECTED");
            state.set_color(theme::RED);
            rssi.set_text("RSSI: --- dBm");
            rssi.set_color(theme::TEXT);
        }
        widgets
            .rate
            .borrow_mut()
            .set_text(&format!("Rate: {} pkt/s", snapshot.send_rate));
    }

    fn show_battery(&self, snapshot: PowerSnapshot) {
        let Some(widgets) = &self.widgets else {
            return;
        };
        let mut bar = widgets.battery.borrow_mut();
        bar.set_value(snapshot.percent);
        bar.set_color(theme::level_color(snapshot.percent));
        widgets
            .volts
            .borrow_mut()
            .set_text(&format!("{:.2}V", snapshot.volts()));
    }
}

impl<D: Surface> Page<D> for RemotePage<D> {
    fn core(&self) -> &PageCore<D> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PageCore<D> {
        &mut self.core
    }

    fn build(&mut self, ui: &mut UiManager<D>) -> UiResult<()> {
        let area = self.core.content_area();
        let shared = |label: Label| Rc::new(RefCell::new(label));

        let widgets = Widgets {
            link_state: shared(
                small_label(place(area, 10, 4, 150, 24), "DISCONNECTED").with_color(theme::RED),
            ),
            rssi: shared(small_label(place(area, 170, 4, 140, 24), "RSSI: --- dBm")),
            rate: shared(small_label(place(area, 320, 4, 150, 24), "Rate: 0 pkt/s")),
            joystick: Rc::new(RefCell::new(JoystickView::new(place(area, 20, 30, 150, 150)))),
            axis_x: shared(
                small_label(place(area, 20, 184, 70, 22), "X: 0").with_alignment(Alignment::Center),
            ),
            axis_y: shared(
                small_label(place(area, 100, 184, 70, 22), "Y: 0")
                    .with_alignment(Alignment::Center),
            ),
            left: MotorRow::new(area, 54),
            right: MotorRow::new(area, 108),
            battery: Rc::new(RefCell::new(ProgressBar::new(place(area, 200, 164, 190, 22)))),
            volts: shared(
                small_label(place(area, 400, 164, 60, 22), "0.00V")
                    .with_alignment(Alignment::Center),
            ),
        };

        let captions = [
            (30, "Motor L"),
            (84, "Motor R"),
            (140, "Remote battery"),
        ];
        let mut content: Vec<WidgetRef<D>> = captions
            .iter()
            .map(|&(y, text)| -> WidgetRef<D> {
                shared(small_label(place(area, 200, y, 200, 22), text))
            })
            .collect();
        let handles: [WidgetRef<D>; 12] = [
            widgets.link_state.clone(),
            widgets.rssi.clone(),
            widgets.rate.clone(),
            widgets.joystick.clone(),
            widgets.axis_x.clone(),
            widgets.axis_y.clone(),
            widgets.left.bar.clone(),
            widgets.left.value.clone(),
            widgets.right.bar.clone(),
            widgets.right.value.clone(),
            widgets.battery.clone(),
            widgets.volts.clone(),
        ];
        content.extend(handles);
        for widget in content {
            self.core.add_content_element(ui, widget)?;
        }

        self.widgets = Some(widgets);
        Ok(())
    }

    fn update(&mut self) {
        self.show_joystick();
        if due(&mut self.last_refresh, Instant::now()) {
            let link = self.link.snapshot();
            self.show_link(&link);
            self.show_battery(self.power.snapshot());
        }
    }

    fn handle_joystick(&mut self, position: JoystickPosition) {
        self.position = position;
    }
}
