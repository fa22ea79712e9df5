//! Test doubles for the engine's collaborators.
//!
//! A recording draw target, a scripted touch panel, a fixed power source,
//! a probe widget that records what the registry does to it and a page
//! that counts its lifecycle calls.

use crate::error::UiResult;
use crate::input::{JoystickPosition, TouchEvent, TouchSample, TouchSource};
use crate::manager::UiManager;
use crate::navigation::PageId;
use crate::pages::{Page, PageCore};
use crate::status::{PowerSnapshot, PowerStatus};
use crate::widget::{Color, Element, Surface, Widget, WidgetState};
use embedded_graphics::{
    Pixel,
    prelude::{DrawTarget, OriginDimensions, Point, Size},
    primitives::Rectangle,
};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

/// Draw target that only counts what is drawn on it.
#[derive(Debug, Clone)]
pub struct RecordingDisplay {
    size: Size,
    /// Pixels received through `draw_iter`.
    pub pixels: usize,
    /// Solid fills, in order.
    pub fills: Vec<(Rectangle, Color)>,
    /// Full clears, in order.
    pub clears: Vec<Color>,
}

impl RecordingDisplay {
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            size,
            pixels: 0,
            fills: Vec::new(),
            clears: Vec::new(),
        }
    }
}

impl Default for RecordingDisplay {
    fn default() -> Self {
        Self::new(Size::new(480, 320))
    }
}

impl OriginDimensions for RecordingDisplay {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for RecordingDisplay {
    type Color = Color;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.pixels += pixels.into_iter().count();
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        self.fills.push((*area, color));
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.clears.push(color);
        Ok(())
    }
}

/// Touch panel fed from a queue. Clones share the queue, so a test can
/// keep one handle while the registry polls another. An empty queue reads
/// as "no contact".
#[derive(Clone, Default)]
pub struct ScriptedTouch {
    samples: Rc<RefCell<VecDeque<TouchSample>>>,
}

impl ScriptedTouch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, sample: TouchSample) {
        self.samples.borrow_mut().push_back(sample);
    }

    /// Queue a valid contact at (`x`, `y`).
    pub fn press(&self, x: i32, y: i32) {
        self.push(TouchSample::contact(Point::new(x, y)));
    }

    /// Queue a sample without contact.
    pub fn release(&self) {
        self.push(TouchSample::RELEASED);
    }

    /// Queue a full tap: one contact sample followed by a release.
    pub fn tap(&self, x: i32, y: i32) {
        self.press(x, y);
        self.release();
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.samples.borrow().len()
    }
}

impl TouchSource for ScriptedTouch {
    fn sample(&mut self) -> TouchSample {
        self.samples
            .borrow_mut()
            .pop_front()
            .unwrap_or(TouchSample::RELEASED)
    }
}

/// Power source whose reading is set by the test.
#[derive(Debug, Default)]
pub struct FixedPower {
    snapshot: Cell<PowerSnapshot>,
}

impl FixedPower {
    #[must_use]
    pub fn new(percent: u8, charging: bool) -> Self {
        Self {
            snapshot: Cell::new(PowerSnapshot::from_percent(percent, charging)),
        }
    }

    pub fn set(&self, percent: u8, charging: bool) {
        self.snapshot
            .set(PowerSnapshot::from_percent(percent, charging));
    }
}

impl PowerStatus for FixedPower {
    fn snapshot(&self) -> PowerSnapshot {
        self.snapshot.get()
    }
}

type TouchHook = Box<dyn FnMut(TouchEvent)>;

/// Widget that records the touch events and draw calls it receives.
pub struct ProbeWidget {
    state: WidgetState,
    pub events: Vec<TouchEvent>,
    pub draws: usize,
    on_touch: Option<TouchHook>,
}

impl ProbeWidget {
    #[must_use]
    pub fn new(bounds: Rectangle) -> Self {
        Self {
            state: WidgetState::new(bounds),
            events: Vec::new(),
            draws: 0,
            on_touch: None,
        }
    }

    /// Run `hook` for every event after recording it.
    #[must_use]
    pub fn with_hook(mut self, hook: impl FnMut(TouchEvent) + 'static) -> Self {
        self.on_touch = Some(Box::new(hook));
        self
    }
}

impl Element for ProbeWidget {
    fn state(&self) -> &WidgetState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut WidgetState {
        &mut self.state
    }

    fn handle_touch(&mut self, event: TouchEvent) {
        self.events.push(event);
        if let Some(hook) = self.on_touch.as_mut() {
            hook(event);
        }
    }
}

impl<D: Surface> Widget<D> for ProbeWidget {
    fn draw(&mut self, _display: &mut D) -> Result<(), D::Error> {
        self.draws += 1;
        self.state.mark_clean();
        Ok(())
    }
}

/// Shared log of lifecycle transitions, as `"show:<name>"`/`"hide:<name>"`.
pub type Journal = Rc<RefCell<Vec<String>>>;

/// Page whose content is a list of probe widgets handed in up front.
pub struct TestPage {
    core: PageCore<RecordingDisplay>,
    widgets: Vec<Rc<RefCell<ProbeWidget>>>,
    journal: Option<Journal>,
    pub builds: usize,
    pub updates: usize,
    pub joystick: Vec<JoystickPosition>,
}

impl TestPage {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            core: PageCore::new(name),
            widgets: Vec::new(),
            journal: None,
            builds: 0,
            updates: 0,
            joystick: Vec::new(),
        }
    }

    /// Register `widget` as content when the page is built.
    #[must_use]
    pub fn with_widget(mut self, widget: Rc<RefCell<ProbeWidget>>) -> Self {
        self.widgets.push(widget);
        self
    }

    #[must_use]
    pub fn with_back_button(mut self, target: PageId) -> Self {
        self.core.set_back_button(true, Some(target));
        self
    }

    #[must_use]
    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    fn record(&self, what: &str) {
        if let Some(journal) = &self.journal {
            journal
                .borrow_mut()
                .push(format!("{what}:{}", self.core.name()));
        }
    }
}

impl Page<RecordingDisplay> for TestPage {
    fn core(&self) -> &PageCore<RecordingDisplay> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PageCore<RecordingDisplay> {
        &mut self.core
    }

    fn build(&mut self, ui: &mut UiManager<RecordingDisplay>) -> UiResult<()> {
        self.builds += 1;
        for widget in &self.widgets {
            self.core.add_content_element(ui, widget.clone())?;
        }
        Ok(())
    }

    fn update(&mut self) {
        self.updates += 1;
    }

    fn on_show(&mut self) {
        self.record("show");
    }

    fn on_hide(&mut self) {
        self.record("hide");
    }

    fn handle_joystick(&mut self, position: JoystickPosition) {
        self.joystick.push(position);
    }
}
