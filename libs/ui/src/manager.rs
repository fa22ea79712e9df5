//! Widget registry: touch dispatch and redraw passes.
//!
//! The registry never owns a widget. It keeps [`WeakWidget`] handles in
//! registration order; the page or chrome layout that created a widget owns
//! it and removes it from here before dropping it. Handles whose widget is
//! already gone are skipped and pruned.

use crate::input::{TouchEvent, TouchSource};
use crate::widget::{Color, Surface, WeakWidget, Widget, WidgetRef};
use embedded_graphics::{prelude::*, primitives::Rectangle};
use std::cell::RefCell;
use std::rc::Rc;

/// Fill queued for the start of the next redraw pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PendingFill {
    Screen(Color),
    Area(Rectangle, Color),
}

pub struct UiManager<D: Surface> {
    elements: Vec<WeakWidget<D>>,
    touch: Option<Box<dyn TouchSource>>,
    /// Coordinates of the last valid contact while the finger is down.
    last_touch: Option<Point>,
    pending_fills: Vec<PendingFill>,
}

impl<D: Surface> Default for UiManager<D> {
    fn default() -> Self {
        Self {
            elements: Vec::new(),
            touch: None,
            last_touch: None,
            pending_fills: Vec::new(),
        }
    }
}

impl<D: Surface> UiManager<D> {
    #[must_use]
    pub fn new(touch: Box<dyn TouchSource>) -> Self {
        Self {
            touch: Some(touch),
            ..Self::default()
        }
    }

    /// Registry without a touch source. Dispatch is a no-op until one is set.
    #[must_use]
    pub fn without_touch() -> Self {
        Self::default()
    }

    pub fn set_touch_source(&mut self, touch: Box<dyn TouchSource>) {
        self.touch = Some(touch);
        self.last_touch = None;
    }

    /// Register a widget and mark it dirty. Registering the same widget
    /// twice makes it receive every event twice.
    pub fn add(&mut self, widget: WidgetRef<D>) {
        widget.borrow_mut().set_needs_redraw(true);
        self.elements.push(Rc::downgrade(&widget));
    }

    /// Register a widget through a weak handle. Returns `false` and
    /// registers nothing if the widget no longer exists.
    pub fn add_weak(&mut self, widget: &WeakWidget<D>) -> bool {
        match widget.upgrade() {
            Some(strong) => {
                self.add(strong);
                true
            }
            None => {
                log::warn!("UiManager: refusing to register a dropped widget");
                false
            }
        }
    }

    /// Remove the first registration of `widget`. Returns whether it was found.
    pub fn remove<W: Widget<D> + ?Sized>(&mut self, widget: &Rc<RefCell<W>>) -> bool {
        let target = Rc::as_ptr(widget);
        match self
            .elements
            .iter()
            .position(|weak| std::ptr::addr_eq(weak.as_ptr(), target))
        {
            Some(index) => {
                self.elements.remove(index);
                true
            }
            None => false,
        }
    }

    /// Forget every registration. Widgets themselves are untouched.
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Widget registered at `index`, if it is still alive.
    #[must_use]
    pub fn widget(&self, index: usize) -> Option<WidgetRef<D>> {
        self.elements.get(index).and_then(std::rc::Weak::upgrade)
    }

    /// Whether `widget` is currently registered.
    #[must_use]
    pub fn contains<W: Widget<D> + ?Sized>(&self, widget: &Rc<RefCell<W>>) -> bool {
        let target = Rc::as_ptr(widget);
        self.elements
            .iter()
            .any(|weak| std::ptr::addr_eq(weak.as_ptr(), target))
    }

    /// Poll the touch source once and forward the result.
    ///
    /// A valid contact sends a press to every visible and enabled widget.
    /// The first sample without a valid contact after one with it sends a
    /// single release at the last valid coordinates. Nothing is sent while
    /// the panel stays untouched.
    pub fn dispatch_touch(&mut self) {
        let Some(touch) = self.touch.as_mut() else {
            return;
        };
        let sample = touch.sample();

        let event = if sample.is_contact() {
            self.last_touch = Some(sample.point);
            TouchEvent::press(sample.point)
        } else if let Some(last) = self.last_touch.take() {
            TouchEvent::release(last)
        } else {
            return;
        };

        let mut found_dead = false;
        for weak in &self.elements {
            let Some(widget) = weak.upgrade() else {
                found_dead = true;
                continue;
            };
            let Ok(mut widget) = widget.try_borrow_mut() else {
                log::warn!("UiManager: widget is borrowed during dispatch, skipping");
                continue;
            };
            if widget.is_visible() && widget.is_enabled() {
                widget.handle_touch(event);
            }
        }

        if found_dead {
            self.prune();
        }
    }

    /// Draw every visible widget whatever its dirty flag. Used after a full
    /// screen clear.
    pub fn redraw_all(&mut self, display: &mut D) -> Result<(), D::Error> {
        self.apply_fills(display)?;
        self.draw_pass(display, false)
    }

    /// Draw visible widgets whose dirty flag is set.
    pub fn redraw_dirty(&mut self, display: &mut D) -> Result<(), D::Error> {
        self.apply_fills(display)?;
        self.draw_pass(display, true)
    }

    pub fn mark_all_dirty(&mut self) {
        for widget in self.elements.iter().filter_map(std::rc::Weak::upgrade) {
            if let Ok(mut widget) = widget.try_borrow_mut() {
                widget.set_needs_redraw(true);
            }
        }
    }

    /// Fill the whole surface with `color` at the start of the next redraw
    /// pass and mark everything dirty so it gets repainted on top.
    pub fn clear_screen(&mut self, color: Color) {
        self.pending_fills.clear();
        self.pending_fills.push(PendingFill::Screen(color));
        self.mark_all_dirty();
    }

    /// Fill `area` with `color` at the start of the next redraw pass.
    pub fn fill_area(&mut self, area: Rectangle, color: Color) {
        self.pending_fills.push(PendingFill::Area(area, color));
    }

    /// Log every registration with its bounds and flags at info level.
    pub fn debug_dump(&self) {
        log::info!(
            "UiManager: {} elements, touch {}",
            self.elements.len(),
            match self.last_touch {
                Some(p) => format!("ACTIVE at ({}, {})", p.x, p.y),
                None => "INACTIVE".to_string(),
            }
        );
        for (i, weak) in self.elements.iter().enumerate() {
            let Some(widget) = weak.upgrade() else {
                log::info!("  [{i}] dropped");
                continue;
            };
            let Ok(widget) = widget.try_borrow() else {
                log::info!("  [{i}] busy");
                continue;
            };
            let Rectangle { top_left, size } = widget.bounds();
            log::info!(
                "  [{i}] pos ({}, {}) size {}x{} visible {} enabled {} dirty {}",
                top_left.x,
                top_left.y,
                size.width,
                size.height,
                widget.is_visible(),
                widget.is_enabled(),
                widget.needs_redraw()
            );
        }
    }

    fn apply_fills(&mut self, display: &mut D) -> Result<(), D::Error> {
        for fill in self.pending_fills.drain(..) {
            match fill {
                PendingFill::Screen(color) => display.clear(color)?,
                PendingFill::Area(area, color) => display.fill_solid(&area, color)?,
            }
        }
        Ok(())
    }

    fn draw_pass(&mut self, display: &mut D, only_dirty: bool) -> Result<(), D::Error> {
        let mut found_dead = false;
        for weak in &self.elements {
            let Some(widget) = weak.upgrade() else {
                found_dead = true;
                continue;
            };
            let Ok(mut widget) = widget.try_borrow_mut() else {
                continue;
            };
            if widget.is_visible() && (!only_dirty || widget.needs_redraw()) {
                widget.draw(display)?;
            }
        }
        if found_dead {
            self.prune();
        }
        Ok(())
    }

    fn prune(&mut self) {
        let before = self.elements.len();
        self.elements.retain(|weak| weak.strong_count() > 0);
        log::debug!(
            "UiManager: pruned {} dropped widgets",
            before - self.elements.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{TouchPhase, TouchSample};
    use crate::test_utils::{ProbeWidget, RecordingDisplay, ScriptedTouch};
    use crate::widget::Element;

    type Ui = UiManager<RecordingDisplay>;

    fn probe(x: i32, y: i32) -> Rc<RefCell<ProbeWidget>> {
        Rc::new(RefCell::new(ProbeWidget::new(Rectangle::new(
            Point::new(x, y),
            Size::new(20, 20),
        ))))
    }

    fn setup() -> (Ui, ScriptedTouch) {
        let touch = ScriptedTouch::new();
        (UiManager::new(Box::new(touch.clone())), touch)
    }

    #[test]
    fn add_marks_dirty_and_remove_finds_first_match() {
        let (mut ui, _) = setup();
        let w = probe(0, 0);
        w.borrow_mut().set_needs_redraw(false);
        ui.add(w.clone());
        assert!(w.borrow().needs_redraw());
        assert!(ui.contains(&w));
        assert!(ui.remove(&w));
        assert!(!ui.remove(&w));
        assert!(ui.is_empty());
    }

    #[test]
    fn duplicate_registration_is_not_deduplicated() {
        let (mut ui, touch) = setup();
        let w = probe(0, 0);
        ui.add(w.clone());
        ui.add(w.clone());
        assert_eq!(ui.len(), 2);
        touch.press(5, 5);
        ui.dispatch_touch();
        assert_eq!(w.borrow().events.len(), 2);
    }

    #[test]
    fn add_weak_rejects_dropped_widget() {
        let (mut ui, _) = setup();
        let weak: WeakWidget<RecordingDisplay> = {
            let w: WidgetRef<RecordingDisplay> = probe(0, 0);
            Rc::downgrade(&w)
        };
        assert!(!ui.add_weak(&weak));
        assert!(ui.is_empty());
    }

    #[test]
    fn press_goes_to_every_visible_enabled_widget_in_order() {
        let (mut ui, touch) = setup();
        let a = probe(0, 0);
        let b = probe(100, 100);
        ui.add(a.clone());
        ui.add(b.clone());
        touch.press(5, 5);
        ui.dispatch_touch();
        // No geometry filtering: b gets the press although it is far away.
        assert_eq!(a.borrow().events, vec![TouchEvent::press(Point::new(5, 5))]);
        assert_eq!(b.borrow().events, vec![TouchEvent::press(Point::new(5, 5))]);
    }

    #[test]
    fn release_uses_last_valid_coordinates_once() {
        let (mut ui, touch) = setup();
        let w = probe(0, 0);
        ui.add(w.clone());
        touch.press(10, 10);
        touch.press(12, 11);
        touch.push(TouchSample {
            active: false,
            point: Point::new(999, 999),
            valid: false,
        });
        touch.release();
        for _ in 0..4 {
            ui.dispatch_touch();
        }
        let events = &w.borrow().events;
        let releases: Vec<_> = events
            .iter()
            .filter(|e| e.phase == TouchPhase::Release)
            .collect();
        assert_eq!(releases.len(), 1);
        assert_eq!(releases[0].point, Point::new(12, 11));
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn active_but_invalid_sample_ends_the_contact() {
        let (mut ui, touch) = setup();
        let w = probe(0, 0);
        ui.add(w.clone());
        touch.press(4, 4);
        touch.push(TouchSample {
            active: true,
            point: Point::new(-1, -1),
            valid: false,
        });
        touch.push(TouchSample {
            active: true,
            point: Point::new(-1, -1),
            valid: false,
        });
        for _ in 0..3 {
            ui.dispatch_touch();
        }
        assert_eq!(
            w.borrow().events,
            vec![
                TouchEvent::press(Point::new(4, 4)),
                TouchEvent::release(Point::new(4, 4)),
            ]
        );
    }

    #[test]
    fn idle_panel_dispatches_nothing() {
        let (mut ui, _touch) = setup();
        let w = probe(0, 0);
        ui.add(w.clone());
        ui.dispatch_touch();
        ui.dispatch_touch();
        assert!(w.borrow().events.is_empty());
    }

    #[test]
    fn hidden_and_disabled_widgets_get_no_touch() {
        let (mut ui, touch) = setup();
        let hidden = probe(0, 0);
        let disabled = probe(0, 0);
        hidden.borrow_mut().set_visible(false);
        disabled.borrow_mut().set_enabled(false);
        ui.add(hidden.clone());
        ui.add(disabled.clone());
        touch.press(1, 1);
        ui.dispatch_touch();
        assert!(hidden.borrow().events.is_empty());
        assert!(disabled.borrow().events.is_empty());
    }

    #[test]
    fn missing_touch_source_is_a_no_op() {
        let mut ui: Ui = UiManager::without_touch();
        let w = probe(0, 0);
        ui.add(w.clone());
        ui.dispatch_touch();
        assert!(w.borrow().events.is_empty());
    }

    #[test]
    fn redraw_dirty_skips_clean_and_hidden_widgets() {
        let (mut ui, _) = setup();
        let clean = probe(0, 0);
        let dirty = probe(30, 0);
        let hidden = probe(60, 0);
        ui.add(clean.clone());
        ui.add(dirty.clone());
        ui.add(hidden.clone());
        clean.borrow_mut().set_needs_redraw(false);
        hidden.borrow_mut().set_visible(false);

        let mut display = RecordingDisplay::default();
        ui.redraw_dirty(&mut display).unwrap();
        assert_eq!(clean.borrow().draws, 0);
        assert_eq!(dirty.borrow().draws, 1);
        assert_eq!(hidden.borrow().draws, 0);
        assert!(!dirty.borrow().needs_redraw());

        // Nothing is dirty any more.
        ui.redraw_dirty(&mut display).unwrap();
        assert_eq!(dirty.borrow().draws, 1);
    }

    #[test]
    fn redraw_all_ignores_dirty_flag_but_not_visibility() {
        let (mut ui, _) = setup();
        let a = probe(0, 0);
        let hidden = probe(30, 0);
        ui.add(a.clone());
        ui.add(hidden.clone());
        a.borrow_mut().set_needs_redraw(false);
        hidden.borrow_mut().set_visible(false);
        let mut display = RecordingDisplay::default();
        ui.redraw_all(&mut display).unwrap();
        assert_eq!(a.borrow().draws, 1);
        assert_eq!(hidden.borrow().draws, 0);
    }

    #[test]
    fn disabled_widget_is_still_drawn() {
        let (mut ui, _) = setup();
        let w = probe(0, 0);
        w.borrow_mut().set_enabled(false);
        ui.add(w.clone());
        let mut display = RecordingDisplay::default();
        ui.redraw_dirty(&mut display).unwrap();
        assert_eq!(w.borrow().draws, 1);
    }

    #[test]
    fn clear_screen_fills_then_repaints_everything() {
        let (mut ui, _) = setup();
        let a = probe(0, 0);
        let b = probe(30, 0);
        ui.add(a.clone());
        ui.add(b.clone());
        let mut display = RecordingDisplay::default();
        ui.redraw_dirty(&mut display).unwrap();

        ui.clear_screen(Color::BLACK);
        assert!(a.borrow().needs_redraw());
        ui.redraw_dirty(&mut display).unwrap();
        assert_eq!(display.clears, vec![Color::BLACK]);
        assert_eq!(a.borrow().draws, 2);
        assert_eq!(b.borrow().draws, 2);
    }

    #[test]
    fn queued_area_fill_is_applied_once() {
        let (mut ui, _) = setup();
        let area = Rectangle::new(Point::new(0, 40), Size::new(480, 240));
        ui.fill_area(area, Color::BLUE);
        let mut display = RecordingDisplay::default();
        ui.redraw_dirty(&mut display).unwrap();
        ui.redraw_dirty(&mut display).unwrap();
        assert_eq!(display.fills, vec![(area, Color::BLUE)]);
    }

    #[test]
    fn dropped_widgets_are_skipped_and_pruned() {
        let (mut ui, touch) = setup();
        let keep = probe(0, 0);
        ui.add(keep.clone());
        {
            let gone = probe(0, 0);
            ui.add(gone.clone());
        }
        assert_eq!(ui.len(), 2);
        touch.press(1, 1);
        ui.dispatch_touch();
        assert_eq!(ui.len(), 1);
        assert_eq!(keep.borrow().events.len(), 1);
        assert!(ui.widget(1).is_none());
    }

    #[test]
    fn clear_forgets_registrations_but_keeps_widgets() {
        let (mut ui, _) = setup();
        let w = probe(0, 0);
        ui.add(w.clone());
        ui.clear();
        assert!(ui.is_empty());
        assert_eq!(Rc::strong_count(&w), 1);
    }
}
