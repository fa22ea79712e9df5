//! Widget capability shared by chrome elements and page content.
//!
//! A widget is split in two traits: [`Element`] carries the state every
//! widget has (bounds, visibility, enabled, dirty) and touch handling, and
//! [`Widget`] adds drawing onto a concrete [`Surface`]. The split keeps the
//! state accessors callable on concrete widget types without naming a
//! display type.

use crate::input::TouchEvent;
use embedded_graphics::{pixelcolor::Rgb565, prelude::*, primitives::Rectangle};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Pixel format of the handset display.
pub type Color = Rgb565;

/// Any draw target the engine can paint on.
pub trait Surface: DrawTarget<Color = Color> + 'static {}

impl<T: DrawTarget<Color = Color> + 'static> Surface for T {}

/// Owning handle to a widget. Pages and the chrome layout hold these.
pub type WidgetRef<D> = Rc<RefCell<dyn Widget<D>>>;

/// Non-owning handle to a widget, as stored by the registry.
pub type WeakWidget<D> = Weak<RefCell<dyn Widget<D>>>;

/// Visibility, enabled and redraw state embedded in every widget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WidgetState {
    bounds: Rectangle,
    visible: bool,
    enabled: bool,
    dirty: bool,
}

impl WidgetState {
    /// New state for a visible, enabled widget that still has to be drawn.
    #[must_use]
    pub fn new(bounds: Rectangle) -> Self {
        Self {
            bounds,
            visible: true,
            enabled: true,
            dirty: true,
        }
    }

    #[must_use]
    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the widget as needing a redraw.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Called by a widget at the end of its own `draw`.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }
}

/// State and input side of a widget.
///
/// Hit-testing is the widget's own business: the registry forwards every
/// touch event to every visible and enabled widget, including events that
/// land outside its bounds (a button uses those to cancel a press that was
/// dragged away).
pub trait Element {
    fn state(&self) -> &WidgetState;

    fn state_mut(&mut self) -> &mut WidgetState;

    /// Handle a touch event. Runs inside the registry's dispatch pass, so
    /// it must not try to change which widgets are registered; navigation
    /// goes through [`crate::Navigator::request`].
    fn handle_touch(&mut self, _event: TouchEvent) {}

    fn bounds(&self) -> Rectangle {
        self.state().bounds
    }

    /// Move or resize the widget. The widget is redrawn on the next pass.
    fn set_bounds(&mut self, bounds: Rectangle) {
        let state = self.state_mut();
        if state.bounds != bounds {
            state.bounds = bounds;
            state.dirty = true;
        }
    }

    fn is_visible(&self) -> bool {
        self.state().visible
    }

    fn set_visible(&mut self, visible: bool) {
        let state = self.state_mut();
        if state.visible != visible {
            state.visible = visible;
            state.dirty = true;
        }
    }

    fn is_enabled(&self) -> bool {
        self.state().enabled
    }

    /// Disabled widgets are still drawn (usually greyed out) but receive
    /// no touch events.
    fn set_enabled(&mut self, enabled: bool) {
        let state = self.state_mut();
        if state.enabled != enabled {
            state.enabled = enabled;
            state.dirty = true;
        }
    }

    fn needs_redraw(&self) -> bool {
        self.state().dirty
    }

    fn set_needs_redraw(&mut self, dirty: bool) {
        self.state_mut().dirty = dirty;
    }
}

/// A drawable [`Element`].
pub trait Widget<D: Surface>: Element {
    /// Paint the widget and clear its dirty flag.
    fn draw(&mut self, display: &mut D) -> Result<(), D::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain {
        state: WidgetState,
    }

    impl Element for Plain {
        fn state(&self) -> &WidgetState {
            &self.state
        }

        fn state_mut(&mut self) -> &mut WidgetState {
            &mut self.state
        }
    }

    fn plain() -> Plain {
        let mut state = WidgetState::new(Rectangle::new(Point::new(1, 2), Size::new(3, 4)));
        state.mark_clean();
        Plain { state }
    }

    #[test]
    fn new_state_is_visible_enabled_and_dirty() {
        let state = WidgetState::new(Rectangle::zero());
        assert!(state.is_visible());
        assert!(state.is_enabled());
        assert!(state.is_dirty());
    }

    #[test]
    fn visibility_change_marks_dirty() {
        let mut w = plain();
        w.set_visible(false);
        assert!(!w.is_visible());
        assert!(w.needs_redraw());
    }

    #[test]
    fn setting_same_visibility_keeps_clean() {
        let mut w = plain();
        w.set_visible(true);
        w.set_enabled(true);
        assert!(!w.needs_redraw());
    }

    #[test]
    fn enabled_change_marks_dirty() {
        let mut w = plain();
        w.set_enabled(false);
        assert!(!w.is_enabled());
        assert!(w.needs_redraw());
    }

    #[test]
    fn set_bounds_marks_dirty_only_on_change() {
        let mut w = plain();
        w.set_bounds(w.bounds());
        assert!(!w.needs_redraw());
        w.set_bounds(Rectangle::new(Point::new(10, 10), Size::new(5, 5)));
        assert!(w.needs_redraw());
        assert_eq!(w.bounds().top_left, Point::new(10, 10));
    }
}
