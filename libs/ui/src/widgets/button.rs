use crate::fonts::{self, FontSize};
use crate::input::{TouchEvent, TouchPhase};
use crate::theme;
use crate::widget::{Element, Surface, Widget, WidgetState};
use embedded_graphics::{
    Drawable,
    prelude::*,
    primitives::{PrimitiveStyleBuilder, Rectangle, RoundedRectangle},
    text::Alignment,
};
use embedded_layout::View;

type ClickAction = Box<dyn FnMut()>;

/// Rounded push button with a text caption.
///
/// A press inside the bounds arms the button, a release inside the bounds
/// while armed fires the click action. Pressing elsewhere disarms it, so
/// dragging a finger off the button cancels the click.
pub struct Button {
    state: WidgetState,
    text: String,
    font: FontSize,
    pressed: bool,
    on_click: Option<ClickAction>,
}

impl Button {
    /// Button of `size` at the origin; place it with [`Element::set_bounds`]
    /// or [`super::arrange_row`].
    #[must_use]
    pub fn new(size: Size, text: &str) -> Self {
        Self::at(Rectangle::new(Point::zero(), size), text)
    }

    #[must_use]
    pub fn at(bounds: Rectangle, text: &str) -> Self {
        Self {
            state: WidgetState::new(bounds),
            text: text.to_string(),
            font: FontSize::Normal,
            pressed: false,
            on_click: None,
        }
    }

    #[must_use]
    pub fn with_font(mut self, font: FontSize) -> Self {
        self.font = font;
        self
    }

    /// Action run on a completed tap.
    #[must_use]
    pub fn on_click(mut self, action: impl FnMut() + 'static) -> Self {
        self.on_click = Some(Box::new(action));
        self
    }

    pub fn set_on_click(&mut self, action: impl FnMut() + 'static) {
        self.on_click = Some(Box::new(action));
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: &str) {
        if self.text != text {
            self.text = text.to_string();
            self.state.invalidate();
        }
    }

    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        self.state.bounds().contains(point)
    }

    fn set_pressed(&mut self, pressed: bool) {
        if self.pressed != pressed {
            self.pressed = pressed;
            self.state.invalidate();
        }
    }
}

impl Element for Button {
    fn state(&self) -> &WidgetState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut WidgetState {
        &mut self.state
    }

    fn handle_touch(&mut self, event: TouchEvent) {
        let inside = self.contains(event.point);
        match event.phase {
            TouchPhase::Press => self.set_pressed(inside),
            TouchPhase::Release => {
                let armed = self.pressed;
                self.set_pressed(false);
                if armed
                    && inside
                    && let Some(action) = self.on_click.as_mut()
                {
                    log::debug!("Button '{}' clicked", self.text);
                    action();
                }
            }
        }
    }
}

impl View for Button {
    fn bounds(&self) -> Rectangle {
        self.state.bounds()
    }

    fn translate_impl(&mut self, by: Point) {
        let bounds = self.state.bounds();
        Element::set_bounds(self, Rectangle::new(bounds.top_left + by, bounds.size));
    }
}

impl<D: Surface> Widget<D> for Button {
    fn draw(&mut self, display: &mut D) -> Result<(), D::Error> {
        let rect = self.state.bounds();
        let face = if !self.state.is_enabled() {
            theme::DARK_GRAY
        } else if self.pressed {
            theme::BUTTON_PRESSED
        } else {
            theme::BUTTON_FACE
        };
        let style = PrimitiveStyleBuilder::new()
            .fill_color(face)
            .stroke_color(theme::BUTTON_BORDER)
            .stroke_width(1)
            .build();
        RoundedRectangle::with_equal_corners(rect, Size::new(5, 5))
            .into_styled(style)
            .draw(display)?;

        let text_color = if self.state.is_enabled() {
            theme::TEXT
        } else {
            theme::TEXT_DISABLED
        };
        fonts::draw_text(
            display,
            &self.text,
            rect.center(),
            Alignment::Center,
            self.font,
            text_color,
        )?;

        self.state.mark_clean();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::RecordingDisplay;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counted() -> (Button, Rc<Cell<u32>>) {
        let clicks = Rc::new(Cell::new(0));
        let counter = clicks.clone();
        let button = Button::at(Rectangle::new(Point::new(10, 10), Size::new(50, 30)), "OK")
            .on_click(move || counter.set(counter.get() + 1));
        (button, clicks)
    }

    #[test]
    fn tap_inside_clicks_once() {
        let (mut button, clicks) = counted();
        button.handle_touch(TouchEvent::press(Point::new(20, 20)));
        assert!(button.is_pressed());
        button.handle_touch(TouchEvent::release(Point::new(20, 20)));
        assert!(!button.is_pressed());
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn dragging_off_cancels_the_click() {
        let (mut button, clicks) = counted();
        button.handle_touch(TouchEvent::press(Point::new(20, 20)));
        button.handle_touch(TouchEvent::press(Point::new(200, 200)));
        assert!(!button.is_pressed());
        button.handle_touch(TouchEvent::release(Point::new(200, 200)));
        assert_eq!(clicks.get(), 0);
    }

    #[test]
    fn release_without_press_does_nothing() {
        let (mut button, clicks) = counted();
        button.handle_touch(TouchEvent::release(Point::new(20, 20)));
        assert_eq!(clicks.get(), 0);
    }

    #[test]
    fn press_state_change_marks_dirty() {
        let (mut button, _) = counted();
        button.set_needs_redraw(false);
        button.handle_touch(TouchEvent::press(Point::new(20, 20)));
        assert!(button.needs_redraw());
    }

    #[test]
    fn draw_clears_dirty_flag() {
        let (mut button, _) = counted();
        let mut display = RecordingDisplay::default();
        Widget::<RecordingDisplay>::draw(&mut button, &mut display).unwrap();
        assert!(!button.needs_redraw());
        assert!(display.pixels > 0 || !display.fills.is_empty());
    }
}
