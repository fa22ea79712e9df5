use crate::fonts::{self, FontSize};
use crate::theme;
use crate::widget::{Color, Element, Surface, Widget, WidgetState};
use embedded_graphics::{prelude::*, primitives::Rectangle, text::Alignment};

const INSET: i32 = 4;

/// Single line of text. The background is repainted on every draw so a
/// shorter text fully replaces a longer one.
pub struct Label {
    state: WidgetState,
    text: String,
    font: FontSize,
    alignment: Alignment,
    color: Color,
    background: Option<Color>,
}

impl Label {
    #[must_use]
    pub fn new(bounds: Rectangle, text: &str) -> Self {
        Self {
            state: WidgetState::new(bounds),
            text: text.to_string(),
            font: FontSize::Normal,
            alignment: Alignment::Left,
            color: theme::TEXT,
            background: Some(theme::CONTENT_BACKGROUND),
        }
    }

    #[must_use]
    pub fn with_font(mut self, font: FontSize) -> Self {
        self.font = font;
        self
    }

    #[must_use]
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Background colour, or `None` to draw the text over whatever is there.
    #[must_use]
    pub fn with_background(mut self, background: Option<Color>) -> Self {
        self.background = background;
        self
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text. Marks the label dirty only if it changed.
    pub fn set_text(&mut self, text: &str) {
        if self.text != text {
            text.clone_into(&mut self.text);
            self.state.invalidate();
        }
    }

    pub fn set_color(&mut self, color: Color) {
        if self.color != color {
            self.color = color;
            self.state.invalidate();
        }
    }

    fn anchor(&self) -> Point {
        let rect = self.state.bounds();
        let center = rect.center();
        match self.alignment {
            Alignment::Left => Point::new(rect.top_left.x + INSET, center.y),
            Alignment::Center => center,
            Alignment::Right => rect
                .bottom_right()
                .map_or(center, |br| Point::new(br.x - INSET, center.y)),
        }
    }
}

impl Element for Label {
    fn state(&self) -> &WidgetState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut WidgetState {
        &mut self.state
    }
}

impl<D: Surface> Widget<D> for Label {
    fn draw(&mut self, display: &mut D) -> Result<(), D::Error> {
        if let Some(background) = self.background {
            display.fill_solid(&self.state.bounds(), background)?;
        }
        let color = if self.state.is_enabled() {
            self.color
        } else {
            theme::TEXT_DISABLED
        };
        fonts::draw_text(
            display,
            &self.text,
            self.anchor(),
            self.alignment,
            self.font,
            color,
        )?;
        self.state.mark_clean();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::RecordingDisplay;

    fn label() -> Label {
        Label::new(Rectangle::new(Point::new(0, 0), Size::new(100, 20)), "Ready")
    }

    #[test]
    fn set_text_marks_dirty_only_on_change() {
        let mut l = label();
        l.set_needs_redraw(false);
        l.set_text("Ready");
        assert!(!l.needs_redraw());
        l.set_text("Paired");
        assert!(l.needs_redraw());
        assert_eq!(l.text(), "Paired");
    }

    #[test]
    fn draw_paints_background_first() {
        let mut l = label().with_background(Some(theme::BLUE));
        let mut display = RecordingDisplay::default();
        Widget::<RecordingDisplay>::draw(&mut l, &mut display).unwrap();
        assert_eq!(display.fills.first(), Some(&(l.bounds(), theme::BLUE)));
        assert!(!l.needs_redraw());
    }

    #[test]
    fn transparent_label_fills_nothing() {
        let mut l = label().with_background(None);
        let mut display = RecordingDisplay::default();
        Widget::<RecordingDisplay>::draw(&mut l, &mut display).unwrap();
        assert!(display.fills.is_empty());
    }

    #[test]
    fn right_alignment_anchors_inside_right_edge() {
        let l = label().with_alignment(Alignment::Right);
        assert_eq!(l.anchor(), Point::new(95, 9));
    }
}
