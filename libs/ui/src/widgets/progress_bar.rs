use crate::theme;
use crate::widget::{Color, Element, Surface, Widget, WidgetState};
use embedded_graphics::{
    Drawable,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
};

/// Horizontal bar showing a value from 0 to 100.
pub struct ProgressBar {
    state: WidgetState,
    value: u8,
    color: Color,
    track: Color,
}

impl ProgressBar {
    #[must_use]
    pub fn new(bounds: Rectangle) -> Self {
        Self {
            state: WidgetState::new(bounds),
            value: 0,
            color: theme::GREEN,
            track: theme::DARK_GRAY,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn value(&self) -> u8 {
        self.value
    }

    /// Set the value, capped at 100.
    pub fn set_value(&mut self, value: u8) {
        let value = value.min(100);
        if self.value != value {
            self.value = value;
            self.state.invalidate();
        }
    }

    pub fn set_color(&mut self, color: Color) {
        if self.color != color {
            self.color = color;
            self.state.invalidate();
        }
    }

    /// Width in pixels of the filled part, inside the 1px border.
    fn fill_width(&self) -> u32 {
        let inner = self.state.bounds().size.width.saturating_sub(2);
        inner * u32::from(self.value) / 100
    }
}

impl Element for ProgressBar {
    fn state(&self) -> &WidgetState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut WidgetState {
        &mut self.state
    }
}

impl<D: Surface> Widget<D> for ProgressBar {
    fn draw(&mut self, display: &mut D) -> Result<(), D::Error> {
        let rect = self.state.bounds();
        let inner = rect.offset(-1);

        display.fill_solid(&inner, self.track)?;
        rect.into_styled(PrimitiveStyle::with_stroke(theme::BUTTON_BORDER, 1))
            .draw(display)?;

        let filled = Rectangle::new(
            inner.top_left,
            Size::new(self.fill_width(), inner.size.height),
        );
        if filled.size.width > 0 {
            display.fill_solid(&filled, self.color)?;
        }

        self.state.mark_clean();
        Ok(())
    }
}
