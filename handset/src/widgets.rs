//! Widgets only the handset pages use.

use embedded_graphics::{
    Drawable,
    prelude::*,
    primitives::{Circle, Line, PrimitiveStyle, Rectangle},
};
use handset_ui::{Element, JoystickPosition, Surface, Widget, WidgetState, theme};

const KNOB_DIAMETER: u32 = 16;

/// Circular joystick gauge: outline, centre cross and a knob at the
/// current deflection.
pub struct JoystickView {
    state: WidgetState,
    position: JoystickPosition,
}

impl JoystickView {
    #[must_use]
    pub fn new(bounds: Rectangle) -> Self {
        Self {
            state: WidgetState::new(bounds),
            position: JoystickPosition::default(),
        }
    }

    #[must_use]
    pub fn position(&self) -> JoystickPosition {
        self.position
    }

    pub fn set_position(&mut self, position: JoystickPosition) {
        if self.position != position {
            self.position = position;
            self.state.invalidate();
        }
    }

    fn radius(&self) -> i32 {
        let size = self.state.bounds().size;
        (size.width.min(size.height) / 2).cast_signed()
    }

    /// Centre of the knob on screen.
    #[must_use]
    pub fn knob_center(&self) -> Point {
        let travel = (self.radius() - (KNOB_DIAMETER / 2).cast_signed()).max(0);
        self.position
            .to_screen(self.state.bounds().center(), travel)
    }
}

impl Element for JoystickView {
    fn state(&self) -> &WidgetState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut WidgetState {
        &mut self.state
    }
}

impl<D: Surface> Widget<D> for JoystickView {
    fn draw(&mut self, display: &mut D) -> Result<(), D::Error> {
        let bounds = self.state.bounds();
        display.fill_solid(&bounds, theme::CONTENT_BACKGROUND)?;

        let center = bounds.center();
        let radius = self.radius();
        let outline = PrimitiveStyle::with_stroke(theme::GRAY, 1);
        Circle::with_center(center, (radius * 2).cast_unsigned())
            .into_styled(outline)
            .draw(display)?;
        Circle::with_center(center, radius.cast_unsigned())
            .into_styled(PrimitiveStyle::with_stroke(theme::DARK_GRAY, 1))
            .draw(display)?;

        let cross = PrimitiveStyle::with_stroke(theme::DARK_GRAY, 1);
        Line::new(center - Point::new(radius, 0), center + Point::new(radius, 0))
            .into_styled(cross)
            .draw(display)?;
        Line::new(center - Point::new(0, radius), center + Point::new(0, radius))
            .into_styled(cross)
            .draw(display)?;

        Circle::with_center(self.knob_center(), KNOB_DIAMETER)
            .into_styled(PrimitiveStyle::with_fill(theme::CYAN))
            .draw(display)?;

        self.state.mark_clean();
        Ok(())
    }
}
