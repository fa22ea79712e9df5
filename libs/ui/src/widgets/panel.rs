use crate::widget::{Color, Element, Surface, Widget, WidgetState};
use embedded_graphics::primitives::Rectangle;

/// Solid band, used for the header and footer backgrounds.
pub struct Panel {
    state: WidgetState,
    color: Color,
}

impl Panel {
    #[must_use]
    pub fn new(bounds: Rectangle, color: Color) -> Self {
        Self {
            state: WidgetState::new(bounds),
            color,
        }
    }

    pub fn set_color(&mut self, color: Color) {
        if self.color != color {
            self.color = color;
            self.state.invalidate();
        }
    }
}

impl Element for Panel {
    fn state(&self) -> &WidgetState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut WidgetState {
        &mut self.state
    }
}

impl<D: Surface> Widget<D> for Panel {
    fn draw(&mut self, display: &mut D) -> Result<(), D::Error> {
        display.fill_solid(&self.state.bounds(), self.color)?;
        self.state.mark_clean();
        Ok(())
    }
}
