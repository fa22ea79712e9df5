use crate::fonts;
use crate::theme;
use crate::widget::{Color, Element, Surface, Widget, WidgetState};
use embedded_graphics::{prelude::*, primitives::Rectangle};
use embedded_text::{
    TextBox,
    alignment::{HorizontalAlignment, VerticalAlignment},
    style::TextBoxStyleBuilder,
};
use u8g2_fonts::U8g2TextStyle;

/// Word-wrapped multi-line text.
pub struct TextBlock {
    state: WidgetState,
    text: String,
    color: Color,
    background: Color,
}

impl TextBlock {
    #[must_use]
    pub fn new(bounds: Rectangle, text: &str) -> Self {
        Self {
            state: WidgetState::new(bounds),
            text: text.to_string(),
            color: theme::TEXT,
            background: theme::CONTENT_BACKGROUND,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: &str) {
        if self.text != text {
            text.clone_into(&mut self.text);
            self.state.invalidate();
        }
    }
}

impl Element for TextBlock {
    fn state(&self) -> &WidgetState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut WidgetState {
        &mut self.state
    }
}

impl<D: Surface> Widget<D> for TextBlock {
    fn draw(&mut self, display: &mut D) -> Result<(), D::Error> {
        let bounds = self.state.bounds();
        display.fill_solid(&bounds, self.background)?;

        let character_style = U8g2TextStyle::new(fonts::FONT_MEDIUM, self.color);
        let textbox_style = TextBoxStyleBuilder::new()
            .alignment(HorizontalAlignment::Left)
            .vertical_alignment(VerticalAlignment::Top)
            .build();
        TextBox::with_textbox_style(&self.text, bounds, character_style, textbox_style)
            .draw(display)?;

        self.state.mark_clean();
        Ok(())
    }
}
