// Font definitions for the handset display

use crate::widget::{Color, Surface};
use embedded_graphics::{
    Drawable,
    prelude::Point,
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};
use u8g2_fonts::U8g2TextStyle;

// Proportional font for labels and button captions
pub use u8g2_fonts::fonts::u8g2_font_helvR12_tf as FONT_PROPORTIONAL;

// Bold font for the header title
pub use u8g2_fonts::fonts::u8g2_font_helvB12_tf as FONT_TITLE;

// Medium proportional font for secondary text
pub use u8g2_fonts::fonts::u8g2_font_helvR10_tf as FONT_MEDIUM;

// Small font for the footer and dense status lines
pub use u8g2_fonts::fonts::u8g2_font_helvR08_tf as FONT_SMALL;

// Monospace font for MAC addresses and numeric readouts
pub use u8g2_fonts::fonts::u8g2_font_courR10_tf as FONT_MONO;

/// Font choice for widgets that render text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FontSize {
    Small,
    Medium,
    #[default]
    Normal,
    Title,
    Mono,
}

/// Draw a single line of text vertically centred on `position`.
pub fn draw_text<D: Surface>(
    display: &mut D,
    text: &str,
    position: Point,
    alignment: Alignment,
    font: FontSize,
    color: Color,
) -> Result<(), D::Error> {
    let text_style = TextStyleBuilder::new()
        .alignment(alignment)
        .baseline(Baseline::Middle)
        .build();

    match font {
        FontSize::Small => Text::with_text_style(
            text,
            position,
            U8g2TextStyle::new(FONT_SMALL, color),
            text_style,
        )
        .draw(display)?,
        FontSize::Medium => Text::with_text_style(
            text,
            position,
            U8g2TextStyle::new(FONT_MEDIUM, color),
            text_style,
        )
        .draw(display)?,
        FontSize::Normal => Text::with_text_style(
            text,
            position,
            U8g2TextStyle::new(FONT_PROPORTIONAL, color),
            text_style,
        )
        .draw(display)?,
        FontSize::Title => Text::with_text_style(
            text,
            position,
            U8g2TextStyle::new(FONT_TITLE, color),
            text_style,
        )
        .draw(display)?,
        FontSize::Mono => Text::with_text_style(
            text,
            position,
            U8g2TextStyle::new(FONT_MONO, color),
            text_style,
        )
        .draw(display)?,
    };

    Ok(())
}
