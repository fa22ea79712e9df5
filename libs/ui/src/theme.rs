// Colour palette for the handset display (RGB565)

use crate::widget::Color;

pub const BLACK: Color = Color::new(0, 0, 0);
pub const WHITE: Color = Color::new(31, 63, 31);
pub const GRAY: Color = Color::new(16, 32, 16);
pub const DARK_GRAY: Color = Color::new(8, 16, 8);
pub const RED: Color = Color::new(31, 0, 0);
pub const GREEN: Color = Color::new(0, 63, 0);
pub const BLUE: Color = Color::new(0, 0, 31);
pub const CYAN: Color = Color::new(0, 63, 31);
pub const YELLOW: Color = Color::new(31, 63, 0);
pub const ORANGE: Color = Color::new(31, 41, 0);

pub const HEADER_BACKGROUND: Color = Color::new(3, 8, 6);
pub const FOOTER_BACKGROUND: Color = HEADER_BACKGROUND;
pub const CONTENT_BACKGROUND: Color = BLACK;
pub const TEXT: Color = WHITE;
pub const TEXT_DISABLED: Color = GRAY;
pub const BUTTON_FACE: Color = Color::new(4, 12, 10);
pub const BUTTON_PRESSED: Color = Color::new(0, 24, 20);
pub const BUTTON_BORDER: Color = GRAY;

/// Bar/icon colour for a charge or signal level in percent.
#[must_use]
pub fn level_color(percent: u8) -> Color {
    match percent {
        80.. => GREEN,
        50..=79 => YELLOW,
        20..=49 => ORANGE,
        _ => RED,
    }
}
