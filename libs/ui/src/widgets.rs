//! Concrete widgets used by the chrome layout and by pages.

mod battery;
mod button;
mod label;
mod panel;
mod progress_bar;
mod text_block;

pub use battery::BatteryIcon;
pub use button::Button;
pub use label::Label;
pub use panel::Panel;
pub use progress_bar::ProgressBar;
pub use text_block::TextBlock;

use embedded_graphics::prelude::Point;
use embedded_layout::{
    View,
    align::vertical,
    layout::linear::{FixedMargin, LinearLayout},
    view_group::Views,
};

/// Lay `buttons` out left to right starting at `origin`, `spacing` pixels
/// apart and vertically centred on the tallest one.
pub fn arrange_row(buttons: &mut [Button], origin: Point, spacing: i32) {
    if buttons.is_empty() {
        return;
    }
    let mut row = LinearLayout::horizontal(Views::new(buttons))
        .with_spacing(FixedMargin(spacing))
        .with_alignment(vertical::Center)
        .arrange();
    let offset = origin - row.bounds().top_left;
    row.translate_mut(offset);
}
