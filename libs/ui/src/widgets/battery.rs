use crate::fonts::{self, FontSize};
use crate::status::PowerSnapshot;
use crate::theme;
use crate::widget::{Element, Surface, Widget, WidgetState};
use embedded_graphics::{
    Drawable,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::Alignment,
};

const BODY_WIDTH: u32 = 28;
const TIP_WIDTH: u32 = 3;

/// Battery outline filled to the charge level, with the percentage to its
/// left and a `+` while charging.
pub struct BatteryIcon {
    state: WidgetState,
    snapshot: PowerSnapshot,
}

impl BatteryIcon {
    #[must_use]
    pub fn new(bounds: Rectangle) -> Self {
        Self {
            state: WidgetState::new(bounds),
            snapshot: PowerSnapshot::default(),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> PowerSnapshot {
        self.snapshot
    }

    pub fn set_snapshot(&mut self, snapshot: PowerSnapshot) {
        if self.snapshot.differs_visibly(&snapshot) {
            self.state.invalidate();
        }
        self.snapshot = snapshot;
    }

    fn body(&self) -> Rectangle {
        let rect = self.state.bounds();
        let height = rect.size.height.min(16);
        let x = rect.top_left.x
            + rect
                .size
                .width
                .saturating_sub(BODY_WIDTH + TIP_WIDTH)
                .cast_signed();
        let y = rect.center().y - (height / 2).cast_signed();
        Rectangle::new(Point::new(x, y), Size::new(BODY_WIDTH, height))
    }

    fn caption(&self) -> String {
        if self.snapshot.charging {
            format!("+{}%", self.snapshot.percent)
        } else {
            format!("{}%", self.snapshot.percent)
        }
    }
}

impl Element for BatteryIcon {
    fn state(&self) -> &WidgetState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut WidgetState {
        &mut self.state
    }
}

impl<D: Surface> Widget<D> for BatteryIcon {
    fn draw(&mut self, display: &mut D) -> Result<(), D::Error> {
        let rect = self.state.bounds();
        display.fill_solid(&rect, theme::HEADER_BACKGROUND)?;

        let body = self.body();
        body.into_styled(PrimitiveStyle::with_stroke(theme::TEXT, 1))
            .draw(display)?;
        let tip_height = body.size.height / 2;
        let tip = Rectangle::new(
            Point::new(
                body.top_left.x + BODY_WIDTH.cast_signed(),
                body.center().y - (tip_height / 2).cast_signed(),
            ),
            Size::new(TIP_WIDTH, tip_height),
        );
        display.fill_solid(&tip, theme::TEXT)?;

        let inner = body.offset(-2);
        let level = inner.size.width * u32::from(self.snapshot.percent.min(100)) / 100;
        if level > 0 {
            display.fill_solid(
                &Rectangle::new(inner.top_left, Size::new(level, inner.size.height)),
                theme::level_color(self.snapshot.percent),
            )?;
        }

        fonts::draw_text(
            display,
            &self.caption(),
            Point::new(body.top_left.x - 4, rect.center().y),
            Alignment::Right,
            FontSize::Small,
            theme::TEXT,
        )?;

        self.state.mark_clean();
        Ok(())
    }
}
