//! Touch and joystick input types.

use embedded_graphics::prelude::Point;

/// One level-sampled reading of the touch controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct TouchSample {
    /// A finger is on the panel.
    pub active: bool,
    /// Coordinates in display space. Only meaningful when `valid`.
    pub point: Point,
    /// The controller produced usable coordinates for this sample.
    pub valid: bool,
}

impl TouchSample {
    /// No contact.
    pub const RELEASED: Self = Self {
        active: false,
        point: Point::zero(),
        valid: false,
    };

    /// Valid contact at `point`.
    #[must_use]
    pub fn contact(point: Point) -> Self {
        Self {
            active: true,
            point,
            valid: true,
        }
    }

    /// Active and valid.
    #[must_use]
    pub fn is_contact(&self) -> bool {
        self.active && self.valid
    }
}

/// Source of touch samples, polled once per dispatch pass.
pub trait TouchSource {
    fn sample(&mut self) -> TouchSample;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchPhase {
    /// Finger is down (sent on every active sample, not only the first).
    Press,
    /// Finger lifted; carries the last valid coordinates.
    Release,
}

/// Event delivered to widgets during dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TouchEvent {
    pub point: Point,
    pub phase: TouchPhase,
}

impl TouchEvent {
    #[must_use]
    pub fn press(point: Point) -> Self {
        Self {
            point,
            phase: TouchPhase::Press,
        }
    }

    #[must_use]
    pub fn release(point: Point) -> Self {
        Self {
            point,
            phase: TouchPhase::Release,
        }
    }

    #[must_use]
    pub fn is_press(&self) -> bool {
        self.phase == TouchPhase::Press
    }
}

/// Joystick deflection, each axis in -100..=100.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct JoystickPosition {
    x: i16,
    y: i16,
}

impl JoystickPosition {
    pub const MAX: i16 = 100;

    /// Build a position, clamping both axes to the valid range.
    #[must_use]
    pub fn new(x: i16, y: i16) -> Self {
        Self {
            x: x.clamp(-Self::MAX, Self::MAX),
            y: y.clamp(-Self::MAX, Self::MAX),
        }
    }

    #[must_use]
    pub fn x(&self) -> i16 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> i16 {
        self.y
    }

    /// Map the deflection onto a circle of `radius` pixels around `center`.
    /// Screen y grows downwards, so the y axis is inverted.
    #[must_use]
    pub fn to_screen(&self, center: Point, radius: i32) -> Point {
        let max = i32::from(Self::MAX);
        Point::new(
            center.x + i32::from(self.x) * radius / max,
            center.y - i32::from(self.y) * radius / max,
        )
    }
}
