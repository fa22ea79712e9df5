//! In-memory RGB565 frame buffer standing in for the TFT panel.
//!
//! Drawing only touches memory and grows a dirty rectangle. `flush` hands
//! the dirty region to the panel (here: a log line and, optionally, a PPM
//! snapshot of the whole frame).

use anyhow::{Context, Result};
use embedded_graphics::{
    Pixel,
    pixelcolor::{Rgb565, Rgb888},
    prelude::{DrawTarget, OriginDimensions, Point, PointsIter, RgbColor, Size},
    primitives::Rectangle,
};
use std::convert::Infallible;
use std::io::Write;
use std::path::Path;

pub struct FrameBuffer {
    size: Size,
    pixels: Box<[Rgb565]>,
    dirty: Option<Rectangle>,
    flushes: u64,
}

impl FrameBuffer {
    #[must_use]
    pub fn new(size: Size) -> Self {
        let len = (size.width * size.height) as usize;
        Self {
            size,
            pixels: vec![Rgb565::BLACK; len].into_boxed_slice(),
            dirty: None,
            flushes: 0,
        }
    }

    /// Colour at `point`, or `None` outside the frame.
    #[cfg(test)]
    #[must_use]
    pub fn pixel(&self, point: Point) -> Option<Rgb565> {
        self.index(point).map(|i| self.pixels[i])
    }

    /// Region changed since the last flush.
    #[cfg(test)]
    #[must_use]
    pub fn dirty(&self) -> Option<Rectangle> {
        self.dirty
    }

    #[must_use]
    pub fn flushes(&self) -> u64 {
        self.flushes
    }

    /// Push the dirty region to the panel. Returns the region, if any.
    pub fn flush(&mut self) -> Option<Rectangle> {
        let dirty = self.dirty.take()?;
        self.flushes += 1;
        log::debug!(
            "Flush #{}: {}x{} at ({}, {})",
            self.flushes,
            dirty.size.width,
            dirty.size.height,
            dirty.top_left.x,
            dirty.top_left.y
        );
        Some(dirty)
    }

    /// Write the whole frame as a binary PPM image.
    pub fn write_ppm(&self, path: &Path) -> Result<()> {
        let mut out = Vec::with_capacity(self.pixels.len() * 3 + 32);
        write!(out, "P6\n{} {}\n255\n", self.size.width, self.size.height)
            .context("Failed to encode PPM header")?;
        for color in &self.pixels {
            let rgb = Rgb888::from(*color);
            out.extend_from_slice(&[rgb.r(), rgb.g(), rgb.b()]);
        }
        std::fs::write(path, out)
            .with_context(|| format!("Failed to write frame dump: {}", path.display()))?;
        log::info!("Frame written to {}", path.display());
        Ok(())
    }

    fn index(&self, point: Point) -> Option<usize> {
        let Size { width, height } = self.size;
        if point.x < 0
            || point.y < 0
            || point.x >= width.cast_signed()
            || point.y >= height.cast_signed()
        {
            return None;
        }
        Some((point.y.cast_unsigned() * width + point.x.cast_unsigned()) as usize)
    }

    fn mark_dirty(&mut self, area: Rectangle) {
        self.dirty = Some(match self.dirty {
            None => area,
            Some(current) => envelope(&current, &area),
        });
    }
}

/// Smallest rectangle containing both `a` and `b`.
fn envelope(a: &Rectangle, b: &Rectangle) -> Rectangle {
    let left = a.top_left.x.min(b.top_left.x);
    let top = a.top_left.y.min(b.top_left.y);
    let right = (a.top_left.x + a.size.width.cast_signed())
        .max(b.top_left.x + b.size.width.cast_signed());
    let bottom = (a.top_left.y + a.size.height.cast_signed())
        .max(b.top_left.y + b.size.height.cast_signed());
    Rectangle::new(
        Point::new(left, top),
        Size::new((right - left).cast_unsigned(), (bottom - top).cast_unsigned()),
    )
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some(index) = self.index(point) {
                self.pixels[index] = color;
                self.mark_dirty(Rectangle::new(point, Size::new(1, 1)));
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let clipped = area.intersection(&Rectangle::new(Point::zero(), self.size));
        if clipped.is_zero_sized() {
            return Ok(());
        }
        for point in clipped.points() {
            if let Some(index) = self.index(point) {
                self.pixels[index] = color;
            }
        }
        self.mark_dirty(clipped);
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.pixels.fill(color);
        self.mark_dirty(Rectangle::new(Point::zero(), self.size));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_is_clipped_to_the_frame() {
        let mut fb = FrameBuffer::new(Size::new(10, 10));
        fb.fill_solid(
            &Rectangle::new(Point::new(8, 8), Size::new(5, 5)),
            Rgb565::RED,
        )
        .unwrap();
        assert_eq!(fb.pixel(Point::new(9, 9)), Some(Rgb565::RED));
        assert_eq!(fb.pixel(Point::new(7, 7)), Some(Rgb565::BLACK));
        assert_eq!(
            fb.dirty(),
            Some(Rectangle::new(Point::new(8, 8), Size::new(2, 2)))
        );
    }

    #[test]
    fn dirty_region_grows_and_flush_resets_it() {
        let mut fb = FrameBuffer::new(Size::new(20, 20));
        fb.draw_iter([
            Pixel(Point::new(2, 3), Rgb565::WHITE),
            Pixel(Point::new(10, 12), Rgb565::WHITE),
            Pixel(Point::new(-1, 4), Rgb565::WHITE),
        ])
        .unwrap();
        assert_eq!(
            fb.flush(),
            Some(Rectangle::new(Point::new(2, 3), Size::new(9, 10)))
        );
        assert_eq!(fb.flush(), None);
        assert_eq!(fb.flushes(), 1);
    }

    #[test]
    fn clear_marks_everything() {
        let mut fb = FrameBuffer::new(Size::new(4, 3));
        fb.clear(Rgb565::BLUE).unwrap();
        assert_eq!(fb.pixel(Point::new(3, 2)), Some(Rgb565::BLUE));
        assert_eq!(fb.pixel(Point::new(4, 0)), None);
        assert_eq!(
            fb.dirty(),
            Some(Rectangle::new(Point::zero(), Size::new(4, 3)))
        );
    }

    #[test]
    fn ppm_dump_has_header_and_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.ppm");
        let mut fb = FrameBuffer::new(Size::new(2, 1));
        fb.clear(Rgb565::WHITE).unwrap();
        fb.write_ppm(&path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"P6\n2 1\n255\n"));
        assert_eq!(bytes.len(), b"P6\n2 1\n255\n".len() + 6);
        assert_eq!(&bytes[bytes.len() - 3..], &[255, 255, 255]);
    }
}
