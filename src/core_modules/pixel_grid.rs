// THEORY:
// The pixel grid is the read-only input to the aggregator. The aggregator never
// cares where pixels come from, so the grid is a trait: anything that knows its
// dimensions and can hand back a normalized `Color` for an (x, y) position.
//
// Two implementations live here:
// - `ColorGrid`, a flattened row-major `Vec<Color>`, handy for tests and for
//   callers that already hold decoded colors.
// - `image::ImageBuffer<Rgba<u16>, _>`, the wide-precision buffer the map loader
//   produces. Sampling it applies `Color::normalize`.
//
// Sampling outside the grid yields `Color::TRANSPARENT` instead of panicking, so
// an over-scanning caller still gets a deterministic answer.

use crate::core_modules::color::color::Color;
use image::{ImageBuffer, Rgba};
use std::ops::Deref;

/// A bounded, addressable raster of colors.
pub trait PixelGrid {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// The normalized color at (x, y), or transparent black outside the grid.
    fn sample(&self, x: u32, y: u32) -> Color;

    fn pixel_count(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width() && y < self.height()
    }
}

/// An in-memory grid of already-normalized colors, stored row by row.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorGrid {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl ColorGrid {
    /// Builds a grid from row-major pixels. Returns `None` if the pixel count
    /// does not equal `width * height`.
    pub fn new(width: u32, height: u32, pixels: Vec<Color>) -> Option<Self> {
        if pixels.len() as u64 != width as u64 * height as u64 {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    /// A grid painted in a single color.
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    fn index_of(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        if self.contains(x, y) {
            let index = self.index_of(x, y);
            self.pixels[index] = color;
        }
    }
}

impl PixelGrid for ColorGrid {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn sample(&self, x: u32, y: u32) -> Color {
        if !self.contains(x, y) {
            return Color::TRANSPARENT;
        }
        self.pixels[self.index_of(x, y)]
    }
}

impl<C> PixelGrid for ImageBuffer<Rgba<u16>, C>
where
    C: Deref<Target = [u16]>,
{
    fn width(&self) -> u32 {
        ImageBuffer::width(self)
    }

    fn height(&self) -> u32 {
        ImageBuffer::height(self)
    }

    fn sample(&self, x: u32, y: u32) -> Color {
        match self.get_pixel_checked(x, y) {
            Some(Rgba(channels)) => Color::from(*channels),
            None => Color::TRANSPARENT,
        }
    }
}
