//! Dense color grids.

use crate::{MatrixError, Result};

/// Packed `0xAARRGGBB` color. Two pixels are the same color only if every
/// bit matches; there is no blending or palette lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Color(pub u32);

impl Color {
    #[inline]
    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    #[inline]
    pub const fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_argb(a, r, g, b)
    }

    #[inline]
    pub const fn a(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn b(self) -> u8 {
        self.0 as u8
    }

    /// Channels in RGBA byte order.
    #[inline]
    pub const fn to_rgba(self) -> [u8; 4] {
        [self.r(), self.g(), self.b(), self.a()]
    }
}

/// Row-major grid of colors, indexed `y * width + x`.
///
/// A grid is immutable once built. Zero-area grids are allowed and decompose
/// to nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelGrid {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl PixelGrid {
    /// Build a grid from row-major colors.
    pub fn new(width: usize, height: usize, pixels: Vec<Color>) -> Result<Self> {
        let expected = width
            .checked_mul(height)
            .ok_or(MatrixError::InvalidDimensions { width, height })?;
        if pixels.len() != expected {
            return Err(MatrixError::BufferSizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a grid from raw RGBA data (4 bytes per pixel: R, G, B, A).
    pub fn from_rgba(rgba: &[u8], width: usize, height: usize) -> Result<Self> {
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(4))
            .ok_or(MatrixError::InvalidDimensions { width, height })?;
        if rgba.len() != expected {
            return Err(MatrixError::BufferSizeMismatch {
                expected,
                actual: rgba.len(),
            });
        }
        let pixels = rgba
            .chunks_exact(4)
            .map(|c| Color::from_rgba(c[0], c[1], c[2], c[3]))
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a grid by evaluating `f(x, y)` for every cell.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> Color) -> Self {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Color at `(x, y)`. Coordinates must be inside the grid.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Color {
        debug_assert!(x < self.width && y < self.height);
        self.pixels[y * self.width + x]
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Copy out the `width x height` region whose top-left corner is `(x, y)`.
    pub fn crop(&self, x: usize, y: usize, width: usize, height: usize) -> Result<Self> {
        let fits = x
            .checked_add(width)
            .is_some_and(|right| right <= self.width)
            && y.checked_add(height)
                .is_some_and(|bottom| bottom <= self.height);
        if !fits {
            return Err(MatrixError::CropOutOfBounds {
                x,
                y,
                width,
                height,
                grid_width: self.width,
                grid_height: self.height,
            });
        }

        let mut pixels = Vec::with_capacity(width * height);
        for row in y..y + height {
            let start = row * self.width + x;
            pixels.extend_from_slice(&self.pixels[start..start + width]);
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }
}
