//! Software display used to check generated programs.
//!
//! Draws replace pixels outright; the display does no alpha blending.

use crate::compile::Instruction;

/// Rendered display contents, top row first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreviewImage {
    /// RGBA pixel data (4 bytes per pixel)
    pub pixels: Vec<u8>,
    pub width: usize,
    pub height: usize,
}

impl PreviewImage {
    /// RGBA of the pixel at `(x, y)` with `y` counted from the top.
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = (y * self.width + x) * 4;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }
}

const BACKGROUND: [u8; 4] = [0, 0, 0, 255];
const DEFAULT_COLOR: [u8; 4] = [255, 255, 255, 255];

/// Execute `instructions` on a blank `width x height` display.
///
/// Rectangles are given with the origin at the bottom-left and are clipped to
/// the display. Flushes are no-ops.
pub fn render_preview<'a>(
    instructions: impl IntoIterator<Item = &'a Instruction>,
    width: usize,
    height: usize,
) -> PreviewImage {
    let mut pixels = BACKGROUND.repeat(width * height);
    let mut color = DEFAULT_COLOR;

    for instruction in instructions {
        match *instruction {
            Instruction::Color { r, g, b, a } => color = [r, g, b, a],
            Instruction::Rect { x, y, w, h } => {
                let (w_px, h_px) = (width as i64, height as i64);
                // coordinates come from program files, saturate before clamping
                let left = x.clamp(0, w_px);
                let right = x.saturating_add(w).clamp(0, w_px);
                // flip back to a top-left origin
                let top = h_px.saturating_sub(y.saturating_add(h)).clamp(0, h_px);
                let bottom = h_px.saturating_sub(y).clamp(0, h_px);
                for row in top..bottom {
                    for col in left..right {
                        let i = (row as usize * width + col as usize) * 4;
                        pixels[i..i + 4].copy_from_slice(&color);
                    }
                }
            }
            Instruction::Flush => {}
        }
    }

    PreviewImage {
        pixels,
        width,
        height,
    }
}
