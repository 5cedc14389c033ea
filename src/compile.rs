//! Rectangle maps to display instructions.
//!
//! Instruction text format, one per line:
//!
//! ```text
//! draw color <R> <G> <B> <A> 0 0
//! draw rect <X> <Y> <W> <H> 0 0
//! drawflush display1
//! ```
//!
//! Displays put the origin at the bottom-left corner, grids at the top-left,
//! so rectangle Y coordinates are flipped on the way out.

use std::fmt;
use std::str::FromStr;

use crate::config::ClipPolicy;
use crate::decompose::{Rect, RectangleMap};
use crate::grid::Color;
use crate::tile::Tile;
use crate::{MatrixError, Result, FLUSH_TARGET};

/// A single display instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// Select the draw color.
    Color { r: u8, g: u8, b: u8, a: u8 },
    /// Fill a rectangle in display coordinates (origin bottom-left).
    Rect { x: i64, y: i64, w: i64, h: i64 },
    /// Push buffered draws to the display.
    Flush,
}

impl Instruction {
    pub fn color(color: Color) -> Self {
        Instruction::Color {
            r: color.r(),
            g: color.g(),
            b: color.b(),
            a: color.a(),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Instruction::Color { r, g, b, a } => write!(f, "draw color {r} {g} {b} {a} 0 0"),
            Instruction::Rect { x, y, w, h } => write!(f, "draw rect {x} {y} {w} {h} 0 0"),
            Instruction::Flush => write!(f, "drawflush {FLUSH_TARGET}"),
        }
    }
}

impl FromStr for Instruction {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<Self> {
        let err = || MatrixError::Parse {
            line: 0,
            text: s.to_string(),
        };
        let words: Vec<&str> = s.split_whitespace().collect();
        match words.as_slice() {
            ["drawflush", target] if *target == FLUSH_TARGET => Ok(Instruction::Flush),
            ["draw", "color", r, g, b, a, "0", "0"] => Ok(Instruction::Color {
                r: r.parse().map_err(|_| err())?,
                g: g.parse().map_err(|_| err())?,
                b: b.parse().map_err(|_| err())?,
                a: a.parse().map_err(|_| err())?,
            }),
            ["draw", "rect", x, y, w, h, "0", "0"] => Ok(Instruction::Rect {
                x: x.parse().map_err(|_| err())?,
                y: y.parse().map_err(|_| err())?,
                w: w.parse().map_err(|_| err())?,
                h: h.parse().map_err(|_| err())?,
            }),
            _ => Err(err()),
        }
    }
}

/// Parse program text, one instruction per line. Blank lines are skipped.
/// Errors carry the 1-based line number.
pub fn parse_program(text: &str) -> Result<Vec<Instruction>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            line.parse().map_err(|_| MatrixError::Parse {
                line: i + 1,
                text: line.to_string(),
            })
        })
        .collect()
}

/// Turn a rectangle map into instructions for one display.
///
/// Each color with rectangles yields a color instruction followed by its
/// rectangles. Coordinates are shifted by `(offset_x, offset_y)` and flipped
/// against `visible_height`. No bounds checking happens here; see
/// [`clip_to_window`].
pub fn compile(
    map: &RectangleMap,
    offset_x: usize,
    offset_y: usize,
    visible_height: usize,
) -> Vec<Instruction> {
    let mut out = Vec::with_capacity(map.len() + map.rect_count());
    for (color, rects) in map.iter() {
        if rects.is_empty() {
            continue;
        }
        out.push(Instruction::color(color));
        for rect in rects {
            let x = rect.x as i64 - offset_x as i64;
            let y = rect.y as i64 - offset_y as i64;
            let h = rect.h as i64;
            out.push(Instruction::Rect {
                x,
                y: visible_height as i64 - y - h,
                w: rect.w as i64,
                h,
            });
        }
    }
    out
}

/// Apply `policy` to rectangles that reach outside `tile`'s visible window.
///
/// Coordinates stay slice-local; colors left with no rectangles are removed.
pub fn clip_to_window(map: &RectangleMap, tile: &Tile, policy: ClipPolicy) -> RectangleMap {
    if policy == ClipPolicy::Keep {
        return map.clone();
    }

    let (wx, wy, ww, wh) = tile.visible_window();
    let mut out = RectangleMap::new();
    let mut removed = 0usize;
    for (color, rects) in map.iter() {
        for rect in rects {
            let left = rect.x.max(wx);
            let top = rect.y.max(wy);
            let right = (rect.x + rect.w).min(wx + ww);
            let bottom = (rect.y + rect.h).min(wy + wh);
            if left >= right || top >= bottom {
                removed += 1;
                continue;
            }
            let clipped = Rect::new(left, top, right - left, bottom - top);
            match policy {
                ClipPolicy::Drop if clipped != *rect => removed += 1,
                _ => out.push(color, clipped),
            }
        }
    }

    if removed > 0 {
        tracing::debug!(
            col = tile.col,
            row = tile.row,
            removed,
            ?policy,
            "removed border rectangles"
        );
    }
    out
}
