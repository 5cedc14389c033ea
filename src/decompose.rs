//! Greedy rectangle decomposition.
//!
//! Each pass evaluates the largest same-color rectangle anchored at every
//! unused cell and commits the single biggest one. Ties go to the anchor that
//! comes first in row-major order. This is not a minimum cover, but it is
//! deterministic and commits large areas first, which keeps instruction counts
//! low for typical pixel art.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::grid::{Color, PixelGrid};

/// Cell range `[x, x + w) x [y, y + h)` in grid coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub w: usize,
    pub h: usize,
}

impl Rect {
    pub const fn new(x: usize, y: usize, w: usize, h: usize) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub const fn area(&self) -> usize {
        self.w * self.h
    }

    #[inline]
    pub const fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && x - self.x < self.w && y >= self.y && y - self.y < self.h
    }
}

/// Rectangles grouped by color.
///
/// Colors iterate in the order their first rectangle was found; each color's
/// rectangles keep discovery order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RectangleMap {
    order: Vec<Color>,
    rects: HashMap<Color, Vec<Rect>>,
}

impl RectangleMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, color: Color, rect: Rect) {
        match self.rects.entry(color) {
            Entry::Occupied(mut entry) => entry.get_mut().push(rect),
            Entry::Vacant(entry) => {
                self.order.push(color);
                entry.insert(vec![rect]);
            }
        }
    }

    pub fn get(&self, color: Color) -> Option<&[Rect]> {
        self.rects.get(&color).map(Vec::as_slice)
    }

    /// Colors in discovery order.
    pub fn colors(&self) -> &[Color] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = (Color, &[Rect])> + '_ {
        self.order
            .iter()
            .map(move |color| (*color, self.rects[color].as_slice()))
    }

    /// Number of distinct colors.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Total rectangles across all colors.
    pub fn rect_count(&self) -> usize {
        self.rects.values().map(Vec::len).sum()
    }
}

/// Partition `grid` into disjoint single-color rectangles.
///
/// Every cell ends up in exactly one rectangle, filed under that cell's color.
pub fn decompose(grid: &PixelGrid) -> RectangleMap {
    let mut out = RectangleMap::new();
    for (color, rect) in Decomposer::new(grid) {
        out.push(color, rect);
    }

    tracing::debug!(
        width = grid.width(),
        height = grid.height(),
        colors = out.len(),
        rects = out.rect_count(),
        "decomposed grid"
    );
    out
}

/// Step-by-step decomposition. Yields each committed rectangle with its
/// color, largest first.
pub struct Decomposer<'a> {
    grid: &'a PixelGrid,
    used: Vec<bool>,
    remaining: usize,
}

impl<'a> Decomposer<'a> {
    pub fn new(grid: &'a PixelGrid) -> Self {
        let cells = grid.width() * grid.height();
        Self {
            grid,
            used: vec![false; cells],
            remaining: cells,
        }
    }

    #[inline]
    fn is_free(&self, x: usize, y: usize, color: Color) -> bool {
        !self.used[y * self.grid.width() + x] && self.grid.get(x, y) == color
    }

    /// Scan every unused anchor and return the strictly largest candidate.
    fn best_candidate(&self) -> Option<(Color, Rect)> {
        if self.remaining == 0 {
            return None;
        }

        let mut best: Option<(Color, Rect)> = None;
        let mut best_area = 0;
        for y in 0..self.grid.height() {
            for x in 0..self.grid.width() {
                if self.used[y * self.grid.width() + x] {
                    continue;
                }
                let color = self.grid.get(x, y);
                let candidate = self.largest_at(x, y, color);
                // strict comparison keeps the earliest anchor on ties
                if candidate.area() > best_area {
                    best_area = candidate.area();
                    best = Some((color, candidate));
                }
            }
        }
        best
    }

    /// Largest rectangle of `color` with its top-left corner at `(start_x, start_y)`.
    fn largest_at(&self, start_x: usize, start_y: usize, color: Color) -> Rect {
        let mut max_width = (start_x..self.grid.width())
            .take_while(|&x| self.is_free(x, start_y, color))
            .count();

        let mut best_area = 0;
        let mut best = Rect::new(start_x, start_y, 0, 0);

        for y in start_y..self.grid.height() {
            let current_width = (start_x..start_x + max_width)
                .take_while(|&x| self.is_free(x, y, color))
                .count();
            max_width = max_width.min(current_width);
            if max_width == 0 {
                break;
            }

            let height = y - start_y + 1;
            let area = max_width * height;
            if area > best_area {
                best_area = area;
                best = Rect::new(start_x, start_y, max_width, height);
            }
        }
        best
    }

    fn mark(&mut self, rect: &Rect) {
        let width = self.grid.width();
        for y in rect.y..rect.y + rect.h {
            self.used[y * width + rect.x..y * width + rect.x + rect.w].fill(true);
        }
        self.remaining -= rect.area();
    }
}

impl Iterator for Decomposer<'_> {
    type Item = (Color, Rect);

    fn next(&mut self) -> Option<Self::Item> {
        let (color, rect) = self.best_candidate()?;
        self.mark(&rect);
        Some((color, rect))
    }
}
