//! Mosaic geometry.
//!
//! A mosaic is `cols x rows` displays, each showing `visible_size` pixels per
//! side. Every display decodes a slice of the master image that also includes
//! `border` extra pixels on each side that has a neighbour, so that large
//! regions crossing a display edge break into rectangles the same way on both
//! sides. Slices are laid out back to back: a display's slice starts where the
//! previous column's (or row's) slice ends.

use crate::{MatrixError, Result};

/// One display's slice of the master image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    pub col: usize,
    pub row: usize,
    /// Top-left corner of the slice in the master image.
    pub source_x: usize,
    pub source_y: usize,
    pub slice_width: usize,
    pub slice_height: usize,
    /// Border pixels in front of the visible area, to subtract from
    /// slice-local coordinates.
    pub offset_x: usize,
    pub offset_y: usize,
    pub visible_size: usize,
}

impl Tile {
    /// Visible window in slice-local coordinates: `(x, y, width, height)`.
    pub fn visible_window(&self) -> (usize, usize, usize, usize) {
        (
            self.offset_x,
            self.offset_y,
            self.visible_size.min(self.slice_width - self.offset_x),
            self.visible_size.min(self.slice_height - self.offset_y),
        )
    }
}

/// Grid of displays sharing one master image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MosaicLayout {
    cols: usize,
    rows: usize,
    visible_size: usize,
    border: usize,
}

impl MosaicLayout {
    /// Rejects empty mosaics and mosaics whose master image size or pixel
    /// count does not fit in `usize`.
    pub fn new(cols: usize, rows: usize, visible_size: usize, border: usize) -> Result<Self> {
        let invalid = MatrixError::InvalidMosaic {
            cols,
            rows,
            visible_size,
        };
        if cols == 0 || rows == 0 || visible_size == 0 {
            return Err(invalid);
        }
        let width = axis_length(cols, visible_size, border);
        let height = axis_length(rows, visible_size, border);
        let representable = match (width, height) {
            (Some(w), Some(h)) => w.checked_mul(h).is_some() && cols.checked_mul(rows).is_some(),
            _ => false,
        };
        if !representable {
            return Err(invalid);
        }
        Ok(Self {
            cols,
            rows,
            visible_size,
            border,
        })
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn visible_size(&self) -> usize {
        self.visible_size
    }

    pub fn border(&self) -> usize {
        self.border
    }

    /// Size the master image must be scaled to, `(width, height)`.
    pub fn master_size(&self) -> (usize, usize) {
        (
            self.cols * self.visible_size + 2 * self.border * (self.cols - 1),
            self.rows * self.visible_size + 2 * self.border * (self.rows - 1),
        )
    }

    /// Column-major display index, used to name output files.
    pub fn display_index(&self, col: usize, row: usize) -> usize {
        col * self.rows + row
    }

    pub fn tile(&self, col: usize, row: usize) -> Result<Tile> {
        if col >= self.cols || row >= self.rows {
            return Err(MatrixError::TileOutOfRange { col, row });
        }
        Ok(self.tile_at(col, row))
    }

    /// All tiles in display-index order.
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        (0..self.cols).flat_map(move |col| (0..self.rows).map(move |row| self.tile_at(col, row)))
    }

    fn tile_at(&self, col: usize, row: usize) -> Tile {
        Tile {
            col,
            row,
            source_x: (0..col).map(|c| self.span(c, self.cols)).sum(),
            source_y: (0..row).map(|r| self.span(r, self.rows)).sum(),
            slice_width: self.span(col, self.cols),
            slice_height: self.span(row, self.rows),
            offset_x: self.lead(col),
            offset_y: self.lead(row),
            visible_size: self.visible_size,
        }
    }

    /// Border in front of position `i`.
    #[inline]
    fn lead(&self, i: usize) -> usize {
        if i > 0 {
            self.border
        } else {
            0
        }
    }

    /// Slice length at position `i` of `count` along one axis.
    #[inline]
    fn span(&self, i: usize, count: usize) -> usize {
        let trail = if i + 1 < count { self.border } else { 0 };
        self.lead(i) + self.visible_size + trail
    }
}

/// Master length along one axis of `count` displays, `None` on overflow.
fn axis_length(count: usize, visible_size: usize, border: usize) -> Option<usize> {
    let shared = border.checked_mul(2)?.checked_mul(count - 1)?;
    visible_size.checked_mul(count)?.checked_add(shared)
}
