//! Conversion options and display sizes.

use crate::budget::InstructionBudget;
use crate::tile::MosaicLayout;
use crate::{Result, BORDER_SIZE, COMMANDS_PER_PROCESSOR};

/// What to do with rectangles that reach outside a display's visible window
/// once the shared border is stripped off.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClipPolicy {
    /// Trim rectangles to the window, dropping any that end up empty.
    #[default]
    Clip,
    /// Drop rectangles that are not entirely inside the window.
    Drop,
    /// Emit coordinates as they are, even if they fall off the display.
    Keep,
}

/// Options for converting tiles into processor programs.
#[derive(Clone, Debug)]
pub struct ConvertOptions {
    /// Instructions per processor, not counting the trailing flush.
    pub capacity: usize,

    /// Pixels shared with each neighbouring display.
    pub border: usize,

    /// Handling of rectangles that spill into the border.
    pub clip: ClipPolicy,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            capacity: COMMANDS_PER_PROCESSOR,
            border: BORDER_SIZE,
            clip: ClipPolicy::default(),
        }
    }
}

impl ConvertOptions {
    /// Mosaic of `cols x rows` displays of type `display` using this border.
    pub fn layout(&self, cols: usize, rows: usize, display: DisplaySize) -> Result<MosaicLayout> {
        MosaicLayout::new(cols, rows, display.pixel_size(), self.border)
    }

    /// Per-processor budget for `capacity`. Fails on a zero capacity, so
    /// callers can validate before touching any image or file.
    pub fn budget(&self) -> Result<InstructionBudget> {
        InstructionBudget::new(self.capacity)
    }
}

/// In-world display blocks and their drawable area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DisplaySize {
    /// 3x3 logic display, 80px visible
    #[default]
    Logic,
    /// 6x6 large logic display, 176px visible
    LargeLogic,
}

impl DisplaySize {
    /// Map a block size to a display. Unknown sizes fall back to the 3x3
    /// display with a warning.
    pub fn from_block_size(block_size: u32) -> Self {
        match block_size {
            3 => DisplaySize::Logic,
            6 => DisplaySize::LargeLogic,
            other => {
                tracing::warn!(
                    block_size = other,
                    "unknown display size, falling back to {}px",
                    DisplaySize::Logic.pixel_size()
                );
                DisplaySize::Logic
            }
        }
    }

    pub const fn block_size(self) -> u32 {
        match self {
            DisplaySize::Logic => 3,
            DisplaySize::LargeLogic => 6,
        }
    }

    /// Visible pixels along each side.
    pub const fn pixel_size(self) -> usize {
        match self {
            DisplaySize::Logic => 80,
            DisplaySize::LargeLogic => 176,
        }
    }
}
