//! # matrixproc
//!
//! Converts raster images into draw programs for display/processor matrices.
//!
//! ## Features
//!
//! - **Decomposer**: greedy "largest remaining rectangle" partition of a pixel grid
//!   into disjoint single-color rectangles
//! - **Tiling**: mosaic geometry with shared borders so neighbouring displays line up
//! - **Compiler**: `draw color` / `draw rect` instructions with the Y axis flipped
//!   for bottom-left origin displays
//! - **Budgeting**: fixed-capacity chunks, one per processor, each ending in a flush
//!
//! ## Quick Start
//!
//! ```ignore
//! use matrixproc::{convert_tile, ConvertOptions, MosaicLayout, PixelGrid};
//!
//! // RGBA image data (4 bytes per pixel)
//! let rgba = [255u8, 0, 0, 255].repeat(4); // 2x2 red square
//! let grid = PixelGrid::from_rgba(&rgba, 2, 2)?;
//! let layout = MosaicLayout::new(1, 1, 2, 0)?; // one 2px display, no border
//! let program = convert_tile(&grid, &layout.tile(0, 0)?, &ConvertOptions::default())?;
//! for chunk in &program.chunks {
//!     println!("{}", chunk);
//! }
//! ```

use thiserror::Error;

pub mod budget;
pub mod compile;
pub mod config;
pub mod decompose;
pub mod grid;
pub mod pipeline;
pub mod preview;
pub mod tile;

pub use budget::{InstructionBudget, InstructionChunk};
pub use compile::{clip_to_window, compile, parse_program, Instruction};
pub use config::{ClipPolicy, ConvertOptions, DisplaySize};
pub use decompose::{decompose, Decomposer, Rect, RectangleMap};
pub use grid::{Color, PixelGrid};
pub use pipeline::{chunk_file_name, convert_mosaic, convert_tile, MosaicProgram, TileProgram};
pub use preview::{render_preview, PreviewImage};
pub use tile::{MosaicLayout, Tile};

/// Errors that can occur while building grids, validating configuration or
/// reading instruction text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatrixError {
    /// Grid dimensions do not fit in memory or overflow
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    /// Buffer size doesn't match expected size for dimensions
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Requested crop reaches past the grid edge
    #[error("crop {x},{y} {width}x{height} exceeds grid {grid_width}x{grid_height}")]
    CropOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        grid_width: usize,
        grid_height: usize,
    },

    /// Chunk capacity must be at least one instruction
    #[error("instruction capacity must be positive")]
    InvalidCapacity,

    /// Mosaic needs at least one column, one row and a visible area
    #[error("invalid mosaic: {cols}x{rows} displays of {visible_size}px")]
    InvalidMosaic {
        cols: usize,
        rows: usize,
        visible_size: usize,
    },

    /// Display position outside the mosaic
    #[error("display ({col},{row}) is outside the mosaic")]
    TileOutOfRange { col: usize, row: usize },

    /// Line of program text that is not a known instruction
    #[error("line {line}: cannot parse instruction {text:?}")]
    Parse { line: usize, text: String },
}

/// Result type for matrixproc operations.
pub type Result<T> = core::result::Result<T, MatrixError>;

/// Instructions a single processor can hold once its reserved lines are taken.
pub const COMMANDS_PER_PROCESSOR: usize = 989;

/// Pixels shared with each neighbouring display.
pub const BORDER_SIZE: usize = 8;

/// Display block the generated programs flush to.
pub const FLUSH_TARGET: &str = "display1";
