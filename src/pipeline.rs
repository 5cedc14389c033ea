//! Tile and mosaic conversion: decompose, clip, compile, chunk.

use crate::budget::{InstructionBudget, InstructionChunk};
use crate::compile::{clip_to_window, compile, Instruction};
use crate::config::ConvertOptions;
use crate::decompose::decompose;
use crate::grid::PixelGrid;
use crate::tile::{MosaicLayout, Tile};
use crate::Result;

/// Everything generated for one display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileProgram {
    pub tile: Tile,
    /// Position in the mosaic's output, column-major.
    pub display_index: usize,
    pub rect_count: usize,
    pub instructions: Vec<Instruction>,
    pub chunks: Vec<InstructionChunk>,
}

impl TileProgram {
    /// Processors this display needs.
    pub fn processor_count(&self) -> usize {
        self.chunks.len()
    }
}

/// Programs for every display of a mosaic, in display-index order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MosaicProgram {
    pub layout: MosaicLayout,
    pub tiles: Vec<TileProgram>,
}

impl MosaicProgram {
    /// Processor count per display, indexed by display index.
    pub fn processors_per_display(&self) -> Vec<usize> {
        self.tiles.iter().map(TileProgram::processor_count).collect()
    }

    pub fn total_instructions(&self) -> usize {
        self.tiles.iter().map(|t| t.instructions.len()).sum()
    }
}

/// Convert `slice`, the part of the master image cut out for `tile`.
pub fn convert_tile(slice: &PixelGrid, tile: &Tile, opts: &ConvertOptions) -> Result<TileProgram> {
    let budget = opts.budget()?;
    Ok(convert_with_budget(slice, tile, 0, opts, &budget))
}

/// Slice `master` according to `layout` and convert every display.
///
/// `master` must be exactly [`MosaicLayout::master_size`].
pub fn convert_mosaic(
    master: &PixelGrid,
    layout: &MosaicLayout,
    opts: &ConvertOptions,
) -> Result<MosaicProgram> {
    let budget = opts.budget()?;

    let tiles = layout
        .tiles()
        .map(|tile| {
            let slice = master.crop(
                tile.source_x,
                tile.source_y,
                tile.slice_width,
                tile.slice_height,
            )?;
            let display_index = layout.display_index(tile.col, tile.row);
            Ok(convert_with_budget(
                &slice,
                &tile,
                display_index,
                opts,
                &budget,
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(MosaicProgram {
        layout: *layout,
        tiles,
    })
}

fn convert_with_budget(
    slice: &PixelGrid,
    tile: &Tile,
    display_index: usize,
    opts: &ConvertOptions,
    budget: &InstructionBudget,
) -> TileProgram {
    let rects = clip_to_window(&decompose(slice), tile, opts.clip);
    let instructions = compile(&rects, tile.offset_x, tile.offset_y, tile.visible_size);
    let chunks = budget.chunk(&instructions);

    tracing::debug!(
        display = display_index,
        col = tile.col,
        row = tile.row,
        slice_width = tile.slice_width,
        slice_height = tile.slice_height,
        offset_x = tile.offset_x,
        offset_y = tile.offset_y,
        instructions = instructions.len(),
        processors = chunks.len(),
        "converted display"
    );

    TileProgram {
        tile: *tile,
        display_index,
        rect_count: rects.rect_count(),
        instructions,
        chunks,
    }
}

/// File name for a display's `processor`-th chunk.
pub fn chunk_file_name(display_index: usize, processor: usize) -> String {
    format!("display_{display_index}_proc_{processor}.txt")
}
