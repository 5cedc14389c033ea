//! matrixproc - Turn images into display/processor programs
//!
//! A command-line tool that scales an image onto a mosaic of logic displays
//! and writes one instruction file per processor.

use clap::{Args, Parser, Subcommand, ValueEnum};
use matrixproc::{
    chunk_file_name, convert_mosaic, parse_program, render_preview, ClipPolicy, ConvertOptions,
    DisplaySize, MosaicLayout, MosaicProgram, PixelGrid, BORDER_SIZE, COMMANDS_PER_PROCESSOR,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "matrixproc")]
#[command(version)]
#[command(about = "Turn images into display/processor programs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an image and write one program file per processor
    Convert {
        /// Input image file (PNG, JPEG, GIF, WebP)
        input: PathBuf,

        #[command(flatten)]
        mosaic: MosaicArgs,

        /// Output directory for program files (cleared first)
        #[arg(short, long, default_value = "outputProcessors")]
        output: PathBuf,

        /// Also save the scaled master image to the output directory
        #[arg(long)]
        save_master: bool,
    },

    /// Convert an image and print instruction and processor counts only
    Stats {
        /// Input image file (PNG, JPEG, GIF, WebP)
        input: PathBuf,

        #[command(flatten)]
        mosaic: MosaicArgs,
    },

    /// Render program files as the display would show them
    Preview {
        /// Program files, executed in the order given
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Display block size (3 or 6)
        #[arg(short, long, default_value = "3")]
        display_size: u32,

        /// Output PNG file
        #[arg(short, long, default_value = "preview.png")]
        output: PathBuf,
    },
}

#[derive(Args)]
struct MosaicArgs {
    /// Displays per row
    #[arg(long, default_value = "1")]
    cols: usize,

    /// Displays per column
    #[arg(long, default_value = "1")]
    rows: usize,

    /// Display block size (3 or 6)
    #[arg(short, long, default_value = "3")]
    display_size: u32,

    /// Instructions per processor, excluding the flush
    #[arg(short, long, default_value_t = COMMANDS_PER_PROCESSOR)]
    capacity: usize,

    /// Pixels shared with neighbouring displays
    #[arg(short, long, default_value_t = BORDER_SIZE)]
    border: usize,

    /// Handling of rectangles that spill over the display edge
    #[arg(long, value_enum, default_value_t = ClipArg::Clip)]
    clip: ClipArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum ClipArg {
    Clip,
    Drop,
    Keep,
}

impl From<ClipArg> for ClipPolicy {
    fn from(arg: ClipArg) -> Self {
        match arg {
            ClipArg::Clip => ClipPolicy::Clip,
            ClipArg::Drop => ClipPolicy::Drop,
            ClipArg::Keep => ClipPolicy::Keep,
        }
    }
}

impl MosaicArgs {
    fn options(&self) -> ConvertOptions {
        ConvertOptions {
            capacity: self.capacity,
            border: self.border,
            clip: self.clip.into(),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            mosaic,
            output,
            save_master,
        } => {
            let opts = mosaic.options();
            let display = DisplaySize::from_block_size(mosaic.display_size);
            let layout = opts.layout(mosaic.cols, mosaic.rows, display)?;
            opts.budget()?;
            let master = load_master(&input, &layout)?;

            clean_output_dir(&output)?;
            if save_master {
                save_rgba(&output.join("scaled_master_image.png"), &master)?;
            }

            let program = convert_mosaic(&master, &layout, &opts)?;
            let mut written = 0;
            for tile in &program.tiles {
                for (p, chunk) in tile.chunks.iter().enumerate() {
                    let path = output.join(chunk_file_name(tile.display_index, p));
                    fs::write(&path, chunk.to_string())
                        .map_err(|e| format!("Failed to write '{}': {}", path.display(), e))?;
                    written += 1;
                }
            }

            report(&program);
            tracing::info!("Written {} program files to '{}'", written, output.display());
        }

        Commands::Stats { input, mosaic } => {
            let opts = mosaic.options();
            let display = DisplaySize::from_block_size(mosaic.display_size);
            let layout = opts.layout(mosaic.cols, mosaic.rows, display)?;
            opts.budget()?;
            let master = load_master(&input, &layout)?;
            let program = convert_mosaic(&master, &layout, &opts)?;
            report(&program);
        }

        Commands::Preview {
            inputs,
            display_size,
            output,
        } => {
            let mut instructions = Vec::new();
            for path in &inputs {
                let text = fs::read_to_string(path)
                    .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
                let program = parse_program(&text)
                    .map_err(|e| format!("'{}': {}", path.display(), e))?;
                instructions.extend(program);
            }

            let size = DisplaySize::from_block_size(display_size).pixel_size();
            let preview = render_preview(&instructions, size, size);
            let img = image::RgbaImage::from_raw(size as u32, size as u32, preview.pixels)
                .ok_or("Failed to create image from preview data")?;
            img.save(&output)?;

            tracing::info!(
                "Rendered {} instructions from {} files -> '{}'",
                instructions.len(),
                inputs.len(),
                output.display()
            );
        }
    }

    Ok(())
}

/// Decode `input` and scale it to the layout's master size.
fn load_master(input: &Path, layout: &MosaicLayout) -> Result<PixelGrid, Box<dyn std::error::Error>> {
    let (width, height) = layout.master_size();
    let (Ok(target_w), Ok(target_h)) = (u32::try_from(width), u32::try_from(height)) else {
        return Err(format!("Master image {}x{} is too large to scale", width, height).into());
    };
    let img = image::open(input).map_err(|e| format!("Failed to open '{}': {}", input.display(), e))?;

    tracing::info!(
        "Scaling '{}' ({}x{}) to {}x{} for {}x{} displays of {}px, border {}px",
        input.display(),
        img.width(),
        img.height(),
        width,
        height,
        layout.cols(),
        layout.rows(),
        layout.visible_size(),
        layout.border()
    );

    let scaled = img
        .resize_exact(target_w, target_h, image::imageops::FilterType::Lanczos3)
        .to_rgba8();
    Ok(PixelGrid::from_rgba(scaled.as_raw(), width, height)?)
}

/// Remove files left over from a previous run, or create the directory.
fn clean_output_dir(dir: &Path) -> std::io::Result<()> {
    if dir.exists() {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    } else {
        fs::create_dir_all(dir)
    }
}

fn save_rgba(path: &Path, grid: &PixelGrid) -> Result<(), Box<dyn std::error::Error>> {
    let rgba: Vec<u8> = grid.pixels().iter().flat_map(|c| c.to_rgba()).collect();
    let img = image::RgbaImage::from_raw(grid.width() as u32, grid.height() as u32, rgba)
        .ok_or("Failed to create image from master data")?;
    img.save(path)?;
    Ok(())
}

fn report(program: &MosaicProgram) {
    for tile in &program.tiles {
        let t = &tile.tile;
        tracing::info!(
            "Display {} (X:{},Y:{}): slice {}x{}, offset ({},{}), {} rects, {} instructions -> {} processors",
            tile.display_index,
            t.col,
            t.row,
            t.slice_width,
            t.slice_height,
            t.offset_x,
            t.offset_y,
            tile.rect_count,
            tile.instructions.len(),
            tile.processor_count()
        );
    }
    tracing::info!(
        "Processors per display: {:?} ({} instructions total)",
        program.processors_per_display(),
        program.total_instructions()
    );
}
