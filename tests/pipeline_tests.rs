use matrixproc::*;
use pretty_assertions::assert_eq;

const RED: Color = Color(0xFFFF0000);
const WHITE: Color = Color(0xFFFFFFFF);
const NAVY: Color = Color(0xFF000080);

/// Circle on a white background, with a navy band across the bottom.
fn scene(width: usize, height: usize) -> PixelGrid {
    let (cx, cy) = (width as i64 / 2, height as i64 / 2);
    let radius = (width.min(height) / 3) as i64;
    PixelGrid::from_fn(width, height, |x, y| {
        let (dx, dy) = (x as i64 - cx, y as i64 - cy);
        if dx * dx + dy * dy <= radius * radius {
            RED
        } else if y >= height * 4 / 5 {
            NAVY
        } else {
            WHITE
        }
    })
}

fn visible_part(master: &PixelGrid, tile: &Tile) -> PixelGrid {
    master
        .crop(
            tile.source_x + tile.offset_x,
            tile.source_y + tile.offset_y,
            tile.visible_size,
            tile.visible_size,
        )
        .unwrap()
}

fn assert_preview_matches(program: &TileProgram, expected: &PixelGrid) {
    let size = program.tile.visible_size;
    let preview = render_preview(&program.instructions, size, size);
    for y in 0..size {
        for x in 0..size {
            assert_eq!(
                preview.pixel(x, y),
                expected.get(x, y).to_rgba(),
                "display {} pixel ({x},{y})",
                program.display_index
            );
        }
    }
}

#[test]
fn test_single_red_square_program() {
    let grid = PixelGrid::new(2, 2, vec![RED; 4]).unwrap();
    let tile = MosaicLayout::new(1, 1, 2, 0).unwrap().tile(0, 0).unwrap();
    let program = convert_tile(&grid, &tile, &ConvertOptions::default()).unwrap();

    assert_eq!(
        program.instructions,
        vec![
            Instruction::Color {
                r: 255,
                g: 0,
                b: 0,
                a: 255
            },
            Instruction::Rect {
                x: 0,
                y: 0,
                w: 2,
                h: 2
            },
        ]
    );
    assert_eq!(program.chunks.len(), 1);
    assert_eq!(
        program.chunks[0].to_string(),
        "draw color 255 0 0 255 0 0\ndraw rect 0 0 2 2 0 0\ndrawflush display1"
    );
}

#[test]
fn test_budgeting_reproduces_program() {
    let grid = scene(60, 60);
    let tile = MosaicLayout::new(1, 1, 60, 0).unwrap().tile(0, 0).unwrap();
    let opts = ConvertOptions {
        capacity: 7,
        ..Default::default()
    };
    let program = convert_tile(&grid, &tile, &opts).unwrap();

    let rejoined: Vec<Instruction> = program
        .chunks
        .iter()
        .flat_map(|c| c.payload().iter().copied())
        .collect();
    assert_eq!(rejoined, program.instructions);
    assert!(program.chunks.iter().all(|c| c.payload().len() <= 7));
    for chunk in &program.chunks {
        let text = chunk.to_string();
        assert_eq!(text.lines().last(), Some("drawflush display1"));
        assert_eq!(text.matches("drawflush").count(), 1);
    }
    assert_eq!(
        program.processor_count(),
        program.instructions.len().div_ceil(7)
    );
}

#[test]
fn test_single_display_preview_matches_source() {
    let grid = scene(40, 40);
    let tile = MosaicLayout::new(1, 1, 40, 0).unwrap().tile(0, 0).unwrap();
    let program = convert_tile(&grid, &tile, &ConvertOptions::default()).unwrap();
    assert_preview_matches(&program, &grid);
}

#[test]
fn test_mosaic_preview_matches_every_display() {
    let layout = MosaicLayout::new(3, 2, 20, 4).unwrap();
    let (w, h) = layout.master_size();
    assert_eq!((w, h), (3 * 20 + 2 * 2 * 4, 2 * 20 + 2 * 4));
    let master = scene(w, h);

    let opts = ConvertOptions {
        border: 4,
        ..Default::default()
    };
    let program = convert_mosaic(&master, &layout, &opts).unwrap();
    assert_eq!(program.tiles.len(), 6);

    for (i, tile_program) in program.tiles.iter().enumerate() {
        assert_eq!(tile_program.display_index, i);
        let expected = visible_part(&master, &tile_program.tile);
        assert_preview_matches(tile_program, &expected);
    }
}

#[test]
fn test_clip_keeps_coordinates_on_display() {
    let layout = MosaicLayout::new(2, 2, 16, 8).unwrap();
    let (w, h) = layout.master_size();
    let master = scene(w, h);

    let clipped = convert_mosaic(&master, &layout, &ConvertOptions::default()).unwrap();
    for tile in &clipped.tiles {
        for instruction in &tile.instructions {
            if let Instruction::Rect { x, y, w, h } = *instruction {
                assert!(x >= 0 && y >= 0 && x + w <= 16 && y + h <= 16);
            }
        }
    }

    let keep = ConvertOptions {
        clip: ClipPolicy::Keep,
        ..Default::default()
    };
    let unclipped = convert_mosaic(&master, &layout, &keep).unwrap();
    let off_display = unclipped.tiles.iter().flat_map(|t| &t.instructions).any(
        |i| matches!(*i, Instruction::Rect { x, y, w, h } if x < 0 || y < 0 || x + w > 16 || y + h > 16),
    );
    assert!(off_display, "border rectangles should leave the display");
}

#[test]
fn test_second_column_tile_geometry() {
    let layout = MosaicLayout::new(2, 1, 80, 8).unwrap();
    let first = layout.tile(0, 0).unwrap();
    let second = layout.tile(1, 0).unwrap();
    assert_eq!(second.offset_x, 8);
    assert_eq!(second.source_x, first.slice_width);
}

#[test]
fn test_chunk_text_parses_back() {
    let grid = scene(30, 30);
    let tile = MosaicLayout::new(1, 1, 30, 0).unwrap().tile(0, 0).unwrap();
    let opts = ConvertOptions {
        capacity: 5,
        ..Default::default()
    };
    let program = convert_tile(&grid, &tile, &opts).unwrap();

    let mut parsed = Vec::new();
    for chunk in &program.chunks {
        let instructions = parse_program(&chunk.to_string()).unwrap();
        assert_eq!(instructions.last(), Some(&Instruction::Flush));
        parsed.extend(instructions);
    }
    let preview = render_preview(&parsed, 30, 30);
    assert_eq!(preview, render_preview(&program.instructions, 30, 30));
}

#[test]
fn test_empty_slice_yields_nothing() {
    let grid = PixelGrid::new(0, 0, Vec::new()).unwrap();
    let tile = MosaicLayout::new(1, 1, 1, 0).unwrap().tile(0, 0).unwrap();
    let program = convert_tile(&grid, &tile, &ConvertOptions::default()).unwrap();
    assert!(program.instructions.is_empty());
    assert!(program.chunks.is_empty());
    assert_eq!(program.rect_count, 0);
}

#[test]
fn test_error_display() {
    assert_eq!(
        MatrixError::InvalidCapacity.to_string(),
        "instruction capacity must be positive"
    );
    assert_eq!(
        MatrixError::BufferSizeMismatch {
            expected: 16,
            actual: 4
        }
        .to_string(),
        "buffer size mismatch: expected 16 bytes, got 4"
    );
}
