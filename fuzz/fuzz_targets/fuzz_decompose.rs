#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use matrixproc::{decompose, Color, PixelGrid};

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    width: u8,
    height: u8,
    palette: u8,
    pixels: Vec<u8>,
}

fuzz_target!(|input: FuzzInput| {
    // Keep grids small, the decomposition is cubic in the cell count
    let width = (input.width as usize).min(24);
    let height = (input.height as usize).min(24);
    let palette = (input.palette as u32 % 6) + 1;

    if input.pixels.len() < width * height {
        return;
    }

    let grid = PixelGrid::from_fn(width, height, |x, y| {
        Color(input.pixels[y * width + x] as u32 % palette)
    });
    let map = decompose(&grid);

    // Every cell covered exactly once, by a rect of its own color
    let mut hits = vec![0u8; width * height];
    for (color, rects) in map.iter() {
        for rect in rects {
            assert!(rect.w > 0 && rect.h > 0);
            for y in rect.y..rect.y + rect.h {
                for x in rect.x..rect.x + rect.w {
                    assert_eq!(grid.get(x, y), color);
                    hits[y * width + x] += 1;
                }
            }
        }
    }
    assert!(hits.iter().all(|&n| n == 1));
});
