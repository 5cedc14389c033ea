use matrixproc::*;
use pretty_assertions::assert_eq;

const RED: Color = Color(0xFFFF0000);
const GREEN: Color = Color(0xFF00FF00);
const BLUE: Color = Color(0xFF0000FF);
const CLEAR: Color = Color(0x00000000);

/// Small deterministic generator so the property tests are reproducible.
fn lcg_grid(width: usize, height: usize, seed: u64, palette: &[Color]) -> PixelGrid {
    let mut state = seed;
    PixelGrid::from_fn(width, height, |_, _| {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        palette[(state >> 33) as usize % palette.len()]
    })
}

/// Blocky test image: a few overlapping solid regions.
fn blocky_grid(width: usize, height: usize) -> PixelGrid {
    PixelGrid::from_fn(width, height, |x, y| {
        if x < width / 3 && y < height / 2 {
            RED
        } else if (x + y) % 7 == 0 {
            CLEAR
        } else if y > height * 2 / 3 {
            BLUE
        } else {
            GREEN
        }
    })
}

fn assert_exact_cover(grid: &PixelGrid, map: &RectangleMap) {
    for (_, rects) in map.iter() {
        for rect in rects {
            assert!(rect.w >= 1 && rect.h >= 1, "degenerate rect {rect:?}");
            assert!(
                rect.x + rect.w <= grid.width() && rect.y + rect.h <= grid.height(),
                "rect {rect:?} leaves the grid"
            );
        }
    }
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let covering: Vec<Color> = map
                .iter()
                .flat_map(|(color, rects)| {
                    rects
                        .iter()
                        .filter(move |r| r.contains(x, y))
                        .map(move |_| color)
                })
                .collect();
            assert_eq!(covering, vec![grid.get(x, y)], "cell ({x},{y})");
        }
    }
}

/// Largest free same-color rectangle with its top-left corner at `(ax, ay)`,
/// found by trying every size.
fn brute_force_area(grid: &PixelGrid, used: &[bool], ax: usize, ay: usize) -> usize {
    let color = grid.get(ax, ay);
    let free = |x: usize, y: usize| !used[y * grid.width() + x] && grid.get(x, y) == color;
    let mut best = 0;
    for h in 1..=grid.height() - ay {
        for w in 1..=grid.width() - ax {
            let fits = (ay..ay + h).all(|y| (ax..ax + w).all(|x| free(x, y)));
            if fits {
                best = best.max(w * h);
            }
        }
    }
    best
}

#[test]
fn test_uniform_red_square() {
    let grid = PixelGrid::new(2, 2, vec![RED; 4]).unwrap();
    let map = decompose(&grid);
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(RED).unwrap(), &[Rect::new(0, 0, 2, 2)]);
}

#[test]
fn test_two_pixels_two_colors() {
    let grid = PixelGrid::new(2, 1, vec![RED, BLUE]).unwrap();
    let map = decompose(&grid);
    let steps: Vec<(Color, Rect)> = Decomposer::new(&grid).collect();
    assert_eq!(
        steps,
        vec![(RED, Rect::new(0, 0, 1, 1)), (BLUE, Rect::new(1, 0, 1, 1))]
    );
    assert_eq!(map.colors(), &[RED, BLUE]);
}

#[test]
fn test_checkerboard_is_all_single_pixels() {
    let grid = PixelGrid::new(2, 2, vec![RED, BLUE, BLUE, RED]).unwrap();
    let map = decompose(&grid);
    assert_eq!(map.rect_count(), 4);
    assert!(map.iter().all(|(_, rects)| rects.iter().all(|r| r.area() == 1)));
    assert_exact_cover(&grid, &map);
}

#[test]
fn test_alpha_distinguishes_colors() {
    // same RGB, different alpha
    let half_red = Color(0x80FF0000);
    let grid = PixelGrid::new(2, 1, vec![RED, half_red]).unwrap();
    assert_eq!(decompose(&grid).len(), 2);
}

#[test]
fn test_exact_cover_random_grids() {
    let palette = [RED, GREEN, BLUE];
    for seed in 0..20 {
        let grid = lcg_grid(9, 7, seed, &palette);
        assert_exact_cover(&grid, &decompose(&grid));
    }
}

#[test]
fn test_exact_cover_blocky_grid() {
    let grid = blocky_grid(40, 30);
    let map = decompose(&grid);
    assert_exact_cover(&grid, &map);
    assert_eq!(map.colors()[0], RED);
}

#[test]
fn test_deterministic() {
    let grid = lcg_grid(12, 12, 7, &[RED, GREEN, BLUE, CLEAR]);
    let first = decompose(&grid);
    let second = decompose(&grid);
    assert_eq!(first, second);
    let first_order: Vec<Color> = first.colors().to_vec();
    assert_eq!(first_order, second.colors().to_vec());
}

#[test]
fn test_each_step_is_globally_largest() {
    for seed in 0..6 {
        let grid = lcg_grid(7, 6, seed, &[RED, GREEN]);
        let mut used = vec![false; grid.width() * grid.height()];

        for (_, rect) in Decomposer::new(&grid) {
            let mut best_area = 0;
            let mut best_anchor = None;
            for y in 0..grid.height() {
                for x in 0..grid.width() {
                    if used[y * grid.width() + x] {
                        continue;
                    }
                    let area = brute_force_area(&grid, &used, x, y);
                    if area > best_area {
                        best_area = area;
                        best_anchor = Some((x, y));
                    }
                }
            }
            assert_eq!(rect.area(), best_area, "seed {seed}: not the largest");
            assert_eq!(
                Some((rect.x, rect.y)),
                best_anchor,
                "seed {seed}: tie not broken by earliest anchor"
            );

            for y in rect.y..rect.y + rect.h {
                for x in rect.x..rect.x + rect.w {
                    used[y * grid.width() + x] = true;
                }
            }
        }
    }
}

#[test]
fn test_areas_never_grow() {
    let grid = blocky_grid(24, 18);
    let areas: Vec<usize> = Decomposer::new(&grid).map(|(_, r)| r.area()).collect();
    assert!(areas.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn test_tie_goes_to_upper_anchor() {
    // two 2x2 blue squares of equal area; the upper-right one is found first
    // in row-major order
    #[rustfmt::skip]
    let cells = vec![
        RED,  RED,  BLUE, BLUE,
        RED,  GREEN, BLUE, BLUE,
        BLUE, BLUE, RED,  GREEN,
        BLUE, BLUE, GREEN, RED,
    ];
    let grid = PixelGrid::new(4, 4, cells).unwrap();
    let steps: Vec<(Color, Rect)> = Decomposer::new(&grid).take(2).collect();
    assert_eq!(
        steps,
        vec![(BLUE, Rect::new(2, 0, 2, 2)), (BLUE, Rect::new(0, 2, 2, 2))]
    );
}

#[test]
fn test_zero_area_grids() {
    for (w, h) in [(0, 0), (0, 3), (3, 0)] {
        let grid = PixelGrid::new(w, h, Vec::new()).unwrap();
        assert!(decompose(&grid).is_empty());
        assert_eq!(Decomposer::new(&grid).count(), 0);
    }
}

#[test]
fn test_grid_from_image_crate() {
    let img = image::RgbaImage::from_fn(6, 4, |x, _| {
        if x < 3 {
            image::Rgba([255, 0, 0, 255])
        } else {
            image::Rgba([0, 0, 255, 255])
        }
    });
    let (width, height) = img.dimensions();
    let grid = PixelGrid::from_rgba(img.as_raw(), width as usize, height as usize).unwrap();
    let map = decompose(&grid);
    assert_eq!(map.get(RED).unwrap(), &[Rect::new(0, 0, 3, 4)]);
    assert_eq!(map.get(BLUE).unwrap(), &[Rect::new(3, 0, 3, 4)]);
}
