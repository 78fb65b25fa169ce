use crate::config::{DELAY_ROW_STRIDE, GRID_HEIGHT, GRID_WIDTH, TARGET_GAIN};
use crate::simulation::cell::Cell;
use crate::simulation::pixels::{GridError, PixelMap};

/// Whether the grid still has motion to play out
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationState {
    Idle,
    Animating,
}

/// Up to four 4-connected neighbour indices (left, right, below, above)
#[derive(Clone, Copy, Debug, Default)]
pub struct Neighbors {
    indices: [usize; 4],
    len: usize,
}

impl Neighbors {
    fn push(&mut self, index: usize) {
        self.indices[self.len] = index;
        self.len += 1;
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.indices[..self.len]
    }
}

/// Read-only view of one cell, for whatever presents the board
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellView {
    pub x: usize,
    pub y: usize,
    pub scale: f32,
    pub visible: bool,
}

/// Fixed-size board of relaxing cells.
///
/// Cells live in a flat row-major array (`y * width + x`). Each cell's
/// neighbours are resolved once into an index table and never change.
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    neighbors: Vec<Neighbors>,
    /// Forces copied out of the force pass, read by the propagation pass
    forces: Vec<f32>,
    state: AnimationState,
    /// Ticks run since the last pixel load
    ticks: u64,
}

impl Grid {
    /// Create a grid at rest. Both dimensions must be at least 2.
    pub fn new(width: usize, height: usize) -> Self {
        assert!(
            width >= 2 && height >= 2,
            "grid must be at least 2x2, got {}x{}",
            width,
            height
        );

        let count = width * height;
        let mut neighbors = Vec::with_capacity(count);

        for y in 0..height {
            for x in 0..width {
                let mut around = Neighbors::default();
                if x > 0 {
                    around.push(y * width + x - 1);
                }
                if x + 1 < width {
                    around.push(y * width + x + 1);
                }
                if y > 0 {
                    around.push((y - 1) * width + x);
                }
                if y + 1 < height {
                    around.push((y + 1) * width + x);
                }
                neighbors.push(around);
            }
        }

        Self {
            width,
            height,
            cells: vec![Cell::default(); count],
            neighbors,
            forces: vec![0.0; count],
            state: AnimationState::Idle,
            ticks: 0,
        }
    }

    /// Create a grid with default dimensions
    pub fn new_default() -> Self {
        Self::new(GRID_WIDTH, GRID_HEIGHT)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    #[cfg(test)]
    pub fn is_animating(&self) -> bool {
        self.state == AnimationState::Animating
    }

    /// Ticks run since the last pixel load
    #[cfg(test)]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    #[cfg(test)]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[cfg(test)]
    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Neighbour indices of `(x, y)`, empty when out of bounds
    #[cfg(test)]
    pub fn neighbors(&self, x: usize, y: usize) -> &[usize] {
        match self.index(x, y) {
            Some(i) => self.neighbors[i].as_slice(),
            None => &[],
        }
    }

    #[cfg(test)]
    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    /// Center `pixels` on the grid and restart the animation from rest.
    ///
    /// Source rows run top to bottom while grid rows run bottom to top, so the
    /// map is flipped vertically. Each covered cell waits
    /// `row * 2 + column` ticks before moving, which sweeps the letter in
    /// diagonally.
    pub fn set_pixels(&mut self, pixels: &PixelMap) -> Result<(), GridError> {
        let (pw, ph) = (pixels.width(), pixels.height());
        if pw > self.width || ph > self.height {
            return Err(GridError::PixelsOutOfRange {
                width: pw,
                height: ph,
                max_width: self.width,
                max_height: self.height,
            });
        }

        let x0 = (self.width - pw) / 2;
        let y0 = (self.height - ph) / 2;

        for yi in 0..self.height {
            for xi in 0..self.width {
                let cell = &mut self.cells[yi * self.width + xi];

                if xi < x0 || xi >= x0 + pw || yi < y0 || yi >= y0 + ph {
                    cell.reset(0.0, 0);
                    continue;
                }

                let (col, row) = (xi - x0, yi - y0);
                let pixel = pixels.get(col, ph - row - 1);
                let target = if pixel.is_nan() {
                    0.0
                } else {
                    (pixel * TARGET_GAIN).min(1.0)
                };
                cell.reset(target, row as u32 * DELAY_ROW_STRIDE + col as u32);
            }
        }

        log::debug!("Loaded {}x{} pixels at offset ({}, {})", pw, ph, x0, y0);

        self.ticks = 0;
        self.state = AnimationState::Animating;
        Ok(())
    }

    /// Advance every cell by one tick and return the state for the next one.
    ///
    /// Does nothing while idle. The grid goes idle after the first tick in
    /// which no cell was delayed and no cell moved.
    pub fn step(&mut self) -> AnimationState {
        if self.state == AnimationState::Idle {
            return self.state;
        }

        let mut active = false;

        for (cell, force) in self.cells.iter_mut().zip(self.forces.iter_mut()) {
            active |= cell.compute_force();
            *force = cell.force;
        }

        for (cell, around) in self.cells.iter_mut().zip(&self.neighbors) {
            let indices = around.as_slice();
            let mut sum = 0.0;
            for &n in indices {
                sum += self.forces[n];
            }
            active |= cell.integrate(sum / indices.len() as f32);
        }

        self.ticks += 1;

        if !active {
            log::debug!("Animation settled after {} ticks", self.ticks);
            self.state = AnimationState::Idle;
        }

        self.state
    }

    /// View of every cell in index order
    pub fn snapshot(&self) -> Vec<CellView> {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, cell)| CellView {
                x: i % self.width,
                y: i / self.width,
                scale: cell.scale,
                visible: cell.visible,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MOMENTUM_THRESHOLD;

    const SETTLE_LIMIT: u64 = 20_000;

    fn run_until_idle(grid: &mut Grid) -> u64 {
        while grid.step() == AnimationState::Animating {
            assert!(
                grid.ticks() < SETTLE_LIMIT,
                "Grid did not settle within {} ticks",
                SETTLE_LIMIT
            );
        }
        grid.ticks()
    }

    fn single_pixel(width: usize, height: usize, x: usize, y: usize) -> PixelMap {
        PixelMap::from_fn(width, height, |px, py| if (px, py) == (x, y) { 1.0 } else { 0.0 })
    }

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new_default();
        assert_eq!(grid.cells().len(), GRID_WIDTH * GRID_HEIGHT);
        assert_eq!(grid.state(), AnimationState::Idle);
    }

    #[test]
    fn test_neighbor_counts_match_edges() {
        let grid = Grid::new_default();
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let edges = [x == 0, x == grid.width() - 1, y == 0, y == grid.height() - 1]
                    .iter()
                    .filter(|&&e| e)
                    .count();
                assert_eq!(
                    grid.neighbors(x, y).len(),
                    4 - edges,
                    "Wrong neighbour count at ({}, {})",
                    x,
                    y
                );
            }
        }
        assert_eq!(grid.neighbors(0, 0).len(), 2);
        assert_eq!(grid.neighbors(7, 0).len(), 3);
        assert_eq!(grid.neighbors(7, 7).len(), 4);
    }

    #[test]
    fn test_neighbors_are_adjacent() {
        let grid = Grid::new_default();
        let w = grid.width();
        assert_eq!(grid.neighbors(3, 5), &[5 * w + 2, 5 * w + 4, 4 * w + 3, 6 * w + 3]);
        assert_eq!(grid.neighbors(0, 0), &[1, w]);
        assert!(grid.neighbors(w, 0).is_empty());
    }

    #[test]
    fn test_step_is_noop_when_idle() {
        let mut grid = Grid::new_default();
        assert_eq!(grid.step(), AnimationState::Idle);
        assert_eq!(grid.ticks(), 0);
    }

    #[test]
    fn test_all_zero_pattern() {
        let mut grid = Grid::new_default();
        grid.set_pixels(&single_pixel(8, 8, 2, 2)).unwrap();
        for _ in 0..40 {
            grid.step();
        }

        grid.set_pixels(&PixelMap::new(8, 8)).unwrap();
        for cell in grid.cells() {
            assert_eq!(cell.target, 0.0);
            assert_eq!(cell.delay, 0);
        }

        run_until_idle(&mut grid);
        for cell in grid.cells() {
            assert_eq!(cell.value, 0.0);
            assert!(!cell.visible);
        }
    }

    #[test]
    fn test_single_pixel_target() {
        let mut grid = Grid::new_default();
        // Source (3, 1) on a 4x4 map: offset 6, flipped row 4 - 1 - 1 = 2
        grid.set_pixels(&single_pixel(4, 4, 3, 1)).unwrap();

        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let target = grid.cell(x, y).unwrap().target;
                if (x, y) == (9, 8) {
                    assert_eq!(target, 1.0);
                } else {
                    assert_eq!(target, 0.0, "Unexpected target at ({}, {})", x, y);
                }
            }
        }
    }

    #[test]
    fn test_centering_with_flip() {
        let mut grid = Grid::new_default();
        grid.set_pixels(&single_pixel(8, 8, 0, 0)).unwrap();

        let cell = grid.cell(4, 11).unwrap();
        assert_eq!(cell.target, 1.0);
        // Top-left of the source lands on the last row of the rectangle
        assert_eq!(cell.delay, 7 * DELAY_ROW_STRIDE);
    }

    #[test]
    fn test_diagonal_delays() {
        let mut grid = Grid::new_default();
        grid.set_pixels(&PixelMap::new(8, 8)).unwrap();

        assert_eq!(grid.cell(4, 4).unwrap().delay, 0);
        assert_eq!(grid.cell(5, 4).unwrap().delay, 1);
        assert_eq!(grid.cell(4, 5).unwrap().delay, 2);
        assert_eq!(grid.cell(11, 11).unwrap().delay, 21);
        assert_eq!(grid.cell(3, 4).unwrap().delay, 0);
    }

    #[test]
    fn test_target_gain_and_clamp() {
        let map = PixelMap::from_fn(4, 1, |x, _| [0.5, 1.0, -1.0, f32::NAN][x]);
        let mut grid = Grid::new_default();
        grid.set_pixels(&map).unwrap();

        // 4x1 map: offsets (6, 7)
        assert!((grid.cell(6, 7).unwrap().target - 0.55).abs() < 1e-6);
        assert_eq!(grid.cell(7, 7).unwrap().target, 1.0);
        // Only the upper bound is clamped
        assert!((grid.cell(8, 7).unwrap().target + 1.1).abs() < 1e-6);
        assert_eq!(grid.cell(9, 7).unwrap().target, 0.0);
    }

    #[test]
    fn test_negative_pixel_sinks_below_rest() {
        let mut grid = Grid::new_default();
        grid.set_pixels(&PixelMap::from_fn(1, 1, |_, _| -0.5)).unwrap();
        assert!((grid.cell(7, 7).unwrap().target + 0.55).abs() < 1e-6);

        for _ in 0..5 {
            grid.step();
        }
        let cell = grid.cell(7, 7).unwrap();
        assert!(cell.value < 0.0);
        assert!(!cell.visible);
    }

    #[test]
    fn test_oversized_pixels_rejected() {
        let mut grid = Grid::new_default();
        let err = grid.set_pixels(&PixelMap::new(17, 4)).unwrap_err();
        assert_eq!(
            err,
            GridError::PixelsOutOfRange {
                width: 17,
                height: 4,
                max_width: 16,
                max_height: 16
            }
        );
        assert_eq!(grid.state(), AnimationState::Idle);
        assert!(grid.cells().iter().all(|c| c.target == 0.0));

        let err = grid.set_pixels(&PixelMap::new(4, 17)).unwrap_err();
        assert_eq!(
            err,
            GridError::PixelsOutOfRange {
                width: 4,
                height: 17,
                max_width: 16,
                max_height: 16
            }
        );
        assert_eq!(grid.state(), AnimationState::Idle);
    }

    #[test]
    fn test_oversized_load_keeps_running_animation() {
        let mut grid = Grid::new_default();
        grid.set_pixels(&single_pixel(4, 4, 1, 1)).unwrap();
        grid.step();
        let before = grid.snapshot();

        assert!(grid.set_pixels(&PixelMap::new(16, 17)).is_err());
        assert_eq!(grid.state(), AnimationState::Animating);
        assert_eq!(grid.ticks(), 1);
        assert_eq!(grid.snapshot(), before);
    }

    #[test]
    fn test_full_size_pixels_accepted() {
        let mut grid = Grid::new_default();
        let map = PixelMap::from_fn(16, 16, |_, _| 1.0);
        grid.set_pixels(&map).unwrap();
        assert!(grid.cells().iter().all(|c| c.target == 1.0));
        assert_eq!(grid.cell(15, 15).unwrap().delay, 15 * 2 + 15);
    }

    #[test]
    fn test_full_grid_settles_slowly() {
        let mut grid = Grid::new_default();
        grid.set_pixels(&PixelMap::from_fn(16, 16, |_, _| 1.0)).unwrap();

        // Every cell pulls the same way, so the edges ring for a long time
        let ticks = run_until_idle(&mut grid);
        assert!(ticks > 10_000, "Full grid settled after only {} ticks", ticks);
        assert!(grid
            .cells()
            .iter()
            .all(|c| c.momentum.abs() < MOMENTUM_THRESHOLD));
    }

    #[test]
    fn test_delayed_cells_keep_grid_animating() {
        let mut grid = Grid::new_default();
        // Zero targets, but the delays alone keep the grid ticking
        grid.set_pixels(&PixelMap::new(4, 4)).unwrap();
        for _ in 0..9 {
            assert_eq!(grid.step(), AnimationState::Animating);
        }
        // Largest delay is 3 * 2 + 3 = 9
        assert_eq!(grid.step(), AnimationState::Idle);
    }

    #[test]
    fn test_settles_and_reaches_target() {
        let mut grid = Grid::new_default();
        let map = PixelMap::from_fn(4, 4, |_, _| 1.0);
        grid.set_pixels(&map).unwrap();

        let ticks = run_until_idle(&mut grid);
        assert!(ticks > 9, "Settled before the sweep finished: {}", ticks);

        let centre = grid.cell(7, 7).unwrap();
        assert!(
            (centre.value - 1.0).abs() < 0.2,
            "Centre should rest near its target, got {}",
            centre.value
        );
        assert!(centre.visible);
        assert!(grid
            .cells()
            .iter()
            .all(|c| c.momentum.abs() < MOMENTUM_THRESHOLD));

        // Once idle, further ticks change nothing
        let before = grid.snapshot();
        grid.step();
        assert_eq!(grid.snapshot(), before);
    }

    #[test]
    fn test_deterministic_replay() {
        let map = PixelMap::from_fn(10, 14, |x, y| ((x * 7 + y * 3) % 5) as f32 / 4.0);
        let mut a = Grid::new_default();
        let mut b = Grid::new_default();
        a.set_pixels(&map).unwrap();
        b.set_pixels(&map).unwrap();

        for _ in 0..120 {
            a.step();
            b.step();
            for (ca, cb) in a.cells().iter().zip(b.cells()) {
                assert_eq!(ca.value.to_bits(), cb.value.to_bits());
            }
        }
    }

    #[test]
    fn test_reload_restarts_from_rest() {
        let mut grid = Grid::new_default();
        grid.set_pixels(&single_pixel(4, 4, 0, 0)).unwrap();
        for _ in 0..30 {
            grid.step();
        }
        assert!(grid.ticks() > 0);

        grid.set_pixels(&single_pixel(4, 4, 0, 0)).unwrap();
        assert_eq!(grid.ticks(), 0);
        assert!(grid.is_animating());
        for cell in grid.cells() {
            assert_eq!(cell.value, 0.0);
            assert_eq!(cell.momentum, 0.0);
            assert_eq!(cell.scale, 0.0);
        }
    }

    #[test]
    fn test_snapshot_positions() {
        let mut grid = Grid::new_default();
        grid.set_pixels(&single_pixel(1, 1, 0, 0)).unwrap();
        for _ in 0..5 {
            grid.step();
        }

        let views = grid.snapshot();
        assert_eq!(views.len(), 256);
        let view = views[7 * 16 + 7];
        assert_eq!((view.x, view.y), (7, 7));
        assert!(view.visible);
        assert_eq!(view.scale, grid.cell(7, 7).unwrap().value);
    }

    #[test]
    #[should_panic]
    fn test_degenerate_grid_panics() {
        Grid::new(1, 16);
    }
}
