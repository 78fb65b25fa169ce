/// Errors from loading pixel data onto the grid.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    #[error("pixel map {width}x{height} does not fit the {max_width}x{max_height} grid")]
    PixelsOutOfRange {
        width: usize,
        height: usize,
        max_width: usize,
        max_height: usize,
    },
}

/// A small bitmap of intensities, addressed as `(x, y)` with `y = 0` on top.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelMap {
    width: usize,
    height: usize,
    values: Vec<f32>,
}

impl PixelMap {
    /// Create an all-zero map
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            values: vec![0.0; width * height],
        }
    }

    /// Create a map by evaluating `f(x, y)` for every pixel
    pub fn from_fn(width: usize, height: usize, f: impl Fn(usize, usize) -> f32) -> Self {
        let mut values = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                values.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            values,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Intensity at `(x, y)`; out of bounds reads as 0
    pub fn get(&self, x: usize, y: usize) -> f32 {
        if x >= self.width || y >= self.height {
            return 0.0;
        }
        self.values[y * self.width + x]
    }

    /// Nearest-neighbour upscale by an integer factor
    pub fn upscale(&self, factor: usize) -> Self {
        Self::from_fn(self.width * factor, self.height * factor, |x, y| {
            self.get(x / factor, y / factor)
        })
    }
}
