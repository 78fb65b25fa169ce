mod cell;
mod grid;
mod pixels;

pub use grid::{AnimationState, CellView, Grid};
pub use pixels::PixelMap;
