use crate::config::{FORCE_GAIN, MOMENTUM_DECAY, MOMENTUM_THRESHOLD};

/// Animation state of one grid cell.
///
/// `scale` and `visible` hold what was last presented for this cell. They only
/// change when the cell actually moves (or on a pixel load), so a cell whose
/// momentum stays under the threshold keeps its previous look.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Cell {
    /// Value the cell relaxes toward
    pub target: f32,
    /// Current animated value
    pub value: f32,
    /// Spring force from the last force pass
    pub force: f32,
    /// Damped velocity applied to `value`
    pub momentum: f32,
    /// Ticks left before the cell starts relaxing
    pub delay: u32,
    /// Last presented uniform scale
    pub scale: f32,
    /// Last presented visibility
    pub visible: bool,
}

impl Cell {
    /// Put the cell back at rest with a new target and start delay.
    pub fn reset(&mut self, target: f32, delay: u32) {
        self.target = target;
        self.delay = delay;
        self.value = 0.0;
        self.momentum = 0.0;
        self.scale = 0.0;
        self.visible = false;
    }

    /// Force pass. Returns true while the cell is still held by its delay.
    pub fn compute_force(&mut self) -> bool {
        if self.delay > 0 {
            self.delay -= 1;
            self.force = 0.0;
            return true;
        }

        self.force = (self.target - self.value) * FORCE_GAIN;
        false
    }

    /// Propagation pass. Returns true if the cell moved this tick.
    pub fn integrate(&mut self, force_surround: f32) -> bool {
        self.momentum += self.force + force_surround / 2.0;

        if self.momentum.abs() < MOMENTUM_THRESHOLD {
            return false;
        }

        self.value += self.momentum;
        self.momentum *= MOMENTUM_DECAY;
        self.scale = self.value;
        self.visible = self.value > 0.0;
        true
    }
}
