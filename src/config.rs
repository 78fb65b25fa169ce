/// Grid dimensions (one cube per cell)
pub const GRID_WIDTH: usize = 16;
pub const GRID_HEIGHT: usize = 16;

// ============================================
// Update Rule
// ============================================

/// Spring gain pulling a cell's value toward its target
pub const FORCE_GAIN: f32 = 0.15;

/// Momentum kept after each update (0.9 = lose 10% per tick)
pub const MOMENTUM_DECAY: f32 = 0.9;

/// Below this magnitude a cell's momentum is not applied
pub const MOMENTUM_THRESHOLD: f32 = 0.012;

/// Pixel intensity boost before clamping to 1.0
pub const TARGET_GAIN: f32 = 1.1;

/// Delay ticks added per pixel row; columns add one each.
/// Rows weigh more than columns so the sweep runs diagonally.
pub const DELAY_ROW_STRIDE: u32 = 2;

// ============================================
// Timing
// ============================================

/// Simulation ticks per second (host engines default to a 20 ms fixed step)
pub const TICK_RATE_HZ: u32 = 50;

/// Upper bound on ticks run for a single rendered frame
pub const MAX_TICKS_PER_FRAME: u32 = 5;

// ============================================
// Board Rendering
// ============================================

/// Distance between neighbouring cube centres (cube edge is 1.0)
pub const CELL_SPACING: f32 = 1.04;

/// Largest uniform scale a cube is drawn with; values overshoot during the wave
pub const MAX_VISUAL_SCALE: f32 = 1.25;

/// Cube colour (linear RGBA)
pub const BOX_COLOR: [f32; 4] = [0.1, 0.9, 0.2, 1.0];

/// Clear colour behind the board
pub const BACKGROUND_COLOR: wgpu::Color = wgpu::Color {
    r: 0.05,
    g: 0.05,
    b: 0.08,
    a: 1.0,
};

/// Camera placement, looking at the board centre
pub const CAMERA_EYE: [f32; 3] = [0.0, 17.0, 13.0];
pub const CAMERA_FOV_DEGREES: f32 = 50.0;

/// Wobble of the board around its random axis
pub const WOBBLE_AMPLITUDE: f32 = 0.3;
pub const WOBBLE_SPEED: f32 = 0.5;

/// Half-range of the integer components used to pick a random axis
pub const AXIS_COMPONENT_RANGE: i32 = 50;

/// Letter shown when the window first opens
pub const INITIAL_LETTER: char = 'A';
