use glam::{Mat4, Quat, Vec3};
use rand::Rng;

use crate::config::{
    AXIS_COMPONENT_RANGE, CAMERA_EYE, CAMERA_FOV_DEGREES, CELL_SPACING, WOBBLE_AMPLITUDE,
    WOBBLE_SPEED,
};

/// Fixed camera over the board plus the slow wobble of the board itself.
///
/// Camera motion is presentation only; it never feeds back into the grid.
pub struct BoardView {
    pub eye: Vec3,
    pub target: Vec3,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Unit axis the board wobbles around
    pub wobble_axis: Vec3,
}

impl Default for BoardView {
    fn default() -> Self {
        Self {
            eye: Vec3::from(CAMERA_EYE),
            target: Vec3::ZERO,
            fov: CAMERA_FOV_DEGREES.to_radians(),
            aspect: 1.0,
            near: 0.1,
            far: 200.0,
            wobble_axis: Vec3::Y,
        }
    }
}

impl BoardView {
    /// Default view with a random wobble axis
    pub fn with_random_axis(rng: &mut impl Rng) -> Self {
        Self {
            wobble_axis: random_axis(rng),
            ..Default::default()
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Board orientation `seconds` into the run
    pub fn board_rotation(&self, seconds: f32) -> Quat {
        let angle = (seconds * WOBBLE_SPEED).sin() * WOBBLE_AMPLITUDE;
        Quat::from_axis_angle(self.wobble_axis, angle)
    }
}

/// Axis from integer components in `[-range, range]`, normalised.
/// All-zero draws fall back to +Y.
pub fn random_axis(rng: &mut impl Rng) -> Vec3 {
    let mut component = || rng.gen_range(-AXIS_COMPONENT_RANGE..=AXIS_COMPONENT_RANGE) as f32;
    let axis = Vec3::new(component(), component(), component());
    axis.try_normalize().unwrap_or(Vec3::Y)
}

/// Board-space centre of cell `(x, y)`.
///
/// Grid rows grow away from the camera (towards -Z) and columns grow to the
/// right, so the board reads like the bitmap it was loaded from.
pub fn cell_position(x: usize, y: usize, width: usize, height: usize) -> Vec3 {
    let col = x as f32 - (width / 2) as f32;
    let row = y as f32 - (height / 2) as f32;
    Vec3::new(col, 0.0, -row) * CELL_SPACING
}
