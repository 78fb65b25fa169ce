mod buffers;
mod camera;
mod context;
mod render;

pub use buffers::{build_instances, BoardBuffers};
pub use camera::{random_axis, BoardView};
pub use context::{GpuContext, GpuError};
pub use render::RenderPipeline;
