use glam::{Mat4, Quat, Vec3};
use wgpu::util::DeviceExt;
use wgpu::{Buffer, BufferUsages, Device, Queue};

use crate::config::{BOX_COLOR, MAX_VISUAL_SCALE};
use crate::gpu::camera::cell_position;
use crate::simulation::CellView;

/// Camera uniform (64 bytes)
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Uniforms {
    pub view_proj: [[f32; 4]; 4],
}

/// Cube mesh vertex
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Per-cube instance data: model matrix columns + colour (80 bytes)
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceData {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

/// Unit cube centred on the origin, 24 vertices and 36 indices
pub fn cube_mesh() -> (Vec<Vertex>, Vec<u16>) {
    // (normal, tangent u, tangent v) per face, with u x v = normal
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (normal, u, v) in faces {
        let (n, u, v) = (Vec3::from(normal), Vec3::from(u), Vec3::from(v));
        let base = vertices.len() as u16;
        for (su, sv) in [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)] {
            let p = n * 0.5 + u * su + v * sv;
            vertices.push(Vertex {
                position: p.to_array(),
                normal,
            });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    (vertices, indices)
}

/// Instances for every visible cell, with the board rotated by `board`.
///
/// The presented scale is clamped to `[0, MAX_VISUAL_SCALE]`.
pub fn build_instances(
    views: &[CellView],
    width: usize,
    height: usize,
    board: Quat,
) -> Vec<InstanceData> {
    let board = Mat4::from_quat(board);

    views
        .iter()
        .filter(|view| view.visible)
        .map(|view| {
            let scale = view.scale.clamp(0.0, MAX_VISUAL_SCALE);
            let local = Mat4::from_scale_rotation_translation(
                Vec3::splat(scale),
                Quat::IDENTITY,
                cell_position(view.x, view.y, width, height),
            );
            InstanceData {
                model: (board * local).to_cols_array_2d(),
                color: BOX_COLOR,
            }
        })
        .collect()
}

/// Mesh, instance and uniform buffers for the board
pub struct BoardBuffers {
    pub vertex_buffer: Buffer,
    pub index_buffer: Buffer,
    pub index_count: u32,
    pub instance_buffer: Buffer,
    pub uniform_buffer: Buffer,
    /// Instances written by the last `update_instances`
    pub instance_count: u32,
    max_instances: usize,
}

impl BoardBuffers {
    /// Create buffers sized for `max_instances` cubes
    pub fn new(device: &Device, max_instances: usize) -> Self {
        let (vertices, indices) = cube_mesh();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube-vertex-buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube-index-buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: BufferUsages::INDEX,
        });

        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("cube-instance-buffer"),
            size: (max_instances * std::mem::size_of::<InstanceData>()) as u64,
            usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("camera-uniform-buffer"),
            contents: bytemuck::bytes_of(&Uniforms {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            }),
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            instance_buffer,
            uniform_buffer,
            instance_count: 0,
            max_instances,
        }
    }

    /// Upload the camera matrix
    pub fn update_camera(&self, queue: &Queue, view_proj: Mat4) {
        let uniforms = Uniforms {
            view_proj: view_proj.to_cols_array_2d(),
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
    }

    /// Upload instance data, truncating to the buffer capacity
    pub fn update_instances(&mut self, queue: &Queue, instances: &[InstanceData]) {
        let count = instances.len().min(self.max_instances);
        if count < instances.len() {
            log::warn!(
                "Dropping {} cube instances over capacity {}",
                instances.len() - count,
                self.max_instances
            );
        }
        if count > 0 {
            queue.write_buffer(
                &self.instance_buffer,
                0,
                bytemuck::cast_slice(&instances[..count]),
            );
        }
        self.instance_count = count as u32;
    }
}
