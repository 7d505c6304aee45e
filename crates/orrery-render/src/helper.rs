//! Wireframe helper showing the shadow camera frustum.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::depth::DepthBuffer;
use crate::shadow::ShadowCameraParams;

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct HelperVertex {
    position: [f32; 3],
}

/// 12 edges, 2 vertices each.
const EDGE_VERTEX_COUNT: u64 = 24;

pub const HELPER_SHADER_SOURCE: &str = r#"
struct HelperUniform {
    view_proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> helper: HelperUniform;

@vertex
fn vs_helper(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    return helper.view_proj * vec4<f32>(position, 1.0);
}

@fragment
fn fs_helper() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 0.9, 0.3, 1.0);
}
"#;

/// The eight world-space corners of the shadow camera's ortho frustum,
/// near quad first, in (l,b) (r,b) (r,t) (l,t) order.
pub fn frustum_corners(params: &ShadowCameraParams, light_pos: Vec3) -> [Vec3; 8] {
    let view = Mat4::look_at_rh(light_pos, Vec3::ZERO, Vec3::Y);
    let inv_view = view.inverse();

    let mut corners = [Vec3::ZERO; 8];
    for (i, &z) in [-params.near, -params.far].iter().enumerate() {
        let quad = [
            Vec3::new(params.left, params.bottom, z),
            Vec3::new(params.right, params.bottom, z),
            Vec3::new(params.right, params.top, z),
            Vec3::new(params.left, params.top, z),
        ];
        for (j, corner) in quad.iter().enumerate() {
            corners[i * 4 + j] = inv_view.transform_point3(*corner);
        }
    }
    corners
}

/// Draws the shadow frustum as a line box inside the main pass.
pub struct FrustumHelperRenderer {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    vertex_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl FrustumHelperRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        sample_count: u32,
    ) -> Self {
        use wgpu::util::DeviceExt;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("frustum-helper-shader"),
            source: wgpu::ShaderSource::Wgsl(HELPER_SHADER_SOURCE.into()),
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("frustum-helper-uniform"),
            contents: bytemuck::cast_slice(&Mat4::IDENTITY.to_cols_array()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frustum-helper-vertices"),
            size: EDGE_VERTEX_COUNT * std::mem::size_of::<HelperVertex>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frustum-helper-bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: std::num::NonZeroU64::new(64),
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frustum-helper-bg"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("frustum-helper-pipeline-layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("frustum-helper-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_helper"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<HelperVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x3],
                }],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DepthBuffer::FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::GreaterEqual, // reverse-Z
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: sample_count,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_helper"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            uniform_buffer,
            vertex_buffer,
            bind_group,
        }
    }

    /// Rebuild the line box for the current frustum and camera.
    pub fn update(
        &self,
        queue: &wgpu::Queue,
        params: &ShadowCameraParams,
        light_pos: Vec3,
        view_proj: Mat4,
    ) {
        let corners = frustum_corners(params, light_pos);

        // Near quad, far quad, then the four connecting edges.
        let edges: [(usize, usize); 12] = [
            (0, 1),
            (1, 2),
            (2, 3),
            (3, 0),
            (4, 5),
            (5, 6),
            (6, 7),
            (7, 4),
            (0, 4),
            (1, 5),
            (2, 6),
            (3, 7),
        ];
        let mut vertices = [HelperVertex { position: [0.0; 3] }; 24];
        for (i, (a, b)) in edges.iter().enumerate() {
            vertices[i * 2].position = corners[*a].to_array();
            vertices[i * 2 + 1].position = corners[*b].to_array();
        }

        queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::cast_slice(&view_proj.to_cols_array()),
        );
    }

    pub fn render<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.draw(0..EDGE_VERTEX_COUNT as u32, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_near_corners_sit_near_plane_distance_from_light() {
        let params = ShadowCameraParams::default();
        let light = Vec3::new(-380.0, 240.0, -1000.0);
        let corners = frustum_corners(&params, light);

        let dir = (Vec3::ZERO - light).normalize();
        for corner in &corners[..4] {
            let along = (*corner - light).dot(dir);
            assert!(
                (along - params.near).abs() < 1e-2,
                "near corner depth {along} != {}",
                params.near
            );
        }
        for corner in &corners[4..] {
            let along = (*corner - light).dot(dir);
            assert!((along - params.far).abs() < 1e-2);
        }
    }

    #[test]
    fn test_frustum_straddles_origin() {
        // The default frustum is placed so the scene origin lies inside it.
        let params = ShadowCameraParams::default();
        let light = Vec3::new(-380.0, 240.0, -1000.0);
        let corners = frustum_corners(&params, light);

        let center = corners.iter().copied().sum::<Vec3>() / 8.0;
        assert!(center.length() < (params.far - params.near));
    }
}
