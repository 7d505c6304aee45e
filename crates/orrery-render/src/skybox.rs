//! Skybox renderer: draws the star cubemap behind all scene geometry.
//!
//! Uses a fullscreen triangle with inverse view-projection to sample a
//! cubemap texture. The cubemap bind group is passed in per draw so a
//! quality change only swaps textures, never the pipeline.

use bytemuck::{Pod, Zeroable};

use crate::depth::DepthBuffer;

/// Uniform buffer for the skybox: inverse view-projection matrix.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SkyboxUniform {
    /// Inverse view-projection matrix (rotation only, no translation).
    pub inv_view_proj: [[f32; 4]; 4],
}

/// WGSL shader source for the skybox pass.
pub const SKYBOX_SHADER_SOURCE: &str = r#"
struct SkyboxUniform {
    inv_view_proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> skybox: SkyboxUniform;

@group(1) @binding(0)
var skybox_texture: texture_cube<f32>;
@group(1) @binding(1)
var skybox_sampler: sampler;

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) view_dir: vec3<f32>,
};

@vertex
fn vs_skybox(@builtin(vertex_index) idx: u32) -> VertexOutput {
    // Fullscreen triangle
    let uv = vec2<f32>(f32((idx << 1u) & 2u), f32(idx & 2u));
    let ndc = uv * 2.0 - 1.0;

    // Reconstruct the view ray on the far plane (reverse-Z: z=0).
    let clip_far = vec4<f32>(ndc.x, ndc.y, 0.0, 1.0);
    let world = skybox.inv_view_proj * clip_far;
    let view_dir = normalize(world.xyz / world.w);

    var out: VertexOutput;
    out.position = vec4<f32>(ndc.x, ndc.y, 0.0, 1.0);
    out.view_dir = view_dir;
    return out;
}

@fragment
fn fs_skybox(in: VertexOutput) -> @location(0) vec4<f32> {
    let color = textureSample(skybox_texture, skybox_sampler, in.view_dir);
    return vec4<f32>(color.rgb, 1.0);
}
"#;

/// GPU skybox renderer that draws a cubemap star field.
pub struct SkyboxRenderer {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
}

impl SkyboxRenderer {
    /// Create a new skybox renderer.
    ///
    /// `cubemap_bind_group_layout` is the texture manager's cube layout
    /// (group 1). The pipeline must match the main pass sample count.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        sample_count: u32,
        cubemap_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("skybox-shader"),
            source: wgpu::ShaderSource::Wgsl(SKYBOX_SHADER_SOURCE.into()),
        });

        // Uniform bind group layout (group 0)
        let uniform_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("skybox-uniform-bgl"),
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

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("skybox-pipeline-layout"),
            bind_group_layouts: &[&uniform_bgl, cubemap_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("skybox-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_skybox"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            // Drawn first at the far plane: never writes depth, always passes.
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DepthBuffer::FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Always,
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
                entry_point: Some("fs_skybox"),
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

        // Uniform buffer
        use wgpu::util::DeviceExt;
        let uniform = SkyboxUniform {
            inv_view_proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
        };
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("skybox-uniform"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("skybox-uniform-bg"),
            layout: &uniform_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        log::info!("Skybox renderer initialized ({sample_count}x MSAA)");

        Self {
            pipeline,
            uniform_buffer,
            uniform_bind_group,
        }
    }

    /// Update the skybox uniform with a new inverse view-projection matrix.
    ///
    /// The matrix should be rotation-only (strip translation from the view
    /// matrix) so the skybox appears at infinite distance.
    pub fn update(&self, queue: &wgpu::Queue, inv_view_proj: glam::Mat4) {
        let uniform = SkyboxUniform {
            inv_view_proj: inv_view_proj.to_cols_array_2d(),
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    /// Render the skybox. Should be the first draw of the main pass.
    pub fn render<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>, cubemap: &'a wgpu::BindGroup) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        pass.set_bind_group(1, cubemap, &[]);
        pass.draw(0..3, 0..1);
    }
}

/// Rotation-only inverse view-projection for skybox sampling.
pub fn skybox_inv_view_proj(view: glam::Mat4, proj: glam::Mat4) -> glam::Mat4 {
    let mut rotation_only = view;
    rotation_only.w_axis = glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
    (proj * rotation_only).inverse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec3, Vec4};

    #[test]
    fn test_inv_view_proj_strips_translation() {
        let view = Mat4::look_at_rh(Vec3::new(100.0, 50.0, 25.0), Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh(1.0, 16.0 / 9.0, 8000.0, 1.0);

        let a = skybox_inv_view_proj(view, proj);
        let translated_view = Mat4::look_at_rh(
            Vec3::new(100.0, 50.0, 25.0) + Vec3::splat(500.0),
            Vec3::splat(500.0),
            Vec3::Y,
        );
        let b = skybox_inv_view_proj(translated_view, proj);

        // Same orientation from a different position gives the same matrix.
        for col in 0..4 {
            let da = a.col(col);
            let db = b.col(col);
            assert!(
                (da - db).abs().max_element() < 1e-3,
                "column {col} differs: {da:?} vs {db:?}"
            );
        }
    }

    #[test]
    fn test_far_plane_ray_points_forward() {
        let view = Mat4::look_at_rh(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y);
        let proj = Mat4::perspective_rh(1.0, 1.0, 8000.0, 1.0); // reverse-Z swap
        let inv = skybox_inv_view_proj(view, proj);

        // Screen center on the reverse-Z far plane (z = 0).
        let world = inv * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let dir = (world.truncate() / world.w).normalize();
        assert!(
            (dir - Vec3::NEG_Z).length() < 1e-4,
            "center ray {dir:?} should look down -Z"
        );
    }
}
