//! Directional light shadow mapping.
//!
//! A single orthographic shadow camera rides on the sun. Casters are drawn
//! depth-only from the light's point of view, and the main pass samples the
//! resulting map through a comparison sampler.

use std::num::NonZeroU64;

use glam::{Mat4, Vec3};

use crate::mesh::SphereVertex;

/// Parameters of the orthographic shadow camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowCameraParams {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub near: f32,
    pub far: f32,
    /// Constant depth bias applied when sampling, in light-space depth units.
    pub bias: f32,
}

impl Default for ShadowCameraParams {
    fn default() -> Self {
        Self {
            left: -150.0,
            right: 150.0,
            top: 150.0,
            bottom: -150.0,
            near: 950.0,
            far: 1250.0,
            bias: 0.0,
        }
    }
}

impl ShadowCameraParams {
    /// Light-space view-projection matrix for a light at `light_pos`
    /// shining toward the scene origin. Reverse-Z, like the main camera.
    pub fn view_projection(&self, light_pos: Vec3) -> Mat4 {
        let view = Mat4::look_at_rh(light_pos, Vec3::ZERO, Vec3::Y);
        let proj = Mat4::orthographic_rh(
            self.left,
            self.right,
            self.bottom,
            self.top,
            self.far,  // swapped for reverse-Z
            self.near, // swapped for reverse-Z
        );
        proj * view
    }
}

/// The shadow depth texture and the comparison sampler used to read it.
pub struct ShadowMap {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    resolution: u32,
}

impl ShadowMap {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Create a square shadow map of the given resolution.
    pub fn new(device: &wgpu::Device, resolution: u32) -> Self {
        let resolution = resolution.max(1);
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("shadow-map"),
            size: wgpu::Extent3d {
                width: resolution,
                height: resolution,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        // Reverse-Z: a fragment is lit when its light-space depth is at
        // least the stored depth of the closest caster.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("shadow-sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            compare: Some(wgpu::CompareFunction::GreaterEqual),
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
            resolution,
        }
    }

    /// Recreate the map at a new resolution. No-op when unchanged.
    pub fn set_resolution(&mut self, device: &wgpu::Device, resolution: u32) {
        if self.resolution == resolution.max(1) {
            return;
        }
        *self = Self::new(device, resolution);
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }
}

/// WGSL shader source for shadow depth-only rendering.
pub const SHADOW_SHADER_SOURCE: &str = r#"
struct LightMatrix {
    view_proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> light: LightMatrix;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

@vertex
fn vs_shadow(in: VertexInput) -> @builtin(position) vec4<f32> {
    return light.view_proj * vec4<f32>(in.position, 1.0);
}
"#;

/// Depth-only pipeline for rendering the shadow map.
pub struct ShadowPipeline {
    /// The underlying wgpu render pipeline.
    pub pipeline: wgpu::RenderPipeline,
    /// Light matrix uniform bind group layout (group 0).
    pub light_bind_group_layout: wgpu::BindGroupLayout,
}

impl ShadowPipeline {
    /// Create a new shadow depth-only pipeline.
    pub fn new(device: &wgpu::Device) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shadow-shader"),
            source: wgpu::ShaderSource::Wgsl(SHADOW_SHADER_SOURCE.into()),
        });

        let light_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("shadow-light-bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(64), // mat4x4<f32>
                    },
                    count: None,
                }],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("shadow-pipeline-layout"),
            bind_group_layouts: &[&light_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("shadow-depth-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_shadow"),
                buffers: &[SphereVertex::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Front), // front-face culling reduces acne
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: ShadowMap::FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::GreaterEqual, // reverse-Z
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState {
                    constant: 2,
                    slope_scale: 1.75,
                    clamp: 0.0,
                },
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: None, // depth-only
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            light_bind_group_layout,
        }
    }
}

/// Render the shadow casters into the shadow map.
pub fn render_shadow_pass(
    encoder: &mut wgpu::CommandEncoder,
    shadow_pipeline: &ShadowPipeline,
    shadow_map: &ShadowMap,
    casters: &[(&wgpu::BindGroup, &crate::mesh::MeshBuffer)],
) {
    let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("shadow-pass"),
        color_attachments: &[],
        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
            view: &shadow_map.view,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(0.0), // reverse-Z: clear to 0
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        }),
        timestamp_writes: None,
        occlusion_query_set: None,
    });

    pass.set_pipeline(&shadow_pipeline.pipeline);
    for (bind_group, mesh) in casters {
        pass.set_bind_group(0, *bind_group, &[]);
        mesh.bind(&mut pass);
        mesh.draw(&mut pass);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::create_test_device_queue;
    use glam::Vec4;

    #[test]
    fn test_default_params_match_scene_light() {
        let params = ShadowCameraParams::default();
        assert_eq!(params.near, 950.0);
        assert_eq!(params.far, 1250.0);
        assert_eq!(params.right, 150.0);
        assert_eq!(params.left, -150.0);
        assert_eq!(params.top, 150.0);
        assert_eq!(params.bottom, -150.0);
        assert_eq!(params.bias, 0.0);
    }

    #[test]
    fn test_origin_projects_inside_light_frustum() {
        let params = ShadowCameraParams::default();
        let light_pos = Vec3::new(-380.0, 240.0, -1000.0);
        // The light sits roughly 1100 units from the origin, between the
        // configured near and far planes.
        assert!(light_pos.length() > params.near && light_pos.length() < params.far);

        let vp = params.view_projection(light_pos);
        let clip = vp * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() <= 1.0, "origin outside x bounds: {}", ndc.x);
        assert!(ndc.y.abs() <= 1.0, "origin outside y bounds: {}", ndc.y);
        assert!(
            (0.0..=1.0).contains(&ndc.z),
            "origin outside depth range: {}",
            ndc.z
        );
    }

    #[test]
    fn test_reverse_z_orders_depth_toward_light() {
        let params = ShadowCameraParams::default();
        let light_pos = Vec3::new(0.0, 0.0, -1100.0);
        let vp = params.view_projection(light_pos);

        // A point nearer the light must get a larger depth value.
        let near_pt = vp * Vec4::new(0.0, 0.0, -100.0, 1.0);
        let far_pt = vp * Vec4::new(0.0, 0.0, 100.0, 1.0);
        assert!(near_pt.z / near_pt.w > far_pt.z / far_pt.w);
    }

    #[test]
    fn test_shadow_map_resolution() {
        let Some((device, _queue)) = create_test_device_queue() else {
            return;
        };
        let map = ShadowMap::new(&device, 512);
        assert_eq!(map.resolution(), 512);
        assert_eq!(map.texture.width(), 512);
        assert_eq!(map.texture.format(), wgpu::TextureFormat::Depth32Float);
    }

    #[test]
    fn test_set_resolution_recreates_texture() {
        let Some((device, _queue)) = create_test_device_queue() else {
            return;
        };
        let mut map = ShadowMap::new(&device, 512);
        map.set_resolution(&device, 1024);
        assert_eq!(map.resolution(), 1024);
        assert_eq!(map.texture.width(), 1024);
    }

    #[test]
    fn test_zero_resolution_clamped() {
        let Some((device, _queue)) = create_test_device_queue() else {
            return;
        };
        let map = ShadowMap::new(&device, 0);
        assert_eq!(map.resolution(), 1);
    }
}
