//! Screen-space lens flare for the sun.
//!
//! Draws textured sprites along the light-to-center screen diagonal. The
//! burst sprite sits on the light itself; the ghost sprites (circles and
//! hexagons) march toward and past the screen center according to their
//! distance parameter. Intensity fades as the light nears the screen edge.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3, Vec4};

use orrery_assets::FlareTexture;

use crate::depth::DepthBuffer;

/// A single flare sprite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlareElement {
    /// Sprite size in pixels.
    pub size: f32,
    /// Opacity multiplier.
    pub opacity: f32,
    /// Position along the flare line. 0.0 = on the light, 0.5 = screen
    /// center, 1.0 = mirrored through the center.
    pub distance: f32,
}

/// Ghost sprites at or above this pixel size use the hexagon texture.
pub const CIRCLE_SIZE_MAX: f32 = 70.0;

/// The nine sprites of the default sun flare.
pub const DEFAULT_FLARE_ELEMENTS: [FlareElement; 9] = [
    FlareElement {
        size: 1400.0,
        opacity: 1.0,
        distance: 0.0,
    },
    FlareElement {
        size: 20.0,
        opacity: 0.4,
        distance: 0.63,
    },
    FlareElement {
        size: 40.0,
        opacity: 0.3,
        distance: 0.64,
    },
    FlareElement {
        size: 70.0,
        opacity: 0.8,
        distance: 0.7,
    },
    FlareElement {
        size: 110.0,
        opacity: 0.7,
        distance: 0.8,
    },
    FlareElement {
        size: 60.0,
        opacity: 0.4,
        distance: 0.85,
    },
    FlareElement {
        size: 30.0,
        opacity: 0.4,
        distance: 0.86,
    },
    FlareElement {
        size: 120.0,
        opacity: 0.3,
        distance: 0.9,
    },
    FlareElement {
        size: 260.0,
        opacity: 0.4,
        distance: 1.0,
    },
];

/// The texture a flare element draws with. The first element is the sun
/// burst itself; the ghosts pick circle or hexagon by size.
pub fn element_texture(index: usize, element: &FlareElement) -> FlareTexture {
    if index == 0 {
        FlareTexture::Sun
    } else if element.size < CIRCLE_SIZE_MAX {
        FlareTexture::Circle
    } else {
        FlareTexture::Hexagon
    }
}

/// GPU instance data for a single flare sprite.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct FlareInstance {
    /// Sprite center in NDC.
    center: [f32; 2],
    /// Half extents in NDC.
    scale: [f32; 2],
    /// Tint color and final opacity.
    color: [f32; 4],
}

/// WGSL shader source for lens flare sprites.
pub const FLARE_SHADER_SOURCE: &str = r#"
struct FlareInstance {
    center: vec2<f32>,
    scale: vec2<f32>,
    color: vec4<f32>,
};

@group(0) @binding(0) var<storage, read> instances: array<FlareInstance>;

@group(1) @binding(0) var flare_texture: texture_2d<f32>;
@group(1) @binding(1) var flare_sampler: sampler;

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) color: vec4<f32>,
};

@vertex
fn vs_flare(@builtin(vertex_index) vid: u32, @builtin(instance_index) iid: u32) -> VertexOutput {
    let inst = instances[iid];
    // Triangle-strip quad: 0,1,2,3 -> BL,BR,TL,TR
    let uv = vec2<f32>(f32(vid & 1u), f32((vid >> 1u) & 1u));
    let local = (uv - 0.5) * 2.0;

    var out: VertexOutput;
    out.position = vec4<f32>(inst.center + local * inst.scale, 0.0, 1.0);
    out.uv = vec2<f32>(uv.x, 1.0 - uv.y);
    out.color = inst.color;
    return out;
}

@fragment
fn fs_flare(in: VertexOutput) -> @location(0) vec4<f32> {
    let tex = textureSample(flare_texture, flare_sampler, in.uv);
    // Additive blending; the textures carry no alpha channel.
    return vec4<f32>(tex.rgb * in.color.rgb * in.color.a, 1.0);
}
"#;

/// Maximum number of flare sprites supported per frame.
const MAX_FLARE_ELEMENTS: usize = 32;

/// One contiguous run of instances sharing a texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlareBatch {
    pub texture: FlareTexture,
    pub start: u32,
    pub end: u32,
}

/// Screen-space lens flare renderer.
pub struct LensFlareRenderer {
    pipeline: wgpu::RenderPipeline,
    instance_buffer: wgpu::Buffer,
    instance_bind_group: wgpu::BindGroup,
    batches: Vec<FlareBatch>,
    /// Screen-edge fade margin in UV units.
    pub edge_fade_margin: f32,
}

impl LensFlareRenderer {
    /// Create a new lens flare renderer matching the main pass format and
    /// sample count. `texture_bind_group_layout` is the texture manager's
    /// 2D layout (group 1).
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        sample_count: u32,
        texture_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        use wgpu::util::DeviceExt;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("lens-flare-shader"),
            source: wgpu::ShaderSource::Wgsl(FLARE_SHADER_SOURCE.into()),
        });

        let instance_data = vec![FlareInstance::zeroed(); MAX_FLARE_ELEMENTS];
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("flare-instances"),
            contents: bytemuck::cast_slice(&instance_data),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        });

        let instance_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("flare-instance-bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Storage { read_only: true },
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let instance_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("flare-instance-bg"),
            layout: &instance_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: instance_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("flare-pipeline-layout"),
            bind_group_layouts: &[&instance_bgl, texture_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("lens-flare-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_flare"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                ..Default::default()
            },
            // Flares draw last inside the main pass, on top of everything.
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
                entry_point: Some("fs_flare"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState {
                        color: wgpu::BlendComponent {
                            src_factor: wgpu::BlendFactor::One,
                            dst_factor: wgpu::BlendFactor::One,
                            operation: wgpu::BlendOperation::Add,
                        },
                        alpha: wgpu::BlendComponent::OVER,
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            instance_buffer,
            instance_bind_group,
            batches: Vec::new(),
            edge_fade_margin: 0.3,
        }
    }

    /// Update sprite instances for this frame.
    ///
    /// Returns `false` (and draws nothing) when the light is behind the
    /// camera or fully faded out at the screen border.
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        queue: &wgpu::Queue,
        light_pos: Vec3,
        light_color: [f32; 3],
        intensity: f32,
        view_proj: Mat4,
        viewport: (u32, u32),
        elements: &[FlareElement],
    ) -> bool {
        self.batches.clear();

        let screen_pos = match project_to_screen(light_pos, view_proj) {
            Some(pos) => pos,
            None => return false,
        };

        let edge_fade = edge_fade_factor(screen_pos, self.edge_fade_margin);
        if edge_fade <= 0.0 || intensity <= 0.0 {
            return false;
        }

        let (width, height) = (viewport.0.max(1) as f32, viewport.1.max(1) as f32);
        let count = elements.len().min(MAX_FLARE_ELEMENTS);

        // Group instances by texture so each batch is one draw.
        let mut instances = Vec::with_capacity(count);
        for texture in [FlareTexture::Sun, FlareTexture::Circle, FlareTexture::Hexagon] {
            let start = instances.len() as u32;
            for (i, elem) in elements.iter().take(count).enumerate() {
                if element_texture(i, elem) != texture {
                    continue;
                }
                let pos = element_screen_position(screen_pos, elem.distance);
                let ndc = Vec2::new(pos.x * 2.0 - 1.0, 1.0 - pos.y * 2.0);
                instances.push(FlareInstance {
                    center: [ndc.x, ndc.y],
                    scale: [elem.size / width, elem.size / height],
                    color: [
                        light_color[0],
                        light_color[1],
                        light_color[2],
                        elem.opacity * intensity * edge_fade,
                    ],
                });
            }
            let end = instances.len() as u32;
            if end > start {
                self.batches.push(FlareBatch {
                    texture,
                    start,
                    end,
                });
            }
        }

        instances.resize(MAX_FLARE_ELEMENTS, FlareInstance::zeroed());
        queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        !self.batches.is_empty()
    }

    /// Render the flare sprites. `texture_bind_group` resolves each batch's
    /// texture to a ready bind group.
    pub fn render<'a>(
        &'a self,
        pass: &mut wgpu::RenderPass<'a>,
        texture_bind_group: impl Fn(FlareTexture) -> &'a wgpu::BindGroup,
    ) {
        if self.batches.is_empty() {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.instance_bind_group, &[]);
        for batch in &self.batches {
            pass.set_bind_group(1, texture_bind_group(batch.texture), &[]);
            pass.draw(0..4, batch.start..batch.end);
        }
    }

    /// The batches produced by the last `update` call.
    pub fn batches(&self) -> &[FlareBatch] {
        &self.batches
    }
}

/// Project a world position to normalized screen coordinates [0, 1].
/// Returns `None` if the position is behind the camera.
pub fn project_to_screen(world_pos: Vec3, view_proj: Mat4) -> Option<Vec2> {
    let clip = view_proj * Vec4::new(world_pos.x, world_pos.y, world_pos.z, 1.0);
    if clip.w <= 0.0 {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    Some(Vec2::new(ndc.x * 0.5 + 0.5, -ndc.y * 0.5 + 0.5))
}

/// Screen position of a flare element along the light-to-center line.
/// Distance 0.5 lands on the center, 1.0 mirrors through it.
pub fn element_screen_position(light_screen_pos: Vec2, distance: f32) -> Vec2 {
    let screen_center = Vec2::new(0.5, 0.5);
    light_screen_pos + (screen_center - light_screen_pos) * 2.0 * distance
}

/// Edge fade factor based on how close the light is to the screen border.
pub fn edge_fade_factor(screen_pos: Vec2, margin: f32) -> f32 {
    let dx = (screen_pos.x - 0.5).abs();
    let dy = (screen_pos.y - 0.5).abs();
    let max_dist = dx.max(dy);

    let fade_start = 0.5 - margin;
    if max_dist < fade_start {
        1.0
    } else if margin <= 0.0 {
        0.0
    } else {
        ((0.5 - max_dist) / margin).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;

    #[test]
    fn test_default_elements_match_sun_flare() {
        assert_eq!(DEFAULT_FLARE_ELEMENTS.len(), 9);
        assert_eq!(DEFAULT_FLARE_ELEMENTS[0].size, 1400.0);
        assert_eq!(DEFAULT_FLARE_ELEMENTS[0].distance, 0.0);
        assert_eq!(DEFAULT_FLARE_ELEMENTS[8].distance, 1.0);
    }

    #[test]
    fn test_first_element_uses_sun_texture() {
        let tex = element_texture(0, &DEFAULT_FLARE_ELEMENTS[0]);
        assert_eq!(tex, FlareTexture::Sun);
    }

    #[test]
    fn test_ghost_texture_selected_by_size() {
        let small = FlareElement {
            size: 30.0,
            opacity: 0.4,
            distance: 0.5,
        };
        let large = FlareElement {
            size: 110.0,
            opacity: 0.7,
            distance: 0.5,
        };
        let boundary = FlareElement {
            size: CIRCLE_SIZE_MAX,
            opacity: 0.8,
            distance: 0.5,
        };
        assert_eq!(element_texture(3, &small), FlareTexture::Circle);
        assert_eq!(element_texture(3, &large), FlareTexture::Hexagon);
        assert_eq!(element_texture(3, &boundary), FlareTexture::Hexagon);
    }

    #[test]
    fn test_light_ahead_projects_near_center() {
        let view_proj = Mat4::perspective_rh(1.0, 16.0 / 9.0, 8000.0, 1.0);
        let screen = project_to_screen(Vec3::new(0.0, 0.0, -500.0), view_proj);
        let pos = screen.expect("light ahead should project");
        assert!((pos.x - 0.5).abs() < 1e-4);
        assert!((pos.y - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_light_behind_camera_is_culled() {
        let view_proj = Mat4::perspective_rh(1.0, 16.0 / 9.0, 8000.0, 1.0);
        assert!(project_to_screen(Vec3::new(0.0, 0.0, 500.0), view_proj).is_none());
    }

    #[test]
    fn test_element_at_zero_distance_sits_on_light() {
        let light = Vec2::new(0.2, 0.7);
        let pos = element_screen_position(light, 0.0);
        assert!((pos - light).length() < 1e-6);
    }

    #[test]
    fn test_element_at_half_distance_hits_center() {
        let light = Vec2::new(0.1, 0.9);
        let pos = element_screen_position(light, 0.5);
        assert!((pos - Vec2::new(0.5, 0.5)).length() < 1e-6);
    }

    #[test]
    fn test_element_at_full_distance_mirrors_light() {
        let light = Vec2::new(0.2, 0.3);
        let pos = element_screen_position(light, 1.0);
        let mirrored = Vec2::new(0.8, 0.7);
        assert!((pos - mirrored).length() < 1e-6);
    }

    #[test]
    fn test_elements_stay_on_the_diagonal() {
        let light = Vec2::new(0.3, 0.2);
        let direction = Vec2::new(0.5, 0.5) - light;
        for elem in &DEFAULT_FLARE_ELEMENTS {
            let offset = element_screen_position(light, elem.distance) - light;
            let cross = offset.x * direction.y - offset.y * direction.x;
            assert!(
                cross.abs() < 1e-5,
                "element at distance {} is off the diagonal",
                elem.distance
            );
        }
    }

    #[test]
    fn test_edge_fade_full_at_center_zero_offscreen() {
        let margin = 0.3;
        assert!((edge_fade_factor(Vec2::new(0.5, 0.5), margin) - 1.0).abs() < 1e-6);

        let near_edge = edge_fade_factor(Vec2::new(0.9, 0.5), margin);
        assert!(near_edge > 0.0 && near_edge < 1.0);

        assert!(edge_fade_factor(Vec2::new(1.1, 0.5), margin) <= 0.0);
    }

    #[test]
    fn test_edge_fade_is_symmetric() {
        let margin = 0.3;
        let fade_left = edge_fade_factor(Vec2::new(0.1, 0.5), margin);
        let fade_right = edge_fade_factor(Vec2::new(0.9, 0.5), margin);
        assert!((fade_left - fade_right).abs() < 1e-6);
    }
}
