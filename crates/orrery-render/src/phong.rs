//! Blinn-Phong shading for the planet spheres.
//!
//! One shader serves every sphere in the scene: the planet with its color,
//! bump, and specular maps, the moon with color and bump, and the cloud
//! shell which reuses its single texture as both alpha map and bump map.
//! Material flags select which maps participate per draw.

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::depth::DepthBuffer;
use crate::mesh::{BufferAllocator, IndexData, MeshBuffer, SphereVertex};
use crate::shadow::ShadowMap;
use crate::sphere::SphereGeometry;

/// CPU-side directional light description.
#[derive(Clone, Copy, Debug)]
pub struct LightUniform {
    /// Light position; the direction toward the light is derived from it.
    pub position: Vec3,
    /// Light color (linear RGB).
    pub color: [f32; 3],
    /// Intensity multiplier.
    pub intensity: f32,
}

/// Scene-wide uniform data shared by every Phong draw.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SceneUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub light_view_proj: [[f32; 4]; 4],
    /// Camera world position (w unused).
    pub camera_pos: [f32; 4],
    /// Normalized direction from the surface toward the light (w unused).
    pub light_dir: [f32; 4],
    /// Light color in rgb, intensity in w.
    pub light_color: [f32; 4],
    /// x = shadow bias, y = shadows enabled (0/1), zw unused.
    pub shadow_params: [f32; 4],
}

impl SceneUniforms {
    /// Assemble the per-frame scene uniform.
    pub fn new(
        view_proj: Mat4,
        camera_pos: Vec3,
        light: &LightUniform,
        light_view_proj: Mat4,
        shadow_bias: f32,
        shadows_enabled: bool,
    ) -> Self {
        let dir = light.position.normalize_or_zero();
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            light_view_proj: light_view_proj.to_cols_array_2d(),
            camera_pos: [camera_pos.x, camera_pos.y, camera_pos.z, 0.0],
            light_dir: [dir.x, dir.y, dir.z, 0.0],
            light_color: [
                light.color[0],
                light.color[1],
                light.color[2],
                light.intensity,
            ],
            shadow_params: [shadow_bias, if shadows_enabled { 1.0 } else { 0.0 }, 0.0, 0.0],
        }
    }
}

/// GPU material uniform. Mirrors the `Material` struct in the shader.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct MaterialUniform {
    /// rgb diffuse color, a = opacity.
    diffuse: [f32; 4],
    /// rgb specular color, w = shininess.
    specular: [f32; 4],
    /// x = bump scale, yzw unused.
    params: [f32; 4],
    /// use_map, use_bump_map, use_specular_map, use_alpha_map.
    flags: [u32; 4],
}

/// Per-object model uniform: model matrix and its normal matrix.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct ModelUniform {
    model: [[f32; 4]; 4],
    normal: [[f32; 4]; 4],
}

/// Material description for a Phong-shaded sphere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialParams {
    /// Diffuse color (linear RGB).
    pub diffuse_color: [f32; 3],
    /// Overall opacity; only meaningful with the blended pipeline.
    pub opacity: f32,
    /// Specular highlight color (linear RGB).
    pub specular_color: [f32; 3],
    /// Blinn-Phong shininess exponent.
    pub shininess: f32,
    /// Bump map height scale.
    pub bump_scale: f32,
    /// Sample the color map.
    pub use_map: bool,
    /// Perturb the normal with the bump map.
    pub use_bump_map: bool,
    /// Modulate the specular term with the specular map.
    pub use_specular_map: bool,
    /// Take per-texel opacity from the color map slot (cloud layer).
    pub use_alpha_map: bool,
}

impl Default for MaterialParams {
    fn default() -> Self {
        Self {
            diffuse_color: [1.0, 1.0, 1.0],
            opacity: 1.0,
            specular_color: [0.067, 0.067, 0.067],
            shininess: 30.0,
            bump_scale: 1.0,
            use_map: true,
            use_bump_map: false,
            use_specular_map: false,
            use_alpha_map: false,
        }
    }
}

impl MaterialParams {
    fn to_uniform(self) -> MaterialUniform {
        MaterialUniform {
            diffuse: [
                self.diffuse_color[0],
                self.diffuse_color[1],
                self.diffuse_color[2],
                self.opacity,
            ],
            specular: [
                self.specular_color[0],
                self.specular_color[1],
                self.specular_color[2],
                self.shininess.max(1e-4),
            ],
            params: [self.bump_scale, 0.0, 0.0, 0.0],
            flags: [
                self.use_map as u32,
                self.use_bump_map as u32,
                self.use_specular_map as u32,
                self.use_alpha_map as u32,
            ],
        }
    }
}

/// WGSL shader source for Blinn-Phong sphere shading.
pub const PHONG_SHADER_SOURCE: &str = r#"
struct SceneUniforms {
    view_proj: mat4x4<f32>,
    light_view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    light_dir: vec4<f32>,
    light_color: vec4<f32>,
    shadow_params: vec4<f32>,
};

struct Material {
    diffuse: vec4<f32>,
    specular: vec4<f32>,
    params: vec4<f32>,
    flags: vec4<u32>,
};

struct Model {
    model: mat4x4<f32>,
    normal: mat4x4<f32>,
};

@group(0) @binding(0) var<uniform> scene: SceneUniforms;
@group(0) @binding(1) var shadow_map: texture_depth_2d;
@group(0) @binding(2) var shadow_sampler: sampler_comparison;

@group(1) @binding(0) var<uniform> material: Material;
@group(1) @binding(1) var map_texture: texture_2d<f32>;
@group(1) @binding(2) var bump_texture: texture_2d<f32>;
@group(1) @binding(3) var specular_texture: texture_2d<f32>;
@group(1) @binding(4) var map_sampler: sampler;

@group(2) @binding(0) var<uniform> object: Model;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
    @location(3) shadow_pos: vec4<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    let world = object.model * vec4<f32>(in.position, 1.0);

    var out: VertexOutput;
    out.clip_position = scene.view_proj * world;
    out.world_pos = world.xyz;
    out.normal = normalize((object.normal * vec4<f32>(in.normal, 0.0)).xyz);
    out.uv = in.uv;
    out.shadow_pos = scene.light_view_proj * world;
    return out;
}

// Height-field normal perturbation from the bump map, using screen-space
// derivatives of the sampled height.
fn perturb_normal(n: vec3<f32>, world_pos: vec3<f32>, uv: vec2<f32>, scale: f32) -> vec3<f32> {
    let h = textureSample(bump_texture, map_sampler, uv).x;
    let hx = textureSample(bump_texture, map_sampler, uv + dpdx(uv)).x;
    let hy = textureSample(bump_texture, map_sampler, uv + dpdy(uv)).x;
    let db = vec2<f32>(hx - h, hy - h) * scale;

    let sigma_x = dpdx(world_pos);
    let sigma_y = dpdy(world_pos);
    let r1 = cross(sigma_y, n);
    let r2 = cross(n, sigma_x);
    let det = dot(sigma_x, r1);
    let grad = sign(det) * (db.x * r1 + db.y * r2);
    return normalize(abs(det) * n - grad);
}

fn shadow_factor(shadow_pos: vec4<f32>) -> f32 {
    if scene.shadow_params.y < 0.5 {
        return 1.0;
    }
    let ndc = shadow_pos.xyz / shadow_pos.w;
    let uv = vec2<f32>(ndc.x * 0.5 + 0.5, ndc.y * -0.5 + 0.5);
    if uv.x < 0.0 || uv.x > 1.0 || uv.y < 0.0 || uv.y > 1.0 {
        return 1.0;
    }
    // Reverse-Z: lit when the fragment depth reaches the stored caster depth.
    return textureSampleCompare(shadow_map, shadow_sampler, uv, ndc.z + scene.shadow_params.x);
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    var base = material.diffuse.rgb;
    var alpha = material.diffuse.a;

    let map_sample = textureSample(map_texture, map_sampler, in.uv);
    if material.flags.x == 1u {
        base = base * map_sample.rgb;
    }
    if material.flags.w == 1u {
        // Alpha map shares the color map slot; green channel carries coverage.
        alpha = alpha * map_sample.g;
    }

    var n = normalize(in.normal);
    // Bump sampling happens unconditionally to keep control flow uniform;
    // the flag only gates whether the result is used.
    let bumped = perturb_normal(n, in.world_pos, in.uv, material.params.x);
    if material.flags.y == 1u {
        n = bumped;
    }

    var spec_strength = 1.0;
    let spec_sample = textureSample(specular_texture, map_sampler, in.uv).r;
    if material.flags.z == 1u {
        spec_strength = spec_sample;
    }

    let l = normalize(scene.light_dir.xyz);
    let v = normalize(scene.camera_pos.xyz - in.world_pos);
    let h = normalize(l + v);

    let shadow = shadow_factor(in.shadow_pos);
    let radiance = scene.light_color.rgb * scene.light_color.w * shadow;

    let diffuse = max(dot(n, l), 0.0) * base * radiance;
    let specular = pow(max(dot(n, h), 0.0), material.specular.w)
        * material.specular.rgb
        * spec_strength
        * radiance;

    return vec4<f32>((diffuse + specular) * alpha, alpha);
}
"#;

/// How a Phong draw blends with the framebuffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhongBlend {
    /// Depth-tested, depth-writing, no blending.
    Opaque,
    /// Premultiplied alpha blending with depth writes off (cloud shell).
    AlphaBlend,
}

/// The full set of Phong pipeline variants sharing one set of layouts.
pub struct PhongPipelines {
    opaque: wgpu::RenderPipeline,
    blended: wgpu::RenderPipeline,
    wireframe: Option<wgpu::RenderPipeline>,
    pub scene_bind_group_layout: wgpu::BindGroupLayout,
    pub material_bind_group_layout: wgpu::BindGroupLayout,
    pub model_bind_group_layout: wgpu::BindGroupLayout,
    sample_count: u32,
}

impl PhongPipelines {
    /// Build the opaque, blended, and (when supported) wireframe variants.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        sample_count: u32,
        supports_wireframe: bool,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("phong-shader"),
            source: wgpu::ShaderSource::Wgsl(PHONG_SHADER_SOURCE.into()),
        });

        let scene_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("phong-scene-bgl"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: NonZeroU64::new(
                                std::mem::size_of::<SceneUniforms>() as u64,
                            ),
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Depth,
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                        count: None,
                    },
                ],
            });

        let material_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("phong-material-bgl"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: NonZeroU64::new(
                                std::mem::size_of::<MaterialUniform>() as u64,
                            ),
                        },
                        count: None,
                    },
                    texture_entry(1),
                    texture_entry(2),
                    texture_entry(3),
                    wgpu::BindGroupLayoutEntry {
                        binding: 4,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let model_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("phong-model-bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(
                            std::mem::size_of::<ModelUniform>() as u64
                        ),
                    },
                    count: None,
                }],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("phong-pipeline-layout"),
            bind_group_layouts: &[
                &scene_bind_group_layout,
                &material_bind_group_layout,
                &model_bind_group_layout,
            ],
            push_constant_ranges: &[],
        });

        let build = |label: &str,
                     blend: Option<wgpu::BlendState>,
                     depth_write: bool,
                     polygon_mode: wgpu::PolygonMode| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[SphereVertex::layout()],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: Some(wgpu::Face::Back),
                    unclipped_depth: false,
                    polygon_mode,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DepthBuffer::FORMAT,
                    depth_write_enabled: depth_write,
                    depth_compare: DepthBuffer::COMPARE_FUNCTION,
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
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        blend,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                multiview: None,
                cache: None,
            })
        };

        let opaque = build("phong-opaque", None, true, wgpu::PolygonMode::Fill);
        let blended = build(
            "phong-blended",
            Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
            false,
            wgpu::PolygonMode::Fill,
        );
        let wireframe = supports_wireframe
            .then(|| build("phong-wireframe", None, true, wgpu::PolygonMode::Line));

        Self {
            opaque,
            blended,
            wireframe,
            scene_bind_group_layout,
            material_bind_group_layout,
            model_bind_group_layout,
            sample_count,
        }
    }

    /// Select the pipeline variant for a draw.
    pub fn variant(&self, blend: PhongBlend, wireframe: bool) -> &wgpu::RenderPipeline {
        if wireframe && let Some(pipeline) = &self.wireframe {
            return pipeline;
        }
        match blend {
            PhongBlend::Opaque => &self.opaque,
            PhongBlend::AlphaBlend => &self.blended,
        }
    }

    /// Sample count the pipelines were built for.
    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// Create the scene bind group from the uniform buffer and shadow map.
    pub fn create_scene_bind_group(
        &self,
        device: &wgpu::Device,
        scene_buffer: &wgpu::Buffer,
        shadow_map: &ShadowMap,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("phong-scene-bg"),
            layout: &self.scene_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: scene_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&shadow_map.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&shadow_map.sampler),
                },
            ],
        })
    }
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

/// A material instance: uniform buffer plus texture bind group.
pub struct PhongMaterial {
    pub params: MaterialParams,
    buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl PhongMaterial {
    /// Create a material binding the three map slots. Slots a material does
    /// not use still need a placeholder view.
    pub fn new(
        device: &wgpu::Device,
        pipelines: &PhongPipelines,
        label: &str,
        params: MaterialParams,
        map: &wgpu::TextureView,
        bump: &wgpu::TextureView,
        specular: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
    ) -> Self {
        use wgpu::util::DeviceExt;

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-material")),
            contents: bytemuck::cast_slice(&[params.to_uniform()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label}-material-bg")),
            layout: &pipelines.material_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(map),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(bump),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(specular),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        Self {
            params,
            buffer,
            bind_group,
        }
    }

    /// Push updated material parameters to the GPU.
    pub fn update(&mut self, queue: &wgpu::Queue, params: MaterialParams) {
        if self.params == params {
            return;
        }
        self.params = params;
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[params.to_uniform()]));
    }
}

/// A sphere mesh with its per-object model uniform.
pub struct PhongMesh {
    pub mesh: MeshBuffer,
    model_buffer: wgpu::Buffer,
    pub model_bind_group: wgpu::BindGroup,
}

impl PhongMesh {
    /// Upload sphere geometry and allocate the model uniform.
    pub fn new(
        device: &wgpu::Device,
        pipelines: &PhongPipelines,
        label: &str,
        geometry: &SphereGeometry,
    ) -> Self {
        use wgpu::util::DeviceExt;

        let allocator = BufferAllocator::new(device);
        let mesh = allocator.create_mesh(
            label,
            geometry.vertex_bytes(),
            IndexData::U32(&geometry.indices),
        );

        let uniform = ModelUniform {
            model: Mat4::IDENTITY.to_cols_array_2d(),
            normal: Mat4::IDENTITY.to_cols_array_2d(),
        };
        let model_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-model")),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let model_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label}-model-bg")),
            layout: &pipelines.model_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: model_buffer.as_entire_binding(),
            }],
        });

        Self {
            mesh,
            model_buffer,
            model_bind_group,
        }
    }

    /// Write a new model matrix (the normal matrix is derived from it).
    pub fn update_model(&self, queue: &wgpu::Queue, model: Mat4) {
        let uniform = ModelUniform {
            model: model.to_cols_array_2d(),
            normal: model.inverse().transpose().to_cols_array_2d(),
        };
        queue.write_buffer(&self.model_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }
}

/// Draw one Phong-shaded sphere.
pub fn draw_phong<'a>(
    pass: &mut wgpu::RenderPass<'a>,
    pipelines: &'a PhongPipelines,
    blend: PhongBlend,
    wireframe: bool,
    scene_bind_group: &'a wgpu::BindGroup,
    material: &'a PhongMaterial,
    mesh: &'a PhongMesh,
) {
    pass.set_pipeline(pipelines.variant(blend, wireframe));
    pass.set_bind_group(0, scene_bind_group, &[]);
    pass.set_bind_group(1, &material.bind_group, &[]);
    pass.set_bind_group(2, &mesh.model_bind_group, &[]);
    mesh.mesh.bind(pass);
    mesh.mesh.draw(pass);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_uniform_flags_encoding() {
        let params = MaterialParams {
            use_map: true,
            use_bump_map: false,
            use_specular_map: true,
            use_alpha_map: false,
            ..MaterialParams::default()
        };
        let uniform = params.to_uniform();
        assert_eq!(uniform.flags, [1, 0, 1, 0]);
    }

    #[test]
    fn test_material_uniform_packs_opacity_and_shininess() {
        let params = MaterialParams {
            diffuse_color: [0.2, 0.4, 0.6],
            opacity: 0.9,
            specular_color: [0.1, 0.2, 0.3],
            shininess: 6.0,
            ..MaterialParams::default()
        };
        let uniform = params.to_uniform();
        assert_eq!(uniform.diffuse, [0.2, 0.4, 0.6, 0.9]);
        assert_eq!(uniform.specular, [0.1, 0.2, 0.3, 6.0]);
    }

    #[test]
    fn test_zero_shininess_is_clamped() {
        // pow(x, 0) would flatten the highlight across the whole sphere.
        let params = MaterialParams {
            shininess: 0.0,
            ..MaterialParams::default()
        };
        assert!(params.to_uniform().specular[3] > 0.0);
    }

    #[test]
    fn test_scene_uniform_normalizes_light_direction() {
        let light = LightUniform {
            position: Vec3::new(-380.0, 240.0, -1000.0),
            color: [1.0, 1.0, 1.0],
            intensity: 1.3,
        };
        let uniforms = SceneUniforms::new(
            Mat4::IDENTITY,
            Vec3::ZERO,
            &light,
            Mat4::IDENTITY,
            0.0,
            true,
        );
        let dir = Vec3::new(
            uniforms.light_dir[0],
            uniforms.light_dir[1],
            uniforms.light_dir[2],
        );
        assert!((dir.length() - 1.0).abs() < 1e-5);
        assert_eq!(uniforms.light_color[3], 1.3);
        assert_eq!(uniforms.shadow_params[1], 1.0);
    }

    #[test]
    fn test_scene_uniform_shadow_disable_flag() {
        let light = LightUniform {
            position: Vec3::X,
            color: [1.0; 3],
            intensity: 1.0,
        };
        let uniforms = SceneUniforms::new(
            Mat4::IDENTITY,
            Vec3::ZERO,
            &light,
            Mat4::IDENTITY,
            0.001,
            false,
        );
        assert_eq!(uniforms.shadow_params[0], 0.001);
        assert_eq!(uniforms.shadow_params[1], 0.0);
    }

    #[test]
    fn test_uniform_struct_sizes_match_wgsl_layout() {
        assert_eq!(std::mem::size_of::<SceneUniforms>(), 192);
        assert_eq!(std::mem::size_of::<MaterialUniform>(), 64);
        assert_eq!(std::mem::size_of::<ModelUniform>(), 128);
    }
}
