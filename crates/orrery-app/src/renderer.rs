//! GPU-side scene orchestration: owns the pipelines, meshes, materials,
//! and the shadow and main render passes.

use std::sync::Arc;

use bytemuck::Zeroable;
use glam::Mat4;
use orrery_assets::AssetCatalog;
use orrery_render::{
    Camera, DepthBuffer, FrustumHelperRenderer, LensFlareRenderer, ManagedTexture, MaterialParams,
    MeshBuffer, MsaaColorTarget, PhongBlend, PhongMaterial, PhongMesh, PhongPipelines,
    RenderContext, SceneUniforms, ShadowMap, ShadowPipeline, SkyboxRenderer, SphereGeometry,
    draw_phong, render_shadow_pass, skybox_inv_view_proj,
};
use orrery_scene::{Cloud, Earth, Moon, Scene};
use tracing::{error, info};

use crate::textures::{
    CloudTextures, EarthTextures, FlareTextures, MoonTextures, TextureLoadError, TextureStore,
};

/// One shadow caster: a per-frame light-space matrix and its bind group.
struct ShadowCaster {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl ShadowCaster {
    fn new(device: &wgpu::Device, pipeline: &ShadowPipeline, label: &str) -> Self {
        use wgpu::util::DeviceExt;

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-caster")),
            contents: bytemuck::cast_slice(&Mat4::IDENTITY.to_cols_array()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label}-caster-bg")),
            layout: &pipeline.light_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Self { buffer, bind_group }
    }

    /// Write `light_view_proj * model` for this caster.
    fn write(&self, queue: &wgpu::Queue, matrix: Mat4) {
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&matrix.to_cols_array()));
    }
}

/// Everything needed to turn a [`Scene`] into frames.
pub struct SceneRenderer {
    pipelines: PhongPipelines,
    skybox: SkyboxRenderer,
    flare: LensFlareRenderer,
    helper: FrustumHelperRenderer,
    shadow_pipeline: ShadowPipeline,
    shadow_map: ShadowMap,
    depth: DepthBuffer,
    msaa: Option<MsaaColorTarget>,
    /// Configured MSAA sample count used when antialiasing is on.
    msaa_samples: u32,
    supports_wireframe: bool,

    scene_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,

    store: TextureStore,
    earth_textures: EarthTextures,
    cloud_textures: CloudTextures,
    moon_textures: MoonTextures,
    flare_textures: FlareTextures,
    skymap: Arc<ManagedTexture>,

    earth_mesh: PhongMesh,
    cloud_mesh: PhongMesh,
    moon_mesh: PhongMesh,
    earth_material: PhongMaterial,
    cloud_material: PhongMaterial,
    moon_material: PhongMaterial,

    earth_caster: ShadowCaster,
    moon_caster: ShadowCaster,

    flare_visible: bool,
}

impl SceneRenderer {
    /// Build the full GPU state for `scene`, loading every texture at the
    /// tier each entity currently resolves to.
    pub fn new(
        gpu: &RenderContext,
        catalog: AssetCatalog,
        scene: &mut Scene,
        msaa_samples: u32,
    ) -> Result<Self, TextureLoadError> {
        let device = &gpu.device;
        let queue = &gpu.queue;
        let (width, height) = (gpu.surface_config.width, gpu.surface_config.height);
        let sample_count = if scene.renderer.antialias {
            msaa_samples
        } else {
            1
        };

        let pipelines = PhongPipelines::new(
            device,
            gpu.surface_format,
            sample_count,
            gpu.supports_wireframe,
        );
        let mut store = TextureStore::new(device, catalog);
        let skybox = SkyboxRenderer::new(
            device,
            gpu.surface_format,
            sample_count,
            store.manager.cube_bind_group_layout(),
        );
        let flare = LensFlareRenderer::new(
            device,
            gpu.surface_format,
            sample_count,
            store.manager.bind_group_layout(),
        );
        let helper = FrustumHelperRenderer::new(device, gpu.surface_format, sample_count);

        let shadow_pipeline = ShadowPipeline::new(device);
        let shadow_map = ShadowMap::new(device, scene.shadow.map_size);
        let depth = DepthBuffer::new(device, width, height, sample_count);
        let msaa = (sample_count > 1)
            .then(|| MsaaColorTarget::new(device, gpu.surface_format, width, height, sample_count));

        let earth_quality = scene.earth.resolved_quality();
        let earth_textures = store.load_earth(device, queue, earth_quality)?;
        scene.earth.mark_loaded(earth_quality);

        let cloud_quality = scene.cloud.resolved_quality();
        let cloud_textures = store.load_cloud(device, queue, cloud_quality)?;
        scene.cloud.mark_loaded(cloud_quality);

        let moon_quality = scene.moon.resolved_quality();
        let moon_textures = store.load_moon(device, queue, moon_quality)?;
        scene.moon.mark_loaded(moon_quality);

        let sun_quality = scene.sun.resolved_quality();
        let flare_textures = store.load_flares(device, queue, sun_quality)?;
        scene.sun.mark_loaded(sun_quality);

        let skymap_quality = scene.skymap.resolved_quality();
        let skymap = store.load_skymap(device, queue, skymap_quality)?;
        scene.skymap.mark_loaded(skymap_quality);

        let earth_material = build_earth_material(
            device,
            &pipelines,
            &store,
            &earth_textures,
            scene.earth.material_params(),
        );
        let cloud_material = build_cloud_material(
            device,
            &pipelines,
            &store,
            &cloud_textures,
            scene.cloud.material_params(),
        );
        let moon_material = build_moon_material(
            device,
            &pipelines,
            &store,
            &moon_textures,
            scene.moon.material_params(),
        );

        let earth_mesh = PhongMesh::new(
            device,
            &pipelines,
            "earth",
            &SphereGeometry::new(Earth::RADIUS, Earth::WIDTH_SEGMENTS, Earth::HEIGHT_SEGMENTS),
        );
        let cloud_mesh = PhongMesh::new(
            device,
            &pipelines,
            "cloud",
            &SphereGeometry::new(Cloud::RADIUS, Cloud::WIDTH_SEGMENTS, Cloud::HEIGHT_SEGMENTS),
        );
        let moon_mesh = PhongMesh::new(
            device,
            &pipelines,
            "moon",
            &SphereGeometry::new(Moon::RADIUS, Moon::WIDTH_SEGMENTS, Moon::HEIGHT_SEGMENTS),
        );

        let scene_buffer = {
            use wgpu::util::DeviceExt;
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("scene-uniforms"),
                contents: bytemuck::bytes_of(&SceneUniforms::zeroed()),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            })
        };
        let scene_bind_group = pipelines.create_scene_bind_group(device, &scene_buffer, &shadow_map);

        let earth_caster = ShadowCaster::new(device, &shadow_pipeline, "earth");
        let moon_caster = ShadowCaster::new(device, &shadow_pipeline, "moon");

        info!(
            "Scene renderer ready ({}x{}, {} samples)",
            width, height, sample_count
        );

        Ok(Self {
            pipelines,
            skybox,
            flare,
            helper,
            shadow_pipeline,
            shadow_map,
            depth,
            msaa,
            msaa_samples,
            supports_wireframe: gpu.supports_wireframe,
            scene_buffer,
            scene_bind_group,
            store,
            earth_textures,
            cloud_textures,
            moon_textures,
            flare_textures,
            skymap,
            earth_mesh,
            cloud_mesh,
            moon_mesh,
            earth_material,
            cloud_material,
            moon_material,
            earth_caster,
            moon_caster,
            flare_visible: false,
        })
    }

    /// The sample count currently used by the main pass.
    pub fn sample_count(&self) -> u32 {
        self.pipelines.sample_count()
    }

    /// Resize the depth buffer and the MSAA target to the surface size.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        let sample_count = self.sample_count();
        self.depth.resize(device, width, height, sample_count);
        if let Some(msaa) = &mut self.msaa {
            msaa.resize(device, width, height, sample_count);
        }
    }

    /// Apply scene edits that change GPU state: antialias flips, shadow map
    /// resizes, quality-guard reloads, material and transform updates.
    pub fn prepare(&mut self, gpu: &RenderContext, scene: &mut Scene) {
        let device = &gpu.device;
        let queue = &gpu.queue;

        let desired = if scene.renderer.antialias {
            self.msaa_samples
        } else {
            1
        };
        if desired != self.sample_count() {
            self.rebuild_for_sample_count(gpu, scene, desired);
        }

        if scene.shadow.map_size != self.shadow_map.resolution() {
            self.shadow_map.set_resolution(device, scene.shadow.map_size);
            self.scene_bind_group =
                self.pipelines
                    .create_scene_bind_group(device, &self.scene_buffer, &self.shadow_map);
            info!("Shadow map resized to {}", scene.shadow.map_size);
        }

        self.reload_textures(gpu, scene);

        self.earth_material.update(queue, scene.earth.material_params());
        self.cloud_material.update(queue, scene.cloud.material_params());
        self.moon_material.update(queue, scene.moon.material_params());

        self.earth_mesh.update_model(queue, scene.earth.model_matrix());
        // The cloud shell is parented to the planet and spins on top of it.
        self.cloud_mesh
            .update_model(queue, scene.earth.model_matrix() * scene.cloud.model_matrix());
        self.moon_mesh.update_model(queue, scene.moon.model_matrix());
    }

    /// Re-fetch textures for entities whose quality guard fired. A failed
    /// reload keeps the previous textures and stops the guard retrying.
    fn reload_textures(&mut self, gpu: &RenderContext, scene: &mut Scene) {
        let device = &gpu.device;
        let queue = &gpu.queue;

        if scene.earth.needs_reload() {
            let quality = scene.earth.resolved_quality();
            match self.store.load_earth(device, queue, quality) {
                Ok(textures) => {
                    self.earth_textures = textures;
                    self.earth_material = build_earth_material(
                        device,
                        &self.pipelines,
                        &self.store,
                        &self.earth_textures,
                        scene.earth.material_params(),
                    );
                }
                Err(e) => error!("Earth texture reload failed, keeping previous: {e}"),
            }
            scene.earth.mark_loaded(quality);
        }

        if scene.cloud.needs_reload() {
            let quality = scene.cloud.resolved_quality();
            match self.store.load_cloud(device, queue, quality) {
                Ok(textures) => {
                    self.cloud_textures = textures;
                    self.cloud_material = build_cloud_material(
                        device,
                        &self.pipelines,
                        &self.store,
                        &self.cloud_textures,
                        scene.cloud.material_params(),
                    );
                }
                Err(e) => error!("Cloud texture reload failed, keeping previous: {e}"),
            }
            scene.cloud.mark_loaded(quality);
        }

        if scene.moon.needs_reload() {
            let quality = scene.moon.resolved_quality();
            match self.store.load_moon(device, queue, quality) {
                Ok(textures) => {
                    self.moon_textures = textures;
                    self.moon_material = build_moon_material(
                        device,
                        &self.pipelines,
                        &self.store,
                        &self.moon_textures,
                        scene.moon.material_params(),
                    );
                }
                Err(e) => error!("Moon texture reload failed, keeping previous: {e}"),
            }
            scene.moon.mark_loaded(quality);
        }

        if scene.sun.needs_reload() {
            let quality = scene.sun.resolved_quality();
            match self.store.load_flares(device, queue, quality) {
                Ok(textures) => self.flare_textures = textures,
                Err(e) => error!("Flare texture reload failed, keeping previous: {e}"),
            }
            scene.sun.mark_loaded(quality);
        }

        if scene.skymap.needs_reload() {
            let quality = scene.skymap.resolved_quality();
            match self.store.load_skymap(device, queue, quality) {
                Ok(texture) => self.skymap = texture,
                Err(e) => error!("Skymap reload failed, keeping previous: {e}"),
            }
            scene.skymap.mark_loaded(quality);
        }
    }

    /// Rebuild every pipeline bound to the main pass sample count.
    fn rebuild_for_sample_count(&mut self, gpu: &RenderContext, scene: &Scene, sample_count: u32) {
        let device = &gpu.device;
        let (width, height) = (gpu.surface_config.width, gpu.surface_config.height);

        self.pipelines = PhongPipelines::new(
            device,
            gpu.surface_format,
            sample_count,
            self.supports_wireframe,
        );
        self.skybox = SkyboxRenderer::new(
            device,
            gpu.surface_format,
            sample_count,
            self.store.manager.cube_bind_group_layout(),
        );
        self.flare = LensFlareRenderer::new(
            device,
            gpu.surface_format,
            sample_count,
            self.store.manager.bind_group_layout(),
        );
        self.helper = FrustumHelperRenderer::new(device, gpu.surface_format, sample_count);
        self.depth = DepthBuffer::new(device, width, height, sample_count);
        self.msaa = (sample_count > 1)
            .then(|| MsaaColorTarget::new(device, gpu.surface_format, width, height, sample_count));

        // Bind groups are tied to the rebuilt layouts.
        self.scene_bind_group =
            self.pipelines
                .create_scene_bind_group(device, &self.scene_buffer, &self.shadow_map);
        self.earth_material = build_earth_material(
            device,
            &self.pipelines,
            &self.store,
            &self.earth_textures,
            scene.earth.material_params(),
        );
        self.cloud_material = build_cloud_material(
            device,
            &self.pipelines,
            &self.store,
            &self.cloud_textures,
            scene.cloud.material_params(),
        );
        self.moon_material = build_moon_material(
            device,
            &self.pipelines,
            &self.store,
            &self.moon_textures,
            scene.moon.material_params(),
        );

        info!("Pipelines rebuilt for {sample_count}x MSAA");
    }

    /// Record the shadow pass and the main pass into `encoder`, resolving
    /// into `surface_view`.
    pub fn render(
        &mut self,
        gpu: &RenderContext,
        scene: &Scene,
        camera: &Camera,
        surface_view: &wgpu::TextureView,
        encoder: &mut wgpu::CommandEncoder,
    ) {
        let queue = &gpu.queue;
        let (width, height) = (gpu.surface_config.width, gpu.surface_config.height);

        let view = camera.view_matrix();
        let proj = camera.projection_matrix();
        let view_proj = proj * view;
        let light = scene.sun.light_uniform();
        let light_view_proj = scene.shadow.params.view_projection(scene.sun.position);

        let uniforms = SceneUniforms::new(
            view_proj,
            camera.position,
            &light,
            light_view_proj,
            scene.shadow.params.bias,
            scene.shadow.enabled,
        );
        queue.write_buffer(&self.scene_buffer, 0, bytemuck::bytes_of(&uniforms));

        self.skybox.update(queue, skybox_inv_view_proj(view, proj));
        self.flare_visible = scene.sun.visible
            && scene.sun.flares_enabled
            && self.flare.update(
                queue,
                scene.sun.position,
                scene.sun.color,
                scene.sun.intensity,
                view_proj,
                (width, height),
                &scene.sun.flare_elements,
            );
        if scene.shadow.helper_visible {
            self.helper
                .update(queue, &scene.shadow.params, scene.sun.position, view_proj);
        }

        if scene.shadow.enabled {
            // Hidden bodies do not cast.
            let mut casters: Vec<(&wgpu::BindGroup, &MeshBuffer)> = Vec::with_capacity(2);
            if scene.earth.visible {
                self.earth_caster
                    .write(queue, light_view_proj * scene.earth.model_matrix());
                casters.push((&self.earth_caster.bind_group, &self.earth_mesh.mesh));
            }
            if scene.moon.visible {
                self.moon_caster
                    .write(queue, light_view_proj * scene.moon.model_matrix());
                casters.push((&self.moon_caster.bind_group, &self.moon_mesh.mesh));
            }
            render_shadow_pass(encoder, &self.shadow_pipeline, &self.shadow_map, &casters);
        }

        let (color_view, resolve_target) = match &self.msaa {
            Some(msaa) => (&msaa.view, Some(surface_view)),
            None => (surface_view, None),
        };

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("main-pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_view,
                depth_slice: None,
                resolve_target,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(DepthBuffer::CLEAR_VALUE),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        // Background first: the skybox neither tests nor writes depth.
        self.skybox.render(&mut pass, &self.skymap.bind_group);

        if scene.earth.visible {
            draw_phong(
                &mut pass,
                &self.pipelines,
                PhongBlend::Opaque,
                scene.earth.wireframe && self.supports_wireframe,
                &self.scene_bind_group,
                &self.earth_material,
                &self.earth_mesh,
            );
        }
        if scene.moon.visible {
            draw_phong(
                &mut pass,
                &self.pipelines,
                PhongBlend::Opaque,
                scene.moon.wireframe && self.supports_wireframe,
                &self.scene_bind_group,
                &self.moon_material,
                &self.moon_mesh,
            );
        }
        // The shell is a child of the planet and draws after the opaque
        // bodies.
        if scene.cloud_visible() {
            let blend = if scene.cloud.transparent {
                PhongBlend::AlphaBlend
            } else {
                PhongBlend::Opaque
            };
            draw_phong(
                &mut pass,
                &self.pipelines,
                blend,
                scene.cloud.wireframe && self.supports_wireframe,
                &self.scene_bind_group,
                &self.cloud_material,
                &self.cloud_mesh,
            );
        }

        if scene.shadow.helper_visible {
            self.helper.render(&mut pass);
        }

        if self.flare_visible {
            let flare_textures = &self.flare_textures;
            self.flare
                .render(&mut pass, |texture| flare_textures.bind_group(texture));
        }
    }
}

fn build_earth_material(
    device: &wgpu::Device,
    pipelines: &PhongPipelines,
    store: &TextureStore,
    textures: &EarthTextures,
    params: MaterialParams,
) -> PhongMaterial {
    PhongMaterial::new(
        device,
        pipelines,
        "earth",
        params,
        &textures.map.view,
        &textures.bump.view,
        &textures.specular.view,
        store.manager.sampler_linear(),
    )
}

fn build_cloud_material(
    device: &wgpu::Device,
    pipelines: &PhongPipelines,
    store: &TextureStore,
    textures: &CloudTextures,
    params: MaterialParams,
) -> PhongMaterial {
    // One image fills every slot: the map slot feeds the alpha lookup, the
    // bump slot the height lookup, and the specular slot is unused.
    PhongMaterial::new(
        device,
        pipelines,
        "cloud",
        params,
        &textures.clouds.view,
        &textures.clouds.view,
        &textures.clouds.view,
        store.manager.sampler_linear(),
    )
}

fn build_moon_material(
    device: &wgpu::Device,
    pipelines: &PhongPipelines,
    store: &TextureStore,
    textures: &MoonTextures,
    params: MaterialParams,
) -> PhongMaterial {
    PhongMaterial::new(
        device,
        pipelines,
        "moon",
        params,
        &textures.map.view,
        &textures.bump.view,
        &textures.bump.view,
        store.manager.sampler_linear(),
    )
}
