//! Disk-to-GPU texture loading for the scene entities.
//!
//! Textures are cached under quality-suffixed names, so switching a tier
//! back and forth only hits the disk once per tier.

use std::path::Path;
use std::sync::Arc;

use orrery_assets::{AssetCatalog, AssetError, FlareTexture, ImageQuality, load_rgba};
use orrery_render::{ManagedTexture, TextureError, TextureManager};
use tracing::info;

/// A texture load failed either on disk or on upload.
#[derive(Debug, thiserror::Error)]
pub enum TextureLoadError {
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Texture(#[from] TextureError),
}

/// GPU textures for the planet.
pub struct EarthTextures {
    pub map: Arc<ManagedTexture>,
    pub bump: Arc<ManagedTexture>,
    pub specular: Arc<ManagedTexture>,
}

/// GPU texture for the cloud shell. One image serves as alpha and bump map.
pub struct CloudTextures {
    pub clouds: Arc<ManagedTexture>,
}

/// GPU textures for the moon.
pub struct MoonTextures {
    pub map: Arc<ManagedTexture>,
    pub bump: Arc<ManagedTexture>,
}

/// GPU textures for the lens flare sprites.
pub struct FlareTextures {
    pub sun: Arc<ManagedTexture>,
    pub circle: Arc<ManagedTexture>,
    pub hexagon: Arc<ManagedTexture>,
}

impl FlareTextures {
    /// The bind group for one flare sprite texture.
    pub fn bind_group(&self, texture: FlareTexture) -> &wgpu::BindGroup {
        match texture {
            FlareTexture::Sun => &self.sun.bind_group,
            FlareTexture::Circle => &self.circle.bind_group,
            FlareTexture::Hexagon => &self.hexagon.bind_group,
        }
    }
}

/// Loads catalog entries into the texture manager.
pub struct TextureStore {
    pub manager: TextureManager,
    catalog: AssetCatalog,
}

impl TextureStore {
    pub fn new(device: &wgpu::Device, catalog: AssetCatalog) -> Self {
        Self {
            manager: TextureManager::new(device),
            catalog,
        }
    }

    fn load_2d(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        name: &str,
        path: &Path,
        format: wgpu::TextureFormat,
    ) -> Result<Arc<ManagedTexture>, TextureLoadError> {
        if let Some(existing) = self.manager.get(name) {
            return Ok(existing);
        }
        info!("Loading texture '{name}' from {}", path.display());
        let image = load_rgba(path)?;
        let texture = self
            .manager
            .create_texture(device, queue, name, &image, format, true)?;
        Ok(texture)
    }

    /// Planet maps at the given tier. Color is sRGB; bump and specular hold
    /// linear data.
    pub fn load_earth(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        quality: ImageQuality,
    ) -> Result<EarthTextures, TextureLoadError> {
        let q = quality.label();
        let map_path = self.catalog.earth_map(quality);
        let bump_path = self.catalog.earth_bump(quality);
        let specular_path = self.catalog.earth_specular(quality);
        Ok(EarthTextures {
            map: self.load_2d(
                device,
                queue,
                &format!("earth-map-{q}"),
                &map_path,
                wgpu::TextureFormat::Rgba8UnormSrgb,
            )?,
            bump: self.load_2d(
                device,
                queue,
                &format!("earth-bump-{q}"),
                &bump_path,
                wgpu::TextureFormat::Rgba8Unorm,
            )?,
            specular: self.load_2d(
                device,
                queue,
                &format!("earth-specular-{q}"),
                &specular_path,
                wgpu::TextureFormat::Rgba8Unorm,
            )?,
        })
    }

    /// Cloud coverage map. Linear: the green channel is coverage, the
    /// luminance doubles as bump height.
    pub fn load_cloud(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        quality: ImageQuality,
    ) -> Result<CloudTextures, TextureLoadError> {
        let q = quality.label();
        let path = self.catalog.earth_clouds(quality);
        Ok(CloudTextures {
            clouds: self.load_2d(
                device,
                queue,
                &format!("earth-clouds-{q}"),
                &path,
                wgpu::TextureFormat::Rgba8Unorm,
            )?,
        })
    }

    /// Moon maps at the given tier.
    pub fn load_moon(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        quality: ImageQuality,
    ) -> Result<MoonTextures, TextureLoadError> {
        let q = quality.label();
        let map_path = self.catalog.moon_map(quality);
        let bump_path = self.catalog.moon_bump(quality);
        Ok(MoonTextures {
            map: self.load_2d(
                device,
                queue,
                &format!("moon-map-{q}"),
                &map_path,
                wgpu::TextureFormat::Rgba8UnormSrgb,
            )?,
            bump: self.load_2d(
                device,
                queue,
                &format!("moon-bump-{q}"),
                &bump_path,
                wgpu::TextureFormat::Rgba8Unorm,
            )?,
        })
    }

    /// The six-face skybox cubemap at the given tier.
    pub fn load_skymap(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        quality: ImageQuality,
    ) -> Result<Arc<ManagedTexture>, TextureLoadError> {
        let name = format!("skymap-{}", quality.label());
        if let Some(existing) = self.manager.get(&name) {
            return Ok(existing);
        }

        let [px, nx, py, ny, pz, nz] = self.catalog.skymap_faces(quality);
        info!("Loading cubemap '{name}' from {}", px.display());
        let faces = [
            load_rgba(&px)?,
            load_rgba(&nx)?,
            load_rgba(&py)?,
            load_rgba(&ny)?,
            load_rgba(&pz)?,
            load_rgba(&nz)?,
        ];
        let texture = self.manager.create_cubemap(
            device,
            queue,
            &name,
            &faces,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        )?;
        Ok(texture)
    }

    /// The three lens flare sprite textures at the given tier.
    pub fn load_flares(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        quality: ImageQuality,
    ) -> Result<FlareTextures, TextureLoadError> {
        let q = quality.label();
        let sun_path = self.catalog.lens_flare(FlareTexture::Sun, quality);
        let circle_path = self.catalog.lens_flare(FlareTexture::Circle, quality);
        let hexagon_path = self.catalog.lens_flare(FlareTexture::Hexagon, quality);
        Ok(FlareTextures {
            sun: self.load_2d(
                device,
                queue,
                &format!("flare-sun-{q}"),
                &sun_path,
                wgpu::TextureFormat::Rgba8UnormSrgb,
            )?,
            circle: self.load_2d(
                device,
                queue,
                &format!("flare-circle-{q}"),
                &circle_path,
                wgpu::TextureFormat::Rgba8UnormSrgb,
            )?,
            hexagon: self.load_2d(
                device,
                queue,
                &format!("flare-hexagon-{q}"),
                &hexagon_path,
                wgpu::TextureFormat::Rgba8UnormSrgb,
            )?,
        })
    }
}
