//! The sun: the directional light and its lens flare.

use glam::Vec3;
use orrery_assets::ImageQuality;
use orrery_render::{DEFAULT_FLARE_ELEMENTS, FlareElement, LightUniform};

use crate::quality::QualitySetting;

/// Sun entity state and tweakable parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct Sun {
    /// Light on at all. Off also hides the lens flare.
    pub visible: bool,
    /// Light color (linear RGB).
    pub color: [f32; 3],
    /// Light intensity multiplier.
    pub intensity: f32,
    /// Light position in world space.
    pub position: Vec3,
    /// Draw the lens flare sprites.
    pub flares_enabled: bool,
    /// The flare sprite layers, tweakable per layer.
    pub flare_elements: Vec<FlareElement>,
    /// Texture quality selector for the flare sprites.
    pub quality: QualitySetting,
    loaded_quality: Option<ImageQuality>,
}

impl Sun {
    pub const PREFERRED_QUALITY: ImageQuality = ImageQuality::Hd;

    const DEFAULT_COLOR: [f32; 3] = [1.0, 1.0, 1.0];
    const DEFAULT_INTENSITY: f32 = 1.3;
    const DEFAULT_POSITION: Vec3 = Vec3::new(-380.0, 240.0, -1000.0);

    pub fn new() -> Self {
        Self {
            visible: true,
            color: Self::DEFAULT_COLOR,
            intensity: Self::DEFAULT_INTENSITY,
            position: Self::DEFAULT_POSITION,
            flares_enabled: true,
            flare_elements: DEFAULT_FLARE_ELEMENTS.to_vec(),
            quality: QualitySetting::Default,
            loaded_quality: None,
        }
    }

    /// Restore the tweakable parameters to their defaults.
    pub fn reset(&mut self) {
        let loaded_quality = self.loaded_quality;
        *self = Self::new();
        self.loaded_quality = loaded_quality;
    }

    /// The light as seen by the Phong shader. A hidden sun emits nothing.
    pub fn light_uniform(&self) -> LightUniform {
        LightUniform {
            position: self.position,
            color: self.color,
            intensity: if self.visible { self.intensity } else { 0.0 },
        }
    }

    pub fn resolved_quality(&self) -> ImageQuality {
        self.quality.resolve(Self::PREFERRED_QUALITY)
    }

    pub fn needs_reload(&self) -> bool {
        self.loaded_quality != Some(self.resolved_quality())
    }

    pub fn mark_loaded(&mut self, quality: ImageQuality) {
        self.loaded_quality = Some(quality);
    }
}

impl Default for Sun {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let sun = Sun::new();
        assert_eq!(sun.color, [1.0, 1.0, 1.0]);
        assert_eq!(sun.intensity, 1.3);
        assert_eq!(sun.position, Vec3::new(-380.0, 240.0, -1000.0));
        assert!(sun.flares_enabled);
        assert_eq!(sun.flare_elements.len(), 9);
        assert_eq!(sun.resolved_quality(), ImageQuality::Hd);
    }

    #[test]
    fn test_light_uniform_carries_params() {
        let mut sun = Sun::new();
        sun.intensity = 2.5;
        sun.color = [1.0, 0.8, 0.6];
        let light = sun.light_uniform();
        assert_eq!(light.intensity, 2.5);
        assert_eq!(light.color, [1.0, 0.8, 0.6]);
        assert_eq!(light.position, sun.position);
    }

    #[test]
    fn test_hidden_sun_emits_no_light() {
        let mut sun = Sun::new();
        sun.visible = false;
        assert_eq!(sun.light_uniform().intensity, 0.0);
    }

    #[test]
    fn test_reset_restores_flare_layers() {
        let mut sun = Sun::new();
        sun.flare_elements[0].size = 10.0;
        sun.flare_elements.truncate(2);
        sun.intensity = 0.0;
        sun.reset();
        assert_eq!(sun.flare_elements.len(), 9);
        assert_eq!(sun.flare_elements[0].size, 1400.0);
        assert_eq!(sun.intensity, 1.3);
    }
}
