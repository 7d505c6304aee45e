//! The planet: a textured, bump-mapped, ocean-specular sphere.

use std::f32::consts::TAU;

use glam::Mat4;
use orrery_assets::ImageQuality;
use orrery_render::MaterialParams;

use crate::color::linear_rgb_from_srgb_hex;
use crate::quality::QualitySetting;

/// Planet entity state and tweakable parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct Earth {
    /// Draw the planet at all.
    pub visible: bool,
    /// Draw the planet as a wireframe.
    pub wireframe: bool,
    /// Advance the self-rotation each frame.
    pub animated: bool,
    /// Bump map height scale.
    pub bump_scale: f32,
    /// Ocean highlight color (linear RGB).
    pub specular_color: [f32; 3],
    /// Blinn-Phong shininess exponent.
    pub shininess: f32,
    /// Self-rotation speed in turns per second.
    pub rotations_y_per_second: f32,
    /// Texture quality selector.
    pub quality: QualitySetting,
    /// Accumulated self-rotation angle in radians.
    pub angle_y: f32,
    /// Tier the textures were last loaded at.
    loaded_quality: Option<ImageQuality>,
}

impl Earth {
    pub const RADIUS: f32 = 50.0;
    pub const WIDTH_SEGMENTS: u32 = 64;
    pub const HEIGHT_SEGMENTS: u32 = 32;
    pub const PREFERRED_QUALITY: ImageQuality = ImageQuality::Sd;

    const DEFAULT_BUMP_SCALE: f32 = 0.45;
    const DEFAULT_SPECULAR_HEX: u32 = 0x2d4ea0;
    const DEFAULT_SHININESS: f32 = 6.0;
    const DEFAULT_ROTATIONS_Y_PER_SECOND: f32 = 0.01;

    pub fn new() -> Self {
        Self {
            visible: true,
            wireframe: false,
            animated: true,
            bump_scale: Self::DEFAULT_BUMP_SCALE,
            specular_color: linear_rgb_from_srgb_hex(Self::DEFAULT_SPECULAR_HEX),
            shininess: Self::DEFAULT_SHININESS,
            rotations_y_per_second: Self::DEFAULT_ROTATIONS_Y_PER_SECOND,
            quality: QualitySetting::Default,
            angle_y: 0.0,
            loaded_quality: None,
        }
    }

    /// Restore the tweakable parameters to their defaults. The rotation
    /// angle is animation state and is left alone.
    pub fn reset(&mut self) {
        let angle_y = self.angle_y;
        let loaded_quality = self.loaded_quality;
        *self = Self::new();
        self.angle_y = angle_y;
        self.loaded_quality = loaded_quality;
    }

    /// Advance the self-rotation by `dt` seconds.
    pub fn animate(&mut self, dt: f32) {
        if self.animated {
            self.angle_y += dt * TAU * self.rotations_y_per_second;
        }
    }

    /// Model matrix for the current rotation.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.angle_y)
    }

    /// The concrete tier the current selector resolves to.
    pub fn resolved_quality(&self) -> ImageQuality {
        self.quality.resolve(Self::PREFERRED_QUALITY)
    }

    /// True when the resolved tier differs from what is loaded. Textures
    /// are only re-fetched when this fires; re-selecting the same tier is
    /// a no-op.
    pub fn needs_reload(&self) -> bool {
        self.loaded_quality != Some(self.resolved_quality())
    }

    /// Record that textures were loaded at `quality`.
    pub fn mark_loaded(&mut self, quality: ImageQuality) {
        self.loaded_quality = Some(quality);
    }

    /// Material parameters for the Phong pipeline.
    pub fn material_params(&self) -> MaterialParams {
        MaterialParams {
            diffuse_color: [1.0, 1.0, 1.0],
            opacity: 1.0,
            specular_color: self.specular_color,
            shininess: self.shininess,
            bump_scale: self.bump_scale,
            use_map: true,
            use_bump_map: true,
            use_specular_map: true,
            use_alpha_map: false,
        }
    }
}

impl Default for Earth {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::srgb_hex_from_linear_rgb;

    #[test]
    fn test_defaults() {
        let earth = Earth::new();
        assert_eq!(earth.bump_scale, 0.45);
        assert_eq!(earth.shininess, 6.0);
        assert_eq!(earth.rotations_y_per_second, 0.01);
        assert_eq!(srgb_hex_from_linear_rgb(earth.specular_color), 0x2d4ea0);
        assert_eq!(earth.resolved_quality(), ImageQuality::Sd);
        assert!(!earth.wireframe);
    }

    #[test]
    fn test_one_second_advances_by_rotation_rate() {
        let mut earth = Earth::new();
        earth.rotations_y_per_second = 0.25;
        earth.animate(1.0);
        assert!((earth.angle_y - TAU * 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_reset_restores_params_but_keeps_angle() {
        let mut earth = Earth::new();
        earth.animate(3.0);
        let angle = earth.angle_y;

        earth.bump_scale = 2.0;
        earth.shininess = 99.0;
        earth.quality = QualitySetting::Hd;
        earth.reset();

        assert_eq!(earth.bump_scale, 0.45);
        assert_eq!(earth.shininess, 6.0);
        assert_eq!(earth.quality, QualitySetting::Default);
        assert_eq!(earth.angle_y, angle);
    }

    #[test]
    fn test_reload_guard_fires_only_on_change() {
        let mut earth = Earth::new();
        assert!(earth.needs_reload(), "nothing loaded yet");

        earth.mark_loaded(earth.resolved_quality());
        assert!(!earth.needs_reload());

        // Re-selecting the equivalent tier must not trigger a reload.
        earth.quality = QualitySetting::Sd;
        assert!(!earth.needs_reload());

        earth.quality = QualitySetting::Hd;
        assert!(earth.needs_reload());

        earth.mark_loaded(ImageQuality::Hd);
        assert!(!earth.needs_reload());
    }

    #[test]
    fn test_animation_toggle_freezes_rotation() {
        let mut earth = Earth::new();
        earth.animated = false;
        earth.animate(10.0);
        assert_eq!(earth.angle_y, 0.0);
    }

    #[test]
    fn test_material_uses_all_three_maps() {
        let params = Earth::new().material_params();
        assert!(params.use_map && params.use_bump_map && params.use_specular_map);
        assert!(!params.use_alpha_map);
    }
}
