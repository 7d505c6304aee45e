//! The cloud shell: a translucent sphere just above the planet surface.
//!
//! One texture does double duty as alpha map and bump map, so the cloud
//! cover is raised and the gaps are see-through.

use std::f32::consts::TAU;

use glam::Mat4;
use orrery_assets::ImageQuality;
use orrery_render::MaterialParams;

use crate::color::linear_rgb_from_srgb_hex;
use crate::quality::QualitySetting;

/// Cloud layer entity state and tweakable parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct Cloud {
    /// Draw the cloud shell at all.
    pub visible: bool,
    /// Draw the shell as a wireframe.
    pub wireframe: bool,
    /// Advance the drift each frame.
    pub animated: bool,
    /// Blend the shell over the planet. Off renders it as an opaque ball.
    pub transparent: bool,
    /// Layer opacity.
    pub opacity: f32,
    /// Bump map height scale.
    pub bump_scale: f32,
    /// Cloud tint (linear RGB).
    pub color: [f32; 3],
    /// Self-rotation speed in turns per second. Negative: the clouds
    /// drift westward relative to the ground.
    pub rotations_y_per_second: f32,
    /// Texture quality selector.
    pub quality: QualitySetting,
    /// Accumulated self-rotation angle in radians.
    pub angle_y: f32,
    loaded_quality: Option<ImageQuality>,
}

impl Cloud {
    /// Slightly above the planet surface.
    pub const RADIUS: f32 = 50.3;
    pub const WIDTH_SEGMENTS: u32 = 64;
    pub const HEIGHT_SEGMENTS: u32 = 32;
    pub const PREFERRED_QUALITY: ImageQuality = ImageQuality::Sd;

    const DEFAULT_OPACITY: f32 = 0.9;
    const DEFAULT_BUMP_SCALE: f32 = 0.13;
    const DEFAULT_COLOR_HEX: u32 = 0xffffff;
    const DEFAULT_ROTATIONS_Y_PER_SECOND: f32 = -0.0012;

    pub fn new() -> Self {
        Self {
            visible: true,
            wireframe: false,
            animated: true,
            transparent: true,
            opacity: Self::DEFAULT_OPACITY,
            bump_scale: Self::DEFAULT_BUMP_SCALE,
            color: linear_rgb_from_srgb_hex(Self::DEFAULT_COLOR_HEX),
            rotations_y_per_second: Self::DEFAULT_ROTATIONS_Y_PER_SECOND,
            quality: QualitySetting::Default,
            angle_y: 0.0,
            loaded_quality: None,
        }
    }

    /// Restore the tweakable parameters to their defaults, keeping the
    /// rotation angle.
    pub fn reset(&mut self) {
        let angle_y = self.angle_y;
        let loaded_quality = self.loaded_quality;
        *self = Self::new();
        self.angle_y = angle_y;
        self.loaded_quality = loaded_quality;
    }

    /// Advance the drift by `dt` seconds.
    pub fn animate(&mut self, dt: f32) {
        if self.animated {
            self.angle_y += dt * TAU * self.rotations_y_per_second;
        }
    }

    /// Rotation relative to the planet. The shell is parented to the
    /// planet, so the renderer composes this with the planet's matrix.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.angle_y)
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

    /// Material parameters for the blended Phong pipeline.
    pub fn material_params(&self) -> MaterialParams {
        MaterialParams {
            diffuse_color: self.color,
            opacity: self.opacity,
            specular_color: linear_rgb_from_srgb_hex(0x111111),
            shininess: 30.0,
            bump_scale: self.bump_scale,
            use_map: false,
            use_bump_map: true,
            use_specular_map: false,
            use_alpha_map: true,
        }
    }
}

impl Default for Cloud {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cloud = Cloud::new();
        assert_eq!(cloud.opacity, 0.9);
        assert_eq!(cloud.bump_scale, 0.13);
        assert_eq!(cloud.rotations_y_per_second, -0.0012);
        assert_eq!(cloud.color, [1.0, 1.0, 1.0]);
        assert!(cloud.transparent);
        assert!(!cloud.wireframe);
        assert!(Cloud::RADIUS > 50.0, "cloud shell sits above the surface");
    }

    #[test]
    fn test_negative_rate_drifts_backward() {
        let mut cloud = Cloud::new();
        cloud.animate(10.0);
        assert!(cloud.angle_y < 0.0);
    }

    #[test]
    fn test_material_is_alpha_mapped_not_color_mapped() {
        let params = Cloud::new().material_params();
        assert!(params.use_alpha_map);
        assert!(params.use_bump_map);
        assert!(!params.use_map);
        assert_eq!(params.opacity, 0.9);
    }

    #[test]
    fn test_reset_restores_opacity() {
        let mut cloud = Cloud::new();
        cloud.opacity = 0.1;
        cloud.color = [1.0, 0.0, 0.0];
        cloud.transparent = false;
        cloud.wireframe = true;
        cloud.reset();
        assert_eq!(cloud.opacity, 0.9);
        assert_eq!(cloud.color, [1.0, 1.0, 1.0]);
        assert!(cloud.transparent);
        assert!(!cloud.wireframe);
    }
}
