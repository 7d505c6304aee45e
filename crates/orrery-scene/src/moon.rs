//! The moon: a small sphere orbiting the planet on a pivot.

use std::f32::consts::TAU;

use glam::{Mat4, Vec3};
use orrery_assets::ImageQuality;
use orrery_render::MaterialParams;

use crate::color::linear_rgb_from_srgb_hex;
use crate::quality::QualitySetting;

/// Moon entity state and tweakable parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct Moon {
    /// Draw the moon at all.
    pub visible: bool,
    /// Draw the moon as a wireframe.
    pub wireframe: bool,
    /// Advance the pivot orbit each frame.
    pub animated: bool,
    /// Offset from the pivot at the planet center.
    pub position: Vec3,
    /// Bump map height scale.
    pub bump_scale: f32,
    /// Blinn-Phong shininess exponent; 0 gives a fully matte surface.
    pub shininess: f32,
    /// Pivot rotation speed in turns per second.
    pub pivot_rotations_y_per_second: f32,
    /// Texture quality selector.
    pub quality: QualitySetting,
    /// Accumulated pivot angle in radians.
    pub pivot_angle_y: f32,
    loaded_quality: Option<ImageQuality>,
}

impl Moon {
    pub const RADIUS: f32 = 10.0;
    pub const WIDTH_SEGMENTS: u32 = 32;
    pub const HEIGHT_SEGMENTS: u32 = 16;
    pub const PREFERRED_QUALITY: ImageQuality = ImageQuality::Sd;

    const DEFAULT_POSITION: Vec3 = Vec3::new(0.0, 0.0, -100.0);
    const DEFAULT_BUMP_SCALE: f32 = 0.1;
    const DEFAULT_SHININESS: f32 = 0.0;
    const DEFAULT_PIVOT_ROTATIONS_Y_PER_SECOND: f32 = 0.05;

    pub fn new() -> Self {
        Self {
            visible: true,
            wireframe: false,
            animated: true,
            position: Self::DEFAULT_POSITION,
            bump_scale: Self::DEFAULT_BUMP_SCALE,
            shininess: Self::DEFAULT_SHININESS,
            pivot_rotations_y_per_second: Self::DEFAULT_PIVOT_ROTATIONS_Y_PER_SECOND,
            quality: QualitySetting::Default,
            pivot_angle_y: 0.0,
            loaded_quality: None,
        }
    }

    /// Restore the tweakable parameters to their defaults, keeping the
    /// pivot angle.
    pub fn reset(&mut self) {
        let pivot_angle_y = self.pivot_angle_y;
        let loaded_quality = self.loaded_quality;
        *self = Self::new();
        self.pivot_angle_y = pivot_angle_y;
        self.loaded_quality = loaded_quality;
    }

    /// Advance the orbit by `dt` seconds.
    pub fn animate(&mut self, dt: f32) {
        if self.animated {
            self.pivot_angle_y += dt * TAU * self.pivot_rotations_y_per_second;
        }
    }

    /// Model matrix: the pivot rotation carries the offset around the
    /// planet.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.pivot_angle_y) * Mat4::from_translation(self.position)
    }

    /// World position of the moon center.
    pub fn world_position(&self) -> Vec3 {
        self.model_matrix().transform_point3(Vec3::ZERO)
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

    /// Material parameters for the Phong pipeline.
    pub fn material_params(&self) -> MaterialParams {
        MaterialParams {
            diffuse_color: [1.0, 1.0, 1.0],
            opacity: 1.0,
            specular_color: linear_rgb_from_srgb_hex(0x111111),
            shininess: self.shininess,
            bump_scale: self.bump_scale,
            use_map: true,
            use_bump_map: true,
            use_specular_map: false,
            use_alpha_map: false,
        }
    }
}

impl Default for Moon {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_defaults() {
        let moon = Moon::new();
        assert_eq!(moon.position, Vec3::new(0.0, 0.0, -100.0));
        assert_eq!(moon.bump_scale, 0.1);
        assert_eq!(moon.shininess, 0.0);
        assert_eq!(moon.pivot_rotations_y_per_second, 0.05);
        assert!(!moon.wireframe);
    }

    #[test]
    fn test_orbit_keeps_distance_to_planet() {
        let mut moon = Moon::new();
        let r0 = moon.world_position().length();
        moon.animate(3.7);
        let r1 = moon.world_position().length();
        assert!((r0 - r1).abs() < 1e-3, "orbit radius drifted: {r0} -> {r1}");
    }

    #[test]
    fn test_quarter_turn_moves_moon_sideways() {
        let mut moon = Moon::new();
        moon.pivot_angle_y = FRAC_PI_2;
        let pos = moon.world_position();
        // Starting at -Z, a quarter turn around +Y lands on -X.
        assert!(pos.x < -99.0, "unexpected position {pos:?}");
        assert!(pos.z.abs() < 1e-3);
    }

    #[test]
    fn test_matte_material_by_default() {
        let params = Moon::new().material_params();
        assert_eq!(params.shininess, 0.0);
        assert!(params.use_map && params.use_bump_map);
        assert!(!params.use_specular_map);
    }

    #[test]
    fn test_reload_guard() {
        let mut moon = Moon::new();
        assert!(moon.needs_reload());
        moon.mark_loaded(ImageQuality::Sd);
        assert!(!moon.needs_reload());
        moon.quality = QualitySetting::Hd;
        assert!(moon.needs_reload());
    }
}
