//! The whole tweakable scene state, one struct.

use crate::cloud::Cloud;
use crate::earth::Earth;
use crate::moon::Moon;
use crate::quality::QualitySetting;
use crate::shadow::SceneShadow;
use crate::skymap::Skymap;
use crate::sun::Sun;
use crate::view::{OrbitSettings, RendererSettings, ViewCamera};

/// Everything the viewer shows and the panel edits.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Scene {
    pub earth: Earth,
    pub cloud: Cloud,
    pub moon: Moon,
    pub sun: Sun,
    pub skymap: Skymap,
    pub shadow: SceneShadow,
    pub camera: ViewCamera,
    pub orbit: OrbitSettings,
    pub renderer: RendererSettings,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance all animated entities by `dt` seconds.
    pub fn animate(&mut self, dt: f32) {
        self.earth.animate(dt);
        self.cloud.animate(dt);
        self.moon.animate(dt);
    }

    /// Reset every entity to its defaults. Animation angles survive.
    pub fn reset_all(&mut self) {
        self.earth.reset();
        self.cloud.reset();
        self.moon.reset();
        self.sun.reset();
        self.skymap.reset();
        self.shadow.reset();
        self.camera.reset();
        self.orbit.reset();
        self.renderer.reset();
    }

    /// Whether the cloud shell is drawn. The shell is a child of the
    /// planet, so hiding the planet hides it too.
    pub fn cloud_visible(&self) -> bool {
        self.earth.visible && self.cloud.visible
    }

    /// Force one quality selector onto every textured entity.
    pub fn set_global_quality(&mut self, quality: QualitySetting) {
        self.earth.quality = quality;
        self.cloud.quality = quality;
        self.moon.quality = quality;
        self.sun.quality = quality;
        self.skymap.quality = quality;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_assets::ImageQuality;

    #[test]
    fn test_animate_touches_every_animated_entity() {
        let mut scene = Scene::new();
        scene.animate(1.0);
        assert!(scene.earth.angle_y > 0.0);
        assert!(scene.cloud.angle_y < 0.0);
        assert!(scene.moon.pivot_angle_y > 0.0);
    }

    #[test]
    fn test_reset_all_keeps_angles() {
        let mut scene = Scene::new();
        scene.animate(2.0);
        scene.earth.shininess = 50.0;
        scene.sun.intensity = 0.2;
        let earth_angle = scene.earth.angle_y;

        scene.reset_all();

        assert_eq!(scene.earth.shininess, 6.0);
        assert_eq!(scene.sun.intensity, 1.3);
        assert_eq!(scene.earth.angle_y, earth_angle);
    }

    #[test]
    fn test_cloud_inherits_planet_visibility() {
        let mut scene = Scene::new();
        assert!(scene.cloud_visible());

        scene.earth.visible = false;
        assert!(!scene.cloud_visible(), "hiding the planet hides its shell");

        scene.earth.visible = true;
        scene.cloud.visible = false;
        assert!(!scene.cloud_visible());
    }

    #[test]
    fn test_global_quality_overrides_preferences() {
        let mut scene = Scene::new();
        scene.set_global_quality(QualitySetting::Sd);
        assert_eq!(scene.skymap.resolved_quality(), ImageQuality::Sd);
        assert_eq!(scene.sun.resolved_quality(), ImageQuality::Sd);
        assert_eq!(scene.earth.resolved_quality(), ImageQuality::Sd);
    }

    #[test]
    fn test_global_default_restores_preferences() {
        let mut scene = Scene::new();
        scene.set_global_quality(QualitySetting::Hd);
        scene.set_global_quality(QualitySetting::Default);
        assert_eq!(scene.earth.resolved_quality(), ImageQuality::Sd);
        assert_eq!(scene.skymap.resolved_quality(), ImageQuality::Hd);
    }
}
