//! Viewer-side tweakables: camera lens, orbit controls, renderer toggles.

use glam::Vec3;

/// Camera lens and placement as shown in the tweak panel.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewCamera {
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
}

impl ViewCamera {
    pub fn new() -> Self {
        Self {
            fov_y_degrees: 63.0,
            near: 1.0,
            far: 8000.0,
            position: Vec3::new(0.0, 0.0, 150.0),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for ViewCamera {
    fn default() -> Self {
        Self::new()
    }
}

/// Orbit control tweakables, applied to the controller each frame.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitSettings {
    pub auto_rotate: bool,
    pub auto_rotate_speed: f32,
    pub enable_damping: bool,
}

impl OrbitSettings {
    pub fn new() -> Self {
        Self {
            auto_rotate: true,
            auto_rotate_speed: 0.07,
            enable_damping: true,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self::new()
    }
}

/// Renderer-level toggles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RendererSettings {
    /// Multisampled rendering. Flipping this rebuilds the pipelines.
    pub antialias: bool,
}

impl RendererSettings {
    pub fn new() -> Self {
        Self { antialias: false }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_defaults() {
        let camera = ViewCamera::new();
        assert_eq!(camera.fov_y_degrees, 63.0);
        assert_eq!(camera.near, 1.0);
        assert_eq!(camera.far, 8000.0);
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 150.0));
    }

    #[test]
    fn test_orbit_defaults() {
        let orbit = OrbitSettings::new();
        assert!(orbit.auto_rotate);
        assert!(orbit.enable_damping);
        assert_eq!(orbit.auto_rotate_speed, 0.07);
    }

    #[test]
    fn test_renderer_defaults_off() {
        let renderer = RendererSettings::new();
        assert!(!renderer.antialias);
    }
}
