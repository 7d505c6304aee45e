//! Shadow tweakables: the light's ortho frustum and map resolution.

use orrery_render::ShadowCameraParams;

/// Shadow settings as shown in the tweak panel.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneShadow {
    /// Cast shadows at all.
    pub enabled: bool,
    /// Ortho frustum of the shadow camera.
    pub params: ShadowCameraParams,
    /// Shadow map resolution, square.
    pub map_size: u32,
    /// Draw the shadow camera frustum as a wireframe helper.
    pub helper_visible: bool,
}

impl SceneShadow {
    pub const DEFAULT_MAP_SIZE: u32 = 512;

    pub fn new() -> Self {
        Self {
            enabled: true,
            params: ShadowCameraParams::default(),
            map_size: Self::DEFAULT_MAP_SIZE,
            helper_visible: false,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for SceneShadow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let shadow = SceneShadow::new();
        assert!(shadow.enabled);
        assert!(!shadow.helper_visible);
        assert_eq!(shadow.map_size, 512);
        assert_eq!(shadow.params.near, 950.0);
        assert_eq!(shadow.params.far, 1250.0);
    }

    #[test]
    fn test_reset() {
        let mut shadow = SceneShadow::new();
        shadow.enabled = false;
        shadow.map_size = 2048;
        shadow.params.bias = 0.01;
        shadow.reset();
        assert_eq!(shadow, SceneShadow::new());
    }
}
