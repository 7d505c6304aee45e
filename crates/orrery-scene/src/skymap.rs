//! The star field: a cubemap drawn behind everything.

use orrery_assets::ImageQuality;

use crate::quality::QualitySetting;

/// Skybox state: only the texture tier is tweakable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Skymap {
    /// Texture quality selector.
    pub quality: QualitySetting,
    loaded_quality: Option<ImageQuality>,
}

impl Skymap {
    pub const PREFERRED_QUALITY: ImageQuality = ImageQuality::Hd;

    pub fn new() -> Self {
        Self {
            quality: QualitySetting::Default,
            loaded_quality: None,
        }
    }

    pub fn reset(&mut self) {
        self.quality = QualitySetting::Default;
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

impl Default for Skymap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_hd() {
        assert_eq!(Skymap::new().resolved_quality(), ImageQuality::Hd);
    }

    #[test]
    fn test_guard_quiet_after_load() {
        let mut skymap = Skymap::new();
        assert!(skymap.needs_reload());
        skymap.mark_loaded(ImageQuality::Hd);
        assert!(!skymap.needs_reload());
        // Forcing the tier it already has stays quiet.
        skymap.quality = QualitySetting::Hd;
        assert!(!skymap.needs_reload());
        skymap.quality = QualitySetting::Sd;
        assert!(skymap.needs_reload());
    }
}
