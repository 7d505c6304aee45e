//! Per-entity texture quality selection.

use std::fmt;

use orrery_assets::ImageQuality;

/// Quality selector shown in the panel: `Default` defers to the tier each
/// entity prefers, `Sd`/`Hd` force a tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum QualitySetting {
    /// Use the entity's preferred tier.
    #[default]
    Default,
    /// Force standard definition.
    Sd,
    /// Force high definition.
    Hd,
}

impl QualitySetting {
    /// All selector values in panel order.
    pub const ALL: [QualitySetting; 3] =
        [QualitySetting::Default, QualitySetting::Sd, QualitySetting::Hd];

    /// Resolve to a concrete tier given the entity's preference.
    pub fn resolve(self, preferred: ImageQuality) -> ImageQuality {
        match self {
            QualitySetting::Default => preferred,
            QualitySetting::Sd => ImageQuality::Sd,
            QualitySetting::Hd => ImageQuality::Hd,
        }
    }

    /// The label used in the panel selector.
    pub fn label(self) -> &'static str {
        match self {
            QualitySetting::Default => "default",
            QualitySetting::Sd => "sd",
            QualitySetting::Hd => "hd",
        }
    }
}

impl fmt::Display for QualitySetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_resolves_to_preference() {
        assert_eq!(
            QualitySetting::Default.resolve(ImageQuality::Sd),
            ImageQuality::Sd
        );
        assert_eq!(
            QualitySetting::Default.resolve(ImageQuality::Hd),
            ImageQuality::Hd
        );
    }

    #[test]
    fn test_forced_tiers_ignore_preference() {
        assert_eq!(
            QualitySetting::Hd.resolve(ImageQuality::Sd),
            ImageQuality::Hd
        );
        assert_eq!(
            QualitySetting::Sd.resolve(ImageQuality::Hd),
            ImageQuality::Sd
        );
    }
}
