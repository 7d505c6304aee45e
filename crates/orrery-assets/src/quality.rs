//! Texture quality tiers.

use std::fmt;
use std::str::FromStr;

/// Texture quality tier: every asset in the catalog exists at both tiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageQuality {
    /// Standard definition (smaller files, faster to decode and upload).
    Sd,
    /// High definition.
    Hd,
}

impl ImageQuality {
    /// All tiers, in ascending quality order.
    pub const ALL: [ImageQuality; 2] = [ImageQuality::Sd, ImageQuality::Hd];

    /// The lowercase label used in config files and the panel selector.
    pub fn label(self) -> &'static str {
        match self {
            ImageQuality::Sd => "sd",
            ImageQuality::Hd => "hd",
        }
    }
}

impl fmt::Display for ImageQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ImageQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sd" => Ok(ImageQuality::Sd),
            "hd" => Ok(ImageQuality::Hd),
            other => Err(format!("unknown image quality '{other}' (expected sd or hd)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_roundtrip() {
        for quality in ImageQuality::ALL {
            let parsed: ImageQuality = quality.label().parse().unwrap();
            assert_eq!(parsed, quality);
        }
    }

    #[test]
    fn test_unknown_label_is_rejected() {
        let result: Result<ImageQuality, _> = "ultra".parse();
        assert!(result.is_err());
    }

    #[test]
    fn test_display_matches_label() {
        assert_eq!(format!("{}", ImageQuality::Sd), "sd");
        assert_eq!(format!("{}", ImageQuality::Hd), "hd");
    }
}
