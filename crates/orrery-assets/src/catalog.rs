//! Filename catalog for the scene's texture set.
//!
//! The catalog reproduces the original asset naming scheme: each map exists
//! at two resolutions and cubemap faces are derived from a single template
//! by substituting the `{pos}` tag.

use std::path::{Path, PathBuf};

use crate::quality::ImageQuality;

/// Tag substituted with the face name in cubemap filename templates.
pub const CUBEMAP_POSITION_TAG: &str = "{pos}";

/// The six cubemap faces, in the +X −X +Y −Y +Z −Z upload order.
pub const CUBEMAP_FACES: [CubemapFace; 6] = [
    CubemapFace::PosX,
    CubemapFace::NegX,
    CubemapFace::PosY,
    CubemapFace::NegY,
    CubemapFace::PosZ,
    CubemapFace::NegZ,
];

/// One face of the skybox cubemap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CubemapFace {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl CubemapFace {
    /// The face name as it appears in skybox filenames.
    pub fn name(self) -> &'static str {
        match self {
            CubemapFace::PosX => "posx",
            CubemapFace::NegX => "negx",
            CubemapFace::PosY => "posy",
            CubemapFace::NegY => "negy",
            CubemapFace::PosZ => "posz",
            CubemapFace::NegZ => "negz",
        }
    }
}

/// The three lens-flare sprite textures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlareTexture {
    /// The large sun burst placed at the light itself.
    Sun,
    /// Small circular ghost.
    Circle,
    /// Hexagonal ghost.
    Hexagon,
}

/// Resolves catalog filenames against a base directory.
#[derive(Clone, Debug)]
pub struct AssetCatalog {
    base_dir: PathBuf,
}

impl AssetCatalog {
    /// Create a catalog rooted at `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// The base directory this catalog resolves against.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn resolve(&self, filename: &str) -> PathBuf {
        self.base_dir.join(filename)
    }

    /// Earth surface color map.
    pub fn earth_map(&self, quality: ImageQuality) -> PathBuf {
        self.resolve(match quality {
            ImageQuality::Sd => "earth_map_1024x512.jpg",
            ImageQuality::Hd => "earth_map_2048x1024.jpg",
        })
    }

    /// Earth elevation bump map.
    pub fn earth_bump(&self, quality: ImageQuality) -> PathBuf {
        self.resolve(match quality {
            ImageQuality::Sd => "earth_bump_1024x512.jpg",
            ImageQuality::Hd => "earth_bump_2048x1024.jpg",
        })
    }

    /// Earth ocean specular map.
    pub fn earth_specular(&self, quality: ImageQuality) -> PathBuf {
        self.resolve(match quality {
            ImageQuality::Sd => "earth_specular_1024x512.jpg",
            ImageQuality::Hd => "earth_specular_2048x1024.jpg",
        })
    }

    /// Cloud layer map. Serves as both alpha map and bump map.
    pub fn earth_clouds(&self, quality: ImageQuality) -> PathBuf {
        self.resolve(match quality {
            ImageQuality::Sd => "earth_clouds_1024x512.jpg",
            ImageQuality::Hd => "earth_clouds_2048x1024.jpg",
        })
    }

    /// Moon surface color map.
    pub fn moon_map(&self, quality: ImageQuality) -> PathBuf {
        self.resolve(match quality {
            ImageQuality::Sd => "moon_map_512x256.jpg",
            ImageQuality::Hd => "moon_map_1024x512.jpg",
        })
    }

    /// Moon elevation bump map.
    pub fn moon_bump(&self, quality: ImageQuality) -> PathBuf {
        self.resolve(match quality {
            ImageQuality::Sd => "moon_bump_512x256.jpg",
            ImageQuality::Hd => "moon_bump_1024x512.jpg",
        })
    }

    /// Skybox face filename for one cubemap face.
    pub fn skymap_face(&self, face: CubemapFace, quality: ImageQuality) -> PathBuf {
        let template = match quality {
            ImageQuality::Sd => "skymap_{pos}_512x512.jpg",
            ImageQuality::Hd => "skymap_{pos}_1024x1024.jpg",
        };
        self.resolve(&template.replace(CUBEMAP_POSITION_TAG, face.name()))
    }

    /// All six skybox faces in upload order.
    pub fn skymap_faces(&self, quality: ImageQuality) -> [PathBuf; 6] {
        CUBEMAP_FACES.map(|face| self.skymap_face(face, quality))
    }

    /// Lens-flare sprite texture.
    pub fn lens_flare(&self, texture: FlareTexture, quality: ImageQuality) -> PathBuf {
        self.resolve(match (texture, quality) {
            (FlareTexture::Sun, ImageQuality::Sd) => "lens_flare_sun_512x512.jpg",
            (FlareTexture::Sun, ImageQuality::Hd) => "lens_flare_sun_1024x1024.jpg",
            (FlareTexture::Circle, ImageQuality::Sd) => "lens_flare_circle_32x32.jpg",
            (FlareTexture::Circle, ImageQuality::Hd) => "lens_flare_circle_64x64.jpg",
            (FlareTexture::Hexagon, ImageQuality::Sd) => "lens_flare_hexagon_128x128.jpg",
            (FlareTexture::Hexagon, ImageQuality::Hd) => "lens_flare_hexagon_256x256.jpg",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> AssetCatalog {
        AssetCatalog::new("/tmp/orrery-assets")
    }

    #[test]
    fn test_earth_maps_differ_by_quality() {
        let c = catalog();
        assert_ne!(
            c.earth_map(ImageQuality::Sd),
            c.earth_map(ImageQuality::Hd)
        );
        assert!(
            c.earth_map(ImageQuality::Hd)
                .to_string_lossy()
                .contains("2048x1024")
        );
    }

    #[test]
    fn test_skymap_faces_substitute_position_tag() {
        let c = catalog();
        let faces = c.skymap_faces(ImageQuality::Sd);
        assert_eq!(faces.len(), 6);
        for (face, path) in CUBEMAP_FACES.iter().zip(faces.iter()) {
            let name = path.file_name().unwrap().to_string_lossy().into_owned();
            assert!(
                name.contains(face.name()),
                "face filename {name} should contain {}",
                face.name()
            );
            assert!(
                !name.contains(CUBEMAP_POSITION_TAG),
                "position tag must be fully substituted in {name}"
            );
        }
    }

    #[test]
    fn test_cubemap_face_order_matches_wgpu_layers() {
        // wgpu cube array layers are +X −X +Y −Y +Z −Z.
        let names: Vec<&str> = CUBEMAP_FACES.iter().map(|f| f.name()).collect();
        assert_eq!(names, ["posx", "negx", "posy", "negy", "posz", "negz"]);
    }

    #[test]
    fn test_cloud_map_is_shared_alpha_and_bump() {
        // The cloud entity binds the same image as alpha map and bump map.
        let c = catalog();
        let path = c.earth_clouds(ImageQuality::Sd);
        assert!(path.to_string_lossy().contains("earth_clouds"));
    }

    #[test]
    fn test_flare_textures_resolve_for_both_tiers() {
        let c = catalog();
        for texture in [FlareTexture::Sun, FlareTexture::Circle, FlareTexture::Hexagon] {
            for quality in ImageQuality::ALL {
                let path = c.lens_flare(texture, quality);
                assert!(path.to_string_lossy().contains("lens_flare"));
            }
        }
    }

    #[test]
    fn test_paths_are_rooted_at_base_dir() {
        let c = catalog();
        assert!(
            c.moon_map(ImageQuality::Sd)
                .starts_with(c.base_dir())
        );
    }
}
