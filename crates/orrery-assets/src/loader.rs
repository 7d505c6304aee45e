//! Image decoding for catalog assets.

use std::path::{Path, PathBuf};

/// Errors produced while loading a texture asset from disk.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// The file could not be read.
    #[error("failed to read asset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file contents could not be decoded as an image.
    #[error("failed to decode asset {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// A decoded RGBA8 image ready for GPU upload.
#[derive(Clone, Debug)]
pub struct RgbaImage {
    /// Tightly packed RGBA8 pixel data, row-major.
    pub pixels: Vec<u8>,
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
}

impl RgbaImage {
    /// Expected byte length for the stored dimensions.
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// Load an image file and convert it to RGBA8.
pub fn load_rgba(path: &Path) -> Result<RgbaImage, AssetError> {
    let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let decoded = image::load_from_memory(&bytes).map_err(|source| AssetError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    log::debug!("Loaded {} ({width}x{height})", path.display());

    Ok(RgbaImage {
        pixels: rgba.into_raw(),
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Encode a tiny PNG in memory for loader tests.
    fn write_test_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        let img = image::RgbaImage::from_fn(width, height, |x, y| {
            image::Rgba([(x * 37) as u8, (y * 91) as u8, 128, 255])
        });
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn test_load_rgba_decodes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_png(dir.path(), "tile.png", 8, 4);

        let loaded = load_rgba(&path).unwrap();
        assert_eq!(loaded.width, 8);
        assert_eq!(loaded.height, 4);
        assert_eq!(loaded.pixels.len(), loaded.expected_len());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_rgba(&dir.path().join("does_not_exist.jpg"));
        assert!(matches!(result, Err(AssetError::Io { .. })));
    }

    #[test]
    fn test_garbage_bytes_are_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.jpg");
        std::fs::write(&path, b"not an image at all").unwrap();

        let result = load_rgba(&path);
        assert!(matches!(result, Err(AssetError::Decode { .. })));
    }

    #[test]
    fn test_error_message_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("skymap_posx_512x512.jpg");
        let err = load_rgba(&missing).unwrap_err();
        assert!(format!("{err}").contains("skymap_posx_512x512.jpg"));
    }
}
