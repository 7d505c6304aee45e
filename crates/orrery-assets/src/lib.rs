//! Texture asset catalog for the Orrery viewer.
//!
//! Every map the scene uses (planet color/bump/specular, clouds, moon, the
//! six skybox faces, and the three lens-flare sprites) exists at two quality
//! tiers and is resolved by name from a base directory. Decoding goes through
//! the `image` crate.

mod catalog;
mod loader;
mod quality;

pub use catalog::{AssetCatalog, CUBEMAP_FACES, CUBEMAP_POSITION_TAG, CubemapFace, FlareTexture};
pub use loader::{AssetError, RgbaImage, load_rgba};
pub use quality::ImageQuality;
