//! Scene model for the Orrery viewer.
//!
//! Each entity owns its tweakable parameters, its animation state, and the
//! quality tier its textures were loaded at. The structs here are plain
//! data; the app layer turns them into GPU state each frame and reloads
//! textures when a quality guard fires.

pub mod cloud;
pub mod color;
pub mod earth;
pub mod moon;
pub mod quality;
pub mod scene;
pub mod shadow;
pub mod skymap;
pub mod sun;
pub mod view;

pub use cloud::Cloud;
pub use color::{linear_rgb_from_srgb_hex, srgb_hex_from_linear_rgb};
pub use earth::Earth;
pub use moon::Moon;
pub use quality::QualitySetting;
pub use scene::Scene;
pub use shadow::SceneShadow;
pub use skymap::Skymap;
pub use sun::Sun;
pub use view::{OrbitSettings, RendererSettings, ViewCamera};
