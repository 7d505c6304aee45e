//! GPU rendering for the Orrery viewer.
//!
//! Owns the wgpu device and surface, the sphere geometry and texture
//! plumbing, and the render passes: shadow depth, Blinn-Phong planet
//! shading, the skybox background, and the screen-space lens flare.

pub mod camera;
pub mod depth;
pub mod flare;
pub mod gpu;
pub mod helper;
pub mod mesh;
pub mod msaa;
pub mod phong;
pub mod shadow;
pub mod skybox;
pub mod sphere;
pub mod texture;

pub use camera::{Camera, OrbitController, Projection};
pub use depth::DepthBuffer;
pub use flare::{
    CIRCLE_SIZE_MAX, DEFAULT_FLARE_ELEMENTS, FlareBatch, FlareElement, LensFlareRenderer,
    edge_fade_factor, element_screen_position, element_texture, project_to_screen,
};
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use helper::{FrustumHelperRenderer, frustum_corners};
pub use mesh::{BufferAllocator, IndexData, MeshBuffer, SphereVertex};
pub use msaa::MsaaColorTarget;
pub use phong::{
    LightUniform, MaterialParams, PhongBlend, PhongMaterial, PhongMesh, PhongPipelines,
    SceneUniforms, draw_phong,
};
pub use shadow::{ShadowCameraParams, ShadowMap, ShadowPipeline, render_shadow_pass};
pub use skybox::{SkyboxRenderer, skybox_inv_view_proj};
pub use sphere::SphereGeometry;
pub use texture::{ManagedTexture, TextureError, TextureManager};
