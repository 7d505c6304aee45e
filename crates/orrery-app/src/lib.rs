//! Orrery application: window, event loop, and frame orchestration.

pub mod frame_clock;
pub mod platform;
pub mod renderer;
pub mod textures;
pub mod viewer;
