//! egui tweak panel for the Orrery viewer.

pub mod panel;

pub use panel::TweakPanel;
