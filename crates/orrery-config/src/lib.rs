//! Configuration system for the Orrery viewer.
//!
//! Provides runtime-configurable settings that persist to disk as RON files.
//! Supports CLI overrides via clap and forward/backward compatible
//! serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{AssetsConfig, Config, DebugConfig, RenderConfig, WindowConfig};
pub use error::ConfigError;
