//! Configuration for the gaia populator.
//!
//! Settings persist to disk as `config.ron`, can be overridden per run from
//! the command line, and are range-checked before any map is touched.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, DecodeConfig, OutputConfig, PlacementConfig};
pub use error::ConfigError;
