pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::LocalStorage;
pub use app::{execute, run_batch, RunOptions, RunOutcome};
pub use config::toml_config::TomlConfig;
pub use crate::core::{engine::BatchEngine, pipeline::OptimizePipeline};
pub use utils::error::{OptimizeError, Result};
