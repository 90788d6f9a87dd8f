pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_extensions, validate_path, validate_positive_number, validate_range,
};
#[cfg(feature = "cli")]
use crate::utils::validation::Validate;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_SOURCE_DIR: &str = "./images";
pub const DEFAULT_OUTPUT_DIR: &str = "./optimized/images";
pub const DEFAULT_MAX_WIDTH: u32 = 1000;
pub const DEFAULT_QUALITY: f32 = 70.0;
pub const DEFAULT_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

pub fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect()
}

/// Validates the settings every front end shares.
pub fn validate_settings<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validate_path("source_dir", config.source_dir())?;
    validate_path("output_dir", config.output_dir())?;
    validate_positive_number("max_width", config.max_width(), 1)?;
    validate_range("quality", config.quality(), 0.0, 100.0)?;
    validate_extensions("extensions", config.extensions())?;
    Ok(())
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "image-optimize")]
#[command(about = "Convert a tree of images into width-capped WebP files")]
pub struct CliConfig {
    /// Directory walked recursively for source images
    #[arg(long = "source", default_value = DEFAULT_SOURCE_DIR)]
    pub source_dir: String,

    /// Root of the mirrored WebP output tree
    #[arg(long = "output", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: String,

    #[arg(long, default_value_t = DEFAULT_MAX_WIDTH)]
    pub max_width: u32,

    /// WebP quality, 0-100
    #[arg(long, default_value_t = DEFAULT_QUALITY)]
    pub quality: f32,

    /// Source extensions to convert (case-insensitive)
    #[arg(long, value_delimiter = ',', default_values = DEFAULT_EXTENSIONS)]
    pub extensions: Vec<String>,

    /// Show what would be converted without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Write a JSON report of the run to this file
    #[arg(long)]
    pub report: Option<String>,

    /// Exit with code 2 when any file fails to convert
    #[arg(long)]
    pub strict: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn source_dir(&self) -> &str {
        &self.source_dir
    }

    fn output_dir(&self) -> &str {
        &self.output_dir
    }

    fn max_width(&self) -> u32 {
        self.max_width
    }

    fn quality(&self) -> f32 {
        self.quality
    }

    fn extensions(&self) -> &[String] {
        &self.extensions
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_settings(self)
    }
}
