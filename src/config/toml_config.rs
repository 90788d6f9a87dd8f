use crate::config::{
    default_extensions, validate_settings, DEFAULT_MAX_WIDTH, DEFAULT_OUTPUT_DIR, DEFAULT_QUALITY,
    DEFAULT_SOURCE_DIR,
};
use crate::core::ConfigProvider;
use crate::utils::error::{OptimizeError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub conversion: ConversionConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_source_dir")]
    pub path: String,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub path: String,
    pub report: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionConfig {
    #[serde(default = "default_max_width")]
    pub max_width: u32,
    #[serde(default = "default_quality")]
    pub quality: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_format: Option<String>,
}

fn default_source_dir() -> String {
    DEFAULT_SOURCE_DIR.to_string()
}

fn default_output_dir() -> String {
    DEFAULT_OUTPUT_DIR.to_string()
}

fn default_max_width() -> u32 {
    DEFAULT_MAX_WIDTH
}

fn default_quality() -> f32 {
    DEFAULT_QUALITY
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: default_source_dir(),
            extensions: default_extensions(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_dir(),
            report: None,
        }
    }
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            quality: DEFAULT_QUALITY,
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(OptimizeError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| OptimizeError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PHOTO_ROOT})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| OptimizeError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_settings(self)?;

        if let Some(report) = &self.output.report {
            crate::utils::validation::validate_path("output.report", report)?;
        }

        if let Some(format) = self.log_format() {
            if format != "compact" && format != "json" {
                return Err(OptimizeError::InvalidConfigValueError {
                    field: "monitoring.log_format".to_string(),
                    value: format.to_string(),
                    reason: "Supported formats: compact, json".to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn log_format(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_format.as_deref())
    }

    pub fn report_path(&self) -> Option<&str> {
        self.output.report.as_deref()
    }
}

impl ConfigProvider for TomlConfig {
    fn source_dir(&self) -> &str {
        &self.source.path
    }

    fn output_dir(&self) -> &str {
        &self.output.path
    }

    fn max_width(&self) -> u32 {
        self.conversion.max_width
    }

    fn quality(&self) -> f32 {
        self.conversion.quality
    }

    fn extensions(&self) -> &[String] {
        &self.source.extensions
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
