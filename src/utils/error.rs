use thiserror::Error;

#[derive(Error, Debug)]
pub enum OptimizeError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Image decode failed: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("WebP encode failed: {message}")]
    EncodeError { message: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Background task failed: {0}")]
    TaskError(#[from] tokio::task::JoinError),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Source directory not found: {path}")]
    SourceNotFound { path: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    FileSystem,
    Image,
    Runtime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl OptimizeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            OptimizeError::ConfigValidationError { .. }
            | OptimizeError::MissingConfigError { .. }
            | OptimizeError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            OptimizeError::IoError(_) | OptimizeError::SourceNotFound { .. } => {
                ErrorCategory::FileSystem
            }
            OptimizeError::ImageError(_) | OptimizeError::EncodeError { .. } => {
                ErrorCategory::Image
            }
            OptimizeError::SerializationError(_) | OptimizeError::TaskError(_) => {
                ErrorCategory::Runtime
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 單一檔案的影像錯誤不會中止整批處理
            ErrorCategory::Image => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::FileSystem => match self {
                OptimizeError::SourceNotFound { .. } => ErrorSeverity::High,
                _ => ErrorSeverity::Critical,
            },
            ErrorCategory::Runtime => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            OptimizeError::SourceNotFound { path } => {
                format!("Check that '{}' exists and is a directory", path)
            }
            OptimizeError::ConfigValidationError { field, .. }
            | OptimizeError::MissingConfigError { field }
            | OptimizeError::InvalidConfigValueError { field, .. } => {
                format!("Fix the '{}' setting and run again", field)
            }
            OptimizeError::IoError(_) => {
                "Check file permissions and available disk space".to_string()
            }
            OptimizeError::ImageError(_) | OptimizeError::EncodeError { .. } => {
                "The file may be corrupt or use an unsupported encoding".to_string()
            }
            OptimizeError::SerializationError(_) | OptimizeError::TaskError(_) => {
                "Run again with --verbose and report the log output".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::FileSystem => format!("File system problem: {}", self),
            ErrorCategory::Image => format!("Image could not be converted: {}", self),
            ErrorCategory::Runtime => format!("Unexpected failure: {}", self),
        }
    }

    /// Process exit code for a fatal error.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, OptimizeError>;
