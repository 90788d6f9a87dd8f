use crate::utils::error::{OptimizeError, Result};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(OptimizeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(OptimizeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u32, min_value: u32) -> Result<()> {
    if value < min_value {
        return Err(OptimizeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    // NaN 不會落在任何區間內
    if !(value >= min && value <= max) {
        return Err(OptimizeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Checks an extension allow-list: non-empty, no dots, no duplicates after
/// lower-casing.
pub fn validate_extensions(field_name: &str, extensions: &[String]) -> Result<()> {
    if extensions.is_empty() {
        return Err(OptimizeError::MissingConfigError {
            field: field_name.to_string(),
        });
    }

    let mut seen = HashSet::new();
    for ext in extensions {
        let trimmed = ext.trim();
        if trimmed.is_empty() || trimmed.contains('.') || trimmed.contains('/') {
            return Err(OptimizeError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: ext.clone(),
                reason: "Extensions are written without a leading dot, e.g. 'jpg'".to_string(),
            });
        }
        if !seen.insert(trimmed.to_ascii_lowercase()) {
            return Err(OptimizeError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: ext.clone(),
                reason: "Duplicate extension".to_string(),
            });
        }
    }

    Ok(())
}
