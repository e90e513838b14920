use crate::utils::error::{LaunchError, Result};
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &Path) -> Result<()> {
    let display = path.to_string_lossy();
    if display.is_empty() {
        return Err(LaunchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: display.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if display.contains('\0') {
        return Err(LaunchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: display.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LaunchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// A bare executable or file name, no directory components.
pub fn validate_file_name(field_name: &str, value: &str) -> Result<()> {
    validate_non_empty_string(field_name, value)?;
    if value.contains('/') || value.contains('\\') || value == "." || value == ".." {
        return Err(LaunchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Must be a plain file name without directory components".to_string(),
        });
    }
    Ok(())
}

/// Parses a `major.minor` version requirement.
pub fn parse_min_version(field_name: &str, value: &str) -> Result<(u32, u32)> {
    let invalid = || LaunchError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: "Expected a version of the form MAJOR.MINOR".to_string(),
    };

    let (major, minor) = value.trim().split_once('.').ok_or_else(invalid)?;
    let major = major.parse::<u32>().map_err(|_| invalid())?;
    let minor = minor.parse::<u32>().map_err(|_| invalid())?;
    Ok((major, minor))
}
