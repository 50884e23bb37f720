use crate::utils::error::{DiskmagError, Result};
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(DiskmagError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(DiskmagError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_existing_dir(field_name: &str, path: &str) -> Result<()> {
    validate_path(field_name, path)?;
    if !Path::new(path).is_dir() {
        return Err(DiskmagError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "The path to the corpus seems to be invalid".to_string(),
        });
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(DiskmagError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

/// Extensions are given without the leading dot, e.g. `d64`.
pub fn validate_extensions(field_name: &str, extensions: &[String]) -> Result<()> {
    if extensions.is_empty() {
        return Err(DiskmagError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: String::new(),
            reason: "At least one disk image extension is required".to_string(),
        });
    }

    for ext in extensions {
        if ext.trim().is_empty() || ext.starts_with('.') || ext.contains(['/', '\\']) {
            return Err(DiskmagError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: ext.clone(),
                reason: "Extensions must be bare names such as 'd64'".to_string(),
            });
        }
    }

    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| DiskmagError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DiskmagError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
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
    // written so that NaN fails too
    if !(value >= min && value <= max) {
        return Err(DiskmagError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_existing_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().to_str().unwrap();
        assert!(validate_existing_dir("corpus_path", path).is_ok());
        assert!(validate_existing_dir("corpus_path", "").is_err());
        assert!(validate_existing_dir("corpus_path", &format!("{}/missing", path)).is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("line_length", 80, 1).is_ok());
        assert!(validate_positive_number("line_length", 0, 1).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("char_threshold", 0.5, 0.0, 1.0).is_ok());
        assert!(validate_range("char_threshold", 0.0, 0.0, 1.0).is_ok());
        assert!(validate_range("char_threshold", 1.0, 0.0, 1.0).is_ok());
        assert!(validate_range("char_threshold", 1.01, 0.0, 1.0).is_err());
        assert!(validate_range("char_threshold", f64::NAN, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_validate_extensions() {
        assert!(validate_extensions("image_extensions", &["d64".to_string()]).is_ok());
        assert!(validate_extensions("image_extensions", &[]).is_err());
        assert!(validate_extensions("image_extensions", &[".d64".to_string()]).is_err());
        assert!(validate_extensions("image_extensions", &[" ".to_string()]).is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some(3);
        let missing: Option<u8> = None;
        assert_eq!(*validate_required_field("x", &present).unwrap(), 3);
        assert!(matches!(
            validate_required_field("x", &missing),
            Err(DiskmagError::MissingConfigError { .. })
        ));
    }
}
