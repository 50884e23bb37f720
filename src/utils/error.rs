use crate::adapters::d64::D64Error;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiskmagError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Disk image error: {0}")]
    DiskImageError(#[from] D64Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Directory walk failed: {0}")]
    WalkError(#[from] walkdir::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Output,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DiskmagError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DiskmagError::ConfigError { .. }
            | DiskmagError::InvalidConfigValueError { .. }
            | DiskmagError::MissingConfigError { .. }
            | DiskmagError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            DiskmagError::ZipError(_)
            | DiskmagError::DiskImageError(_)
            | DiskmagError::WalkError(_) => ErrorCategory::Input,
            DiskmagError::IoError(_) | DiskmagError::SerializationError(_) => {
                ErrorCategory::Output
            }
            DiskmagError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            DiskmagError::ZipError(_) => "Check that the archive is a valid, unencrypted zip file",
            DiskmagError::DiskImageError(_) => {
                "Check that the file is a D64 image (35 or 40 tracks, optionally with error bytes)"
            }
            DiskmagError::IoError(_) => "Check file permissions and free disk space",
            DiskmagError::SerializationError(_) => {
                "Remove or repair the metadata file; it must contain a JSON array"
            }
            DiskmagError::WalkError(_) => "Check that the corpus directory is readable",
            DiskmagError::ConfigError { .. }
            | DiskmagError::InvalidConfigValueError { .. }
            | DiskmagError::ConfigValidationError { .. } => {
                "Review the command line flags or the TOML configuration file"
            }
            DiskmagError::MissingConfigError { .. } => "Add the missing field to the configuration",
            DiskmagError::ProcessingError { .. } => "Run again with --verbose for more details",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Input => format!("Could not read corpus input: {}", self),
            ErrorCategory::Output => format!("Could not write results: {}", self),
            ErrorCategory::Processing => format!("Conversion failed: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, DiskmagError>;
