use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Settings file error: {0}")]
    SettingsFileError(#[from] toml::de::Error),

    #[error("Progress template error: {0}")]
    ProgressTemplateError(#[from] indicatif::style::TemplateError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidSettingError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Registry data unavailable at {path}: {reason}")]
    RegistryUnavailable { path: String, reason: String },

    #[error("Request sequence exhausted: index {index} out of {len}")]
    SequenceExhausted { index: usize, len: usize },

    #[error("Output error: {message}")]
    OutputError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    LocalData,
    Network,
    Output,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ProbeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ProbeError::ConfigError { .. }
            | ProbeError::InvalidSettingError { .. }
            | ProbeError::SettingsFileError(_) => ErrorCategory::Configuration,
            ProbeError::ZipError(_)
            | ProbeError::CsvError(_)
            | ProbeError::SerializationError(_)
            | ProbeError::IoError(_)
            | ProbeError::RegistryUnavailable { .. } => ErrorCategory::LocalData,
            ProbeError::HttpError(_) => ErrorCategory::Network,
            ProbeError::OutputError { .. } => ErrorCategory::Output,
            ProbeError::ProgressTemplateError(_) | ProbeError::SequenceExhausted { .. } => {
                ErrorCategory::Internal
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Output => ErrorSeverity::High,
            ErrorCategory::LocalData | ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for a run that ended with this error.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ProbeError::RegistryUnavailable { path, .. } => {
                format!("Could not read the FDIC institution registry at {}", path)
            }
            ProbeError::HttpError(e) => format!("Network request failed: {}", e),
            ProbeError::InvalidSettingError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            ProbeError::SettingsFileError(_) => "The settings file could not be parsed".to_string(),
            ProbeError::OutputError { message } => format!("Could not write results: {}", message),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => "Check the command line flags and the settings file",
            ErrorCategory::LocalData => {
                "Delete the cached archive and JSON file in the data directory and run again"
            }
            ErrorCategory::Network => "Check network connectivity to www2.fdic.gov",
            ErrorCategory::Output => "Make sure the data directory is writable",
            ErrorCategory::Internal => "Run again with --verbose and report the log",
        }
    }
}

pub type Result<T> = std::result::Result<T, ProbeError>;
