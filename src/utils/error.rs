use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid output path '{path}': {reason}")]
    PathValidationError { path: String, reason: String },

    #[error("Scan failed: {message}")]
    ScanError { message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    System,
    Data,
    Configuration,
    Validation,
    Processing,
}

impl AnalyzerError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AnalyzerError::IoError(_) | AnalyzerError::ZipError(_) => ErrorSeverity::Critical,
            AnalyzerError::CsvError(_)
            | AnalyzerError::SerializationError(_)
            | AnalyzerError::ScanError { .. }
            | AnalyzerError::ProcessingError { .. } => ErrorSeverity::High,
            AnalyzerError::ConfigError { .. }
            | AnalyzerError::ConfigValidationError { .. }
            | AnalyzerError::InvalidConfigValueError { .. }
            | AnalyzerError::MissingConfigError { .. }
            | AnalyzerError::PathValidationError { .. }
            | AnalyzerError::ValidationError { .. } => ErrorSeverity::Medium,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            AnalyzerError::IoError(_) | AnalyzerError::ZipError(_) => ErrorCategory::System,
            AnalyzerError::CsvError(_) | AnalyzerError::SerializationError(_) => {
                ErrorCategory::Data
            }
            AnalyzerError::ConfigError { .. }
            | AnalyzerError::ConfigValidationError { .. }
            | AnalyzerError::InvalidConfigValueError { .. }
            | AnalyzerError::MissingConfigError { .. } => ErrorCategory::Configuration,
            AnalyzerError::PathValidationError { .. } | AnalyzerError::ValidationError { .. } => {
                ErrorCategory::Validation
            }
            AnalyzerError::ScanError { .. } | AnalyzerError::ProcessingError { .. } => {
                ErrorCategory::Processing
            }
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            AnalyzerError::IoError(_) => {
                "Check that the path exists and the process has permission to access it"
                    .to_string()
            }
            AnalyzerError::ZipError(_) => {
                "Remove any stale archive from the output directory and retry".to_string()
            }
            AnalyzerError::CsvError(_) => {
                "Make sure the CSV report file is writable and not held open elsewhere".to_string()
            }
            AnalyzerError::SerializationError(_) => {
                "Re-run with --verbose to see which report failed to serialize".to_string()
            }
            AnalyzerError::ConfigError { .. } => {
                "Review the repo-analyzer.toml syntax".to_string()
            }
            AnalyzerError::ConfigValidationError { field, .. } => {
                format!("Fix the '{}' entry in the configuration file", field)
            }
            AnalyzerError::InvalidConfigValueError { field, .. } => {
                format!("Provide a valid value for '{}'", field)
            }
            AnalyzerError::MissingConfigError { field } => {
                format!("Add the required '{}' setting", field)
            }
            AnalyzerError::PathValidationError { .. } => {
                "Choose an output directory inside the repository".to_string()
            }
            AnalyzerError::ScanError { .. } => {
                "Verify the scan root is a readable directory".to_string()
            }
            AnalyzerError::ProcessingError { .. } => {
                "Re-run with --verbose for per-file details".to_string()
            }
            AnalyzerError::ValidationError { .. } => {
                "Adjust the flagged setting and retry".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AnalyzerError::IoError(e) => format!("File system problem: {}", e),
            AnalyzerError::ZipError(e) => format!("Could not build the report archive: {}", e),
            AnalyzerError::CsvError(e) => format!("Could not write the CSV report: {}", e),
            AnalyzerError::SerializationError(e) => {
                format!("Could not serialize report data: {}", e)
            }
            AnalyzerError::ConfigError { message } => {
                format!("Configuration problem: {}", message)
            }
            AnalyzerError::ConfigValidationError { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
            AnalyzerError::InvalidConfigValueError {
                field,
                value,
                reason,
            } => format!("'{}' is not a valid {} ({})", value, field, reason),
            AnalyzerError::MissingConfigError { field } => {
                format!("Missing required setting '{}'", field)
            }
            AnalyzerError::PathValidationError { path, reason } => {
                format!("Output path '{}' was rejected: {}", path, reason)
            }
            AnalyzerError::ScanError { message } => format!("Scan failed: {}", message),
            AnalyzerError::ProcessingError { message } => {
                format!("Analysis failed: {}", message)
            }
            AnalyzerError::ValidationError { message } => {
                format!("Validation failed: {}", message)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
