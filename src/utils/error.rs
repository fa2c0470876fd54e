use thiserror::Error;

#[derive(Error, Debug)]
pub enum AbError {
    #[error("Missing input: {which} sample has not been provided")]
    MissingInputError { which: String },

    #[error("Invalid sample '{sample}': {reason}")]
    InvalidSampleError { sample: String, reason: String },

    #[error("Shape mismatch: control columns [{control}] vs treatment columns [{treatment}]")]
    ShapeMismatchError { control: String, treatment: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AbError {
    pub fn invalid_sample(sample: impl Into<String>, reason: impl Into<String>) -> Self {
        AbError::InvalidSampleError {
            sample: sample.into(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            AbError::MissingInputError { .. } => ErrorCategory::Input,
            AbError::InvalidSampleError { .. }
            | AbError::ShapeMismatchError { .. }
            | AbError::CsvError(_) => ErrorCategory::Data,
            AbError::TomlError(_)
            | AbError::ConfigError { .. }
            | AbError::ValidationError { .. }
            | AbError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            AbError::IoError(_) | AbError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 尚未上傳資料只需提示使用者
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Configuration => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Process exit status for the CLI; a missing upload is not a failure.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AbError::MissingInputError { .. } => {
                "Please upload both a control and a treatment CSV file to run the comparison."
                    .to_string()
            }
            AbError::InvalidSampleError { sample, reason } => {
                format!("The data in '{}' cannot be analysed: {}", sample, reason)
            }
            AbError::ShapeMismatchError { .. } => {
                "The control and treatment files do not have matching columns.".to_string()
            }
            AbError::CsvError(e) => format!("The CSV file could not be read: {}", e),
            AbError::IoError(e) => format!("A file could not be accessed: {}", e),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AbError::MissingInputError { .. } => {
                "Pass --control <FILE> and --treatment <FILE>, or set them under [input] in the config file"
            }
            AbError::InvalidSampleError { .. } => {
                "Make sure every column is numeric, has no empty cells and at least two observations"
            }
            AbError::ShapeMismatchError { .. } => {
                "Use the same header in both files, or select a shared column with --column"
            }
            AbError::CsvError(_) => "Check that the file is comma separated and has a header row",
            AbError::IoError(_) => "Check that the path exists and is readable/writable",
            AbError::SerializationError(_) => "This is an internal error; please report it",
            AbError::TomlError(_) => "Check the configuration file for TOML syntax errors",
            AbError::ConfigError { .. }
            | AbError::ValidationError { .. }
            | AbError::InvalidConfigValueError { .. } => {
                "Review the command line flags and configuration values"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AbError>;
