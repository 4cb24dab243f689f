use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatchError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

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

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Required column '{column}' not found in {source_name}")]
    MissingColumn { column: String, source_name: String },

    #[error("Unable to classify travel capacity '{text}'")]
    UnrecognizedTravelCapacity { text: String },

    #[error("Student record has no identifier")]
    MissingStudentId,

    #[error("Capacity underflow on site '{site_id}'")]
    CapacityUnderflow { site_id: String },

    #[error("Duplicate site id '{site_id}'")]
    DuplicateSiteId { site_id: String },

    #[error("Duplicate student id '{student_id}'")]
    DuplicateStudentId { student_id: String },

    #[error("Site '{site_id}' is not tracked by the capacity ledger")]
    UnknownSite { site_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Storage,
    Invariant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MatchError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MatchError::CsvError(_)
            | MatchError::MissingColumn { .. }
            | MatchError::UnrecognizedTravelCapacity { .. }
            | MatchError::MissingStudentId => ErrorCategory::Input,
            MatchError::ConfigError { .. }
            | MatchError::ConfigValidationError { .. }
            | MatchError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            MatchError::IoError(_)
            | MatchError::SerializationError(_)
            | MatchError::ProcessingError { .. } => ErrorCategory::Storage,
            MatchError::CapacityUnderflow { .. }
            | MatchError::DuplicateSiteId { .. }
            | MatchError::DuplicateStudentId { .. }
            | MatchError::UnknownSite { .. } => ErrorCategory::Invariant,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 單列錯誤只會跳過該列
            MatchError::UnrecognizedTravelCapacity { .. } | MatchError::MissingStudentId => {
                ErrorSeverity::Low
            }
            MatchError::CsvError(_) | MatchError::MissingColumn { .. } => ErrorSeverity::Medium,
            MatchError::ConfigError { .. }
            | MatchError::ConfigValidationError { .. }
            | MatchError::InvalidConfigValueError { .. }
            | MatchError::IoError(_)
            | MatchError::SerializationError(_)
            | MatchError::ProcessingError { .. } => ErrorSeverity::High,
            MatchError::CapacityUnderflow { .. }
            | MatchError::DuplicateSiteId { .. }
            | MatchError::DuplicateStudentId { .. }
            | MatchError::UnknownSite { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => {
                "Check the roster CSV headers and the travel capacity text of the rejected rows"
            }
            ErrorCategory::Configuration => {
                "Check the command line arguments and the matching settings TOML file"
            }
            ErrorCategory::Storage => {
                "Check that the input files are readable and the output directory is writable"
            }
            ErrorCategory::Invariant => {
                "Make sure site and student ids are unique; this run's output should not be used"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            MatchError::MissingColumn { column, source_name } => {
                format!("The file {} has no '{}' column", source_name, column)
            }
            MatchError::DuplicateSiteId { site_id } => {
                format!("Site id '{}' appears more than once in the site roster", site_id)
            }
            MatchError::DuplicateStudentId { student_id } => {
                format!(
                    "Student id '{}' appears more than once in the student roster",
                    student_id
                )
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MatchError>;
