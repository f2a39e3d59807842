use thiserror::Error;

/// 單筆通話紀錄的解析錯誤，保留原始輸入以便診斷
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Error parsing start time {0}")]
    StartTime(String),

    #[error("Error parsing duration {0}")]
    Duration(String),

    #[error("Error parsing direction {0}")]
    Direction(String),

    #[error("Error parsing record {line}: expected 4 fields, found {found}")]
    FieldCount { line: String, found: usize },
}

impl ParseError {
    /// 造成錯誤的原始文字
    pub fn raw_input(&self) -> &str {
        match self {
            ParseError::StartTime(raw)
            | ParseError::Duration(raw)
            | ParseError::Direction(raw) => raw,
            ParseError::FieldCount { line, .. } => line,
        }
    }
}

#[derive(Error, Debug)]
pub enum BillingError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Line {line_number}: {source}")]
    ParseAt {
        line_number: u64,
        #[source]
        source: ParseError,
    },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
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

impl BillingError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BillingError::Parse(_) | BillingError::ParseAt { .. } | BillingError::CsvError(_) => {
                ErrorCategory::Input
            }
            BillingError::ConfigError { .. } | BillingError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            BillingError::IoError(_) | BillingError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 若為解析錯誤，回傳其內部的 ParseError
    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            BillingError::Parse(err) | BillingError::ParseAt { source: err, .. } => Some(err),
            _ => None,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            BillingError::Parse(err) => format!("Call log contains a malformed record: {}", err),
            BillingError::ParseAt {
                line_number,
                source,
            } => format!(
                "Call log contains a malformed record on line {}: {}",
                line_number, source
            ),
            BillingError::CsvError(err) => format!("Call log could not be read as CSV: {}", err),
            BillingError::IoError(err) => format!("File access failed: {}", err),
            BillingError::SerializationError(err) => {
                format!("Could not render the billing result: {}", err)
            }
            BillingError::ConfigError { message } => format!("Invalid configuration: {}", message),
            BillingError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid configuration value for {}: {}", field, reason)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            BillingError::Parse(ParseError::StartTime(_))
            | BillingError::ParseAt {
                source: ParseError::StartTime(_),
                ..
            } => "Start times must be ISO-8601, e.g. 2019-08-29T11:28:05.666Z",
            BillingError::Parse(ParseError::Duration(_))
            | BillingError::ParseAt {
                source: ParseError::Duration(_),
                ..
            } => "Durations must be written as MM:SS, e.g. 12:36",
            BillingError::Parse(ParseError::Direction(_))
            | BillingError::ParseAt {
                source: ParseError::Direction(_),
                ..
            } => "Direction must be exactly INCOMING or OUTGOING",
            BillingError::Parse(ParseError::FieldCount { .. })
            | BillingError::ParseAt {
                source: ParseError::FieldCount { .. },
                ..
            } => "Each line must be <number>,<start time>,<MM:SS>,<INCOMING|OUTGOING>",
            BillingError::CsvError(_) => "Check that the call log is UTF-8 comma separated text",
            BillingError::IoError(_) => "Check that the file exists and is readable",
            BillingError::SerializationError(_) => "Re-run with --verbose and report the output",
            BillingError::ConfigError { .. } | BillingError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command line flags and try again"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, BillingError>;
