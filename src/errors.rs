use thiserror::Error;

/// Application-wide error type - single point of truth
#[derive(Error, Debug)]
pub enum AppError {
    /// Analytics backend operations
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// File I/O operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV export and parsing
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration issues
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation/parsing
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Invalid CSV record
    #[error("Invalid CSV record at line {line}: {reason}")]
    InvalidRecord { line: usize, reason: String },
}

/// Analytics backend error types
///
/// Every fetch failure lands in exactly one of three buckets, which drive the
/// connection-status indicator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Transport failure or non-2xx response
    #[error("Network error on {endpoint}: {message}")]
    Network {
        endpoint: String,
        status: Option<u16>,
        message: String,
    },

    /// Response body was not valid JSON (or not the expected shape)
    #[error("Parse error on {endpoint}: {message}")]
    Parse { endpoint: String, message: String },

    /// Backend answered but reported an `error` field
    #[error("Application error on {endpoint}: {message}")]
    Application { endpoint: String, message: String },
}

/// Coarse classification of an [`ApiError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    Network,
    Parse,
    Application,
}

impl ApiError {
    pub fn kind(&self) -> ApiErrorKind {
        match self {
            ApiError::Network { .. } => ApiErrorKind::Network,
            ApiError::Parse { .. } => ApiErrorKind::Parse,
            ApiError::Application { .. } => ApiErrorKind::Application,
        }
    }

    /// Path of the endpoint that failed
    pub fn endpoint(&self) -> &str {
        match self {
            ApiError::Network { endpoint, .. }
            | ApiError::Parse { endpoint, .. }
            | ApiError::Application { endpoint, .. } => endpoint,
        }
    }

    /// HTTP status code, when the server answered with a non-2xx status
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Network { status, .. } => *status,
            _ => None,
        }
    }
}

impl std::fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ApiErrorKind::Network => "network",
            ApiErrorKind::Parse => "parse",
            ApiErrorKind::Application => "application",
        };
        f.pad(label)
    }
}

/// Application-wide result type - single point of truth
pub type AppResult<T> = Result<T, AppError>;

/// Result type for backend API operations
pub type ApiResult<T> = Result<T, ApiError>;

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidData(format!("JSON error: {}", err))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}
