use thiserror::Error;

#[derive(Error, Debug)]
pub enum TarotError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("{service} responded with status {status}")]
    UpstreamStatusError { service: String, status: u16 },

    #[error("Completion response contained no choices")]
    EmptyCompletionError,

    #[error("Deck has {available} distinct cards, {required} are needed for a draw")]
    InsufficientDeckError { required: usize, available: usize },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

impl TarotError {
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            TarotError::MissingConfigError { .. }
                | TarotError::InvalidConfigValueError { .. }
                | TarotError::ConfigValidationError { .. }
        )
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            TarotError::ApiError(_) | TarotError::UpstreamStatusError { .. } => {
                "Check network connectivity and that the upstream endpoint is reachable".to_string()
            }
            TarotError::EmptyCompletionError => {
                "Check the completion model name and the max_tokens setting".to_string()
            }
            TarotError::InsufficientDeckError { .. } => {
                "Point DECK_ENDPOINT at a source that serves a full tarot deck".to_string()
            }
            TarotError::MissingConfigError { field } => {
                format!("Set {} in the environment, on the command line or in the config file", field)
            }
            TarotError::InvalidConfigValueError { field, .. }
            | TarotError::ConfigValidationError { field, .. } => {
                format!("Fix the value of {} and restart", field)
            }
            TarotError::IoError(_) => "Check file paths and permissions".to_string(),
            TarotError::SerializationError(_) => {
                "The upstream payload did not match the expected shape".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        if self.is_config_error() {
            format!("Configuration problem: {}", self)
        } else {
            format!("Request failed: {}", self)
        }
    }
}

pub type Result<T> = std::result::Result<T, TarotError>;
