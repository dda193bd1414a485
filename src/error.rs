use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Frame parse error: {0}")]
    Parse(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
    },

    #[error("Session expired or unauthorized")]
    Unauthorized,

    #[error("Configuration error: {0}")]
    Config(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeedErrorType {
    Transport,
    Parse,
    Validation,
    Api,
    Unauthorized,
    Config,
}

impl FeedError {
    pub fn error_type(&self) -> FeedErrorType {
        match self {
            FeedError::Transport(_) => FeedErrorType::Transport,
            FeedError::Parse(_) => FeedErrorType::Parse,
            FeedError::Validation(_) => FeedErrorType::Validation,
            FeedError::Api { .. } => FeedErrorType::Api,
            FeedError::Unauthorized => FeedErrorType::Unauthorized,
            FeedError::Config(_) => FeedErrorType::Config,
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            FeedError::Transport(_) => true,
            FeedError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            if status.as_u16() == 401 {
                return FeedError::Unauthorized;
            }
            return FeedError::Api {
                status: status.as_u16(),
                message: err.to_string(),
            };
        }
        FeedError::Transport(err.to_string())
    }
}
