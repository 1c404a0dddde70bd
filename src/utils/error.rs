use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Fetch error for {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Notification error: {0}")]
    Notify(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    pub fn fetch(url: &str, message: impl std::fmt::Display) -> Self {
        AppError::Fetch {
            url: url.to_string(),
            message: message.to_string(),
        }
    }
}

// Implement conversion from validation errors
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("{}", err))
    }
}

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;
