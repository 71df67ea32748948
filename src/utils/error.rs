use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("HTTP client error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Email message error: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Parsing error: {message}")]
    Parse { message: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Cannot compute a minimum price over an empty listing set")]
    EmptyListings,
}

/// Exit code used for network failures, including a run whose listings
/// page could not be fetched.
pub const NETWORK_EXIT_CODE: u8 = 4;

impl AppError {
    /// Process exit code for this error, grouped by failure category.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Config(_)
            | AppError::Address(_)
            | AppError::Url(_)
            | AppError::Validation(_) => 3,
            AppError::Network(_) => NETWORK_EXIT_CODE,
            AppError::Parse { .. } => 5,
            AppError::Smtp(_) | AppError::Message(_) => 6,
            AppError::EmptyListings => 7,
            AppError::Serialization(_) | AppError::Io(_) => 1,
        }
    }
}

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;
