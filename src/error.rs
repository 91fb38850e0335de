//! Error types for notepulse

use thiserror::Error;

/// Main error type for the notepulse library
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed interval or calendar-span string
    #[error("invalid interval format: {0}")]
    Format(String),

    /// Calendar arithmetic failure (overflow, unrepresentable local time)
    #[error("time arithmetic error: {0}")]
    Time(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for notepulse
pub type Result<T> = std::result::Result<T, Error>;
