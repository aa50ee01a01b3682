use thiserror::Error;

/// Errors that can occur when talking to the Gemini API
#[derive(Error, Debug)]
pub enum Error {
    /// Error from the reqwest HTTP client
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Error parsing JSON
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error from the Gemini API
    #[error("Gemini API error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },

    /// Error building a valid request
    #[error("Request building error: {0}")]
    RequestError(String),

    /// Missing API key
    #[error("Missing API key")]
    MissingApiKey,
}

/// Result type used throughout this crate
pub type Result<T> = std::result::Result<T, Error>;
