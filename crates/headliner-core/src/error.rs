use thiserror::Error;

/// All the ways things can go wrong in Headliner
///
/// None of these are fatal. Callers log them and keep whatever list they
/// already had on screen.
#[derive(Error, Debug)]
pub enum Error {
    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<headliner_api::NewsApiError> for Error {
    fn from(err: headliner_api::NewsApiError) -> Self {
        match err {
            headliner_api::NewsApiError::InvalidUrl(url) => Error::InvalidUrl(url),
            other => Error::ApiError(other.to_string()),
        }
    }
}
