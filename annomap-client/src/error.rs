use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Could not reach the reference service: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("The API token was rejected (HTTP 401). It may be invalid or rate limited.")]
    Unauthorized,

    #[error("The API token is not allowed to read this reference (HTTP 403).")]
    Forbidden,

    #[error("The reference service failed to answer (HTTP 500).")]
    ServerError,

    #[error("Unexpected response from the reference service (HTTP {0}).")]
    UnexpectedStatus(u16),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Could not decode the service response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Maps a non-200 status code onto its error category.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden,
            500 => ApiError::ServerError,
            other => ApiError::UnexpectedStatus(other),
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::Forbidden => Some(403),
            ApiError::ServerError => Some(500),
            ApiError::UnexpectedStatus(code) => Some(*code),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
