//! NCloud API error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("NCloud API credentials not found: {0}")]
    MissingCredentials(String),

    #[error("Failed to send request: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API request failed: {status} (returnCode: {return_code}, returnMessage: {return_message})")]
    Status {
        status: u16,
        return_code: String,
        return_message: String,
    },

    #[error("Failed to parse response JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Request signing failed: {0}")]
    Signing(String),
}

impl ApiError {
    /// HTTP status of a failed API call, if the gateway answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
