use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The collaborator rejected the payload.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Server or network failure; safe to retry.
    #[error("Remote failure ({status}): {message}")]
    Transient { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// Failures worth another attempt on the next save cycle or user action.
    pub fn is_transient(&self) -> bool {
        matches!(self, ClientError::Http(_) | ClientError::Transient { .. })
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
