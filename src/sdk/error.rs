#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    /// Rejected client-side before any request is sent.
    #[error("configuration error: {0}")]
    Config(String),
    #[error("API error ({status}): {message}")]
    Http { status: u16, message: String },
    #[error("transport error: {0}")]
    Transport(#[from] wreq::Error),
    #[error("unexpected payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl SdkError {
    /// HTTP status for errors returned by the server.
    pub fn status(&self) -> Option<u16> {
        match self {
            SdkError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
