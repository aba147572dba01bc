//! Error types for the riot client

use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API key rejected by the remote API")]
    Unauthorized,

    #[error("Rate limited by the remote API (retry after {retry_after_secs:?}s)")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Unexpected status {status} from {endpoint}")]
    Api { status: u16, endpoint: String },

    #[error("Remote API returned invalid data: {0}")]
    InvalidData(String),

    #[error("Mock response not configured for: {0}")]
    NotConfigured(String),
}
