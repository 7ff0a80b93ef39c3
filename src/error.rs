use thiserror::Error;

/// Failure of a request to the offers API
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("offers API returned {status} for {url}")]
    Status { status: u16, url: String },
    #[error("could not decode offers response: {0}")]
    Decode(String),
    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(String),
}
