use chrono::{DateTime, Utc};

#[derive(Debug, thiserror::Error)]
pub enum LinearError {
    #[error("rate limited (status {status}), resets at {reset}")]
    RateLimited { status: u16, body: String, reset: DateTime<Utc> },

    #[error("linear API error (status {status}): {body}")]
    ApiError { status: u16, body: String },

    #[error("linear GraphQL error: {0}")]
    GraphQl(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("account '{account}' is backing off until {until}")]
    BackoffActive { account: String, until: DateTime<Utc> },

    #[error("unknown account '{0}'")]
    UnknownAccount(String),

    #[error("account '{0}' has no usable auth token")]
    AuthMissing(String),

    #[error("failed to read cache {path}: {source}")]
    CacheRead { path: std::path::PathBuf, source: std::io::Error },

    #[error("failed to write cache {path}: {source}")]
    CacheWrite { path: std::path::PathBuf, source: std::io::Error },

    #[error("failed to decode cache {path}: {source}")]
    CacheDecode { path: std::path::PathBuf, source: serde_json::Error },
}
