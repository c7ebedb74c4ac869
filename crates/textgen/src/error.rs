use thiserror::Error;

use crate::json::ParseError;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("rate limited by the generation service")]
    RateLimited,
    #[error("generation quota exhausted")]
    QuotaExhausted,
    #[error("generation service rejected credentials")]
    Unauthorized,
    #[error("generation request timed out")]
    Timeout,
    #[error("generation service returned status {0}")]
    Status(u16),
    #[error("network failure talking to the generation service")]
    Network(#[source] reqwest::Error),
    #[error("malformed generation reply: {0}")]
    Malformed(#[from] ParseError),
}

impl GenerationError {
    /// Classify a non-success HTTP status from the generation service.
    pub fn from_status(status: u16) -> Self {
        match status {
            429 => Self::RateLimited,
            402 => Self::QuotaExhausted,
            401 | 403 => Self::Unauthorized,
            other => Self::Status(other),
        }
    }

    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(err)
        }
    }

    /// Fatal errors poison every subsequent call in the same run, so the
    /// stage aborts instead of degrading prompt by prompt.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::QuotaExhausted | Self::Unauthorized
        )
    }
}
