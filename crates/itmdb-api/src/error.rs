//! Fetch error taxonomy.

use thiserror::Error;

/// Errors surfaced to callers of a fetch.
///
/// Field-level problems inside a successful response are never reported
/// here; population absorbs them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The response body could not be decoded.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The request failed before a usable response arrived.
    #[error("transport failure: {0}")]
    Transport(String),
}

impl FetchError {
    /// Returns `true` for [`FetchError::NotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
