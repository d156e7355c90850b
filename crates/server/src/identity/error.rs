//! Identity provider error types.

use thiserror::Error;

/// Errors that can occur when talking to the identity provider.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Provider refused the token or credentials.
    #[error("credentials rejected")]
    Rejected,

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// User search ran past its page bound without reaching the end.
    #[error("user search exceeded {pages} pages")]
    SearchLimit { pages: u32 },
}

impl IdentityError {
    /// Whether the provider said no, as opposed to failing.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected)
    }
}
