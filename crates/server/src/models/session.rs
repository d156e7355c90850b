//! Session-stored authentication state.

use serde::{Deserialize, Serialize};

/// Identity provider tokens for the logged-in user.
///
/// This is the only thing kept in the session. Who the tokens belong to, and
/// whether that user is an admin, is re-checked on every request.
#[derive(Clone, Serialize, Deserialize)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
}

impl std::fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokens")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for the identity provider tokens.
    pub const TOKENS: &str = "identity_tokens";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_tokens() {
        let tokens = SessionTokens {
            access_token: "eyJaccess".to_string(),
            refresh_token: "refresh-123".to_string(),
        };
        let debug_output = format!("{tokens:?}");
        assert!(!debug_output.contains("eyJaccess"));
        assert!(!debug_output.contains("refresh-123"));
    }
}
