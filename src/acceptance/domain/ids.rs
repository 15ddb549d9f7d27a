//! Identifier and token types for acceptance requests.

use crate::identifier::uuid_identifier;
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};
use std::fmt;

uuid_identifier! {
    /// Unique identifier for an acceptance request.
    AcceptanceRequestId
}

/// Bearer capability granting unauthenticated portal access to one request.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestToken(String);

impl RequestToken {
    /// Default token length in characters.
    pub const DEFAULT_LENGTH: usize = 43;

    /// Generates a random alphanumeric token of `length` characters.
    #[must_use]
    pub fn generate(length: usize) -> Self {
        let token = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(length)
            .map(char::from)
            .collect();
        Self(token)
    }

    /// Wraps a token presented by a caller.
    #[must_use]
    pub fn from_presented(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_owned())
    }

    /// Returns the token as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Tokens are credentials; keep them out of debug output.
impl fmt::Debug for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RequestToken").field(&"<redacted>").finish()
    }
}
