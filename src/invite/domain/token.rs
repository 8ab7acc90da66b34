//! Single-use opaque invite token.

use super::InviteDomainError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use uuid::Uuid;

/// Unguessable credential embedded in invite action links.
///
/// The token is the sole credential for the unauthenticated accept and
/// decline channels, so it must be unguessable and globally unique; the
/// repository additionally enforces uniqueness at rest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InviteToken(String);

impl InviteToken {
    /// Generates a fresh token from 256 bits of CSPRNG-backed input.
    #[must_use]
    pub fn generate() -> Self {
        let mut hasher = Sha256::new();
        hasher.update(Uuid::new_v4().as_bytes());
        hasher.update(Uuid::new_v4().as_bytes());
        let digest = hasher.finalize();
        Self(digest.iter().map(|byte| format!("{byte:02x}")).collect())
    }

    /// Wraps a token value received from a link or loaded from storage.
    ///
    /// # Errors
    ///
    /// Returns [`InviteDomainError::InvalidToken`] when the value is
    /// empty or contains whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, InviteDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() || normalized.chars().any(char::is_whitespace) {
            return Err(InviteDomainError::InvalidToken);
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the token as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for InviteToken {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for InviteToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
