//! User record as seen by the workflow engines.

use super::{EmailAddress, UserDomainError, UserId};
use serde::{Deserialize, Serialize};

/// Minimal user record: identity plus notification details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    email: EmailAddress,
    first_name: String,
    last_name: String,
}

impl User {
    /// Creates a user record.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::EmptyName`] when the first name is empty
    /// after trimming. The last name may be empty.
    pub fn new(
        id: UserId,
        email: EmailAddress,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Result<Self, UserDomainError> {
        let first_name = first_name.into();
        if first_name.trim().is_empty() {
            return Err(UserDomainError::EmptyName);
        }
        Ok(Self {
            id,
            email,
            first_name,
            last_name: last_name.into(),
        })
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the notification address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the first name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Returns the last name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Returns the full display name used in outbound messages.
    #[must_use]
    pub fn display_name(&self) -> String {
        if self.last_name.trim().is_empty() {
            self.first_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }
}
