//! Users: an account that can coordinate events.
//!
//! The events a user coordinates are never stored on the user; they are
//! looked up from the event side whenever they are needed.

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationErrors};
use crate::id::UserId;

/// Maximum length, in characters, of a username.
pub const USERNAME_MAX: usize = 150;

/// A stored user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
}

/// A user that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
}

impl NewUser {
    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns every failed username rule.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        check_username(&self.username)
    }

    /// Attach the storage-assigned id.
    #[must_use]
    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            username: self.username,
        }
    }
}

/// Field values supplied by a create request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub username: Option<String>,
}

impl UserChanges {
    /// Turn the changes into a validated [`NewUser`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Required`] when `username` is absent, or
    /// the username rules otherwise.
    pub fn into_new_user(self) -> Result<NewUser, ValidationErrors> {
        let Some(username) = self.username else {
            return Err(ValidationError::Required { field: "username" }.into());
        };
        let user = NewUser { username };
        user.validate()?;
        Ok(user)
    }
}

fn check_username(username: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if username.trim().is_empty() {
        errors.push(ValidationError::Blank { field: "username" });
        return errors.into_result();
    }
    if username.chars().count() > USERNAME_MAX {
        errors.push(ValidationError::TooLong {
            field: "username",
            max: USERNAME_MAX,
        });
    }
    if !username.chars().all(is_username_char) {
        errors.push(ValidationError::InvalidUsername);
    }
    errors.into_result()
}

fn is_username_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.' | '@' | '+' | '-')
}
