//! Username Value Object
//!
//! 3 to 25 characters of ASCII letters, digits and underscores. Compared
//! as stored; uniqueness is enforced by the `users_username_key` index.

use std::fmt;

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

pub const USERNAME_MIN_LENGTH: usize = 3;
pub const USERNAME_MAX_LENGTH: usize = 25;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    pub fn new(raw: impl AsRef<str>) -> AppResult<Self> {
        let username = raw.as_ref().trim();

        if username.is_empty() {
            return Err(AppError::bad_request("Username is required"));
        }

        let len = username.chars().count();
        if !(USERNAME_MIN_LENGTH..=USERNAME_MAX_LENGTH).contains(&len) {
            return Err(AppError::bad_request(format!(
                "Username must be between {} and {} characters",
                USERNAME_MIN_LENGTH, USERNAME_MAX_LENGTH
            )));
        }

        if !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(AppError::bad_request(
                "Username can only contain letters, numbers, and underscores",
            ));
        }

        Ok(Self(username.to_string()))
    }

    pub fn from_db(username: String) -> Self {
        Self(username)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
