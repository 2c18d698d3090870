//! User Password Value Object
//!
//! Domain wrappers over `platform::password`. Hashing and verification go
//! through the blocking pool.

use std::fmt;

use kernel::error::app_error::{AppError, AppResult};
use platform::password::{
    ClearTextPassword, HashCost, HashedPassword, PasswordHashError, PasswordPolicyError,
    hash_blocking, verify_blocking,
};

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Password as typed by the user. Zeroized on drop.
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Validate against the password policy; violations are `400`s.
    pub fn new(raw: String) -> AppResult<Self> {
        let clear_text = ClearTextPassword::new(raw).map_err(|e| match e {
            PasswordPolicyError::TooShort { min, .. } => AppError::bad_request(format!(
                "Password must be at least {} characters long",
                min
            )),

            PasswordPolicyError::TooLong { max, .. } => AppError::bad_request(format!(
                "Password must be at most {} characters long",
                max
            )),

            PasswordPolicyError::EmptyOrWhitespace => {
                AppError::bad_request("Password is required")
            }

            PasswordPolicyError::InvalidCharacter => {
                AppError::bad_request("Password contains invalid characters")
                    .with_action("Please remove any special control characters")
            }
        })?;

        Ok(Self(clear_text))
    }

    pub(crate) fn into_inner(self) -> ClearTextPassword {
        self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// User Password (Hashed, for storage)
// ============================================================================

/// Stored password hash (PHC string).
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    pub async fn hash(raw: RawPassword, cost: HashCost) -> Result<Self, PasswordHashError> {
        hash_blocking(raw.into_inner(), cost).await.map(Self)
    }

    /// From the `password_hash` column.
    pub fn from_phc_string(phc_string: impl Into<String>) -> Result<Self, PasswordHashError> {
        HashedPassword::from_phc_string(phc_string).map(Self)
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    pub async fn verify(&self, raw: RawPassword) -> Result<bool, PasswordHashError> {
        verify_blocking(self.0.clone(), raw.into_inner()).await
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}
