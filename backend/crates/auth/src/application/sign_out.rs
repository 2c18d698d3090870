//! Sign Out Use Case
//!
//! Revokes one refresh token (logout) or all of them (logout-all-devices).
//! Access tokens already handed out stay valid until they expire.

use std::sync::Arc;

use crate::application::ledger::RefreshTokenLedger;
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::domain::value_object::UserId;
use crate::error::{AuthError, AuthResult};

/// Sign out use case
pub struct SignOutUseCase<U, T>
where
    U: UserRepository,
    T: RefreshTokenRepository,
{
    user_repo: Arc<U>,
    ledger: RefreshTokenLedger<T>,
}

impl<U, T> SignOutUseCase<U, T>
where
    U: UserRepository,
    T: RefreshTokenRepository,
{
    pub fn new(user_repo: Arc<U>, token_repo: Arc<T>) -> Self {
        Self {
            user_repo,
            ledger: RefreshTokenLedger::new(token_repo),
        }
    }

    /// Sign out from the session owning `refresh_token`
    pub async fn execute(&self, user_id: &UserId, refresh_token: &str) -> AuthResult<()> {
        self.ensure_user(user_id).await?;
        self.ledger.revoke_one(user_id, refresh_token).await?;

        tracing::info!(user_id = %user_id, "User signed out");
        Ok(())
    }

    /// Sign out from every session
    pub async fn execute_all(&self, user_id: &UserId) -> AuthResult<u64> {
        self.ensure_user(user_id).await?;
        let revoked = self.ledger.revoke_all(user_id).await?;

        tracing::info!(
            user_id = %user_id,
            revoked = revoked,
            "User signed out from all devices"
        );

        Ok(revoked)
    }

    async fn ensure_user(&self, user_id: &UserId) -> AuthResult<()> {
        match self.user_repo.find_by_id(user_id).await? {
            Some(_) => Ok(()),
            None => Err(AuthError::UserNotFound),
        }
    }
}
