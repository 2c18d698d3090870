//! Refresh Token Ledger
//!
//! Sole authority on whether a refresh token may still be used. A token with
//! a valid signature but no live row here is rejected.

use std::sync::Arc;

use chrono::Utc;
use platform::crypto::token_digest;

use crate::application::token::IssuedToken;
use crate::domain::entity::RefreshToken;
use crate::domain::repository::RefreshTokenRepository;
use crate::domain::value_object::UserId;
use crate::error::{AuthError, AuthResult};

pub struct RefreshTokenLedger<R>
where
    R: RefreshTokenRepository,
{
    repo: Arc<R>,
}

impl<R> RefreshTokenLedger<R>
where
    R: RefreshTokenRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn record(&self, user_id: &UserId, issued: &IssuedToken) -> AuthResult<()> {
        let entry = RefreshToken::new(*user_id, &issued.token, issued.claims.expires_at());
        self.repo.record(&entry).await
    }

    /// Logout: remove one token of `user_id`.
    pub async fn revoke_one(&self, user_id: &UserId, token: &str) -> AuthResult<()> {
        if self.repo.revoke(user_id, &token_digest(token)).await? {
            Ok(())
        } else {
            Err(AuthError::RefreshTokenNotFound)
        }
    }

    /// Logout everywhere. Zero rows is `NoActiveSessions`.
    pub async fn revoke_all(&self, user_id: &UserId) -> AuthResult<u64> {
        match self.repo.revoke_all(user_id).await? {
            0 => Err(AuthError::NoActiveSessions),
            revoked => Ok(revoked),
        }
    }

    /// Row exists, belongs to `user_id` and has not expired.
    pub async fn is_valid(&self, user_id: &UserId, token: &str) -> AuthResult<bool> {
        let entry = self
            .repo
            .find_active(&token_digest(token), Utc::now())
            .await?;
        Ok(entry.is_some_and(|entry| entry.user_id == *user_id))
    }
}
