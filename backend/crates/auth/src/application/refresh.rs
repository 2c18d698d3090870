//! Refresh Use Case
//!
//! Trades a live refresh token for a new access token. The refresh token is
//! not rotated.

use std::sync::Arc;

use crate::application::ledger::RefreshTokenLedger;
use crate::application::token::TokenIssuer;
use crate::domain::repository::RefreshTokenRepository;
use crate::error::{AuthError, AuthResult};

pub struct RefreshUseCase<T>
where
    T: RefreshTokenRepository,
{
    ledger: RefreshTokenLedger<T>,
    issuer: Arc<TokenIssuer>,
}

impl<T> RefreshUseCase<T>
where
    T: RefreshTokenRepository,
{
    pub fn new(token_repo: Arc<T>, issuer: Arc<TokenIssuer>) -> Self {
        Self {
            ledger: RefreshTokenLedger::new(token_repo),
            issuer,
        }
    }

    /// Returns the new access token.
    pub async fn execute(&self, refresh_token: &str) -> AuthResult<String> {
        let claims = self.issuer.verify_refresh_token(refresh_token)?;
        let user_id = claims.user_id();

        if !self.ledger.is_valid(&user_id, refresh_token).await? {
            tracing::warn!(user_id = %user_id, "Refresh token not in ledger");
            return Err(AuthError::Unauthorized);
        }

        let access = self.issuer.issue_access_token(&user_id)?;

        tracing::debug!(user_id = %user_id, "Access token refreshed");
        Ok(access.token)
    }
}
