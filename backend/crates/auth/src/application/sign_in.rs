//! Sign In Use Case
//!
//! Authenticates by email and password and starts a new session. Each login
//! adds a ledger row, so a user can be signed in on several devices.

use std::sync::Arc;

use crate::application::ledger::RefreshTokenLedger;
use crate::application::session::{SessionTokens, start_session};
use crate::application::token::TokenIssuer;
use crate::domain::entity::User;
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::domain::value_object::{Email, RawPassword};
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in output
#[derive(Debug)]
pub struct SignInOutput {
    pub user: User,
    pub tokens: SessionTokens,
}

/// Sign in use case
pub struct SignInUseCase<U, T>
where
    U: UserRepository,
    T: RefreshTokenRepository,
{
    user_repo: Arc<U>,
    ledger: RefreshTokenLedger<T>,
    issuer: Arc<TokenIssuer>,
}

impl<U, T> SignInUseCase<U, T>
where
    U: UserRepository,
    T: RefreshTokenRepository,
{
    pub fn new(user_repo: Arc<U>, token_repo: Arc<T>, issuer: Arc<TokenIssuer>) -> Self {
        Self {
            user_repo,
            ledger: RefreshTokenLedger::new(token_repo),
            issuer,
        }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        let email = Email::new(&input.email)?;
        let raw_password = RawPassword::new(input.password)?;

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !user.password.verify(raw_password).await? {
            return Err(AuthError::InvalidCredentials);
        }

        let tokens = start_session(&self.issuer, &self.ledger, &user.user_id).await?;

        tracing::info!(user_id = %user.user_id, "User signed in");

        Ok(SignInOutput { user, tokens })
    }
}
