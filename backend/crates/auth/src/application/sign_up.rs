//! Sign Up Use Case
//!
//! Creates a new user account and starts its first session.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::ledger::RefreshTokenLedger;
use crate::application::session::{SessionTokens, start_session};
use crate::application::token::TokenIssuer;
use crate::domain::entity::{NewUser, User};
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::domain::value_object::{Bio, Email, PersonName, RawPassword, UserPassword, Username};
use crate::error::{AuthError, AuthResult};

/// Sign up input
pub struct SignUpInput {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub bio: Option<String>,
}

/// Sign up output
#[derive(Debug)]
pub struct SignUpOutput {
    pub user: User,
    pub tokens: SessionTokens,
}

/// Sign up use case
pub struct SignUpUseCase<U, T>
where
    U: UserRepository,
    T: RefreshTokenRepository,
{
    user_repo: Arc<U>,
    ledger: RefreshTokenLedger<T>,
    issuer: Arc<TokenIssuer>,
    config: Arc<AuthConfig>,
}

impl<U, T> SignUpUseCase<U, T>
where
    U: UserRepository,
    T: RefreshTokenRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        token_repo: Arc<T>,
        issuer: Arc<TokenIssuer>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            ledger: RefreshTokenLedger::new(token_repo),
            issuer,
            config,
        }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<SignUpOutput> {
        // Validate everything before touching the store
        let fields = NewUser {
            first_name: PersonName::first(&input.first_name)?,
            last_name: PersonName::last(&input.last_name)?,
            username: Username::new(&input.username)?,
            email: Email::new(&input.email)?,
            bio: Bio::parse(input.bio)?,
        };
        let raw_password = RawPassword::new(input.password)?;

        if self.user_repo.exists_by_email(&fields.email).await? {
            return Err(AuthError::EmailTaken);
        }
        if self.user_repo.exists_by_username(&fields.username).await? {
            return Err(AuthError::UsernameTaken);
        }

        let password = UserPassword::hash(raw_password, self.config.password_cost).await?;
        let user = User::new(fields, password);

        // A concurrent sign-up can still win the race; the unique index
        // turns that into EmailTaken / UsernameTaken here.
        self.user_repo.create(&user).await?;

        let tokens = start_session(&self.issuer, &self.ledger, &user.user_id).await?;

        tracing::info!(
            user_id = %user.user_id,
            username = %user.username,
            "User signed up"
        );

        Ok(SignUpOutput { user, tokens })
    }
}
