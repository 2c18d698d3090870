//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use chrono::{DateTime, Utc};
use kernel::pagination::PageRequest;

use crate::domain::entity::{RefreshToken, User};
use crate::domain::value_object::{Email, UserId, Username};
use crate::error::AuthResult;

/// Credential store access
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a user. Unique violations surface as `EmailTaken` / `UsernameTaken`.
    async fn create(&self, user: &User) -> AuthResult<()>;

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    async fn find_by_username(&self, username: &Username) -> AuthResult<Option<User>>;

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    async fn exists_by_username(&self, username: &Username) -> AuthResult<bool>;

    /// Persist profile, password and academic-year changes.
    async fn update(&self, user: &User) -> AuthResult<()>;

    /// Up to `page.fetch_limit()` users ordered by id, starting at the cursor.
    async fn page(&self, page: &PageRequest) -> AuthResult<Vec<User>>;
}

/// Refresh token ledger storage
#[trait_variant::make(RefreshTokenRepository: Send)]
pub trait LocalRefreshTokenRepository {
    async fn record(&self, token: &RefreshToken) -> AuthResult<()>;

    /// Ledger row for `token_digest` that has not expired at `now`.
    async fn find_active(
        &self,
        token_digest: &str,
        now: DateTime<Utc>,
    ) -> AuthResult<Option<RefreshToken>>;

    /// Delete the user's row for `token_digest`; `false` if there was none.
    async fn revoke(&self, user_id: &UserId, token_digest: &str) -> AuthResult<bool>;

    /// Delete every row of the user; returns how many existed.
    async fn revoke_all(&self, user_id: &UserId) -> AuthResult<u64>;

    async fn cleanup_expired(&self) -> AuthResult<u64>;
}
