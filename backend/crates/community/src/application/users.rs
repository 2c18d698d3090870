//! Users Directory
//!
//! Listing, lookup and self-service profile edits. Accounts themselves are
//! created by the auth crate; this service reads and updates them through the
//! same repositories.

use std::sync::Arc;

use auth::AuthError;
use auth::UserResponse;
use auth::domain::entity::{ProfileChanges, User};
use auth::domain::value_object::{
    AcademicYear, Bio, PersonName, RawPassword, UserId, UserPassword, Username,
};
use auth::store::{RefreshTokenRepository, UserRepository};
use kernel::pagination::{Page, PageRequest};
use platform::cache::{Cached, ReadThroughCache};

use crate::application::cache_keys::{self, USERS};
use crate::application::config::CommunityConfig;
use crate::error::{CommunityError, CommunityResult};

const NOT_SELF: &str = "Can't update another user";

/// Raw profile edit. `None` leaves a field unchanged.
#[derive(Debug, Default)]
pub struct ProfileInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub bio: Option<String>,
    pub profile_photo: Option<String>,
}

impl ProfileInput {
    fn validate(self) -> CommunityResult<ProfileChanges> {
        Ok(ProfileChanges {
            first_name: self.first_name.map(PersonName::first).transpose()?,
            last_name: self.last_name.map(PersonName::last).transpose()?,
            username: self.username.map(Username::new).transpose()?,
            bio: Bio::parse(self.bio)?,
            profile_photo: self
                .profile_photo
                .map(|photo| photo.trim().to_string())
                .filter(|photo| !photo.is_empty()),
        })
    }
}

pub struct UserService<U>
where
    U: UserRepository + RefreshTokenRepository,
{
    repo: Arc<U>,
    cache: ReadThroughCache,
    config: Arc<CommunityConfig>,
}

impl<U> UserService<U>
where
    U: UserRepository + RefreshTokenRepository,
{
    pub fn new(repo: Arc<U>, cache: ReadThroughCache, config: Arc<CommunityConfig>) -> Self {
        Self {
            repo,
            cache,
            config,
        }
    }

    pub async fn list(&self, page: &PageRequest) -> CommunityResult<Cached<Page<UserResponse>>> {
        let generation = self.cache.generation(USERS).await;
        let key = cache_keys::list(USERS, generation, page);

        self.cache
            .get_or_compute(&key, self.config.cache_ttl, || async {
                let rows = self.repo.page(page).await?;
                Ok::<_, CommunityError>(Page::from_lookahead(rows, page).map(UserResponse::from))
            })
            .await
    }

    pub async fn get(&self, user_id: &UserId) -> CommunityResult<Cached<UserResponse>> {
        let key = cache_keys::detail(USERS, user_id.as_uuid());

        self.cache
            .get_or_compute(&key, self.config.cache_ttl, || async {
                let user = self
                    .repo
                    .find_by_id(user_id)
                    .await?
                    .ok_or(CommunityError::UserNotFound)?;
                Ok::<_, CommunityError>(UserResponse::from(&user))
            })
            .await
    }

    pub async fn update_profile(
        &self,
        actor: &UserId,
        user_id: &UserId,
        input: ProfileInput,
    ) -> CommunityResult<UserResponse> {
        if actor != user_id {
            return Err(CommunityError::NotOwner(NOT_SELF));
        }
        let changes = input.validate()?;

        let mut user = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or(CommunityError::UserNotFound)?;

        if let Some(username) = &changes.username {
            let holder = self.repo.find_by_username(username).await?;
            if holder.is_some_and(|other| other.user_id != user.user_id) {
                return Err(CommunityError::UsernameTaken);
            }
        }

        user.apply_profile(changes);
        self.save(&user).await?;

        tracing::info!(user_id = %user.user_id, "Profile updated");

        self.refresh_cached(UserResponse::from(&user)).await
    }

    /// Replace the password and sign the user out everywhere.
    pub async fn update_password(
        &self,
        actor: &UserId,
        current_password: String,
        new_password: String,
    ) -> CommunityResult<()> {
        let mut user = self
            .repo
            .find_by_id(actor)
            .await?
            .ok_or(CommunityError::UserNotFound)?;

        let current = RawPassword::new(current_password)?;
        if !user.password.verify(current).await? {
            return Err(CommunityError::IncorrectPassword);
        }

        let new_password = RawPassword::new(new_password)?;
        let hashed = UserPassword::hash(new_password, self.config.password_cost).await?;
        user.set_password(hashed);
        self.save(&user).await?;

        let revoked = self.repo.revoke_all(&user.user_id).await?;

        tracing::info!(
            user_id = %user.user_id,
            sessions_revoked = revoked,
            "Password updated"
        );
        Ok(())
    }

    pub async fn update_academic_year(
        &self,
        actor: &UserId,
        user_id: &UserId,
        year: i64,
    ) -> CommunityResult<UserResponse> {
        if actor != user_id {
            return Err(CommunityError::NotOwner(NOT_SELF));
        }
        let year = AcademicYear::new(year)?;

        let mut user = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or(CommunityError::UserNotFound)?;

        user.set_academic_year(year);
        self.save(&user).await?;

        tracing::info!(user_id = %user.user_id, year = year.value(), "Academic year updated");

        self.refresh_cached(UserResponse::from(&user)).await
    }

    async fn save(&self, user: &User) -> CommunityResult<()> {
        self.repo.update(user).await.map_err(|e| match e {
            // Lost a race with another rename
            AuthError::UsernameTaken => CommunityError::UsernameTaken,
            other => other.into(),
        })
    }

    /// Write-through of the detail entry; list pages move to a new generation.
    async fn refresh_cached(&self, view: UserResponse) -> CommunityResult<UserResponse> {
        let key = cache_keys::detail(USERS, &view.id);
        self.cache.put(&key, self.config.cache_ttl, &view).await;
        self.cache.bump_generation(USERS).await;
        Ok(view)
    }
}
