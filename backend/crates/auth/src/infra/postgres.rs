//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::error::conversions::unique_violation;
use kernel::pagination::PageRequest;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{RefreshToken, User};
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::domain::value_object::{
    AcademicYear, Bio, Email, PersonName, UserId, UserPassword, Username,
};
use crate::error::{AuthError, AuthResult};

/// Unique constraint on `users.email`
const EMAIL_CONSTRAINT: &str = "users_email_key";

/// Unique constraint on `users.username`
const USERNAME_CONSTRAINT: &str = "users_username_key";

const USER_COLUMNS: &str = r#"
    id,
    email,
    username,
    password_hash,
    first_name,
    last_name,
    bio,
    academic_year,
    profile_photo,
    created_at,
    updated_at
"#;

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_user_where(&self, column: &str, value: &str) -> AuthResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        row.map(UserRow::into_user).transpose()
    }
}

/// Map a unique violation on `users` to the matching domain error.
fn map_user_write_error(err: sqlx::Error) -> AuthError {
    match unique_violation(&err) {
        Some(EMAIL_CONSTRAINT) => AuthError::EmailTaken,
        Some(USERNAME_CONSTRAINT) => AuthError::UsernameTaken,
        _ => AuthError::Database(err),
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id,
                email,
                username,
                password_hash,
                first_name,
                last_name,
                bio,
                academic_year,
                profile_photo,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.email.as_str())
        .bind(user.username.as_str())
        .bind(user.password.as_phc_string())
        .bind(user.first_name.as_str())
        .bind(user.last_name.as_str())
        .bind(user.bio.as_ref().map(Bio::as_str))
        .bind(user.academic_year.map(|year| year.value()))
        .bind(user.profile_photo.as_deref())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_user_write_error)?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        self.find_user_where("email", email.as_str()).await
    }

    async fn find_by_username(&self, username: &Username) -> AuthResult<Option<User>> {
        self.find_user_where("username", username.as_str()).await
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn exists_by_username(&self, username: &Username) -> AuthResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)",
        )
        .bind(username.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn update(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE users SET
                username = $2,
                password_hash = $3,
                first_name = $4,
                last_name = $5,
                bio = $6,
                academic_year = $7,
                profile_photo = $8,
                updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.username.as_str())
        .bind(user.password.as_phc_string())
        .bind(user.first_name.as_str())
        .bind(user.last_name.as_str())
        .bind(user.bio.as_ref().map(Bio::as_str))
        .bind(user.academic_year.map(|year| year.value()))
        .bind(user.profile_photo.as_deref())
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_user_write_error)?;

        Ok(())
    }

    async fn page(&self, page: &PageRequest) -> AuthResult<Vec<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE ($1::uuid IS NULL OR id >= $1) \
             ORDER BY id ASC LIMIT $2"
        );
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(page.cursor())
            .bind(page.fetch_limit())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(UserRow::into_user).collect()
    }
}

// ============================================================================
// Refresh Token Repository Implementation
// ============================================================================

impl RefreshTokenRepository for PgAuthRepository {
    async fn record(&self, token: &RefreshToken) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (
                token_digest,
                user_id,
                expires_at,
                created_at
            ) VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&token.token_digest)
        .bind(token.user_id.as_uuid())
        .bind(token.expires_at)
        .bind(token.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_active(
        &self,
        token_digest: &str,
        now: DateTime<Utc>,
    ) -> AuthResult<Option<RefreshToken>> {
        let row = sqlx::query_as::<_, RefreshTokenRow>(
            r#"
            SELECT
                token_digest,
                user_id,
                expires_at,
                created_at
            FROM refresh_tokens
            WHERE token_digest = $1 AND expires_at > $2
            "#,
        )
        .bind(token_digest)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(RefreshTokenRow::into_token))
    }

    async fn revoke(&self, user_id: &UserId, token_digest: &str) -> AuthResult<bool> {
        let deleted =
            sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1 AND token_digest = $2")
                .bind(user_id.as_uuid())
                .bind(token_digest)
                .execute(&self.pool)
                .await?
                .rows_affected();

        Ok(deleted > 0)
    }

    async fn revoke_all(&self, user_id: &UserId) -> AuthResult<u64> {
        let deleted = sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted)
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let deleted = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at <= now()")
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(tokens_deleted = deleted, "Cleaned up expired refresh tokens");

        Ok(deleted)
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    username: String,
    password_hash: String,
    first_name: String,
    last_name: String,
    bio: Option<String>,
    academic_year: Option<i16>,
    profile_photo: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let password = UserPassword::from_phc_string(self.password_hash)
            .map_err(|e| AuthError::Internal(format!("Invalid password hash: {}", e)))?;

        Ok(User {
            user_id: UserId::from_uuid(self.id),
            email: Email::from_db(self.email),
            username: Username::from_db(self.username),
            password,
            first_name: PersonName::from_db(self.first_name),
            last_name: PersonName::from_db(self.last_name),
            bio: self.bio.map(Bio::from_db),
            academic_year: self.academic_year.map(AcademicYear::from_db),
            profile_photo: self.profile_photo,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct RefreshTokenRow {
    token_digest: String,
    user_id: Uuid,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl RefreshTokenRow {
    fn into_token(self) -> RefreshToken {
        RefreshToken {
            token_digest: self.token_digest,
            user_id: UserId::from_uuid(self.user_id),
            expires_at: self.expires_at,
            created_at: self.created_at,
        }
    }
}
