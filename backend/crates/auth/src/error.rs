//! Auth Error Types
//!
//! Auth-specific variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::conversions::classify_sqlx;
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::password::PasswordHashError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("User with this email already exists")]
    EmailTaken,

    #[error("User with this username already exists")]
    UsernameTaken,

    #[error("User not found")]
    UserNotFound,

    /// Wrong password. Deliberately vague.
    #[error("Incorrect credentials")]
    InvalidCredentials,

    /// Missing, malformed, expired or revoked token
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Refresh token not found")]
    RefreshTokenNotFound,

    #[error("No active sessions found")]
    NoActiveSessions,

    #[error("Failed to sign token")]
    TokenSigning(#[source] jsonwebtoken::errors::Error),

    #[error("Password hashing failed: {0}")]
    PasswordHash(#[from] PasswordHashError),

    /// Validation and other errors that already carry their kind
    #[error("{0}")]
    App(#[from] AppError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::EmailTaken | AuthError::UsernameTaken => ErrorKind::Conflict,
            AuthError::UserNotFound
            | AuthError::RefreshTokenNotFound
            | AuthError::NoActiveSessions => ErrorKind::NotFound,
            AuthError::InvalidCredentials | AuthError::Unauthorized => ErrorKind::Unauthorized,
            AuthError::App(e) => e.kind(),
            AuthError::Database(e) => classify_sqlx(e).0,
            AuthError::TokenSigning(_) | AuthError::PasswordHash(_) | AuthError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Convert to AppError, keeping the original error as the source.
    pub fn into_app_error(self) -> AppError {
        match self {
            AuthError::App(e) => e,
            AuthError::Database(e) => AppError::from(e),
            AuthError::TokenSigning(e) => AppError::internal("Failed to sign token").with_source(e),
            AuthError::PasswordHash(e) => AppError::internal("Unexpected failure").with_source(e),
            AuthError::Internal(_) => AppError::internal("Unexpected failure"),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::TokenSigning(e) => {
                tracing::error!(error = %e, "Token signing failed");
            }
            AuthError::PasswordHash(e) => {
                tracing::error!(error = %e, "Password hashing failed");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::Unauthorized => {
                tracing::warn!("Rejected token");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}
