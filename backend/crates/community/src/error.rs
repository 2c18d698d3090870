//! Community Error Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use auth::AuthError;
use kernel::error::conversions::classify_sqlx;
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::password::PasswordHashError;
use thiserror::Error;

pub type CommunityResult<T> = Result<T, CommunityError>;

#[derive(Debug, Error)]
pub enum CommunityError {
    #[error("User not found")]
    UserNotFound,

    #[error("Post not found")]
    PostNotFound,

    #[error("Comment not found")]
    CommentNotFound,

    #[error("Reaction not found")]
    ReactionNotFound,

    /// Caller tried to change something that belongs to someone else
    #[error("{0}")]
    NotOwner(&'static str),

    #[error("Username already exists")]
    UsernameTaken,

    /// Current password did not match on password change
    #[error("Incorrect credentials")]
    IncorrectPassword,

    #[error("Password hashing failed: {0}")]
    PasswordHash(#[from] PasswordHashError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Validation and other errors that already carry their kind
    #[error("{0}")]
    App(#[from] AppError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CommunityError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CommunityError::UserNotFound
            | CommunityError::PostNotFound
            | CommunityError::CommentNotFound
            | CommunityError::ReactionNotFound => ErrorKind::NotFound,
            CommunityError::NotOwner(_) | CommunityError::IncorrectPassword => {
                ErrorKind::Unauthorized
            }
            CommunityError::UsernameTaken => ErrorKind::Conflict,
            CommunityError::Auth(e) => e.kind(),
            CommunityError::App(e) => e.kind(),
            CommunityError::Database(e) => classify_sqlx(e).0,
            CommunityError::PasswordHash(_) | CommunityError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn into_app_error(self) -> AppError {
        match self {
            CommunityError::App(e) => e,
            CommunityError::Auth(e) => e.into_app_error(),
            CommunityError::Database(e) => AppError::from(e),
            CommunityError::PasswordHash(e) => {
                AppError::internal("Unexpected failure").with_source(e)
            }
            CommunityError::Internal(_) => AppError::internal("Unexpected failure"),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    fn log(&self) {
        match self {
            CommunityError::Database(e) => {
                tracing::error!(error = %e, "Community database error");
            }
            CommunityError::PasswordHash(e) => {
                tracing::error!(error = %e, "Password hashing failed");
            }
            CommunityError::Internal(msg) => {
                tracing::error!(message = %msg, "Community internal error");
            }
            CommunityError::NotOwner(what) => {
                tracing::warn!(reason = %what, "Ownership check failed");
            }
            CommunityError::IncorrectPassword => {
                tracing::warn!("Password change with wrong current password");
            }
            _ => {
                tracing::debug!(error = %self, "Community error");
            }
        }
    }
}

impl IntoResponse for CommunityError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}
