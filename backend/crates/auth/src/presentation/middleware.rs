//! Auth Middleware
//!
//! Access tokens are checked by signature and expiry only, so the guard
//! needs no repository.

use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::HeaderMap;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, HeaderMapExt};

use crate::application::config::{ACCESS_TOKEN_COOKIE, AuthConfig};
use crate::application::token::TokenIssuer;
use crate::domain::value_object::UserId;
use crate::error::AuthError;

/// State for [`require_auth`]
#[derive(Clone)]
pub struct AuthLayerState {
    pub issuer: Arc<TokenIssuer>,
    pub config: Arc<AuthConfig>,
}

impl AuthLayerState {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self {
            issuer: Arc::new(TokenIssuer::new(&config)),
            config,
        }
    }
}

/// Caller identity, available to handlers behind [`require_auth`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: UserId,
}

/// Reject requests without a valid access token.
///
/// The token comes from `Authorization: Bearer`, or in cookie mode from the
/// `accessToken` cookie.
pub async fn require_auth(
    State(state): State<AuthLayerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = access_token(req.headers(), &state.config).ok_or_else(|| {
        tracing::debug!("No access token on request");
        AuthError::Unauthorized
    })?;

    let claims = state.issuer.verify_access_token(&token)?;

    req.extensions_mut().insert(AuthUser {
        user_id: claims.user_id(),
    });

    Ok(next.run(req).await)
}

fn access_token(headers: &HeaderMap, config: &AuthConfig) -> Option<String> {
    if let Some(Authorization(bearer)) = headers.typed_get::<Authorization<Bearer>>() {
        return Some(bearer.token().to_string());
    }

    if config.cookie_mode {
        return platform::cookie::extract_cookie(headers, ACCESS_TOKEN_COOKIE);
    }

    None
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or(AuthError::Unauthorized)
    }
}
