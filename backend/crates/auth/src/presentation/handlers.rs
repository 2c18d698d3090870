//! HTTP Handlers

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use kernel::error::app_error::AppError;
use kernel::http::JsonBody;
use kernel::response::ApiResponse;
use platform::cookie::{clear_cookie_header, extract_cookie, set_cookie_header};

use crate::application::config::{AuthConfig, REFRESH_TOKEN_COOKIE};
use crate::application::{
    RefreshUseCase, SessionTokens, SignInUseCase, SignOutUseCase, SignUpUseCase, TokenIssuer,
};
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    AccessTokenResponse, AuthResponse, LoginRequest, RefreshTokenRequest, SignUpRequest,
    UserResponse,
};
use crate::presentation::middleware::AuthUser;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub issuer: Arc<TokenIssuer>,
    pub config: Arc<AuthConfig>,
}

impl<R> AuthAppState<R>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: R, config: Arc<AuthConfig>) -> Self {
        Self {
            repo: Arc::new(repo),
            issuer: Arc::new(TokenIssuer::new(&config)),
            config,
        }
    }
}

// ============================================================================
// Sign Up / Login
// ============================================================================

/// POST /auth/sign-up
pub async fn sign_up<R>(
    State(state): State<AuthAppState<R>>,
    JsonBody(req): JsonBody<SignUpRequest>,
) -> AuthResult<Response>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.issuer.clone(),
        state.config.clone(),
    );

    let output = use_case.execute(req.into()).await?;

    Ok(session_response(
        &state.config,
        "Account created successfully",
        UserResponse::from(&output.user),
        output.tokens,
    ))
}

/// POST /auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> AuthResult<Response>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(state.repo.clone(), state.repo.clone(), state.issuer.clone());

    let output = use_case.execute(req.into()).await?;

    Ok(session_response(
        &state.config,
        "Logged in",
        UserResponse::from(&output.user),
        output.tokens,
    ))
}

/// Body carries the tokens, or in cookie mode two Set-Cookie headers do.
fn session_response(
    config: &AuthConfig,
    message: &'static str,
    user: UserResponse,
    tokens: SessionTokens,
) -> Response {
    if !config.cookie_mode {
        let body = AuthResponse {
            user,
            access_token: Some(tokens.access_token),
            refresh_token: Some(tokens.refresh_token),
        };
        return ApiResponse::created(message, body).into_response();
    }

    let body = AuthResponse {
        user,
        access_token: None,
        refresh_token: None,
    };
    let mut response = ApiResponse::created(message, body).into_response();
    append_cookie(
        response.headers_mut(),
        set_cookie_header(&config.access_cookie(), &tokens.access_token),
    );
    append_cookie(
        response.headers_mut(),
        set_cookie_header(&config.refresh_cookie(), &tokens.refresh_token),
    );
    response
}

// ============================================================================
// Logout
// ============================================================================

/// POST /auth/logout
pub async fn logout<R>(
    State(state): State<AuthAppState<R>>,
    auth: AuthUser,
    headers: HeaderMap,
    body: Bytes,
) -> AuthResult<Response>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    let refresh_token = refresh_token_from(&body, &headers, &state.config).ok_or_else(|| {
        AuthError::App(AppError::bad_request("refreshToken is required"))
    })?;

    let use_case = SignOutUseCase::new(state.repo.clone(), state.repo.clone());
    use_case.execute(&auth.user_id, &refresh_token).await?;

    Ok(signed_out_response(&state.config, "Logged out successfully"))
}

/// POST /auth/logout-all-devices
pub async fn logout_all_devices<R>(
    State(state): State<AuthAppState<R>>,
    auth: AuthUser,
) -> AuthResult<Response>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    let use_case = SignOutUseCase::new(state.repo.clone(), state.repo.clone());
    use_case.execute_all(&auth.user_id).await?;

    Ok(signed_out_response(
        &state.config,
        "Logged out from all devices successfully",
    ))
}

fn signed_out_response(config: &AuthConfig, message: &'static str) -> Response {
    let mut response = ApiResponse::created(message, ()).into_response();
    if config.cookie_mode {
        append_cookie(
            response.headers_mut(),
            clear_cookie_header(&config.access_cookie()),
        );
        append_cookie(
            response.headers_mut(),
            clear_cookie_header(&config.refresh_cookie()),
        );
    }
    response
}

// ============================================================================
// Refresh
// ============================================================================

/// POST /auth/refresh-token
pub async fn refresh_token<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    body: Bytes,
) -> AuthResult<Response>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    let refresh_token =
        refresh_token_from(&body, &headers, &state.config).ok_or(AuthError::Unauthorized)?;

    let use_case = RefreshUseCase::new(state.repo.clone(), state.issuer.clone());
    let access_token = use_case.execute(&refresh_token).await?;

    if !state.config.cookie_mode {
        return Ok(ApiResponse::created(
            "Access token refreshed successfully",
            AccessTokenResponse { access_token },
        )
        .into_response());
    }

    let mut response =
        ApiResponse::created("Access token refreshed successfully", ()).into_response();
    append_cookie(
        response.headers_mut(),
        set_cookie_header(&state.config.access_cookie(), &access_token),
    );
    Ok(response)
}

// ============================================================================
// Helpers
// ============================================================================

/// `refreshToken` from the JSON body, falling back to the cookie in cookie mode.
///
/// An empty or unparsable body counts as absent.
fn refresh_token_from(body: &[u8], headers: &HeaderMap, config: &AuthConfig) -> Option<String> {
    let from_body = if body.is_empty() {
        None
    } else {
        serde_json::from_slice::<RefreshTokenRequest>(body)
            .ok()
            .and_then(|req| req.refresh_token)
    };

    from_body
        .filter(|token| !token.is_empty())
        .or_else(|| {
            config
                .cookie_mode
                .then(|| extract_cookie(headers, REFRESH_TOKEN_COOKIE))
                .flatten()
        })
}

fn append_cookie(headers: &mut HeaderMap, value: Option<HeaderValue>) {
    match value {
        Some(value) => {
            headers.append(header::SET_COOKIE, value);
        }
        None => tracing::warn!("Dropping unrepresentable Set-Cookie value"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_token_from_body() {
        let config = AuthConfig::new("a", "b");
        let headers = HeaderMap::new();
        assert_eq!(
            refresh_token_from(br#"{"refreshToken":"r1"}"#, &headers, &config).as_deref(),
            Some("r1")
        );
        assert_eq!(refresh_token_from(b"", &headers, &config), None);
        assert_eq!(refresh_token_from(b"not json", &headers, &config), None);
    }

    #[test]
    fn test_refresh_token_cookie_fallback() {
        let mut config = AuthConfig::new("a", "b");
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("refreshToken=r2"));
        assert_eq!(refresh_token_from(b"{}", &headers, &config), None);

        config.cookie_mode = true;
        assert_eq!(
            refresh_token_from(b"{}", &headers, &config).as_deref(),
            Some("r2")
        );
        // Body wins over cookie
        assert_eq!(
            refresh_token_from(br#"{"refreshToken":"r1"}"#, &headers, &config).as_deref(),
            Some("r1")
        );
    }
}
