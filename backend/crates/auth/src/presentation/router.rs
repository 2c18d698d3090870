//! Auth Router

use axum::{Router, middleware::from_fn_with_state, routing::post};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AuthLayerState, require_auth};

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgAuthRepository, config: Arc<AuthConfig>) -> Router {
    auth_router_generic(repo, config)
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R>(repo: R, config: Arc<AuthConfig>) -> Router
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    let guard = AuthLayerState::new(config.clone());
    let state = AuthAppState::new(repo, config);

    Router::new()
        .route("/logout", post(handlers::logout::<R>))
        .route("/logout-all-devices", post(handlers::logout_all_devices::<R>))
        .route_layer(from_fn_with_state(guard, require_auth))
        .route("/sign-up", post(handlers::sign_up::<R>))
        .route("/login", post(handlers::login::<R>))
        .route("/refresh-token", post(handlers::refresh_token::<R>))
        .with_state(state)
}
