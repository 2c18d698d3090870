//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Users, refresh tokens, repository traits
//! - `application/` - Use cases, JWT issuance, refresh-token ledger
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router, auth guard
//!
//! ## Features
//! - Sign-up and login with email + password
//! - Short-lived access tokens and long-lived refresh tokens (HS256 JWT)
//! - Logout from one device or all devices
//! - Tokens returned in the body, or as HttpOnly cookies in cookie mode
//!
//! ## Security Model
//! - Passwords hashed with Argon2id
//! - Access and refresh tokens signed with separate secrets
//! - Refresh tokens stored as SHA-256 digests; a token missing from the
//!   ledger is rejected even while its signature is still valid

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::token::TokenIssuer;
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAuthRepository;
pub use presentation::dto::UserResponse;
pub use presentation::middleware::{AuthLayerState, AuthUser, require_auth};
pub use presentation::router::{auth_router, auth_router_generic};

pub mod store {
    pub use crate::domain::repository::{RefreshTokenRepository, UserRepository};
}
