//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::cookie::CookieConfig;
use platform::password::HashCost;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Cookie carrying the access token in cookie mode
pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";

/// Cookie carrying the refresh token in cookie mode
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 secret for access tokens
    pub access_token_secret: String,
    /// HS256 secret for refresh tokens (must differ from the access secret)
    pub refresh_token_secret: String,
    /// Access token lifetime (15 minutes)
    pub access_token_ttl: Duration,
    /// Refresh token lifetime (7 days)
    pub refresh_token_ttl: Duration,
    /// Deliver tokens as httpOnly cookies instead of in the body
    pub cookie_mode: bool,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Work factor for new password hashes
    pub password_cost: HashCost,
}

impl AuthConfig {
    pub fn new(access_token_secret: impl Into<String>, refresh_token_secret: impl Into<String>) -> Self {
        Self {
            access_token_secret: access_token_secret.into(),
            refresh_token_secret: refresh_token_secret.into(),
            access_token_ttl: Duration::from_secs(15 * 60),
            refresh_token_ttl: Duration::from_secs(7 * 24 * 3600),
            cookie_mode: false,
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            password_cost: HashCost::default(),
        }
    }

    /// Config with fresh random secrets. Tokens do not survive a restart.
    pub fn with_random_secrets() -> Self {
        Self::new(
            platform::crypto::random_secret(32),
            platform::crypto::random_secret(32),
        )
    }

    /// Create config for development (random secrets, insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secrets()
        }
    }

    pub fn access_cookie(&self) -> CookieConfig {
        self.cookie(ACCESS_TOKEN_COOKIE, self.access_token_ttl)
    }

    pub fn refresh_cookie(&self) -> CookieConfig {
        self.cookie(REFRESH_TOKEN_COOKIE, self.refresh_token_ttl)
    }

    fn cookie(&self, name: &str, ttl: Duration) -> CookieConfig {
        CookieConfig::http_only(name, ttl.as_secs())
            .secure(self.cookie_secure)
            .same_site(self.cookie_same_site)
    }
}
