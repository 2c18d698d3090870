//! Environment configuration
//!
//! Read once at startup, after `.env` has been loaded.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, bail};
use auth::AuthConfig;
use community::CommunityConfig;
use platform::password::HashCost;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_HASH_ROUNDS: u32 = 10;
const DEFAULT_CACHE_TTL_SECS: u64 = 30 * 60;
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub database_url: String,
    /// No Redis means a process-local cache
    pub redis_url: Option<String>,
    pub port: u16,
    pub frontend_origins: Vec<String>,
    pub cache_ttl: Duration,
    pub auth: AuthConfig,
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let redis_url = optional("REDIS_URL");

        let port = parsed("PORT", DEFAULT_PORT)?;
        let rounds = parsed("PASSWORD_HASHING_ROUNDS", DEFAULT_HASH_ROUNDS)?;
        let cache_ttl = Duration::from_secs(parsed("CACHE_TTL_SECONDS", DEFAULT_CACHE_TTL_SECS)?);
        let cookie_mode = parsed("IS_HTTP_COOKIE", false)?;

        let frontend_origins = optional("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        if optional("SWAGGER_ENDPOINT").is_some() {
            tracing::debug!("SWAGGER_ENDPOINT is set but API docs are not served");
        }

        let mut auth = token_secrets()?;
        auth.cookie_mode = cookie_mode;
        auth.password_cost = HashCost::from_rounds(rounds);

        Ok(Self {
            database_url,
            redis_url,
            port,
            frontend_origins,
            cache_ttl,
            auth,
        })
    }

    pub fn community(&self) -> CommunityConfig {
        CommunityConfig {
            cache_ttl: self.cache_ttl,
            password_cost: self.auth.password_cost,
        }
    }
}

/// Both secrets are required in release builds. Debug builds fall back to
/// random ones, which log everyone out on restart.
fn token_secrets() -> anyhow::Result<AuthConfig> {
    match (
        optional("ACCESS_TOKEN_SECRET_KEY"),
        optional("REFRESH_TOKEN_SECRET_KEY"),
    ) {
        (Some(access), Some(refresh)) => {
            if access == refresh {
                bail!("ACCESS_TOKEN_SECRET_KEY and REFRESH_TOKEN_SECRET_KEY must differ");
            }
            let mut config = AuthConfig::new(access, refresh);
            config.cookie_secure = !cfg!(debug_assertions);
            Ok(config)
        }
        _ if cfg!(debug_assertions) => {
            tracing::warn!("Token secrets not set, using random development secrets");
            Ok(AuthConfig::development())
        }
        _ => bail!("ACCESS_TOKEN_SECRET_KEY and REFRESH_TOKEN_SECRET_KEY must be set"),
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parsed<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional(key) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw}")),
        None => Ok(default),
    }
}
