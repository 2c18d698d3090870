//! Application Configuration

use std::time::Duration;

use platform::cache::DEFAULT_CACHE_TTL;
use platform::password::HashCost;

/// Community application configuration
#[derive(Debug, Clone)]
pub struct CommunityConfig {
    /// Lifetime of cached reads
    pub cache_ttl: Duration,
    /// Work factor for hashes written on password change
    pub password_cost: HashCost,
}

impl Default for CommunityConfig {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_CACHE_TTL,
            password_cost: HashCost::default(),
        }
    }
}

impl CommunityConfig {
    pub fn development() -> Self {
        Self {
            cache_ttl: Duration::from_secs(60),
            ..Self::default()
        }
    }
}
