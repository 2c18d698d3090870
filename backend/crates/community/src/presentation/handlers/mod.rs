//! HTTP Handlers

pub mod comments;
pub mod posts;
pub mod reactions;
pub mod users;

use std::sync::Arc;

use platform::cache::ReadThroughCache;

use crate::application::config::CommunityConfig;

/// Shared state for community handlers. `R` is whichever repository the
/// router's endpoints need.
pub struct CommunityAppState<R> {
    pub repo: Arc<R>,
    pub cache: ReadThroughCache,
    pub config: Arc<CommunityConfig>,
}

impl<R> CommunityAppState<R> {
    pub fn new(repo: R, cache: ReadThroughCache, config: Arc<CommunityConfig>) -> Self {
        Self {
            repo: Arc::new(repo),
            cache,
            config,
        }
    }
}

// Manual impl: `R` itself need not be Clone behind the Arc
impl<R> Clone for CommunityAppState<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            cache: self.cache.clone(),
            config: self.config.clone(),
        }
    }
}
