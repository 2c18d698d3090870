//! Community Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Posts, comments, reactions, repository traits
//! - `application/` - Cached services for users, posts, comments, reactions
//! - `infra/` - PostgreSQL implementations, generic soft-delete repository
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - User directory and self-service profile, password and academic-year edits
//! - Posts and comments with owner-only edits and soft deletes
//! - One reaction per user and target, toggled in a single transaction
//! - Cursor pagination on every listing
//!
//! ## Caching
//! Reads go through [`platform::cache::ReadThroughCache`] and report
//! `X-Cache: HIT|MISS`. Writes overwrite or drop the detail entry and bump the
//! namespace generation so no cached list page outlives a write.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::CommunityConfig;
pub use error::{CommunityError, CommunityResult};
pub use infra::postgres::PgCommunityRepository;
pub use presentation::handlers::CommunityAppState;
pub use presentation::router::{community_router, community_router_generic};
