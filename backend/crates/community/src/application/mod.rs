//! Application Layer
//!
//! Services behind the users, posts, comments and reactions endpoints. Reads
//! go through the read-through cache; writes update or retire the affected
//! entries.

pub mod cache_keys;
pub mod comments;
pub mod config;
pub mod posts;
pub mod reactions;
pub mod users;
pub mod views;

// Re-exports
pub use comments::CommentService;
pub use config::CommunityConfig;
pub use posts::{PostInput, PostService, PostUpdateInput};
pub use reactions::ReactionService;
pub use users::{ProfileInput, UserService};
pub use views::{CommentView, PostView, ReactionView};
