//! Value Object Module

pub mod post_type;
pub mod reaction_type;
pub mod text;

pub use kernel::id::{CommentId, PostId, ReactionId, UserId};
pub use post_type::PostType;
pub use reaction_type::ReactionType;
pub use text::{CommentContent, PostContent, PostTitle};
