pub mod comment;
pub mod post;
pub mod reaction;

pub use comment::Comment;
pub use post::{NewPost, Post, PostChanges};
pub use reaction::{Reaction, ReactionTarget, ToggleAction, ToggleOutcome};
