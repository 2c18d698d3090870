//! Domain Layer
//!
//! Posts, comments, reactions and the rules between them. Users belong to
//! the auth crate and are reused from there.

pub mod entity;
pub mod repository;
pub mod value_object;

pub use entity::{Comment, Post, Reaction, ReactionTarget, ToggleOutcome};
pub use repository::{CommentRepository, PostRepository, ReactionRepository};
