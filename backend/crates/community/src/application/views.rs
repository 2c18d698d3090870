//! Read models
//!
//! What the services cache and the handlers return. Users reuse
//! `auth::UserResponse`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entity::{Comment, Post, Reaction};
use crate::domain::value_object::{PostType, ReactionType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: Option<String>,
    pub content: String,
    pub post_type: PostType,
    pub reaction_count: i32,
    pub comment_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Post> for PostView {
    fn from(post: &Post) -> Self {
        Self {
            id: *post.post_id.as_uuid(),
            user_id: *post.user_id.as_uuid(),
            title: post.title.as_ref().map(|t| t.as_str().to_string()),
            content: post.content.as_str().to_string(),
            post_type: post.post_type,
            reaction_count: post.reaction_count,
            comment_count: post.comment_count,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub reaction_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Comment> for CommentView {
    fn from(comment: &Comment) -> Self {
        Self {
            id: *comment.comment_id.as_uuid(),
            post_id: *comment.post_id.as_uuid(),
            user_id: *comment.user_id.as_uuid(),
            content: comment.content.as_str().to_string(),
            reaction_count: comment.reaction_count,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

/// Exactly one of `post_id` / `comment_id` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub post_id: Option<Uuid>,
    pub comment_id: Option<Uuid>,
    pub reaction_type: ReactionType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Reaction> for ReactionView {
    fn from(reaction: &Reaction) -> Self {
        Self {
            id: *reaction.reaction_id.as_uuid(),
            user_id: *reaction.user_id.as_uuid(),
            post_id: reaction.post_id().map(|id| id.into_uuid()),
            comment_id: reaction.comment_id().map(|id| id.into_uuid()),
            reaction_type: reaction.reaction_type,
            created_at: reaction.created_at,
            updated_at: reaction.updated_at,
        }
    }
}
