//! Comment Entity

use chrono::{DateTime, Utc};
use kernel::pagination::Cursor;
use uuid::Uuid;

use crate::domain::value_object::{CommentContent, CommentId, PostId, UserId};

#[derive(Debug, Clone)]
pub struct Comment {
    pub comment_id: CommentId,
    pub post_id: PostId,
    pub user_id: UserId,
    pub content: CommentContent,
    pub reaction_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Comment {
    pub fn new(post_id: PostId, author: UserId, content: CommentContent) -> Self {
        let now = Utc::now();

        Self {
            comment_id: CommentId::new(),
            post_id,
            user_id: author,
            content,
            reaction_count: 0,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        self.user_id == *user_id
    }

    pub fn edit(&mut self, content: CommentContent) {
        self.content = content;
        self.updated_at = Utc::now();
    }
}

impl Cursor for Comment {
    fn cursor(&self) -> Uuid {
        *self.comment_id.as_uuid()
    }
}
