//! Post Entity

use chrono::{DateTime, Utc};
use kernel::pagination::Cursor;
use uuid::Uuid;

use crate::domain::value_object::{PostContent, PostId, PostTitle, PostType, UserId};

#[derive(Debug, Clone)]
pub struct Post {
    pub post_id: PostId,
    /// Author
    pub user_id: UserId,
    pub title: Option<PostTitle>,
    pub content: PostContent,
    pub post_type: PostType,
    pub reaction_count: i32,
    pub comment_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Validated create input.
#[derive(Debug)]
pub struct NewPost {
    pub title: Option<PostTitle>,
    pub content: PostContent,
    pub post_type: PostType,
}

/// Validated edit. `None` keeps the current value.
#[derive(Debug, Default)]
pub struct PostChanges {
    pub title: Option<PostTitle>,
    pub content: Option<PostContent>,
    pub post_type: Option<PostType>,
}

impl Post {
    pub fn new(author: UserId, fields: NewPost) -> Self {
        let now = Utc::now();

        Self {
            post_id: PostId::new(),
            user_id: author,
            title: fields.title,
            content: fields.content,
            post_type: fields.post_type,
            reaction_count: 0,
            comment_count: 0,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        self.user_id == *user_id
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn apply(&mut self, changes: PostChanges) {
        if let Some(title) = changes.title {
            self.title = Some(title);
        }
        if let Some(content) = changes.content {
            self.content = content;
        }
        if let Some(post_type) = changes.post_type {
            self.post_type = post_type;
        }
        self.updated_at = Utc::now();
    }
}

impl Cursor for Post {
    fn cursor(&self) -> Uuid {
        *self.post_id.as_uuid()
    }
}
