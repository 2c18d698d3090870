//! Free-text fields of posts and comments.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

pub const TITLE_MAX_LENGTH: usize = 150;
pub const POST_CONTENT_MIN_LENGTH: usize = 10;
pub const COMMENT_MAX_LENGTH: usize = 2000;

/// Optional post title, at most 150 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostTitle(String);

impl PostTitle {
    /// Blank titles are treated as absent.
    pub fn parse(raw: Option<String>) -> AppResult<Option<Self>> {
        let Some(raw) = raw else {
            return Ok(None);
        };
        let title = raw.trim();
        if title.is_empty() {
            return Ok(None);
        }
        if title.chars().count() > TITLE_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Title cannot exceed {} characters",
                TITLE_MAX_LENGTH
            )));
        }
        Ok(Some(Self(title.to_string())))
    }

    pub fn from_db(title: String) -> Self {
        Self(title)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Post body, at least 10 characters after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostContent(String);

impl PostContent {
    pub fn new(raw: impl AsRef<str>) -> AppResult<Self> {
        let content = raw.as_ref().trim();
        if content.is_empty() {
            return Err(AppError::bad_request("Content is required"));
        }
        if content.chars().count() < POST_CONTENT_MIN_LENGTH {
            return Err(AppError::bad_request(format!(
                "Content must be at least {} characters long",
                POST_CONTENT_MIN_LENGTH
            )));
        }
        Ok(Self(content.to_string()))
    }

    pub fn from_db(content: String) -> Self {
        Self(content)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Comment body: non-empty, at most 2000 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentContent(String);

impl CommentContent {
    pub fn new(raw: impl AsRef<str>) -> AppResult<Self> {
        let content = raw.as_ref().trim();
        if content.is_empty() {
            return Err(AppError::bad_request("Comment content is required"));
        }
        if content.chars().count() > COMMENT_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Comment cannot exceed {} characters",
                COMMENT_MAX_LENGTH
            )));
        }
        Ok(Self(content.to_string()))
    }

    pub fn from_db(content: String) -> Self {
        Self(content)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
