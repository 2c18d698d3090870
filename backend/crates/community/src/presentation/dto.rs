//! Request/Response DTOs

use auth::UserResponse;
use kernel::pagination::{Page, PageInfo};
use serde::{Deserialize, Serialize};

use crate::application::{
    CommentView, PostInput, PostUpdateInput, PostView, ProfileInput, ReactionView,
};

// ============================================================================
// Users
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub bio: Option<String>,
    pub profile_photo: Option<String>,
}

impl From<UpdateUserRequest> for ProfileInput {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            username: req.username,
            bio: req.bio,
            profile_photo: req.profile_photo,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicYearRequest {
    pub academic_year: i64,
}

// ============================================================================
// Posts / Comments / Reactions
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub content: String,
    pub post_type: Option<String>,
}

impl From<CreatePostRequest> for PostInput {
    fn from(req: CreatePostRequest) -> Self {
        Self {
            title: req.title,
            content: req.content,
            post_type: req.post_type,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub post_type: Option<String>,
}

impl From<UpdatePostRequest> for PostUpdateInput {
    fn from(req: UpdatePostRequest) -> Self {
        Self {
            title: req.title,
            content: req.content,
            post_type: req.post_type,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub content: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionRequest {
    pub reaction_type: String,
}

// ============================================================================
// Listings
// ============================================================================

#[derive(Debug, Serialize)]
pub struct UsersPage {
    pub users: Vec<UserResponse>,
    pub pagination: PageInfo,
}

impl From<Page<UserResponse>> for UsersPage {
    fn from(page: Page<UserResponse>) -> Self {
        Self {
            pagination: page.info(),
            users: page.items,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostsPage {
    pub posts: Vec<PostView>,
    pub pagination: PageInfo,
}

impl From<Page<PostView>> for PostsPage {
    fn from(page: Page<PostView>) -> Self {
        Self {
            pagination: page.info(),
            posts: page.items,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommentsPage {
    pub comments: Vec<CommentView>,
    pub pagination: PageInfo,
}

impl From<Page<CommentView>> for CommentsPage {
    fn from(page: Page<CommentView>) -> Self {
        Self {
            pagination: page.info(),
            comments: page.items,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReactionsPage {
    pub reactions: Vec<ReactionView>,
    pub pagination: PageInfo,
}

impl From<Page<ReactionView>> for ReactionsPage {
    fn from(page: Page<ReactionView>) -> Self {
        Self {
            pagination: page.info(),
            reactions: page.items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_update_password_request_field_names() {
        let req: UpdatePasswordRequest = serde_json::from_str(
            r#"{"currentPassword":"old-secret","newPassword":"new-secret"}"#,
        )
        .unwrap();
        assert_eq!(req.current_password, "old-secret");
        assert_eq!(req.new_password, "new-secret");
    }

    #[test]
    fn test_create_post_request_optional_fields() {
        let req: CreatePostRequest =
            serde_json::from_str(r#"{"content":"Long enough content"}"#).unwrap();
        assert!(req.title.is_none());
        assert!(req.post_type.is_none());
    }

    #[test]
    fn test_listing_shape() {
        let page: Page<ReactionView> = Page {
            items: Vec::new(),
            has_next_page: true,
            next_cursor: Some(Uuid::from_u128(3)),
        };
        let json = serde_json::to_value(ReactionsPage::from(page)).unwrap();

        assert!(json["reactions"].is_array());
        assert_eq!(json["pagination"]["hasNextPage"], true);
        assert_eq!(json["pagination"]["nextCursor"], Uuid::from_u128(3).to_string());
        assert_eq!(json["pagination"]["count"], 0);
    }
}
