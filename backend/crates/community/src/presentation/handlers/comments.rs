//! /comment handlers

use axum::extract::State;

use auth::AuthUser;
use kernel::http::{JsonBody, PathId};
use kernel::id::markers::{Comment, Post};
use kernel::pagination::PageRequest;
use kernel::response::ApiResponse;

use crate::application::{CommentService, CommentView};
use crate::domain::repository::{CommentRepository, PostRepository};
use crate::error::CommunityResult;
use crate::presentation::dto::{CommentRequest, CommentsPage};
use crate::presentation::handlers::CommunityAppState;

fn service<R>(state: &CommunityAppState<R>) -> CommentService<R>
where
    R: PostRepository + CommentRepository,
{
    CommentService::new(state.repo.clone(), state.cache.clone(), state.config.clone())
}

/// GET /comment/post/{id}/comments
pub async fn list_post_comments<R>(
    State(state): State<CommunityAppState<R>>,
    PathId(post_id): PathId<Post>,
    page: PageRequest,
) -> CommunityResult<ApiResponse<CommentsPage>>
where
    R: PostRepository + CommentRepository + Send + Sync + 'static,
{
    let cached = service(&state).list_for_post(&post_id, &page).await?;
    Ok(
        ApiResponse::ok("Comments retrieved successfully", CommentsPage::from(cached.data))
            .cache_status(cached.cache),
    )
}

/// GET /comment/{id}
pub async fn get_comment<R>(
    State(state): State<CommunityAppState<R>>,
    PathId(comment_id): PathId<Comment>,
) -> CommunityResult<ApiResponse<CommentView>>
where
    R: PostRepository + CommentRepository + Send + Sync + 'static,
{
    let cached = service(&state).get(&comment_id).await?;
    Ok(ApiResponse::ok("Comment retrieved successfully", cached.data).cache_status(cached.cache))
}

/// POST /comment/{id}, where `id` is the post being commented on
pub async fn create_comment<R>(
    State(state): State<CommunityAppState<R>>,
    auth: AuthUser,
    PathId(post_id): PathId<Post>,
    JsonBody(req): JsonBody<CommentRequest>,
) -> CommunityResult<ApiResponse<CommentView>>
where
    R: PostRepository + CommentRepository + Send + Sync + 'static,
{
    let comment = service(&state)
        .create(&auth.user_id, &post_id, req.content)
        .await?;
    Ok(ApiResponse::created("Comment created successfully", comment))
}

/// PUT /comment/{id}
pub async fn update_comment<R>(
    State(state): State<CommunityAppState<R>>,
    auth: AuthUser,
    PathId(comment_id): PathId<Comment>,
    JsonBody(req): JsonBody<CommentRequest>,
) -> CommunityResult<ApiResponse<CommentView>>
where
    R: PostRepository + CommentRepository + Send + Sync + 'static,
{
    let comment = service(&state)
        .update(&auth.user_id, &comment_id, req.content)
        .await?;
    Ok(ApiResponse::ok("Comment updated successfully", comment))
}

/// DELETE /comment/{id}
pub async fn delete_comment<R>(
    State(state): State<CommunityAppState<R>>,
    auth: AuthUser,
    PathId(comment_id): PathId<Comment>,
) -> CommunityResult<ApiResponse<()>>
where
    R: PostRepository + CommentRepository + Send + Sync + 'static,
{
    service(&state).delete(&auth.user_id, &comment_id).await?;
    Ok(ApiResponse::ok("Comment deleted successfully", ()))
}
