//! /post handlers

use axum::extract::State;

use auth::AuthUser;
use kernel::http::{JsonBody, PathId};
use kernel::id::markers::Post;
use kernel::pagination::PageRequest;
use kernel::response::ApiResponse;

use crate::application::{PostService, PostView};
use crate::domain::repository::PostRepository;
use crate::error::CommunityResult;
use crate::presentation::dto::{CreatePostRequest, PostsPage, UpdatePostRequest};
use crate::presentation::handlers::CommunityAppState;

fn service<R: PostRepository>(state: &CommunityAppState<R>) -> PostService<R> {
    PostService::new(state.repo.clone(), state.cache.clone(), state.config.clone())
}

/// GET /post
pub async fn list_posts<R>(
    State(state): State<CommunityAppState<R>>,
    page: PageRequest,
) -> CommunityResult<ApiResponse<PostsPage>>
where
    R: PostRepository + Send + Sync + 'static,
{
    let cached = service(&state).list(&page).await?;
    Ok(ApiResponse::ok("Posts retrieved successfully", PostsPage::from(cached.data))
        .cache_status(cached.cache))
}

/// GET /post/{id}
pub async fn get_post<R>(
    State(state): State<CommunityAppState<R>>,
    PathId(post_id): PathId<Post>,
) -> CommunityResult<ApiResponse<PostView>>
where
    R: PostRepository + Send + Sync + 'static,
{
    let cached = service(&state).get(&post_id).await?;
    Ok(ApiResponse::ok("Post retrieved successfully", cached.data).cache_status(cached.cache))
}

/// POST /post
pub async fn create_post<R>(
    State(state): State<CommunityAppState<R>>,
    auth: AuthUser,
    JsonBody(req): JsonBody<CreatePostRequest>,
) -> CommunityResult<ApiResponse<PostView>>
where
    R: PostRepository + Send + Sync + 'static,
{
    let post = service(&state).create(&auth.user_id, req.into()).await?;
    Ok(ApiResponse::created("Post created successfully", post))
}

/// PUT /post/{id}
pub async fn update_post<R>(
    State(state): State<CommunityAppState<R>>,
    auth: AuthUser,
    PathId(post_id): PathId<Post>,
    JsonBody(req): JsonBody<UpdatePostRequest>,
) -> CommunityResult<ApiResponse<PostView>>
where
    R: PostRepository + Send + Sync + 'static,
{
    let post = service(&state)
        .update(&auth.user_id, &post_id, req.into())
        .await?;
    Ok(ApiResponse::ok("Post updated successfully", post))
}

/// DELETE /post/{id}
pub async fn delete_post<R>(
    State(state): State<CommunityAppState<R>>,
    auth: AuthUser,
    PathId(post_id): PathId<Post>,
) -> CommunityResult<ApiResponse<()>>
where
    R: PostRepository + Send + Sync + 'static,
{
    service(&state).delete(&auth.user_id, &post_id).await?;
    Ok(ApiResponse::ok("Post deleted successfully", ()))
}
