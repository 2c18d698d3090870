//! /reaction handlers

use axum::extract::State;

use auth::AuthUser;
use kernel::http::{JsonBody, PathId};
use kernel::id::markers::{Comment, Post, Reaction};
use kernel::pagination::PageRequest;
use kernel::response::ApiResponse;

use crate::application::{ReactionService, ReactionView};
use crate::domain::entity::ReactionTarget;
use crate::domain::repository::ReactionRepository;
use crate::error::CommunityResult;
use crate::presentation::dto::{ReactionRequest, ReactionsPage};
use crate::presentation::handlers::CommunityAppState;

fn service<R: ReactionRepository>(state: &CommunityAppState<R>) -> ReactionService<R> {
    ReactionService::new(state.repo.clone(), state.cache.clone(), state.config.clone())
}

/// POST /reaction/post/{id}
pub async fn react_to_post<R>(
    State(state): State<CommunityAppState<R>>,
    auth: AuthUser,
    PathId(post_id): PathId<Post>,
    JsonBody(req): JsonBody<ReactionRequest>,
) -> CommunityResult<ApiResponse<Option<ReactionView>>>
where
    R: ReactionRepository + Send + Sync + 'static,
{
    toggle(&state, &auth, ReactionTarget::Post(post_id), req).await
}

/// POST /reaction/comment/{id}
pub async fn react_to_comment<R>(
    State(state): State<CommunityAppState<R>>,
    auth: AuthUser,
    PathId(comment_id): PathId<Comment>,
    JsonBody(req): JsonBody<ReactionRequest>,
) -> CommunityResult<ApiResponse<Option<ReactionView>>>
where
    R: ReactionRepository + Send + Sync + 'static,
{
    toggle(&state, &auth, ReactionTarget::Comment(comment_id), req).await
}

/// Always 201; `data` is null when the toggle removed the reaction.
async fn toggle<R>(
    state: &CommunityAppState<R>,
    auth: &AuthUser,
    target: ReactionTarget,
    req: ReactionRequest,
) -> CommunityResult<ApiResponse<Option<ReactionView>>>
where
    R: ReactionRepository + Send + Sync + 'static,
{
    let outcome = service(state)
        .toggle(&auth.user_id, &target, &req.reaction_type)
        .await?;

    Ok(match outcome.reaction() {
        Some(reaction) => ApiResponse::created(
            "Reaction created successfully",
            Some(ReactionView::from(reaction)),
        ),
        None => ApiResponse::created("Reaction removed successfully", None),
    })
}

/// GET /reaction/post/{id}
pub async fn list_post_reactions<R>(
    State(state): State<CommunityAppState<R>>,
    PathId(post_id): PathId<Post>,
    page: PageRequest,
) -> CommunityResult<ApiResponse<ReactionsPage>>
where
    R: ReactionRepository + Send + Sync + 'static,
{
    list(&state, ReactionTarget::Post(post_id), page).await
}

/// GET /reaction/comment/{id}
pub async fn list_comment_reactions<R>(
    State(state): State<CommunityAppState<R>>,
    PathId(comment_id): PathId<Comment>,
    page: PageRequest,
) -> CommunityResult<ApiResponse<ReactionsPage>>
where
    R: ReactionRepository + Send + Sync + 'static,
{
    list(&state, ReactionTarget::Comment(comment_id), page).await
}

async fn list<R>(
    state: &CommunityAppState<R>,
    target: ReactionTarget,
    page: PageRequest,
) -> CommunityResult<ApiResponse<ReactionsPage>>
where
    R: ReactionRepository + Send + Sync + 'static,
{
    let cached = service(state).list_for_target(&target, &page).await?;
    Ok(
        ApiResponse::ok("Reactions retrieved successfully", ReactionsPage::from(cached.data))
            .cache_status(cached.cache),
    )
}

/// GET /reaction/{id}
pub async fn get_reaction<R>(
    State(state): State<CommunityAppState<R>>,
    PathId(reaction_id): PathId<Reaction>,
) -> CommunityResult<ApiResponse<ReactionView>>
where
    R: ReactionRepository + Send + Sync + 'static,
{
    let cached = service(&state).get(&reaction_id).await?;
    Ok(ApiResponse::ok("Reaction retrieved successfully", cached.data).cache_status(cached.cache))
}
