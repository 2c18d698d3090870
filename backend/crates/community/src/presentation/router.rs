//! Community Router
//!
//! Every endpoint requires a valid access token.

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, put},
};
use std::sync::Arc;

use auth::store::{RefreshTokenRepository, UserRepository};
use auth::{AuthConfig, AuthLayerState, PgAuthRepository, require_auth};
use platform::cache::ReadThroughCache;

use crate::application::config::CommunityConfig;
use crate::domain::repository::{CommentRepository, PostRepository, ReactionRepository};
use crate::infra::postgres::PgCommunityRepository;
use crate::presentation::handlers::{CommunityAppState, comments, posts, reactions, users};

/// Mounts `/user`, `/post`, `/comment` and `/reaction` over PostgreSQL.
pub fn community_router(
    users: PgAuthRepository,
    repo: PgCommunityRepository,
    cache: ReadThroughCache,
    config: Arc<CommunityConfig>,
    auth_config: Arc<AuthConfig>,
) -> Router {
    community_router_generic(users, repo, cache, config, auth_config)
}

/// Same as [`community_router`] for any repository implementations
pub fn community_router_generic<U, R>(
    users: U,
    repo: R,
    cache: ReadThroughCache,
    config: Arc<CommunityConfig>,
    auth_config: Arc<AuthConfig>,
) -> Router
where
    U: UserRepository + RefreshTokenRepository + Send + Sync + 'static,
    R: PostRepository + CommentRepository + ReactionRepository + Send + Sync + 'static,
{
    let guard = AuthLayerState::new(auth_config);
    let user_state = CommunityAppState::new(users, cache.clone(), config.clone());
    let content_state = CommunityAppState::new(repo, cache, config);

    Router::new()
        .nest("/user", user_routes(user_state))
        .nest("/post", post_routes(content_state.clone()))
        .nest("/comment", comment_routes(content_state.clone()))
        .nest("/reaction", reaction_routes(content_state))
        .route_layer(from_fn_with_state(guard, require_auth))
}

fn user_routes<U>(state: CommunityAppState<U>) -> Router
where
    U: UserRepository + RefreshTokenRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(users::list_users::<U>))
        .route("/update-password", put(users::update_password::<U>))
        .route("/academic-year/{id}", put(users::update_academic_year::<U>))
        .route(
            "/{id}",
            get(users::get_user::<U>).put(users::update_user::<U>),
        )
        .with_state(state)
}

fn post_routes<R>(state: CommunityAppState<R>) -> Router
where
    R: PostRepository + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/",
            get(posts::list_posts::<R>).post(posts::create_post::<R>),
        )
        .route(
            "/{id}",
            get(posts::get_post::<R>)
                .put(posts::update_post::<R>)
                .delete(posts::delete_post::<R>),
        )
        .with_state(state)
}

fn comment_routes<R>(state: CommunityAppState<R>) -> Router
where
    R: PostRepository + CommentRepository + Send + Sync + 'static,
{
    // POST /{id} takes a post id, the other methods a comment id
    Router::new()
        .route("/post/{id}/comments", get(comments::list_post_comments::<R>))
        .route(
            "/{id}",
            get(comments::get_comment::<R>)
                .post(comments::create_comment::<R>)
                .put(comments::update_comment::<R>)
                .delete(comments::delete_comment::<R>),
        )
        .with_state(state)
}

fn reaction_routes<R>(state: CommunityAppState<R>) -> Router
where
    R: ReactionRepository + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/post/{id}",
            get(reactions::list_post_reactions::<R>).post(reactions::react_to_post::<R>),
        )
        .route(
            "/comment/{id}",
            get(reactions::list_comment_reactions::<R>)
                .post(reactions::react_to_comment::<R>),
        )
        .route("/{id}", get(reactions::get_reaction::<R>))
        .with_state(state)
}
