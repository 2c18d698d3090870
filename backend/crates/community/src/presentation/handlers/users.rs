//! /user handlers

use axum::extract::State;

use auth::store::{RefreshTokenRepository, UserRepository};
use auth::{AuthUser, UserResponse};
use kernel::http::{JsonBody, PathId};
use kernel::id::markers::User;
use kernel::pagination::PageRequest;
use kernel::response::ApiResponse;

use crate::application::UserService;
use crate::error::CommunityResult;
use crate::presentation::dto::{
    AcademicYearRequest, UpdatePasswordRequest, UpdateUserRequest, UsersPage,
};
use crate::presentation::handlers::CommunityAppState;

fn service<U>(state: &CommunityAppState<U>) -> UserService<U>
where
    U: UserRepository + RefreshTokenRepository,
{
    UserService::new(state.repo.clone(), state.cache.clone(), state.config.clone())
}

/// GET /user
pub async fn list_users<U>(
    State(state): State<CommunityAppState<U>>,
    page: PageRequest,
) -> CommunityResult<ApiResponse<UsersPage>>
where
    U: UserRepository + RefreshTokenRepository + Send + Sync + 'static,
{
    let cached = service(&state).list(&page).await?;
    Ok(ApiResponse::ok("users retrieved successfully", UsersPage::from(cached.data))
        .cache_status(cached.cache))
}

/// GET /user/{id}
pub async fn get_user<U>(
    State(state): State<CommunityAppState<U>>,
    PathId(user_id): PathId<User>,
) -> CommunityResult<ApiResponse<UserResponse>>
where
    U: UserRepository + RefreshTokenRepository + Send + Sync + 'static,
{
    let cached = service(&state).get(&user_id).await?;
    Ok(ApiResponse::ok("user retrieved successfully", cached.data).cache_status(cached.cache))
}

/// PUT /user/{id}
pub async fn update_user<U>(
    State(state): State<CommunityAppState<U>>,
    auth: AuthUser,
    PathId(user_id): PathId<User>,
    JsonBody(req): JsonBody<UpdateUserRequest>,
) -> CommunityResult<ApiResponse<UserResponse>>
where
    U: UserRepository + RefreshTokenRepository + Send + Sync + 'static,
{
    let user = service(&state)
        .update_profile(&auth.user_id, &user_id, req.into())
        .await?;
    Ok(ApiResponse::ok("user updated successfully", user))
}

/// PUT /user/update-password
pub async fn update_password<U>(
    State(state): State<CommunityAppState<U>>,
    auth: AuthUser,
    JsonBody(req): JsonBody<UpdatePasswordRequest>,
) -> CommunityResult<ApiResponse<()>>
where
    U: UserRepository + RefreshTokenRepository + Send + Sync + 'static,
{
    service(&state)
        .update_password(&auth.user_id, req.current_password, req.new_password)
        .await?;
    Ok(ApiResponse::ok("user password updated successfully", ()))
}

/// PUT /user/academic-year/{id}
pub async fn update_academic_year<U>(
    State(state): State<CommunityAppState<U>>,
    auth: AuthUser,
    PathId(user_id): PathId<User>,
    JsonBody(req): JsonBody<AcademicYearRequest>,
) -> CommunityResult<ApiResponse<UserResponse>>
where
    U: UserRepository + RefreshTokenRepository + Send + Sync + 'static,
{
    let user = service(&state)
        .update_academic_year(&auth.user_id, &user_id, req.academic_year)
        .await?;
    Ok(ApiResponse::ok("user academic year updated successfully", user))
}
