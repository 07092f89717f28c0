//! Account endpoints.

use actix_web::{HttpResponse, web};
use validator::Validate;

use zero_core::services::UserDirectory;
use zero_shared::dto::{FilterPage, Message, UserList, UserPublic, UserSchema};

use crate::middleware::auth::CurrentUser;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /users/
pub async fn create_user(
    state: web::Data<AppState>,
    body: web::Json<UserSchema>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();
    body.validate()?;

    let user = state.users.create(body.into()).await?;

    Ok(HttpResponse::Created().json(UserPublic::from(user)))
}

/// GET /users/?offset&limit
pub async fn read_users(
    _user: CurrentUser,
    state: web::Data<AppState>,
    query: web::Query<FilterPage>,
) -> AppResult<HttpResponse> {
    let users = state.users.list(query.into_inner().into()).await?;

    Ok(HttpResponse::Ok().json(UserList {
        users: users.into_iter().map(UserPublic::from).collect(),
    }))
}

/// GET /users/{user_id}
pub async fn read_user(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let user = state.users.get(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(UserPublic::from(user)))
}

/// PUT /users/{user_id}
///
/// Ownership is checked before the body, so a caller touching someone
/// else's account gets 403 whatever they sent.
pub async fn update_user(
    user: CurrentUser,
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: Result<web::Json<UserSchema>, actix_web::Error>,
) -> Result<HttpResponse, actix_web::Error> {
    let user_id = path.into_inner();
    UserDirectory::ensure_owner(user_id, &user).map_err(AppError::from)?;

    let body = body?.into_inner();
    body.validate().map_err(AppError::from)?;

    let updated = state
        .users
        .update(user_id, body.into(), &user)
        .await
        .map_err(AppError::from)?;

    Ok(HttpResponse::Ok().json(UserPublic::from(updated)))
}

/// DELETE /users/{user_id}
pub async fn delete_user(
    user: CurrentUser,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    state.users.delete(path.into_inner(), &user).await?;

    Ok(HttpResponse::Ok().json(Message::new("User deleted")))
}
