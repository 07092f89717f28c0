//! Token endpoints.

use actix_web::{HttpResponse, web};

use zero_shared::dto::{TokenRequest, TokenResponse};

use crate::middleware::auth::CurrentUser;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /auth/token
///
/// OAuth2 password form; `username` carries the email.
pub async fn login_for_access_token(
    state: web::Data<AppState>,
    form: web::Form<TokenRequest>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    let token = state.auth.login(&form.username, &form.password).await?;

    Ok(HttpResponse::Ok().json(TokenResponse::from(token)))
}

/// POST /auth/refresh/token
pub async fn refresh_access_token(
    user: CurrentUser,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let token = state.auth.refresh(&user)?;

    Ok(HttpResponse::Ok().json(TokenResponse::from(token)))
}
