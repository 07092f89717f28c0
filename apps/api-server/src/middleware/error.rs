//! Error handling middleware - RFC 7807 compliant responses.

use std::fmt;

use actix_web::http::{StatusCode, header};
use actix_web::{HttpRequest, HttpResponse, ResponseError, web};
use thiserror::Error;
use zero_core::DomainError;
use zero_shared::ErrorResponse;

pub const CREDENTIALS_INVALID: &str = "Could not validate credentials";
pub const LOGIN_FAILED: &str = "Incorrect email or password";
pub const NOT_ENOUGH_PERMISSIONS: &str = "Not enough permissions";
pub const TASK_NOT_FOUND: &str = "Task not found.";

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failed login.
    #[error("{}", LOGIN_FAILED)]
    InvalidCredentials,

    /// Missing or unusable bearer token.
    #[error("{}", CREDENTIALS_INVALID)]
    Unauthorized,

    #[error("{}", NOT_ENOUGH_PERMISSIONS)]
    Forbidden,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Validation errors: {0:?}")]
    Validation(Vec<String>),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidCredentials | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::InvalidCredentials => ErrorResponse::unauthorized(LOGIN_FAILED),
            AppError::Unauthorized => ErrorResponse::unauthorized(CREDENTIALS_INVALID),
            AppError::Forbidden => ErrorResponse::forbidden(NOT_ENOUGH_PERMISSIONS),
            AppError::Conflict(detail) => ErrorResponse::conflict(detail),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
            AppError::Validation(errors) => ErrorResponse::unprocessable(errors.clone()),
        };

        let mut response = HttpResponse::build(self.status_code());
        if matches!(self, AppError::Unauthorized) {
            response.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
        }

        response.json(error)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound {
                entity_type: "Task",
                ..
            } => AppError::NotFound(TASK_NOT_FOUND.to_string()),
            DomainError::NotFound { entity_type, .. } => {
                AppError::NotFound(format!("{} not found", entity_type))
            }
            DomainError::Validation(msg) => AppError::Validation(vec![msg]),
            DomainError::Conflict(msg) => AppError::Conflict(msg),
            DomainError::Forbidden => AppError::Forbidden,
            DomainError::Unauthorized => AppError::Unauthorized,
            DomainError::InvalidCredentials => AppError::InvalidCredentials,
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    format!("{}: {}", field, message)
                })
            })
            .collect();
        messages.sort();

        AppError::Validation(messages)
    }
}

/// Route body, query, form and path extraction failures through
/// [`AppError::Validation`] so they share the 422 problem document.
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, req| reject(err, req)))
        .app_data(web::QueryConfig::default().error_handler(|err, req| reject(err, req)))
        .app_data(web::FormConfig::default().error_handler(|err, req| reject(err, req)))
        .app_data(web::PathConfig::default().error_handler(|err, req| reject(err, req)));
}

fn reject(err: impl fmt::Display, req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(path = %req.path(), error = %err, "Rejected malformed request");
    AppError::Validation(vec![err.to_string()]).into()
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_not_found_message() {
        let err = AppError::from(DomainError::task_not_found(3));

        assert!(matches!(err, AppError::NotFound(ref msg) if msg == TASK_NOT_FOUND));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_user_not_found_message() {
        let err = AppError::from(DomainError::user_not_found(3));

        assert!(matches!(err, AppError::NotFound(ref msg) if msg == "User not found"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::Validation(vec![]).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_unauthorized_carries_challenge_header() {
        let response = AppError::Unauthorized.error_response();

        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
        assert!(
            AppError::InvalidCredentials
                .error_response()
                .headers()
                .get(header::WWW_AUTHENTICATE)
                .is_none()
        );
    }
}
