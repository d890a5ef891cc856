//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding. All route handlers return `Result<T, AppError>`;
//! the response body is always `{"error": "..."}` JSON.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::{OrderError, RepositoryError};
use crate::services::auth::AuthError;
use crate::services::auth::tokens::TokenError;
use crate::services::email::EmailError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Order placement failed.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Email delivery failed.
    #[error("Email error: {0}")]
    Email(#[from] EmailError),

    /// Request failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or invalid credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated, but the role does not allow this.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body returned to clients.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Database(err) => repository_status(err),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::NotVerified => StatusCode::UNAUTHORIZED,
                AuthError::UserNotFound => StatusCode::NOT_FOUND,
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::WeakPassword(_)
                | AuthError::InvalidEmail(_)
                | AuthError::AlreadyVerified
                | AuthError::InvalidCode => StatusCode::BAD_REQUEST,
                AuthError::Token(TokenError::Invalid | TokenError::WrongType) => {
                    StatusCode::UNAUTHORIZED
                }
                AuthError::Repository(err) => repository_status(err),
                AuthError::Token(TokenError::Signing) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Order(err) => match err {
                OrderError::EmptyOrder
                | OrderError::InvalidQuantity(_)
                | OrderError::InsufficientStock { .. } => StatusCode::BAD_REQUEST,
                OrderError::UnknownProduct(_) => StatusCode::NOT_FOUND,
                OrderError::Repository(err) => repository_status(err),
            },
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Email(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message exposed to the client. Server-side failures are masked.
    fn client_message(&self) -> String {
        match self {
            Self::Database(err) => repository_message(err),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid email or password.".to_string(),
                AuthError::NotVerified => {
                    "Please verify your email before logging in.".to_string()
                }
                AuthError::UserNotFound => {
                    "User with this email does not exist.".to_string()
                }
                AuthError::UserAlreadyExists => {
                    "An account with this email already exists.".to_string()
                }
                AuthError::WeakPassword(msg) => msg.clone(),
                AuthError::InvalidEmail(e) => e.to_string(),
                AuthError::AlreadyVerified => "Email is already verified.".to_string(),
                AuthError::InvalidCode => "Invalid or expired code.".to_string(),
                AuthError::Token(TokenError::Invalid | TokenError::WrongType) => {
                    "Token is invalid or expired.".to_string()
                }
                AuthError::Repository(err) => repository_message(err),
                AuthError::Token(TokenError::Signing) | AuthError::PasswordHash => {
                    "Internal server error".to_string()
                }
            },
            Self::Order(err) => match err {
                OrderError::Repository(inner) => repository_message(inner),
                other => other.to_string(),
            },
            Self::Validation(msg) => msg.clone(),
            Self::NotFound(what) => format!("{what} not found."),
            Self::Unauthorized(msg) | Self::Forbidden(msg) => msg.clone(),
            Self::Email(_) | Self::Internal(_) => "Internal server error".to_string(),
        }
    }
}

fn repository_status(err: &RepositoryError) -> StatusCode {
    match err {
        RepositoryError::NotFound => StatusCode::NOT_FOUND,
        RepositoryError::Conflict(_) => StatusCode::CONFLICT,
        RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn repository_message(err: &RepositoryError) -> String {
    match err {
        RepositoryError::NotFound => "Not found.".to_string(),
        RepositoryError::Conflict(msg) => msg.clone(),
        RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
            "Internal server error".to_string()
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = ErrorBody {
            error: self.client_message(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("Product".to_string());
        assert_eq!(err.to_string(), "Not found: Product");

        let err = AppError::Validation("quantity must be positive".to_string());
        assert_eq!(err.to_string(), "Validation error: quantity must be positive");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Forbidden("test".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::Validation("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_insufficient_stock_is_a_validation_failure() {
        let err = AppError::Order(OrderError::InsufficientStock {
            product_name: "Puppy Kibble".to_string(),
            available: 5,
            requested: 10,
        });
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.client_message().contains("Puppy Kibble"));
    }

    #[test]
    fn test_conflict_maps_to_409() {
        let err = AppError::Auth(AuthError::UserAlreadyExists);
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_internal_details_are_masked() {
        let err = AppError::Database(RepositoryError::DataCorruption(
            "invalid role in database".to_string(),
        ));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.client_message(), "Internal server error");
    }
}
