//! Authentication extractors.
//!
//! Handlers take [`AuthUser`] to require a valid bearer token, or
//! [`RequireManager`] to additionally require the inventory-manager role.
//! The token is self-contained; extraction never touches the database.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use canineracks_core::{UserId, UserRole};

use crate::error::AppError;
use crate::services::auth::TokenUse;
use crate::state::AppState;

/// The authenticated caller, as established by their access token.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub id: UserId,
    pub role: UserRole,
}

/// Extractor that requires a valid access token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(AuthUser(user): AuthUser) -> impl IntoResponse {
///     format!("hello, user {}", user.id)
/// }
/// ```
pub struct AuthUser(pub CurrentUser);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AppError::Unauthorized("Authentication credentials were not provided.".to_string())
            })?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Unauthorized("Authorization header must be 'Bearer <token>'.".to_string())
        })?;

        let claims = state
            .tokens()
            .verify(token, TokenUse::Access)
            .map_err(|_| AppError::Unauthorized("Token is invalid or expired.".to_string()))?;

        Ok(Self(CurrentUser {
            id: claims.user_id(),
            role: claims.role,
        }))
    }
}

/// Extractor that requires the inventory-manager role.
pub struct RequireManager(pub CurrentUser);

impl FromRequestParts<AppState> for RequireManager {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;

        if !user.role.is_manager() {
            return Err(AppError::Forbidden(
                "You do not have permission to perform this action.".to_string(),
            ));
        }

        Ok(Self(user))
    }
}
