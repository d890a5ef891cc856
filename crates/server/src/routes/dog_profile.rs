//! Dog profile route handlers.
//!
//! A profile belongs to exactly one customer and is only ever read or
//! written through the owner's own token; there is no cross-user access.

use axum::{Json, extract::State};

use crate::db::DogProfileRepository;
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::dog_profile::{DogProfile, UpdateDogProfileInput};
use crate::state::AppState;

/// Get the caller's dog profile, creating a blank one on first access.
pub async fn get(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<DogProfile>> {
    let profile = DogProfileRepository::new(state.pool())
        .get_or_create(user.id)
        .await?;

    Ok(Json(profile))
}

/// Update the caller's dog profile. Creates the profile first if the
/// caller never fetched it.
pub async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateDogProfileInput>,
) -> Result<Json<DogProfile>> {
    let profiles = DogProfileRepository::new(state.pool());

    profiles.get_or_create(user.id).await?;
    let profile = profiles.update(user.id, &input).await?;

    Ok(Json(profile))
}
