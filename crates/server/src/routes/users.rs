//! User administration route handlers.

use axum::{Json, extract::State};

use crate::db::UserRepository;
use crate::error::Result;
use crate::middleware::RequireManager;
use crate::models::user::UserSummary;
use crate::state::AppState;

/// List all accounts. Inventory managers only.
pub async fn list(
    RequireManager(_manager): RequireManager,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserSummary>>> {
    let users = UserRepository::new(state.pool()).list().await?;
    Ok(Json(users))
}
