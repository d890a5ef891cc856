//! Order route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use crate::db::OrderRepository;
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::order::{Order, OrderItemInput};
use crate::state::AppState;

/// Order creation request body.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub items: Vec<OrderItemInput>,
}

/// Place an order for the caller.
///
/// All line items commit or none do: the first item that fails stock
/// validation rolls back every decrement and ledger entry before it.
pub async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(body): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>)> {
    let order = OrderRepository::new(state.pool())
        .create(user.id, &body.items)
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// List orders: customers see their own, managers see everything.
pub async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.pool());

    let result = if user.role.is_manager() {
        orders.list_all().await?
    } else {
        orders.list_for_customer(user.id).await?
    };

    Ok(Json(result))
}
