//! Order domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use canineracks_core::{OrderId, OrderItemId, ProductId, UserId};

/// A placed order with its line items.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Customer who placed the order.
    pub customer_id: UserId,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
    /// Line items, in insertion order.
    pub items: Vec<OrderItem>,
}

/// One line item of an order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    /// Unique line item ID.
    pub id: OrderItemId,
    /// Ordered product.
    pub product_id: ProductId,
    /// Units ordered (always positive).
    pub quantity: i32,
}

/// A requested line item, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemInput {
    pub product_id: ProductId,
    pub quantity: i32,
}
