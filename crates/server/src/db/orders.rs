//! Order repository.
//!
//! Order creation is all-or-nothing: stock validation, stock decrement,
//! ledger append, and line item insert all happen inside one transaction.
//! Any failing line item rolls the whole order back.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use thiserror::Error;

use canineracks_core::{OrderId, OrderItemId, ProductId, StockAction, UserId};

use super::RepositoryError;
use super::products::append_ledger_entry;
use crate::models::order::{Order, OrderItem, OrderItemInput};

/// Errors that can occur while placing or reading orders.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The order contains no line items.
    #[error("an order needs at least one item")]
    EmptyOrder,

    /// A line item requested a non-positive quantity.
    #[error("quantity for product {0} must be positive")]
    InvalidQuantity(ProductId),

    /// A line item referenced a product that doesn't exist.
    #[error("product {0} does not exist")]
    UnknownProduct(ProductId),

    /// Not enough stock to fulfill a line item. Names the product so the
    /// caller can say which item sank the order.
    #[error("insufficient stock for \"{product_name}\": {available} available, {requested} requested")]
    InsufficientStock {
        product_name: String,
        available: i32,
        requested: i32,
    },

    /// Repository/database error.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for OrderError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

/// Internal row type for order item queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: i32,
    order_id: i32,
    product_id: i32,
    quantity: i32,
}

/// Internal row type for order header queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    customer_id: i32,
    created_at: DateTime<Utc>,
}

/// Repository for order operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Place an order for a customer.
    ///
    /// Each line item locks its product row, validates available stock,
    /// decrements it, and appends a stock-out ledger entry. The order
    /// commits only if every line item succeeds.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::EmptyOrder` / `InvalidQuantity` for bad input,
    /// `UnknownProduct` / `InsufficientStock` when a line item cannot be
    /// fulfilled (nothing is committed), and `OrderError::Repository` for
    /// database errors.
    pub async fn create(
        &self,
        customer_id: UserId,
        items: &[OrderItemInput],
    ) -> Result<Order, OrderError> {
        if items.is_empty() {
            return Err(OrderError::EmptyOrder);
        }
        if let Some(item) = items.iter().find(|item| item.quantity <= 0) {
            return Err(OrderError::InvalidQuantity(item.product_id));
        }

        let mut tx = self.pool.begin().await?;

        let order_row = sqlx::query_as::<_, OrderRow>(
            "INSERT INTO customer_order (customer_id) VALUES ($1) \
             RETURNING id, customer_id, created_at",
        )
        .bind(customer_id.as_i32())
        .fetch_one(&mut *tx)
        .await?;

        let mut order_items = Vec::with_capacity(items.len());
        for item in items {
            // Lock the product row for the rest of the transaction so
            // concurrent orders cannot both pass the stock check.
            let product = sqlx::query_as::<_, (String, i32)>(
                "SELECT name, quantity FROM product WHERE id = $1 FOR UPDATE",
            )
            .bind(item.product_id.as_i32())
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(OrderError::UnknownProduct(item.product_id))?;

            let (product_name, available) = product;
            if available < item.quantity {
                // Dropping the transaction rolls back everything so far.
                return Err(OrderError::InsufficientStock {
                    product_name,
                    available,
                    requested: item.quantity,
                });
            }

            sqlx::query("UPDATE product SET quantity = quantity - $2, updated_at = now() WHERE id = $1")
                .bind(item.product_id.as_i32())
                .bind(item.quantity)
                .execute(&mut *tx)
                .await?;

            append_ledger_entry(&mut tx, item.product_id.as_i32(), StockAction::Out, item.quantity)
                .await?;

            let item_row = sqlx::query_as::<_, OrderItemRow>(
                "INSERT INTO order_item (order_id, product_id, quantity) VALUES ($1, $2, $3) \
                 RETURNING id, order_id, product_id, quantity",
            )
            .bind(order_row.id)
            .bind(item.product_id.as_i32())
            .bind(item.quantity)
            .fetch_one(&mut *tx)
            .await?;

            order_items.push(OrderItem {
                id: OrderItemId::new(item_row.id),
                product_id: ProductId::new(item_row.product_id),
                quantity: item_row.quantity,
            });
        }

        tx.commit().await?;

        Ok(Order {
            id: OrderId::new(order_row.id),
            customer_id: UserId::new(order_row.customer_id),
            created_at: order_row.created_at,
            items: order_items,
        })
    }

    /// List one customer's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_customer(
        &self,
        customer_id: UserId,
    ) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, OrderRow>(
            "SELECT id, customer_id, created_at FROM customer_order \
             WHERE customer_id = $1 ORDER BY created_at DESC",
        )
        .bind(customer_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        self.attach_items(orders).await
    }

    /// List every order, newest first. Manager-only at the route layer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, OrderRow>(
            "SELECT id, customer_id, created_at FROM customer_order ORDER BY created_at DESC",
        )
        .fetch_all(self.pool)
        .await?;

        self.attach_items(orders).await
    }

    /// Load line items for a batch of order headers.
    async fn attach_items(&self, orders: Vec<OrderRow>) -> Result<Vec<Order>, RepositoryError> {
        let ids: Vec<i32> = orders.iter().map(|o| o.id).collect();

        let item_rows = sqlx::query_as::<_, OrderItemRow>(
            "SELECT id, order_id, product_id, quantity FROM order_item \
             WHERE order_id = ANY($1) ORDER BY id ASC",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let mut by_order: HashMap<i32, Vec<OrderItem>> = HashMap::new();
        for row in item_rows {
            by_order.entry(row.order_id).or_default().push(OrderItem {
                id: OrderItemId::new(row.id),
                product_id: ProductId::new(row.product_id),
                quantity: row.quantity,
            });
        }

        Ok(orders
            .into_iter()
            .map(|row| Order {
                id: OrderId::new(row.id),
                customer_id: UserId::new(row.customer_id),
                created_at: row.created_at,
                items: by_order.remove(&row.id).unwrap_or_default(),
            })
            .collect())
    }
}
