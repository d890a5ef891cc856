//! Product and stock ledger repository.
//!
//! Every quantity change goes through this module so the corresponding
//! ledger row is written in the same transaction as the change itself.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use canineracks_core::{ProductId, StockAction, StockEntryId};

use super::RepositoryError;
use crate::models::product::{CreateProductInput, Product, StockEntry, UpdateProductInput};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    description: String,
    quantity: i32,
    purchased_price: Decimal,
    selling_price: Decimal,
    date_purchased: NaiveDate,
    supplier_name: String,
    main_category: String,
    sub_category: String,
    product_code: String,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let main_category = row.main_category.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid main category in database: {e}"))
        })?;
        let sub_category = row.sub_category.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid sub category in database: {e}"))
        })?;

        Ok(Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            quantity: row.quantity,
            purchased_price: row.purchased_price,
            selling_price: row.selling_price,
            date_purchased: row.date_purchased,
            supplier_name: row.supplier_name,
            main_category,
            sub_category,
            product_code: row.product_code,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Internal row type for ledger queries (joined with the product name).
#[derive(Debug, sqlx::FromRow)]
struct StockEntryRow {
    id: i32,
    product_id: i32,
    product_name: String,
    action: String,
    quantity_changed: i32,
    timestamp: DateTime<Utc>,
}

impl TryFrom<StockEntryRow> for StockEntry {
    type Error = RepositoryError;

    fn try_from(row: StockEntryRow) -> Result<Self, Self::Error> {
        let action = row.action.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid stock action in database: {e}"))
        })?;

        Ok(Self {
            id: StockEntryId::new(row.id),
            product_id: ProductId::new(row.product_id),
            product_name: row.product_name,
            action,
            quantity_changed: row.quantity_changed,
            timestamp: row.timestamp,
        })
    }
}

const PRODUCT_COLUMNS: &str = "id, name, description, quantity, purchased_price, selling_price, \
     date_purchased, supplier_name, main_category, sub_category, product_code, image_url, \
     created_at, updated_at";

// =============================================================================
// Repository
// =============================================================================

/// Repository for product and stock ledger operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Create a product.
    ///
    /// A positive initial quantity is recorded in the ledger as a stock-in
    /// entry, committed together with the product row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, input: &CreateProductInput) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO product (name, description, quantity, purchased_price, selling_price, \
                 date_purchased, supplier_name, main_category, sub_category, product_code, image_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.quantity)
        .bind(input.purchased_price)
        .bind(input.selling_price)
        .bind(input.date_purchased)
        .bind(&input.supplier_name)
        .bind(input.main_category.as_str())
        .bind(input.sub_category.as_str())
        .bind(&input.product_code)
        .bind(&input.image_url)
        .fetch_one(&mut *tx)
        .await?;

        if input.quantity > 0 {
            append_ledger_entry(&mut tx, row.id, StockAction::In, input.quantity).await?;
        }

        tx.commit().await?;

        row.try_into()
    }

    /// Update a product.
    ///
    /// Absent input fields keep their current value. A quantity change
    /// appends a ledger entry classified by the sign of the delta, in the
    /// same transaction as the update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        input: &UpdateProductInput,
    ) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // Lock the row so the delta is computed against a stable quantity.
        let old_quantity =
            sqlx::query_scalar::<_, i32>("SELECT quantity FROM product WHERE id = $1 FOR UPDATE")
                .bind(id.as_i32())
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(RepositoryError::NotFound)?;

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE product SET \
                 name = COALESCE($2, name), \
                 description = COALESCE($3, description), \
                 quantity = COALESCE($4, quantity), \
                 purchased_price = COALESCE($5, purchased_price), \
                 selling_price = COALESCE($6, selling_price), \
                 date_purchased = COALESCE($7, date_purchased), \
                 supplier_name = COALESCE($8, supplier_name), \
                 main_category = COALESCE($9, main_category), \
                 sub_category = COALESCE($10, sub_category), \
                 product_code = COALESCE($11, product_code), \
                 image_url = COALESCE($12, image_url), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.quantity)
        .bind(input.purchased_price)
        .bind(input.selling_price)
        .bind(input.date_purchased)
        .bind(&input.supplier_name)
        .bind(input.main_category.map(|c| c.as_str()))
        .bind(input.sub_category.map(|c| c.as_str()))
        .bind(&input.product_code)
        .bind(&input.image_url)
        .fetch_one(&mut *tx)
        .await?;

        let delta = row.quantity - old_quantity;
        if delta != 0 {
            append_ledger_entry(&mut tx, row.id, StockAction::from_delta(delta), delta.abs())
                .await?;
        }

        tx.commit().await?;

        row.try_into()
    }

    /// Delete a product. Its ledger rows cascade with it.
    ///
    /// # Returns
    ///
    /// Returns `true` if the product was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM product WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List the ledger entries for a product, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn history(&self, id: ProductId) -> Result<Vec<StockEntry>, RepositoryError> {
        let rows = sqlx::query_as::<_, StockEntryRow>(
            "SELECT h.id, h.product_id, p.name AS product_name, h.action, \
                    h.quantity_changed, h.timestamp \
             FROM stock_history h \
             INNER JOIN product p ON p.id = h.product_id \
             WHERE h.product_id = $1 \
             ORDER BY h.timestamp DESC",
        )
        .bind(id.as_i32())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

/// Append one immutable ledger row inside an open transaction.
pub(crate) async fn append_ledger_entry(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    product_id: i32,
    action: StockAction,
    quantity_changed: i32,
) -> Result<(), RepositoryError> {
    sqlx::query(
        "INSERT INTO stock_history (product_id, action, quantity_changed) VALUES ($1, $2, $3)",
    )
    .bind(product_id)
    .bind(action.to_string())
    .bind(quantity_changed)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
