//! Product catalog and stock ledger domain models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use canineracks_core::{MainCategory, ProductId, StockAction, StockEntryId, SubCategory};

/// A catalog entry.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Long description.
    pub description: String,
    /// Units currently on hand.
    pub quantity: i32,
    /// Unit cost at purchase.
    pub purchased_price: Decimal,
    /// Unit price charged to customers.
    pub selling_price: Decimal,
    /// Date the stock was purchased from the supplier.
    pub date_purchased: NaiveDate,
    /// Supplier display name.
    pub supplier_name: String,
    /// Top-level category.
    pub main_category: MainCategory,
    /// Second-level category.
    pub sub_category: SubCategory,
    /// Five-segment dog-suitability code (e.g. `PUAD-BSSM-HYSH-CO-NOBRJM`).
    /// Well-formedness is not enforced at this layer.
    pub product_code: String,
    /// Externally hosted product image, if any.
    pub image_url: Option<String>,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

/// One row of the append-only stock ledger.
///
/// Entries are only ever inserted; nothing updates or deletes them.
#[derive(Debug, Clone, Serialize)]
pub struct StockEntry {
    /// Unique ledger entry ID.
    pub id: StockEntryId,
    /// Product the entry is recorded against.
    pub product_id: ProductId,
    /// Product name at read time, for display.
    pub product_name: String,
    /// Classification: stock-in, stock-out, or generic update.
    pub action: StockAction,
    /// Magnitude of the change (always positive).
    pub quantity_changed: i32,
    /// When the change was recorded.
    pub timestamp: DateTime<Utc>,
}

/// Input for creating a product.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductInput {
    pub name: String,
    pub description: String,
    pub quantity: i32,
    pub purchased_price: Decimal,
    pub selling_price: Decimal,
    pub date_purchased: NaiveDate,
    pub supplier_name: String,
    pub main_category: MainCategory,
    pub sub_category: SubCategory,
    pub product_code: String,
    pub image_url: Option<String>,
}

/// Input for updating a product. Absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<i32>,
    pub purchased_price: Option<Decimal>,
    pub selling_price: Option<Decimal>,
    pub date_purchased: Option<NaiveDate>,
    pub supplier_name: Option<String>,
    pub main_category: Option<MainCategory>,
    pub sub_category: Option<SubCategory>,
    pub product_code: Option<String>,
    pub image_url: Option<String>,
}
