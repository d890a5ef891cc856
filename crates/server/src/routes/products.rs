//! Product catalog route handlers, including the stock history
//! sub-resource and the recommendation listing.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use canineracks_core::ProductId;
use canineracks_core::recommend::MatchOutcome;

use crate::db::{DogProfileRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::middleware::{AuthUser, RequireManager};
use crate::models::product::{CreateProductInput, Product, StockEntry, UpdateProductInput};
use crate::state::AppState;

/// List all products, newest first.
pub async fn list(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool()).list().await?;
    Ok(Json(products))
}

/// Create a product. A positive initial quantity becomes the first
/// stock-in ledger entry.
pub async fn create(
    RequireManager(_manager): RequireManager,
    State(state): State<AppState>,
    Json(input): Json<CreateProductInput>,
) -> Result<(StatusCode, Json<Product>)> {
    validate_quantity(input.quantity)?;

    let product = ProductRepository::new(state.pool()).create(&input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Fetch a product.
pub async fn get(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

    Ok(Json(product))
}

/// Update a product. A quantity change appends a ledger entry.
pub async fn update(
    RequireManager(_manager): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(input): Json<UpdateProductInput>,
) -> Result<Json<Product>> {
    if let Some(quantity) = input.quantity {
        validate_quantity(quantity)?;
    }

    let product = ProductRepository::new(state.pool()).update(id, &input).await?;
    Ok(Json(product))
}

/// Delete a product together with its ledger rows.
pub async fn delete(
    RequireManager(_manager): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    let deleted = ProductRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("Product".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// List a product's stock ledger, newest first.
pub async fn history(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Vec<StockEntry>>> {
    let products = ProductRepository::new(state.pool());

    if products.get(id).await?.is_none() {
        return Err(AppError::NotFound("Product".to_string()));
    }

    let entries = products.history(id).await?;
    Ok(Json(entries))
}

/// Recommend products for the caller's dog profile.
///
/// No profile, or a profile with no recognizable attribute, yields an
/// empty list. Products with malformed codes are skipped and logged.
pub async fn recommendations(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>> {
    let Some(profile) = DogProfileRepository::new(state.pool()).get(user.id).await? else {
        return Ok(Json(Vec::new()));
    };

    let book = state.code_book();
    let query = book.query(&profile.attributes());
    if query.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let products = ProductRepository::new(state.pool()).list().await?;

    let mut recommended = Vec::new();
    for product in products {
        match book.evaluate(&query, &product.product_code) {
            MatchOutcome::Recommended => recommended.push(product),
            MatchOutcome::NotSuitable => {}
            MatchOutcome::MalformedCode => {
                tracing::warn!(
                    product_id = %product.id,
                    product_code = %product.product_code,
                    "skipping product with malformed suitability code"
                );
            }
        }
    }

    Ok(Json(recommended))
}

fn validate_quantity(quantity: i32) -> Result<()> {
    if quantity < 0 {
        return Err(AppError::Validation(
            "quantity cannot be negative".to_string(),
        ));
    }
    Ok(())
}
