//! HTTP route handlers for the CanineRacks API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness check
//! GET  /health/ready                - Readiness check (database ping)
//!
//! # Auth (rate limited)
//! POST /api/auth/register           - Register a customer account
//! POST /api/auth/login              - Login, returns access/refresh tokens
//! POST /api/auth/refresh            - Exchange refresh token for access token
//! POST /api/auth/send-code          - Issue a verification code (replaces old)
//! POST /api/auth/resend-code        - Issue an additional verification code
//! POST /api/auth/verify-code        - Verify a code; activates on register
//! POST /api/auth/reset-password     - Reset password with a reset code
//!
//! # Products (auth; mutations manager-only)
//! GET    /api/products              - List products
//! POST   /api/products              - Create product (+ stock-in ledger entry)
//! GET    /api/products/{id}         - Fetch product
//! PUT    /api/products/{id}         - Update product (+ ledger entry on delta)
//! DELETE /api/products/{id}         - Delete product
//! GET    /api/products/{id}/history - Stock ledger, newest first
//! GET    /api/recommendations       - Products suitable for the caller's dog
//!
//! # Orders (auth)
//! POST /api/orders                  - Place an order (atomic across items)
//! GET  /api/orders                  - Own orders; managers see all
//!
//! # Dog profile (auth, owner only)
//! GET  /api/dog-profile             - Get-or-create the caller's profile
//! PUT  /api/dog-profile             - Update the caller's profile
//!
//! # Users (manager only)
//! GET  /api/users                   - List accounts
//! ```

pub mod auth;
pub mod dog_profile;
pub mod orders;
pub mod products;
pub mod users;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware;
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/send-code", post(auth::send_code))
        .route("/resend-code", post(auth::resend_code))
        .route("/verify-code", post(auth::verify_code))
        .route("/reset-password", post(auth::reset_password))
        .layer(middleware::auth_rate_limiter())
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list).post(products::create))
        .route(
            "/{id}",
            get(products::get)
                .put(products::update)
                .delete(products::delete),
        )
        .route("/{id}/history", get(products::history))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new().route("/", get(orders::list).post(orders::create))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth_routes())
        .nest("/api/products", product_routes())
        .nest("/api/orders", order_routes())
        .route("/api/recommendations", get(products::recommendations))
        .route(
            "/api/dog-profile",
            get(dog_profile::get).put(dog_profile::update),
        )
        .route("/api/users", get(users::list))
}
