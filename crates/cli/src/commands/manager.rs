//! Inventory manager account commands.
//!
//! # Usage
//!
//! ```bash
//! cr-cli manager create -e manager@example.com -p 's3cure-pass'
//! ```
//!
//! Manager accounts are never created through the public API; this command
//! is the only way to mint one. The account is created already verified
//! and active.
//!
//! # Environment Variables
//!
//! - `CANINERACKS_DATABASE_URL` - `PostgreSQL` connection string
//!   (falls back to `DATABASE_URL`)

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;
use thiserror::Error;

use canineracks_core::{Email, UserRole};

/// Minimum password length for manager accounts.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Errors that can occur during manager account operations.
#[derive(Debug, Error)]
pub enum ManagerError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] canineracks_core::EmailError),

    /// Password too short.
    #[error("Password must be at least {MIN_PASSWORD_LENGTH} characters")]
    WeakPassword,

    /// User already exists.
    #[error("An account already exists with email: {0}")]
    UserExists(String),

    /// Password hashing failed.
    #[error("Password hashing failed")]
    PasswordHash,
}

/// Create a new inventory manager account.
///
/// # Returns
///
/// The ID of the created account.
///
/// # Errors
///
/// Returns `ManagerError` for bad input, a duplicate email, or database
/// failures.
pub async fn create(email: &str, password: &str) -> Result<i32, ManagerError> {
    dotenvy::dotenv().ok();

    let email = Email::parse(email)?;
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ManagerError::WeakPassword);
    }

    let database_url = std::env::var("CANINERACKS_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| ManagerError::MissingEnvVar("CANINERACKS_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    tracing::info!("Creating inventory manager: {}", email);

    let existing = sqlx::query_scalar::<_, i32>("SELECT id FROM app_user WHERE email = $1")
        .bind(email.as_str())
        .fetch_optional(&pool)
        .await?;

    if existing.is_some() {
        return Err(ManagerError::UserExists(email.into_inner()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| ManagerError::PasswordHash)?
        .to_string();

    let user_id = sqlx::query_scalar::<_, i32>(
        "INSERT INTO app_user (email, password_hash, role, is_verified, is_active) \
         VALUES ($1, $2, $3, TRUE, TRUE) \
         RETURNING id",
    )
    .bind(email.as_str())
    .bind(&password_hash)
    .bind(UserRole::InventoryManager.to_string())
    .fetch_one(&pool)
    .await?;

    tracing::info!(
        "Inventory manager created successfully! ID: {}, Email: {}",
        user_id,
        email
    );

    Ok(user_id)
}
