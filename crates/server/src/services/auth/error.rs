//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

use super::tokens::TokenError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] canineracks_core::EmailError),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User not found.
    #[error("user not found")]
    UserNotFound,

    /// User already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Account exists but the email was never verified.
    #[error("email not verified")]
    NotVerified,

    /// Registration code requested for an already-verified account.
    #[error("email is already verified")]
    AlreadyVerified,

    /// No pending code matches (user, code, purpose).
    #[error("invalid or expired code")]
    InvalidCode,

    /// Bearer token problem.
    #[error("token error: {0}")]
    Token(#[from] TokenError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
