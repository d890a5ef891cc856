//! Account domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use canineracks_core::{Email, UserId, UserRole, VerificationCodeId, VerificationPurpose};

/// An account holder.
///
/// The password hash never leaves the repository layer; it is not part of
/// this model.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login email, unique per account.
    pub email: Email,
    /// Permission level.
    pub role: UserRole,
    /// Whether the email has been confirmed with a code.
    pub is_verified: bool,
    /// Inactive accounts cannot log in; activation happens on verification.
    pub is_active: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Compact listing row for the manager-only user index.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: UserId,
    pub email: Email,
    pub role: UserRole,
    pub is_active: bool,
}

/// A pending one-time verification code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationCode {
    /// Unique code ID.
    pub id: VerificationCodeId,
    /// Account the code was issued for.
    pub user_id: UserId,
    /// The 5-character uppercase alphanumeric code.
    pub code: String,
    /// What the code authorizes.
    pub purpose: VerificationPurpose,
    /// When the code was issued.
    pub created_at: DateTime<Utc>,
}
