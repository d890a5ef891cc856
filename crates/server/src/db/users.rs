//! User and verification-code repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use canineracks_core::{Email, UserId, UserRole, VerificationCodeId, VerificationPurpose};

use super::RepositoryError;
use crate::models::user::{User, UserSummary, VerificationCode};

/// Internal row type for user queries.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    email: String,
    role: String,
    is_verified: bool,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let role: UserRole = row.role.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid role in database: {e}"))
        })?;

        Ok(Self {
            id: UserId::new(row.id),
            email,
            role,
            is_verified: row.is_verified,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Internal row type for verification code queries.
#[derive(Debug, sqlx::FromRow)]
struct VerificationCodeRow {
    id: i32,
    user_id: i32,
    code: String,
    purpose: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<VerificationCodeRow> for VerificationCode {
    type Error = RepositoryError;

    fn try_from(row: VerificationCodeRow) -> Result<Self, Self::Error> {
        let purpose: VerificationPurpose = row.purpose.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid code purpose in database: {e}"))
        })?;

        Ok(Self {
            id: VerificationCodeId::new(row.id),
            user_id: UserId::new(row.user_id),
            code: row.code,
            purpose,
            created_at: row.created_at,
        })
    }
}

const USER_COLUMNS: &str = "id, email, role, is_verified, is_active, created_at, updated_at";

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new account.
    ///
    /// Accounts start inactive and unverified; verifying the registration
    /// code activates them.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        email: &Email,
        password_hash: &str,
        role: UserRole,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO app_user (email, password_hash, role) VALUES ($1, $2, $3) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(email.as_str())
        .bind(password_hash)
        .bind(role.to_string())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.try_into()
    }

    /// Get a user by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM app_user WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM app_user WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Get a user together with their password hash, by email.
    ///
    /// Returns `None` if no such user exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct WithHash {
            #[sqlx(flatten)]
            user: UserRow,
            password_hash: String,
        }

        let row = sqlx::query_as::<_, WithHash>(&format!(
            "SELECT {USER_COLUMNS}, password_hash FROM app_user WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some((r.user.try_into()?, r.password_hash))),
            None => Ok(None),
        }
    }

    /// Replace a user's password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_password_hash(
        &self,
        user_id: UserId,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE app_user SET password_hash = $2, updated_at = now() WHERE id = $1",
        )
        .bind(user_id.as_i32())
        .bind(password_hash)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Mark a user verified and active (successful registration code).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn mark_verified(&self, user_id: UserId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE app_user SET is_verified = TRUE, is_active = TRUE, updated_at = now() \
             WHERE id = $1",
        )
        .bind(user_id.as_i32())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// List all accounts in compact form, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<UserSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM app_user ORDER BY id ASC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let user: User = row.try_into()?;
                Ok(UserSummary {
                    id: user.id,
                    email: user.email,
                    role: user.role,
                    is_active: user.is_active,
                })
            })
            .collect()
    }

    // =========================================================================
    // Verification codes
    // =========================================================================

    /// Store a fresh code for (user, purpose), deleting any previous codes
    /// for that pair first. Both statements share a transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn replace_code(
        &self,
        user_id: UserId,
        purpose: VerificationPurpose,
        code: &str,
    ) -> Result<VerificationCode, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM email_verification WHERE user_id = $1 AND purpose = $2")
            .bind(user_id.as_i32())
            .bind(purpose.to_string())
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query_as::<_, VerificationCodeRow>(
            "INSERT INTO email_verification (user_id, code, purpose) VALUES ($1, $2, $3) \
             RETURNING id, user_id, code, purpose, created_at",
        )
        .bind(user_id.as_i32())
        .bind(code)
        .bind(purpose.to_string())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        row.try_into()
    }

    /// Store an additional code for (user, purpose) without touching
    /// earlier ones (resend keeps older codes valid).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn add_code(
        &self,
        user_id: UserId,
        purpose: VerificationPurpose,
        code: &str,
    ) -> Result<VerificationCode, RepositoryError> {
        let row = sqlx::query_as::<_, VerificationCodeRow>(
            "INSERT INTO email_verification (user_id, code, purpose) VALUES ($1, $2, $3) \
             RETURNING id, user_id, code, purpose, created_at",
        )
        .bind(user_id.as_i32())
        .bind(code)
        .bind(purpose.to_string())
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Find a pending code matching (user, code, purpose).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_code(
        &self,
        user_id: UserId,
        code: &str,
        purpose: VerificationPurpose,
    ) -> Result<Option<VerificationCode>, RepositoryError> {
        let row = sqlx::query_as::<_, VerificationCodeRow>(
            "SELECT id, user_id, code, purpose, created_at FROM email_verification \
             WHERE user_id = $1 AND code = $2 AND purpose = $3 \
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(user_id.as_i32())
        .bind(code)
        .bind(purpose.to_string())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Consume (delete) a code after successful use.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_code(&self, id: VerificationCodeId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM email_verification WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
