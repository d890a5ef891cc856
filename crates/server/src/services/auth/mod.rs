//! Authentication service.
//!
//! Registration, login, verification codes, and password reset. Passwords
//! are hashed with Argon2id; API access uses signed bearer tokens.

mod error;
pub mod tokens;

pub use error::AuthError;
pub use tokens::{Claims, TokenPair, TokenSigner, TokenUse};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use rand::Rng;
use sqlx::PgPool;

use canineracks_core::{Email, UserRole, VerificationPurpose};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::user::User;

/// Minimum password length (matches the registration contract).
const MIN_PASSWORD_LENGTH: usize = 6;

/// Verification code alphabet: uppercase letters and digits.
const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
/// Verification code length.
const CODE_LENGTH: usize = 5;

/// Authentication service.
///
/// Wraps the user repository with registration, login, and code flows.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    signer: &'a TokenSigner,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, signer: &'a TokenSigner) -> Self {
        Self {
            users: UserRepository::new(pool),
            signer,
        }
    }

    // =========================================================================
    // Registration & Login
    // =========================================================================

    /// Register a new customer account.
    ///
    /// The account starts inactive and unverified; a registration code is
    /// issued by the caller right after.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password is too short.
    /// Returns `AuthError::UserAlreadyExists` if the email is taken.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(&email, &password_hash, UserRole::Customer)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Log in with email and password.
    ///
    /// Unverified accounts are rejected even with correct credentials.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for wrong email/password,
    /// `AuthError::NotVerified` for unverified accounts.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, TokenPair), AuthError> {
        let email = Email::parse(email)?;

        let (user, password_hash) = self
            .users
            .get_with_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        if !user.is_verified {
            return Err(AuthError::NotVerified);
        }

        let pair = self.signer.issue_pair(user.id, user.role)?;
        Ok((user, pair))
    }

    /// Exchange a refresh token for a fresh access token.
    ///
    /// The user is re-read so a deactivated account stops refreshing.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Token` for bad tokens, `AuthError::InvalidCredentials`
    /// if the account no longer exists or is inactive.
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, AuthError> {
        let claims = self.signer.verify(refresh_token, TokenUse::Refresh)?;

        let user = self
            .users
            .get_by_id(claims.user_id())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.is_active {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(self.signer.issue(user.id, user.role, TokenUse::Access)?)
    }

    // =========================================================================
    // Verification codes
    // =========================================================================

    /// Issue a fresh code for (email, purpose), replacing earlier codes
    /// for that pair.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` for unknown emails.
    pub async fn issue_code(
        &self,
        email: &str,
        purpose: VerificationPurpose,
    ) -> Result<(User, String), AuthError> {
        let email = Email::parse(email)?;
        let user = self
            .users
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let code = generate_code();
        self.users.replace_code(user.id, purpose, &code).await?;

        Ok((user, code))
    }

    /// Issue an additional code without invalidating earlier ones.
    ///
    /// Resending a registration code to an already-verified account is
    /// rejected.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` for unknown emails,
    /// `AuthError::AlreadyVerified` for verified accounts re-requesting a
    /// registration code.
    pub async fn resend_code(
        &self,
        email: &str,
        purpose: VerificationPurpose,
    ) -> Result<(User, String), AuthError> {
        let email = Email::parse(email)?;
        let user = self
            .users
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if user.is_verified && purpose == VerificationPurpose::Register {
            return Err(AuthError::AlreadyVerified);
        }

        let code = generate_code();
        self.users.add_code(user.id, purpose, &code).await?;

        Ok((user, code))
    }

    /// Verify a code. Registration codes activate the account and are
    /// consumed; reset codes stay pending until the password is set.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` for unknown emails,
    /// `AuthError::InvalidCode` when no pending code matches.
    pub async fn verify_code(
        &self,
        email: &str,
        code: &str,
        purpose: VerificationPurpose,
    ) -> Result<(), AuthError> {
        let email = Email::parse(email)?;
        let user = self
            .users
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let pending = self
            .users
            .find_code(user.id, code, purpose)
            .await?
            .ok_or(AuthError::InvalidCode)?;

        if purpose == VerificationPurpose::Register {
            self.users.mark_verified(user.id).await?;
            self.users.delete_code(pending.id).await?;
        }

        Ok(())
    }

    /// Reset a password with a pending reset code. The code is consumed.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` for unknown emails,
    /// `AuthError::InvalidCode` when no pending reset code matches,
    /// `AuthError::WeakPassword` for a too-short replacement.
    pub async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let email = Email::parse(email)?;
        validate_password(new_password)?;

        let user = self
            .users
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let pending = self
            .users
            .find_code(user.id, code, VerificationPurpose::Reset)
            .await?
            .ok_or(AuthError::InvalidCode)?;

        let password_hash = hash_password(new_password)?;
        self.users.set_password_hash(user.id, &password_hash).await?;
        self.users.delete_code(pending.id).await?;

        Ok(())
    }
}

/// Generate a 5-character uppercase alphanumeric verification code.
#[must_use]
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..CODE_CHARSET.len());
            #[allow(clippy::indexing_slicing)] // idx is bounded by the range above
            {
                CODE_CHARSET[idx] as char
            }
        })
        .collect()
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_code_shape() {
        for _ in 0..50 {
            let code = generate_code();
            assert_eq!(code.len(), CODE_LENGTH);
            assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("correct-horse").unwrap();
        assert!(verify_password("correct-horse", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong-horse", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_validate_password_minimum_length() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("longer").is_ok());
    }

    #[test]
    fn test_garbage_hash_rejected() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
