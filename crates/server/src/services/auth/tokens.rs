//! Bearer token issuing and verification.
//!
//! Access tokens authenticate API requests for a day; refresh tokens mint
//! new access tokens for a week. Both are signed with the configured
//! secret; nothing is stored server-side.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use canineracks_core::{UserId, UserRole};

/// Access token lifetime.
const ACCESS_TOKEN_TTL_HOURS: i64 = 24;
/// Refresh token lifetime.
const REFRESH_TOKEN_TTL_HOURS: i64 = 24 * 7;

/// Errors that can occur when issuing or verifying tokens.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Signature mismatch, garbage input, or expired token.
    #[error("token is invalid or expired")]
    Invalid,

    /// A valid token of the wrong kind (refresh where access expected,
    /// or vice versa).
    #[error("wrong token type")]
    WrongType,

    /// Signing failed (malformed key material).
    #[error("token signing failed")]
    Signing,
}

/// Which of the two token kinds a set of claims belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenUse {
    Access,
    Refresh,
}

/// Signed claims carried by every token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID.
    pub sub: i32,
    /// Role at issue time.
    pub role: UserRole,
    /// Access or refresh.
    pub token_use: TokenUse,
    /// Issued-at (unix seconds).
    pub iat: i64,
    /// Expiry (unix seconds).
    pub exp: i64,
}

impl Claims {
    /// The subject as a typed user ID.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        UserId::new(self.sub)
    }
}

/// An access/refresh token pair, as returned by login.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Signs and verifies bearer tokens with a shared secret.
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenSigner {
    /// Create a signer from the configured secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
        }
    }

    /// Issue an access/refresh pair for a user.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if encoding fails.
    pub fn issue_pair(&self, user_id: UserId, role: UserRole) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access: self.issue(user_id, role, TokenUse::Access)?,
            refresh: self.issue(user_id, role, TokenUse::Refresh)?,
        })
    }

    /// Issue a single token.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if encoding fails.
    pub fn issue(
        &self,
        user_id: UserId,
        role: UserRole,
        token_use: TokenUse,
    ) -> Result<String, TokenError> {
        let ttl_hours = match token_use {
            TokenUse::Access => ACCESS_TOKEN_TTL_HOURS,
            TokenUse::Refresh => REFRESH_TOKEN_TTL_HOURS,
        };
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.as_i32(),
            role,
            token_use,
            iat: now.timestamp(),
            exp: (now + Duration::hours(ttl_hours)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(|_| TokenError::Signing)
    }

    /// Verify a token and check it is of the expected kind.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Invalid` for bad signatures or expired tokens,
    /// `TokenError::WrongType` when the kind doesn't match.
    pub fn verify(&self, token: &str, expected: TokenUse) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|_| TokenError::Invalid)?;

        if data.claims.token_use != expected {
            return Err(TokenError::WrongType);
        }

        Ok(data.claims)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn signer() -> TokenSigner {
        TokenSigner::new(&SecretString::from("kD8#mQ2$vR7!xT4@wZ9%nB1^cF6&hJ3*"))
    }

    #[test]
    fn test_access_token_roundtrip() {
        let signer = signer();
        let token = signer
            .issue(UserId::new(42), UserRole::Customer, TokenUse::Access)
            .unwrap();

        let claims = signer.verify(&token, TokenUse::Access).unwrap();
        assert_eq!(claims.user_id(), UserId::new(42));
        assert_eq!(claims.role, UserRole::Customer);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_refresh_token_rejected_as_access() {
        let signer = signer();
        let pair = signer
            .issue_pair(UserId::new(1), UserRole::InventoryManager)
            .unwrap();

        assert!(matches!(
            signer.verify(&pair.refresh, TokenUse::Access),
            Err(TokenError::WrongType)
        ));
        assert!(signer.verify(&pair.refresh, TokenUse::Refresh).is_ok());
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        let signer = signer();
        assert!(matches!(
            signer.verify("not-a-token", TokenUse::Access),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_tampered_token_is_invalid() {
        let signer = signer();
        let other = TokenSigner::new(&SecretString::from("qW5$eR8#tY2!uI6@oP0%aS3^dF7&gH1*"));
        let token = other
            .issue(UserId::new(7), UserRole::Customer, TokenUse::Access)
            .unwrap();

        assert!(matches!(
            signer.verify(&token, TokenUse::Access),
            Err(TokenError::Invalid)
        ));
    }
}
