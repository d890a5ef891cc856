//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use canineracks_core::recommend::CodeBook;

use crate::config::AppConfig;
use crate::services::EmailService;
use crate::services::auth::TokenSigner;
use crate::services::email::EmailError;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the database pool and the recommendation code
/// book.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    pool: PgPool,
    code_book: CodeBook,
    tokens: TokenSigner,
    email: EmailService,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The recommendation code book is built here, once, and handed to the
    /// matcher explicitly wherever it runs.
    ///
    /// # Errors
    ///
    /// Returns an error if the SMTP transport cannot be configured.
    pub fn new(config: AppConfig, pool: PgPool) -> Result<Self, EmailError> {
        let tokens = TokenSigner::new(&config.jwt_secret);
        let email = EmailService::new(config.email.as_ref())?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                code_book: CodeBook::standard(),
                tokens,
                email,
            }),
        })
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the recommendation code book.
    #[must_use]
    pub fn code_book(&self) -> &CodeBook {
        &self.inner.code_book
    }

    /// Get a reference to the token signer.
    #[must_use]
    pub fn tokens(&self) -> &TokenSigner {
        &self.inner.tokens
    }

    /// Get a reference to the email service.
    #[must_use]
    pub fn email(&self) -> &EmailService {
        &self.inner.email
    }
}
