//! Email service for sending verification codes.
//!
//! Uses SMTP via lettre for delivery with Askama templates. Without SMTP
//! configuration the service runs in log-only mode: codes are written to
//! the log instead of sent, which is what local development and the
//! integration tests rely on.

use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use canineracks_core::{Email, VerificationPurpose};

use crate::config::EmailConfig;

/// HTML template for verification code email.
#[derive(Template)]
#[template(path = "email/verification_code.html")]
struct VerificationCodeEmailHtml<'a> {
    code: &'a str,
    purpose: &'a str,
}

/// Plain text template for verification code email.
#[derive(Template)]
#[template(path = "email/verification_code.txt")]
struct VerificationCodeEmailText<'a> {
    code: &'a str,
    purpose: &'a str,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Email service for transactional mail.
#[derive(Clone)]
pub struct EmailService {
    delivery: Delivery,
}

#[derive(Clone)]
enum Delivery {
    Smtp {
        mailer: AsyncSmtpTransport<Tokio1Executor>,
        from_address: String,
    },
    /// No SMTP configured: log instead of sending.
    LogOnly,
}

impl EmailService {
    /// Create an email service. `None` configures log-only delivery.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay cannot be configured.
    pub fn new(config: Option<&EmailConfig>) -> Result<Self, EmailError> {
        let Some(config) = config else {
            return Ok(Self {
                delivery: Delivery::LogOnly,
            });
        };

        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            delivery: Delivery::Smtp {
                mailer,
                from_address: config.from_address.clone(),
            },
        })
    }

    /// Send a verification code for registration or password reset.
    ///
    /// # Errors
    ///
    /// Returns error if the mail fails to render or send.
    pub async fn send_verification_code(
        &self,
        to: &Email,
        code: &str,
        purpose: VerificationPurpose,
    ) -> Result<(), EmailError> {
        let purpose_label = purpose.to_string();
        let html = VerificationCodeEmailHtml {
            code,
            purpose: &purpose_label,
        }
        .render()?;
        let text = VerificationCodeEmailText {
            code,
            purpose: &purpose_label,
        }
        .render()?;

        self.send_multipart_email(to, "Your CanineRacks Verification Code", &text, &html)
            .await
    }

    /// Send a multipart email with both plain text and HTML versions.
    async fn send_multipart_email(
        &self,
        to: &Email,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), EmailError> {
        let Delivery::Smtp {
            mailer,
            from_address,
        } = &self.delivery
        else {
            tracing::info!(to = %to, subject, "email delivery disabled; body:\n{text_body}");
            return Ok(());
        };

        let email = Message::builder()
            .from(
                from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(from_address.clone()))?,
            )
            .to(to
                .as_str()
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )?;

        mailer.send(email).await?;
        Ok(())
    }
}
