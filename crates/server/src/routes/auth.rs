//! Account route handlers: registration, login, verification codes, and
//! password reset.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use canineracks_core::{Email, UserId, UserRole, VerificationPurpose};

use crate::error::Result;
use crate::services::AuthService;
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Refresh request body.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Send/resend verification code request body.
#[derive(Debug, Deserialize)]
pub struct SendCodeRequest {
    pub email: String,
    pub purpose: VerificationPurpose,
}

/// Verify code request body.
#[derive(Debug, Deserialize)]
pub struct VerifyCodeRequest {
    pub email: String,
    pub code: String,
    pub purpose: VerificationPurpose,
}

/// Password reset request body.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

// =============================================================================
// Response Types
// =============================================================================

/// The user payload embedded in the login response.
#[derive(Debug, Serialize)]
pub struct LoginUser {
    pub id: UserId,
    pub email: Email,
    pub is_verified: bool,
    pub role: UserRole,
}

/// Login response: a token pair plus the account summary.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    pub user: LoginUser,
}

// =============================================================================
// Handlers
// =============================================================================

/// Register a new customer account and email a verification code.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let auth = AuthService::new(state.pool(), state.tokens());

    let user = auth.register(&body.email, &body.password).await?;
    let (user, code) = auth
        .issue_code(user.email.as_str(), VerificationPurpose::Register)
        .await?;

    state
        .email()
        .send_verification_code(&user.email, &code, VerificationPurpose::Register)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": user.id, "email": user.email })),
    ))
}

/// Log in and receive an access/refresh token pair.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let auth = AuthService::new(state.pool(), state.tokens());
    let (user, pair) = auth.login(&body.email, &body.password).await?;

    Ok(Json(LoginResponse {
        access: pair.access,
        refresh: pair.refresh,
        user: LoginUser {
            id: user.id,
            email: user.email,
            is_verified: user.is_verified,
            role: user.role,
        },
    }))
}

/// Exchange a refresh token for a fresh access token.
pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<Value>> {
    let auth = AuthService::new(state.pool(), state.tokens());
    let access = auth.refresh(&body.refresh).await?;

    Ok(Json(json!({ "access": access })))
}

/// Issue a verification code, replacing any earlier code for the same
/// purpose.
pub async fn send_code(
    State(state): State<AppState>,
    Json(body): Json<SendCodeRequest>,
) -> Result<Json<Value>> {
    let auth = AuthService::new(state.pool(), state.tokens());
    let (user, code) = auth.issue_code(&body.email, body.purpose).await?;

    state
        .email()
        .send_verification_code(&user.email, &code, body.purpose)
        .await?;

    Ok(Json(
        json!({ "message": format!("Verification code sent to {}", user.email) }),
    ))
}

/// Resend a verification code without invalidating earlier ones.
pub async fn resend_code(
    State(state): State<AppState>,
    Json(body): Json<SendCodeRequest>,
) -> Result<Json<Value>> {
    let auth = AuthService::new(state.pool(), state.tokens());
    let (user, code) = auth.resend_code(&body.email, body.purpose).await?;

    state
        .email()
        .send_verification_code(&user.email, &code, body.purpose)
        .await?;

    Ok(Json(
        json!({ "message": "Verification code resent successfully." }),
    ))
}

/// Verify a code. Registration codes activate the account.
pub async fn verify_code(
    State(state): State<AppState>,
    Json(body): Json<VerifyCodeRequest>,
) -> Result<Json<Value>> {
    let auth = AuthService::new(state.pool(), state.tokens());
    auth.verify_code(&body.email, &body.code, body.purpose)
        .await?;

    Ok(Json(json!({ "message": "Verification successful." })))
}

/// Reset a password with a pending reset code.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<Json<Value>> {
    let auth = AuthService::new(state.pool(), state.tokens());
    auth.reset_password(&body.email, &body.code, &body.new_password)
        .await?;

    Ok(Json(
        json!({ "message": "Password has been reset successfully." }),
    ))
}
