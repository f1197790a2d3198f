//! Authentication route handlers.
//!
//! JSON API for owner login/logout, magic-link login, and password reset.

use axum::{
    Json,
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_sessions::Session;

use gifty_core::{BusinessId, Email};

use crate::error::AppError;
use crate::middleware::{clear_current_owner, client_ip, set_current_owner};
use crate::models::CurrentOwner;
use crate::models::business::Business;
use crate::services::auth::AuthService;
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Magic-link and password-reset request body.
#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    pub email: String,
}

/// Password reset completion body.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

/// Token query parameter for verification endpoints.
#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    pub token: Option<String>,
}

/// Authenticated identity returned by login-style endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub email: Email,
    pub business_id: BusinessId,
    pub business_name: String,
}

/// Response body for successful logins.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: SessionUser,
}

// =============================================================================
// Login / Logout
// =============================================================================

/// Handle password login.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let ip = client_ip(&headers).map(|ip| ip.to_string());

    let auth = AuthService::new(state.pool(), state.login_limiter());
    let business = auth
        .login_with_password(&req.email, &req.password, ip.as_deref())
        .await?;

    let user = establish_owner_session(&session, &business, &headers, ip).await?;

    Ok(Json(LoginResponse { user }))
}

/// Handle logout.
///
/// Idempotent: clearing an absent session is still a success, and the cookie
/// is cleared even if the store delete fails.
pub async fn logout(session: Session) -> Json<serde_json::Value> {
    if let Err(e) = clear_current_owner(&session).await {
        tracing::error!("Failed to clear session: {}", e);
    }

    // Also destroy the persisted session record
    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {}", e);
    }

    Json(json!({"success": true}))
}

// =============================================================================
// Magic Links
// =============================================================================

/// Handle a magic-link request.
///
/// Always responds success for well-formed emails, whether or not an account
/// exists; dispatch is skipped internally for unknown ones.
pub async fn request_magic_link(
    State(state): State<AppState>,
    Json(req): Json<EmailRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let auth = AuthService::new(state.pool(), state.login_limiter());

    match auth.request_magic_link(&req.email).await {
        Ok(Some(token)) => {
            let link = format!(
                "{}/api/auth/verify?token={}",
                state.config().base_url,
                token.token
            );
            if let Err(e) = state.mailer().send_magic_link(&token.email, &link).await {
                // Non-fatal: the token stays valid
                tracing::warn!(error = %e, "magic link dispatch failed");
            }
        }
        Ok(None) => {}
        Err(e) => return Err(e.into()),
    }

    Ok(Json(json!({
        "success": true,
        "message": "Magic link sent! Check your email for a sign-in link.",
    })))
}

/// Exchange a magic-link token for a session.
///
/// Redirects to the dashboard on success, or back to the login page with an
/// error query parameter on any failure.
pub async fn verify_magic_link(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Query(query): Query<TokenQuery>,
) -> Response {
    let Some(token) = query.token else {
        return Redirect::to("/login?error=invalid_link").into_response();
    };

    let auth = AuthService::new(state.pool(), state.login_limiter());
    let Some(business) = auth.verify_magic_link(&token).await else {
        return Redirect::to("/login?error=invalid_link").into_response();
    };

    let ip = client_ip(&headers).map(|ip| ip.to_string());
    if let Err(e) = establish_owner_session(&session, &business, &headers, ip).await {
        tracing::error!(error = %e, "failed to establish session after magic link");
        return Redirect::to("/login?error=session").into_response();
    }

    Redirect::to("/dashboard").into_response()
}

// =============================================================================
// Password Reset
// =============================================================================

/// Handle a password-reset request.
///
/// Same anti-enumeration contract as magic links: always success.
pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(req): Json<EmailRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let auth = AuthService::new(state.pool(), state.login_limiter());

    match auth.request_password_reset(&req.email).await {
        Ok(Some(token)) => {
            let link = format!(
                "{}/reset-password?token={}",
                state.config().base_url,
                token.token
            );
            if let Err(e) = state.mailer().send_password_reset(&token.email, &link).await {
                tracing::warn!(error = %e, "password reset dispatch failed");
            }
        }
        Ok(None) => {}
        Err(e) => return Err(e.into()),
    }

    Ok(Json(json!({
        "success": true,
        "message": "If that email is registered, a reset link is on its way.",
    })))
}

/// Read-only reset token validity check.
///
/// Strictly side-effect-free so the client can pre-validate before rendering
/// the reset form.
pub async fn check_reset_token(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Some(token) = query.token else {
        return Ok(Json(json!({"valid": false, "error": "Missing token"})));
    };

    let auth = AuthService::new(state.pool(), state.login_limiter());
    match auth.check_reset_token(&token).await? {
        Some(email) => Ok(Json(json!({"valid": true, "email": email}))),
        None => Ok(Json(
            json!({"valid": false, "error": "Invalid or expired token"}),
        )),
    }
}

/// Complete a password reset and log the owner in.
pub async fn reset_password(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let ip = client_ip(&headers).map(|ip| ip.to_string());

    let auth = AuthService::new(state.pool(), state.login_limiter());
    let business = auth
        .reset_password(&req.token, &req.password, ip.as_deref())
        .await?;

    let user = establish_owner_session(&session, &business, &headers, ip).await?;

    Ok(Json(LoginResponse { user }))
}

// =============================================================================
// Helpers
// =============================================================================

/// Populate the session with the owner identity and return the API view.
async fn establish_owner_session(
    session: &Session,
    business: &Business,
    headers: &HeaderMap,
    ip: Option<String>,
) -> Result<SessionUser, AppError> {
    let user_agent = headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(ToOwned::to_owned);

    let owner = CurrentOwner {
        business_id: business.id,
        email: business.contact_email.clone(),
        business_name: business.name.clone(),
        logged_in_at: Utc::now(),
        ip_address: ip,
        user_agent,
    };

    set_current_owner(session, &owner)
        .await
        .map_err(|e| AppError::Internal(format!("failed to set session: {e}")))?;

    Ok(SessionUser {
        email: owner.email,
        business_id: owner.business_id,
        business_name: owner.business_name,
    })
}
