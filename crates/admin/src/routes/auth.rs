//! Admin authentication route handlers.

use axum::{Json, extract::State, http::HeaderMap};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_sessions::Session;

use crate::error::AppError;
use crate::middleware::{clear_current_admin, generate_csrf_token, set_current_admin};
use crate::models::CurrentAdmin;
use crate::services::auth::AdminAuthService;
use crate::state::AppState;

/// Proxy headers checked for the real client IP, in order.
const IP_HEADERS: &[&str] = &["cf-connecting-ip", "x-forwarded-for", "x-real-ip", "fly-client-ip"];

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Authenticated admin returned by login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionAdmin {
    pub username: String,
    pub display_name: String,
}

/// Response body for successful logins.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: SessionAdmin,
    /// Token to echo in `x-csrf-token` on every mutation.
    pub csrf_token: String,
}

/// Handle admin login.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let ip = client_ip(&headers);

    let auth = AdminAuthService::new(state.pool(), state.login_limiter());
    let admin = auth
        .login(&req.username, &req.password, ip.as_deref())
        .await?;

    let csrf_token = generate_csrf_token();
    let current = CurrentAdmin {
        id: admin.id,
        username: admin.username.clone(),
        display_name: admin.display_name.clone(),
        csrf_token: csrf_token.clone(),
        logged_in_at: Utc::now(),
        ip_address: ip,
    };

    set_current_admin(&session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("failed to set session: {e}")))?;

    Ok(Json(LoginResponse {
        user: SessionAdmin {
            username: admin.username,
            display_name: admin.display_name,
        },
        csrf_token,
    }))
}

/// Handle admin logout.
///
/// Idempotent; the cookie is cleared even when no session exists.
pub async fn logout(session: Session) -> Json<serde_json::Value> {
    if let Err(e) = clear_current_admin(&session).await {
        tracing::error!("Failed to clear session: {}", e);
    }

    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {}", e);
    }

    Json(json!({"success": true}))
}

/// Extract the client IP from proxy headers.
pub(crate) fn client_ip(headers: &HeaderMap) -> Option<String> {
    for header in IP_HEADERS {
        if let Some(ip) = headers
            .get(*header)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|s| s.trim().parse::<std::net::IpAddr>().ok())
        {
            return Some(ip.to_string());
        }
    }
    None
}
