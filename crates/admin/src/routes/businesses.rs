//! Tenant management route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
};
use serde_json::json;

use gifty_core::BusinessId;

use crate::db::audit::AuditRepository;
use crate::db::businesses::BusinessDirectory;
use crate::error::AppError;
use crate::middleware::{RequireAdmin, require_csrf};
use crate::routes::auth::client_ip;
use crate::state::AppState;

/// Delete a business and everything it owns.
///
/// CSRF-protected; the rejection is audited with the offending admin and IP
/// before the 403 goes out.
pub async fn delete_business(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, AppError> {
    let ip = client_ip(&headers);
    let audit = AuditRepository::new(state.pool());

    if let Err(rejection) = require_csrf(&headers, &admin) {
        audit
            .record_best_effort(
                &admin.username,
                "admin.csrf.rejected",
                json!({"endpoint": "delete_business", "businessId": id}),
                ip.as_deref(),
            )
            .await;
        return Err(rejection);
    }

    let business_id = BusinessId::new(id);
    let deleted = BusinessDirectory::new(state.pool())
        .delete(business_id)
        .await?;

    if !deleted {
        return Err(AppError::NotFound(format!("business {id}")));
    }

    audit
        .record_best_effort(
            &admin.username,
            "admin.business.deleted",
            json!({"businessId": id}),
            ip.as_deref(),
        )
        .await;

    Ok(Json(json!({"success": true})))
}
