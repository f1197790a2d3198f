//! Security audit event log.
//!
//! Append-only record of security-relevant admin events (logins, CSRF
//! rejections, destructive mutations). Presentation lives elsewhere; this
//! module only writes.

use sqlx::PgPool;

use super::RepositoryError;

/// Repository for audit event writes.
pub struct AuditRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AuditRepository<'a> {
    /// Create a new audit repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Append an audit event.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn record(
        &self,
        actor: &str,
        action: &str,
        detail: serde_json::Value,
        ip_address: Option<&str>,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO audit_events (actor, action, detail, ip_address)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(actor)
        .bind(action)
        .bind(detail)
        .bind(ip_address)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Append an audit event, logging instead of failing.
    ///
    /// Audit writes must never turn a handled security decision (e.g. a CSRF
    /// rejection) into a 500.
    pub async fn record_best_effort(
        &self,
        actor: &str,
        action: &str,
        detail: serde_json::Value,
        ip_address: Option<&str>,
    ) {
        if let Err(e) = self.record(actor, action, detail, ip_address).await {
            tracing::error!(error = %e, action, "failed to append audit event");
        }
    }
}
