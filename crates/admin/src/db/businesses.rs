//! Tenant directory operations for the admin panel.

use sqlx::PgPool;

use gifty_core::BusinessId;

use super::RepositoryError;

/// Repository for business management from the admin side.
pub struct BusinessDirectory<'a> {
    pool: &'a PgPool,
}

impl<'a> BusinessDirectory<'a> {
    /// Create a new business directory.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Delete a business and everything owned by it.
    ///
    /// Credentials, gift cards, and redemption logs go with it via foreign
    /// key cascades. Returns `false` when no such business exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: BusinessId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM businesses WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
