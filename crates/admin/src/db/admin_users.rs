//! Admin user repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use gifty_core::AdminUserId;

use super::RepositoryError;
use crate::models::admin_user::AdminUser;

#[derive(sqlx::FromRow)]
struct AdminUserRow {
    id: i32,
    username: String,
    password_hash: String,
    display_name: String,
    active: bool,
    created_at: DateTime<Utc>,
}

/// Repository for admin user database operations.
pub struct AdminUserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminUserRepository<'a> {
    /// Create a new admin user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an admin user and password hash by username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_username(
        &self,
        username: &str,
    ) -> Result<Option<(AdminUser, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminUserRow>(
            r"
            SELECT id, username, password_hash, display_name, active, created_at
            FROM admin_users
            WHERE username = $1
            ",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| {
            (
                AdminUser {
                    id: AdminUserId::new(r.id),
                    username: r.username,
                    display_name: r.display_name,
                    active: r.active,
                    created_at: r.created_at,
                },
                r.password_hash,
            )
        }))
    }
}
