//! Business and credential repository.
//!
//! Provides lookups for business accounts and the persisted lockout state on
//! their credentials. Counter updates are single-statement server-side
//! mutations so concurrent login attempts cannot lose increments.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use gifty_core::{BusinessId, Email};

use super::RepositoryError;
use crate::models::business::{Business, BusinessCredential};

#[derive(sqlx::FromRow)]
struct BusinessRow {
    id: i32,
    name: String,
    contact_email: String,
    active: bool,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    business_id: i32,
    email: String,
    password_hash: String,
    failed_login_attempts: i32,
    account_locked_until: Option<DateTime<Utc>>,
    password_changed_at: DateTime<Utc>,
}

impl BusinessRow {
    fn into_domain(self) -> Result<Business, RepositoryError> {
        let contact_email = Email::parse(&self.contact_email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Business {
            id: BusinessId::new(self.id),
            name: self.name,
            contact_email,
            active: self.active,
            created_at: self.created_at,
        })
    }
}

impl CredentialRow {
    fn into_domain(self) -> Result<BusinessCredential, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(BusinessCredential {
            business_id: BusinessId::new(self.business_id),
            email,
            password_hash: self.password_hash,
            failed_login_attempts: self.failed_login_attempts,
            account_locked_until: self.account_locked_until,
            password_changed_at: self.password_changed_at,
        })
    }
}

/// Repository for business and credential database operations.
pub struct BusinessRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BusinessRepository<'a> {
    /// Create a new business repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a business by its contact email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<Business>, RepositoryError> {
        let row = sqlx::query_as::<_, BusinessRow>(
            r"
            SELECT id, name, contact_email, active, created_at
            FROM businesses
            WHERE contact_email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(BusinessRow::into_domain).transpose()
    }

    /// Get a business by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: BusinessId) -> Result<Option<Business>, RepositoryError> {
        let row = sqlx::query_as::<_, BusinessRow>(
            r"
            SELECT id, name, contact_email, active, created_at
            FROM businesses
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(BusinessRow::into_domain).transpose()
    }

    /// Get the credential row for a business, if a password has been set.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_credential(
        &self,
        business_id: BusinessId,
    ) -> Result<Option<BusinessCredential>, RepositoryError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r"
            SELECT business_id, email, password_hash, failed_login_attempts,
                   account_locked_until, password_changed_at
            FROM business_credentials
            WHERE business_id = $1
            ",
        )
        .bind(business_id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(CredentialRow::into_domain).transpose()
    }

    /// Record a failed login attempt and return the updated counter.
    ///
    /// The increment happens server-side in one statement, so concurrent
    /// failures cannot lose updates.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no credential row exists.
    pub async fn record_failed_attempt(
        &self,
        business_id: BusinessId,
    ) -> Result<i32, RepositoryError> {
        let count: Option<(i32,)> = sqlx::query_as(
            r"
            UPDATE business_credentials
            SET failed_login_attempts = failed_login_attempts + 1
            WHERE business_id = $1
            RETURNING failed_login_attempts
            ",
        )
        .bind(business_id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        count.map(|(n,)| n).ok_or(RepositoryError::NotFound)
    }

    /// Lock the account until `until` and restart the failure counter.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn lock_account(
        &self,
        business_id: BusinessId,
        until: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            UPDATE business_credentials
            SET account_locked_until = $2, failed_login_attempts = 0
            WHERE business_id = $1
            ",
        )
        .bind(business_id.as_i32())
        .bind(until)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Reset the failure counter and clear any lockout (successful login).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn clear_failed_attempts(
        &self,
        business_id: BusinessId,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            UPDATE business_credentials
            SET failed_login_attempts = 0, account_locked_until = NULL
            WHERE business_id = $1
            ",
        )
        .bind(business_id.as_i32())
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Set or replace the password for a business (password reset).
    ///
    /// Creates the credential row on first use; resets the failure counter,
    /// clears any lockout, and stamps `password_changed_at`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    pub async fn upsert_credential(
        &self,
        business_id: BusinessId,
        email: &Email,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO business_credentials
                (business_id, email, password_hash, failed_login_attempts,
                 account_locked_until, password_changed_at)
            VALUES ($1, $2, $3, 0, NULL, now())
            ON CONFLICT (business_id) DO UPDATE
            SET password_hash = EXCLUDED.password_hash,
                failed_login_attempts = 0,
                account_locked_until = NULL,
                password_changed_at = now()
            ",
        )
        .bind(business_id.as_i32())
        .bind(email.as_str())
        .bind(password_hash)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}
