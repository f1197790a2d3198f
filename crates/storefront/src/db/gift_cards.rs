//! Gift card repository.
//!
//! The balance decrement is a single conditional update: the guard
//! (`remaining_balance >= amount` and a redeemable status) and the new
//! balance/status are evaluated server-side in one statement, so two
//! concurrent redemptions can never both drain the same balance.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use gifty_core::{BusinessId, CustomerId, GiftCardId, GiftCardStatus};

use super::RepositoryError;
use crate::models::gift_card::{GiftCard, RedemptionOutcome};

#[derive(sqlx::FromRow)]
struct GiftCardRow {
    id: i32,
    business_id: i32,
    customer_id: Option<i32>,
    code: String,
    amount: Decimal,
    remaining_balance: Decimal,
    status: String,
    issued_at: DateTime<Utc>,
    redeemed_at: Option<DateTime<Utc>>,
    redeemed_by: Option<String>,
}

impl GiftCardRow {
    fn into_domain(self) -> Result<GiftCard, RepositoryError> {
        let status = self.status.parse::<GiftCardStatus>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid gift card status in database: {e}"))
        })?;

        Ok(GiftCard {
            id: GiftCardId::new(self.id),
            business_id: BusinessId::new(self.business_id),
            customer_id: self.customer_id.map(CustomerId::new),
            code: self.code,
            amount: self.amount,
            remaining_balance: self.remaining_balance,
            status,
            issued_at: self.issued_at,
            redeemed_at: self.redeemed_at,
            redeemed_by: self.redeemed_by,
        })
    }
}

/// Repository for gift card database operations.
pub struct GiftCardRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> GiftCardRepository<'a> {
    /// Create a new gift card repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a gift card scoped to its owning business.
    ///
    /// A card belonging to a different business is reported as absent, so the
    /// caller cannot distinguish cross-tenant cards from missing ones.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_for_business(
        &self,
        id: GiftCardId,
        business_id: BusinessId,
    ) -> Result<Option<GiftCard>, RepositoryError> {
        let row = sqlx::query_as::<_, GiftCardRow>(
            r"
            SELECT id, business_id, customer_id, code, amount, remaining_balance,
                   status, issued_at, redeemed_at, redeemed_by
            FROM gift_cards
            WHERE id = $1 AND business_id = $2
            ",
        )
        .bind(id.as_i32())
        .bind(business_id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(GiftCardRow::into_domain).transpose()
    }

    /// Atomically debit `amount` from a card's balance.
    ///
    /// The update only applies while the card is redeemable and holds at
    /// least `amount`; otherwise zero rows match and `None` is returned,
    /// leaving balance and status untouched. On a draining redemption the
    /// status flips to `redeemed` and `redeemed_at`/`redeemed_by` are
    /// stamped in the same statement.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails, or
    /// `DataCorruption` if the returned status cannot be parsed.
    pub async fn debit_balance(
        &self,
        id: GiftCardId,
        business_id: BusinessId,
        amount: Decimal,
        redeemed_by: &str,
    ) -> Result<Option<RedemptionOutcome>, RepositoryError> {
        let row: Option<(Decimal, String)> = sqlx::query_as(
            r"
            UPDATE gift_cards
            SET remaining_balance = remaining_balance - $3,
                status = CASE WHEN remaining_balance - $3 = 0
                              THEN 'redeemed' ELSE 'partially_redeemed' END,
                redeemed_at = CASE WHEN remaining_balance - $3 = 0
                                   THEN now() ELSE redeemed_at END,
                redeemed_by = CASE WHEN remaining_balance - $3 = 0
                                   THEN $4 ELSE redeemed_by END
            WHERE id = $1
              AND business_id = $2
              AND status IN ('issued', 'partially_redeemed')
              AND remaining_balance >= $3
            RETURNING remaining_balance, status
            ",
        )
        .bind(id.as_i32())
        .bind(business_id.as_i32())
        .bind(amount)
        .bind(redeemed_by)
        .fetch_optional(self.pool)
        .await?;

        row.map(|(remaining_balance, status)| {
            let status = status.parse::<GiftCardStatus>().map_err(|e| {
                RepositoryError::DataCorruption(format!(
                    "invalid gift card status in database: {e}"
                ))
            })?;
            Ok(RedemptionOutcome {
                remaining_balance,
                status,
            })
        })
        .transpose()
    }

    /// Append a row to the redemption log.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn record_redemption(
        &self,
        id: GiftCardId,
        business_id: BusinessId,
        amount: Decimal,
        balance_after: Decimal,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO gift_card_redemptions (gift_card_id, business_id, amount, balance_after)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(id.as_i32())
        .bind(business_id.as_i32())
        .bind(amount)
        .bind(balance_after)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Get the email address of the customer a card was issued to.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn customer_email(
        &self,
        customer_id: CustomerId,
    ) -> Result<Option<String>, RepositoryError> {
        let row: Option<(String,)> = sqlx::query_as(
            r"
            SELECT email FROM customers WHERE id = $1
            ",
        )
        .bind(customer_id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|(email,)| email))
    }
}
