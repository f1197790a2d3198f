//! Gift card redemption engine.
//!
//! Validates a redemption request against a card's remaining balance and
//! applies the balance transition atomically. Confirmation mail to the
//! customer is best-effort and never affects the redemption result.

use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

use gifty_core::GiftCardId;

use crate::db::RepositoryError;
use crate::db::gift_cards::GiftCardRepository;
use crate::models::gift_card::RedemptionOutcome;
use crate::models::session::CurrentOwner;
use crate::services::mailer::Mailer;

/// Errors that can occur during redemption.
#[derive(Debug, Error)]
pub enum RedemptionError {
    /// Amount is zero, negative, or otherwise unusable.
    #[error("redemption amount must be a positive number")]
    InvalidAmount,

    /// Card does not exist for this business.
    ///
    /// Cross-tenant lookups land here too, so an owner cannot probe for
    /// other businesses' cards.
    #[error("gift card not found")]
    NotFound,

    /// Card is fully redeemed, expired, or cancelled.
    #[error("gift card has no redeemable balance")]
    NotRedeemable,

    /// Requested amount exceeds the remaining balance.
    #[error("amount exceeds remaining balance ({remaining})")]
    InsufficientBalance {
        /// Balance still on the card.
        remaining: Decimal,
    },

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Validate a requested redemption amount.
///
/// # Errors
///
/// Returns `RedemptionError::InvalidAmount` unless `amount` is positive.
pub fn validate_redemption_amount(amount: Decimal) -> Result<(), RedemptionError> {
    if amount > Decimal::ZERO {
        Ok(())
    } else {
        Err(RedemptionError::InvalidAmount)
    }
}

/// Gift card redemption service.
pub struct RedemptionService<'a> {
    cards: GiftCardRepository<'a>,
    mailer: &'a Mailer,
}

impl<'a> RedemptionService<'a> {
    /// Create a new redemption service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, mailer: &'a Mailer) -> Self {
        Self {
            cards: GiftCardRepository::new(pool),
            mailer,
        }
    }

    /// Redeem `amount` from a gift card on behalf of the logged-in owner.
    ///
    /// Validation order: amount, existence/ownership, redeemable status,
    /// sufficient balance. The debit itself is one conditional update, so a
    /// concurrent redemption that wins the race surfaces here as an error
    /// with the card untouched, never as an overdraft.
    ///
    /// # Errors
    ///
    /// See [`RedemptionError`]; on any error the card's balance and status
    /// are unchanged.
    pub async fn redeem(
        &self,
        card_id: GiftCardId,
        amount: Decimal,
        owner: &CurrentOwner,
    ) -> Result<RedemptionOutcome, RedemptionError> {
        validate_redemption_amount(amount)?;

        let card = self
            .cards
            .get_for_business(card_id, owner.business_id)
            .await?
            .ok_or(RedemptionError::NotFound)?;

        if !card.status.is_redeemable() || card.remaining_balance.is_zero() {
            return Err(RedemptionError::NotRedeemable);
        }

        if amount > card.remaining_balance {
            return Err(RedemptionError::InsufficientBalance {
                remaining: card.remaining_balance,
            });
        }

        let outcome = match self
            .cards
            .debit_balance(card_id, owner.business_id, amount, owner.email.as_str())
            .await?
        {
            Some(outcome) => outcome,
            // A concurrent redemption won the race between our read and the
            // conditional update; re-read to classify the refusal.
            None => {
                let current = self
                    .cards
                    .get_for_business(card_id, owner.business_id)
                    .await?
                    .ok_or(RedemptionError::NotFound)?;
                if !current.status.is_redeemable() || current.remaining_balance.is_zero() {
                    return Err(RedemptionError::NotRedeemable);
                }
                return Err(RedemptionError::InsufficientBalance {
                    remaining: current.remaining_balance,
                });
            }
        };

        // The balance change is committed; the log row must not undo it
        if let Err(e) = self
            .cards
            .record_redemption(card_id, owner.business_id, amount, outcome.remaining_balance)
            .await
        {
            tracing::error!(error = %e, card_id = %card_id, "failed to append redemption log");
        }

        self.notify_customer(&card.customer_id, owner, amount, &outcome)
            .await;

        Ok(outcome)
    }

    /// Best-effort confirmation email; failures are logged only.
    async fn notify_customer(
        &self,
        customer_id: &Option<gifty_core::CustomerId>,
        owner: &CurrentOwner,
        amount: Decimal,
        outcome: &RedemptionOutcome,
    ) {
        let Some(customer_id) = customer_id else {
            return;
        };

        let to = match self.cards.customer_email(*customer_id).await {
            Ok(Some(email)) => email,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!(error = %e, "customer lookup failed for redemption receipt");
                return;
            }
        };

        if let Err(e) = self
            .mailer
            .send_redemption_receipt(
                &to,
                &owner.business_name,
                amount,
                outcome.remaining_balance,
            )
            .await
        {
            tracing::warn!(error = %e, "redemption receipt dispatch failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_amount_is_valid() {
        assert!(validate_redemption_amount(Decimal::new(2500, 2)).is_ok());
    }

    #[test]
    fn test_zero_amount_is_invalid() {
        assert!(matches!(
            validate_redemption_amount(Decimal::ZERO),
            Err(RedemptionError::InvalidAmount)
        ));
    }

    #[test]
    fn test_negative_amount_is_invalid() {
        assert!(matches!(
            validate_redemption_amount(Decimal::new(-100, 2)),
            Err(RedemptionError::InvalidAmount)
        ));
    }
}
