//! Gift card domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use gifty_core::{BusinessId, CustomerId, GiftCardId, GiftCardStatus};

/// A gift card issued by a business (domain type).
#[derive(Debug, Clone)]
pub struct GiftCard {
    /// Unique gift card ID.
    pub id: GiftCardId,
    /// Issuing business; redemption is scoped to it.
    pub business_id: BusinessId,
    /// Customer the card was issued to, if known.
    pub customer_id: Option<CustomerId>,
    /// Human-facing card code, unique per business.
    pub code: String,
    /// Issued amount; fixed for the card's lifetime.
    pub amount: Decimal,
    /// Spendable balance; only decreases, via redemption.
    pub remaining_balance: Decimal,
    /// Cached view of `remaining_balance` vs `amount`.
    pub status: GiftCardStatus,
    /// When the card was issued.
    pub issued_at: DateTime<Utc>,
    /// When the balance reached zero.
    pub redeemed_at: Option<DateTime<Utc>>,
    /// Who performed the final redemption.
    pub redeemed_by: Option<String>,
}

/// Result of a successful redemption.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedemptionOutcome {
    /// Balance left on the card after the redemption.
    pub remaining_balance: Decimal,
    /// Status the card moved to.
    pub status: GiftCardStatus,
}
