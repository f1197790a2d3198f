//! Gift card lifecycle status.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a gift card.
///
/// The status is a cached view of `remaining_balance` vs `amount`:
/// `PartiallyRedeemed` iff `0 < remaining < amount`, `Redeemed` iff
/// `remaining == 0`. `Expired` and `Cancelled` are terminal states set
/// outside the redemption path and block further redemption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GiftCardStatus {
    #[default]
    Issued,
    PartiallyRedeemed,
    Redeemed,
    Expired,
    Cancelled,
}

impl GiftCardStatus {
    /// Derive the status implied by a balance against the issued amount.
    ///
    /// Only meaningful for cards on the redemption path; terminal states
    /// (`Expired`, `Cancelled`) are never derived.
    #[must_use]
    pub fn derive_for_balance(remaining: Decimal, amount: Decimal) -> Self {
        if remaining.is_zero() {
            Self::Redeemed
        } else if remaining < amount {
            Self::PartiallyRedeemed
        } else {
            Self::Issued
        }
    }

    /// Whether a card in this status can still be redeemed against.
    #[must_use]
    pub const fn is_redeemable(self) -> bool {
        matches!(self, Self::Issued | Self::PartiallyRedeemed)
    }

    /// Wire/database representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Issued => "issued",
            Self::PartiallyRedeemed => "partially_redeemed",
            Self::Redeemed => "redeemed",
            Self::Expired => "expired",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for GiftCardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a [`GiftCardStatus`] from its wire representation.
#[derive(thiserror::Error, Debug, Clone)]
#[error("unknown gift card status: {0}")]
pub struct ParseStatusError(String);

impl std::str::FromStr for GiftCardStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "issued" => Ok(Self::Issued),
            "partially_redeemed" => Ok(Self::PartiallyRedeemed),
            "redeemed" => Ok(Self::Redeemed),
            "expired" => Ok(Self::Expired),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(ParseStatusError(other.to_owned())),
        }
    }
}

// SQLx support (with postgres feature): stored as TEXT
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for GiftCardStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for GiftCardStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(s.parse::<Self>()?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for GiftCardStatus {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // Decimal::new(5000, 2) == 50.00
    #[test]
    fn test_derive_full_balance_is_issued() {
        assert_eq!(
            GiftCardStatus::derive_for_balance(Decimal::new(5000, 2), Decimal::new(5000, 2)),
            GiftCardStatus::Issued
        );
    }

    #[test]
    fn test_derive_partial_balance() {
        assert_eq!(
            GiftCardStatus::derive_for_balance(Decimal::new(2000, 2), Decimal::new(5000, 2)),
            GiftCardStatus::PartiallyRedeemed
        );
        assert_eq!(
            GiftCardStatus::derive_for_balance(Decimal::new(1, 2), Decimal::new(5000, 2)),
            GiftCardStatus::PartiallyRedeemed
        );
    }

    #[test]
    fn test_derive_zero_balance_is_redeemed() {
        assert_eq!(
            GiftCardStatus::derive_for_balance(Decimal::ZERO, Decimal::new(5000, 2)),
            GiftCardStatus::Redeemed
        );
    }

    #[test]
    fn test_redeemable() {
        assert!(GiftCardStatus::Issued.is_redeemable());
        assert!(GiftCardStatus::PartiallyRedeemed.is_redeemable());
        assert!(!GiftCardStatus::Redeemed.is_redeemable());
        assert!(!GiftCardStatus::Expired.is_redeemable());
        assert!(!GiftCardStatus::Cancelled.is_redeemable());
    }

    #[test]
    fn test_wire_roundtrip() {
        for status in [
            GiftCardStatus::Issued,
            GiftCardStatus::PartiallyRedeemed,
            GiftCardStatus::Redeemed,
            GiftCardStatus::Expired,
            GiftCardStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<GiftCardStatus>().unwrap(), status);
        }
        assert!("unknown".parse::<GiftCardStatus>().is_err());
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&GiftCardStatus::PartiallyRedeemed).unwrap();
        assert_eq!(json, "\"partially_redeemed\"");
    }
}
