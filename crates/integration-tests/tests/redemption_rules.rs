//! Integration tests for the gift card balance/status state machine.
//!
//! These verify the redemption invariants: status is a pure function of the
//! remaining balance, terminal states never return to the redemption path,
//! and amount validation rejects non-positive requests before any lookup.

use rust_decimal::Decimal;

use gifty_core::GiftCardStatus;
use gifty_storefront::services::gift_cards::{RedemptionError, validate_redemption_amount};

fn dollars(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

// =============================================================================
// Amount validation
// =============================================================================

#[test]
fn test_positive_amount_accepted() {
    assert!(validate_redemption_amount(dollars(2500)).is_ok());
    assert!(validate_redemption_amount(dollars(1)).is_ok());
}

#[test]
fn test_zero_amount_rejected() {
    assert!(matches!(
        validate_redemption_amount(Decimal::ZERO),
        Err(RedemptionError::InvalidAmount)
    ));
}

#[test]
fn test_negative_amount_rejected() {
    assert!(matches!(
        validate_redemption_amount(dollars(-2500)),
        Err(RedemptionError::InvalidAmount)
    ));
}

// =============================================================================
// Status derivation
// =============================================================================

#[test]
fn test_full_redemption_reaches_redeemed() {
    // Card with amount=50.00, remaining=50.00, redeem 50.00
    let amount = dollars(5000);
    let after = amount - dollars(5000);
    assert_eq!(
        GiftCardStatus::derive_for_balance(after, amount),
        GiftCardStatus::Redeemed
    );
    assert_eq!(after, Decimal::ZERO);
}

#[test]
fn test_partial_redemption_reaches_partially_redeemed() {
    let amount = dollars(5000);
    let after = amount - dollars(3000);
    assert_eq!(
        GiftCardStatus::derive_for_balance(after, amount),
        GiftCardStatus::PartiallyRedeemed
    );
}

#[test]
fn test_untouched_card_stays_issued() {
    let amount = dollars(5000);
    assert_eq!(
        GiftCardStatus::derive_for_balance(amount, amount),
        GiftCardStatus::Issued
    );
}

#[test]
fn test_terminal_states_are_not_redeemable() {
    assert!(!GiftCardStatus::Redeemed.is_redeemable());
    assert!(!GiftCardStatus::Expired.is_redeemable());
    assert!(!GiftCardStatus::Cancelled.is_redeemable());
    assert!(GiftCardStatus::Issued.is_redeemable());
    assert!(GiftCardStatus::PartiallyRedeemed.is_redeemable());
}

// =============================================================================
// Overdraft refusal shape
// =============================================================================

#[test]
fn test_insufficient_balance_error_reports_remaining() {
    // Card with remaining=20.00, attempted redeem 25.00: the service surfaces
    // the untouched balance so the client can show what is actually left.
    let err = RedemptionError::InsufficientBalance {
        remaining: dollars(2000),
    };
    assert!(err.to_string().contains("20.00"));
}

#[test]
fn test_status_serializes_to_wire_names() {
    let json = serde_json::to_string(&GiftCardStatus::Redeemed).expect("serialize");
    assert_eq!(json, "\"redeemed\"");
    let json = serde_json::to_string(&GiftCardStatus::PartiallyRedeemed).expect("serialize");
    assert_eq!(json, "\"partially_redeemed\"");
}
