//! Gift card route handlers.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use gifty_core::{BusinessId, GiftCardId, GiftCardStatus};

use crate::error::AppError;
use crate::middleware::RequireOwner;
use crate::services::gift_cards::RedemptionService;
use crate::state::AppState;

/// Redemption request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemRequest {
    pub gift_card_id: GiftCardId,
    pub amount: Decimal,
    pub business_id: BusinessId,
}

/// Redemption response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemResponse {
    pub success: bool,
    pub remaining_balance: Decimal,
    pub status: GiftCardStatus,
}

/// Redeem an amount from a gift card.
///
/// The session decides which business the caller acts for; a body
/// `businessId` that disagrees is answered with the same 404 as a missing
/// card, so a caller can't use it to probe another tenant's cards.
pub async fn redeem(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Json(req): Json<RedeemRequest>,
) -> Result<Json<RedeemResponse>, AppError> {
    if req.business_id != owner.business_id {
        return Err(AppError::NotFound("gift card".to_string()));
    }

    let redemption = RedemptionService::new(state.pool(), state.mailer());
    let outcome = redemption
        .redeem(req.gift_card_id, req.amount, &owner)
        .await?;

    Ok(Json(RedeemResponse {
        success: true,
        remaining_balance: outcome.remaining_balance,
        status: outcome.status,
    }))
}
