//! Claim verification and payment recording handlers.

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::dtos::{
    ConfirmPaymentRequest, ConfirmPaymentResponse, SavePaymentRequest, SavePaymentResponse,
    VerifyPaymentRequest, VerifyPaymentResponse,
};
use crate::error::AppError;
use crate::AppState;

/// Verify a gateway checkout claim. The answer is a judgement, not an
/// error: an inauthentic claim still gets a 200 with `authentic: false`.
pub async fn verify_payment(
    State(state): State<AppState>,
    Json(payload): Json<VerifyPaymentRequest>,
) -> Result<Json<VerifyPaymentResponse>, AppError> {
    payload.validate()?;

    let authentic = state.claims.verify_gateway_claim(
        &payload.order_id,
        &payload.payment_id,
        &payload.signature,
    )?;

    Ok(Json(VerifyPaymentResponse { authentic }))
}

/// Record a first-time payment.
pub async fn save_payment(
    State(state): State<AppState>,
    Json(payload): Json<SavePaymentRequest>,
) -> Result<(StatusCode, Json<SavePaymentResponse>), AppError> {
    let record = state.recorder.save(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(SavePaymentResponse {
            id: record.id.to_string(),
        }),
    ))
}

/// Record a confirmation carrying a manual reconciliation reference.
pub async fn confirm_payment(
    State(state): State<AppState>,
    Json(payload): Json<ConfirmPaymentRequest>,
) -> Result<(StatusCode, Json<ConfirmPaymentResponse>), AppError> {
    let record = state.recorder.confirm(payload).await?;

    let confirmed_at = record
        .payment_confirmed_at
        .map(|dt| dt.to_string())
        .unwrap_or_default();

    Ok((
        StatusCode::CREATED,
        Json(ConfirmPaymentResponse {
            id: record.id.to_string(),
            payment_confirmed_at: confirmed_at,
        }),
    ))
}
