//! Order issuance handlers.

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::dtos::{
    CreateOrderRequest, CreateOrderResponse, CreateQrOrderRequest, CreateQrOrderResponse,
};
use crate::error::AppError;
use crate::AppState;

/// Create an order through the external gateway.
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<CreateOrderResponse>), AppError> {
    payload.validate()?;

    tracing::info!(amount = payload.amount, "creating gateway order");

    let issued = state.issuer.issue_gateway_order(payload.amount).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateOrderResponse {
            order_id: issued.order_id,
            gateway_order_id: issued.gateway_order_id,
            amount: issued.amount,
            currency: issued.currency,
            gateway_key_id: state.config.gateway.key_id.clone(),
        }),
    ))
}

/// Create a self-issued (QR/UPI) order.
pub async fn create_qr_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateQrOrderRequest>,
) -> Result<(StatusCode, Json<CreateQrOrderResponse>), AppError> {
    payload.validate()?;

    tracing::info!(amount = payload.amount, "creating self-issued order");

    let issued = state
        .issuer
        .issue_self_order(payload.amount, payload.note.as_deref())?;

    Ok((
        StatusCode::CREATED,
        Json(CreateQrOrderResponse {
            order_id: issued.order_id,
            amount: issued.amount,
            verification_token: issued.verification_token,
            upi_link: issued.upi_link,
            qr_image_base64: issued.qr_image_base64,
        }),
    ))
}
