//! Request and response shapes for the payment operations.
//!
//! Requests are strict: unknown fields are rejected at deserialization and
//! field rules run through `validator` before any business logic.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateOrderRequest {
    /// Amount in currency major units.
    #[validate(range(min = 0.01, message = "amount must be greater than zero"))]
    pub amount: f64,
}

#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    pub order_id: String,
    pub gateway_order_id: String,
    pub amount: f64,
    pub currency: String,
    /// Key id the frontend needs to initialise checkout.
    pub gateway_key_id: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateQrOrderRequest {
    #[validate(range(min = 0.01, message = "amount must be greater than zero"))]
    pub amount: f64,
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateQrOrderResponse {
    pub order_id: String,
    pub amount: f64,
    pub verification_token: String,
    pub upi_link: String,
    pub qr_image_base64: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct VerifyPaymentRequest {
    #[validate(length(min = 1, message = "order_id cannot be empty"))]
    pub order_id: String,
    #[validate(length(min = 1, message = "payment_id cannot be empty"))]
    pub payment_id: String,
    #[validate(length(min = 1, message = "signature cannot be empty"))]
    pub signature: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyPaymentResponse {
    pub authentic: bool,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SavePaymentRequest {
    #[validate(length(min = 1, message = "full_name cannot be empty"))]
    pub full_name: String,
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    pub phone: Option<String>,
    pub dob: Option<String>,
    pub birth_time: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub amount: f64,
    pub order_id: Option<String>,
    pub payment_id: Option<String>,
    pub verification_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SavePaymentResponse {
    pub id: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ConfirmPaymentRequest {
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "reference_number cannot be empty"))]
    pub reference_number: String,
    pub amount: Option<f64>,
    pub order_id: Option<String>,
    pub verification_token: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub dob: Option<String>,
    pub birth_time: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ConfirmPaymentResponse {
    pub id: String,
    pub payment_confirmed_at: String,
}
