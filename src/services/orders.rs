//! Order issuance.
//!
//! An order is an intent to receive a payment of a given amount. Gateway
//! orders are minted by the external gateway; self-issued orders get a local
//! reference, a verification token, and a UPI payment request. Orders are
//! not persisted; the payment record written later is the system of record.

use anyhow::anyhow;
use chrono::Utc;

use crate::error::AppError;
use crate::services::gateway::GatewayClient;
use crate::services::token::TokenCodec;
use crate::services::upi::UpiService;

#[derive(Clone)]
pub struct OrderIssuer {
    gateway: GatewayClient,
    upi: UpiService,
    codec: TokenCodec,
    currency: String,
}

/// Result of issuing an order through the gateway.
#[derive(Debug)]
pub struct IssuedGatewayOrder {
    /// Local receipt reference.
    pub order_id: String,
    /// Gateway-assigned order id, used by the checkout flow.
    pub gateway_order_id: String,
    pub amount: f64,
    pub currency: String,
}

/// Result of issuing a self-issued (QR) order.
#[derive(Debug)]
pub struct IssuedSelfOrder {
    pub order_id: String,
    pub amount: f64,
    /// Tag binding `(order_id, amount)`; presented back at confirmation.
    pub verification_token: String,
    /// `upi://pay` payment-request payload.
    pub upi_link: String,
    /// QR rendering of the payload, base64 PNG.
    pub qr_image_base64: String,
}

impl OrderIssuer {
    pub fn new(gateway: GatewayClient, upi: UpiService, codec: TokenCodec) -> Self {
        Self {
            gateway,
            upi,
            codec,
            currency: "INR".to_string(),
        }
    }

    /// Issue an order through the external gateway.
    pub async fn issue_gateway_order(&self, amount: f64) -> Result<IssuedGatewayOrder, AppError> {
        ensure_positive(amount)?;

        let receipt = format!("rcpt_{}", Utc::now().timestamp_millis());
        // The gateway speaks minor units; everything else stays in major units.
        let amount_minor = (amount * 100.0).round() as u64;

        let order = self
            .gateway
            .create_order(amount_minor, &self.currency, Some(receipt.clone()))
            .await?;

        Ok(IssuedGatewayOrder {
            order_id: receipt,
            gateway_order_id: order.id,
            amount,
            currency: self.currency.clone(),
        })
    }

    /// Issue a self-issued order: local reference, token, payment request.
    pub fn issue_self_order(
        &self,
        amount: f64,
        note: Option<&str>,
    ) -> Result<IssuedSelfOrder, AppError> {
        ensure_positive(amount)?;

        let order_id = self.upi.new_order_id();
        let verification_token = self.codec.mint(&order_id, amount)?;
        let upi_link = self.upi.payment_request(amount, note, &order_id)?;
        let qr_image_base64 = self.upi.qr_png_base64(&upi_link)?;

        tracing::info!(order_id = %order_id, amount = amount, "self-issued order created");

        Ok(IssuedSelfOrder {
            order_id,
            amount,
            verification_token,
            upi_link,
            qr_image_base64,
        })
    }
}

fn ensure_positive(amount: f64) -> Result<(), AppError> {
    if amount > 0.0 {
        Ok(())
    } else {
        Err(AppError::Validation(anyhow!(
            "amount must be greater than zero"
        )))
    }
}
