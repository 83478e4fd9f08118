//! Claim verification.
//!
//! A claim is a caller's assertion that a payment for an order completed,
//! accompanied by proof: a gateway signature, or a locally minted token.
//! The verifier only judges claims that carry credentials; whether an
//! unauthenticated claim is permissible (manual reconciliation flows) is
//! the recorder's decision.

use crate::error::AppError;
use crate::services::gateway::GatewayClient;
use crate::services::token::TokenCodec;

#[derive(Clone)]
pub struct ClaimVerifier {
    gateway: GatewayClient,
    codec: TokenCodec,
}

impl ClaimVerifier {
    pub fn new(gateway: GatewayClient, codec: TokenCodec) -> Self {
        Self { gateway, codec }
    }

    /// Judge a gateway checkout claim by its signature.
    pub fn verify_gateway_claim(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<bool, AppError> {
        self.gateway.verify_claim(order_id, payment_id, signature)
    }

    /// Judge a self-issued claim by its verification token.
    pub fn verify_self_claim(
        &self,
        order_id: &str,
        amount: f64,
        token: &str,
    ) -> Result<bool, AppError> {
        self.codec.verify(order_id, amount, token)
    }
}
