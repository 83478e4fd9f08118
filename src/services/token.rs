//! Keyed verification tokens for self-issued orders.
//!
//! A token is an HMAC-SHA256 tag over `(order_id, amount)` with a
//! server-held secret. It is minted at order issuance and re-verified when
//! a payment claim comes back; it is never stored.

use anyhow::anyhow;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, Secret};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Canonical rendering of an amount wherever a tag or payload embeds one.
///
/// Mint and verify must agree on this exactly: a token minted over
/// `"500.00"` will not verify against `"500.0"`.
pub fn canonical_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}

#[derive(Clone)]
pub struct TokenCodec {
    secret: Secret<String>,
}

impl TokenCodec {
    pub fn new(secret: Secret<String>) -> Self {
        Self { secret }
    }

    pub fn is_configured(&self) -> bool {
        !self.secret.expose_secret().is_empty()
    }

    /// Mint a tag binding `order_id` to `amount`.
    ///
    /// Fails closed when no secret is configured; there is no fallback key.
    pub fn mint(&self, order_id: &str, amount: f64) -> Result<String, AppError> {
        if !self.is_configured() {
            return Err(AppError::Configuration(anyhow!(
                "payment token secret is not set"
            )));
        }

        let payload = format!("{}|{}", order_id, canonical_amount(amount));
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|_| AppError::Configuration(anyhow!("invalid token secret length")))?;
        mac.update(payload.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Recompute the tag and compare it to the presented one.
    ///
    /// Verification is a pure function of its inputs and the secret; a token
    /// may be verified any number of times.
    pub fn verify(&self, order_id: &str, amount: f64, token: &str) -> Result<bool, AppError> {
        let expected = self.mint(order_id, amount)?;
        Ok(constant_time_eq(expected.as_bytes(), token.as_bytes()))
    }
}

/// Constant time comparison; a length mismatch is simply not authentic.
pub(crate) fn constant_time_eq(expected: &[u8], presented: &[u8]) -> bool {
    if expected.len() != presented.len() {
        return false;
    }
    expected.ct_eq(presented).into()
}
