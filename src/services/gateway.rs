//! Payment gateway client.
//!
//! Implements the gateway's Orders API for payment initiation and checkout
//! signature verification. Amounts cross this boundary in minor units
//! (paise for INR); everywhere else the service works in major units.

use anyhow::anyhow;
use hmac::{Hmac, Mac};
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::config::GatewayConfig;
use crate::error::AppError;
use crate::services::token::constant_time_eq;

#[derive(Clone)]
pub struct GatewayClient {
    client: Client,
    config: GatewayConfig,
}

#[derive(Debug, Serialize)]
struct CreateOrderBody {
    /// Amount in smallest currency unit.
    amount: u64,
    currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    receipt: Option<String>,
}

/// Order as returned by the gateway.
#[derive(Debug, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: u64,
    pub currency: String,
    pub receipt: Option<String>,
    pub status: String,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorBody {
    error: GatewayErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorDetail {
    code: String,
    description: String,
}

impl GatewayClient {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Whether gateway credentials are set.
    pub fn is_configured(&self) -> bool {
        !self.config.key_id.is_empty() && !self.config.key_secret.expose_secret().is_empty()
    }

    /// Create an order at the gateway.
    ///
    /// `amount_minor` is in the smallest currency unit. An unconfigured
    /// gateway is a configuration error, not a request error.
    pub async fn create_order(
        &self,
        amount_minor: u64,
        currency: &str,
        receipt: Option<String>,
    ) -> Result<GatewayOrder, AppError> {
        if !self.is_configured() {
            return Err(AppError::Configuration(anyhow!(
                "gateway credentials not configured"
            )));
        }

        let body = CreateOrderBody {
            amount: amount_minor,
            currency: currency.to_string(),
            receipt,
        };

        let url = format!("{}/orders", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .basic_auth(
                &self.config.key_id,
                Some(self.config.key_secret.expose_secret()),
            )
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(anyhow!("gateway request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AppError::Upstream(anyhow!("gateway response unreadable: {}", e)))?;

        tracing::debug!(status = %status, "gateway create_order response");

        if status.is_success() {
            let order: GatewayOrder = serde_json::from_str(&text)
                .map_err(|e| AppError::Upstream(anyhow!("gateway response malformed: {}", e)))?;
            tracing::info!(
                gateway_order_id = %order.id,
                amount_minor = order.amount,
                currency = %order.currency,
                "gateway order created"
            );
            Ok(order)
        } else {
            // Details are logged; the caller only sees a generic upstream error.
            if let Ok(err) = serde_json::from_str::<GatewayErrorBody>(&text) {
                tracing::error!(
                    code = %err.error.code,
                    description = %err.error.description,
                    "gateway rejected order"
                );
            } else {
                tracing::error!(status = %status, "gateway rejected order");
            }
            Err(AppError::Upstream(anyhow!(
                "gateway returned status {}",
                status
            )))
        }
    }

    /// Verify a checkout claim signature.
    ///
    /// The gateway signs `order_id + "|" + payment_id` with HMAC-SHA256
    /// under the shared key secret; we recompute and compare.
    pub fn verify_claim(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<bool, AppError> {
        if !self.is_configured() {
            return Err(AppError::Configuration(anyhow!(
                "gateway credentials not configured"
            )));
        }

        let payload = format!("{}|{}", order_id, payment_id);
        let expected =
            compute_signature(&payload, self.config.key_secret.expose_secret().as_bytes())?;

        let authentic = constant_time_eq(expected.as_bytes(), signature.as_bytes());

        if authentic {
            tracing::info!(order_id = %order_id, payment_id = %payment_id, "gateway claim verified");
        } else {
            tracing::warn!(order_id = %order_id, payment_id = %payment_id, "gateway claim rejected");
        }

        Ok(authentic)
    }
}

fn compute_signature(payload: &str, secret: &[u8]) -> Result<String, AppError> {
    type HmacSha256 = Hmac<Sha256>;
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|_| AppError::Configuration(anyhow!("invalid gateway secret length")))?;
    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(api_base_url: &str) -> GatewayConfig {
        GatewayConfig {
            key_id: "key_test_123".to_string(),
            key_secret: Secret::new("key_test_secret".to_string()),
            api_base_url: api_base_url.to_string(),
        }
    }

    #[test]
    fn is_configured_requires_both_credentials() {
        let client = GatewayClient::new(test_config("http://localhost"));
        assert!(client.is_configured());

        let client = GatewayClient::new(GatewayConfig {
            key_id: String::new(),
            key_secret: Secret::new(String::new()),
            api_base_url: String::new(),
        });
        assert!(!client.is_configured());
    }

    #[test]
    fn claim_with_matching_signature_is_authentic() {
        let client = GatewayClient::new(test_config("http://localhost"));
        let expected =
            compute_signature("order_123|pay_456", "key_test_secret".as_bytes()).unwrap();
        assert!(client
            .verify_claim("order_123", "pay_456", &expected)
            .unwrap());
    }

    #[test]
    fn claim_with_bad_signature_is_rejected() {
        let client = GatewayClient::new(test_config("http://localhost"));
        assert!(!client
            .verify_claim("order_123", "pay_456", "not_the_signature")
            .unwrap());
    }

    #[test]
    fn claim_verification_fails_closed_without_credentials() {
        let client = GatewayClient::new(GatewayConfig {
            key_id: String::new(),
            key_secret: Secret::new(String::new()),
            api_base_url: String::new(),
        });
        assert!(matches!(
            client.verify_claim("order_123", "pay_456", "sig"),
            Err(AppError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn create_order_parses_gateway_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/orders"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "order_gw_001",
                "amount": 50000,
                "currency": "INR",
                "receipt": "rcpt_1",
                "status": "created"
            })))
            .mount(&server)
            .await;

        let client = GatewayClient::new(test_config(&server.uri()));
        let order = client
            .create_order(50000, "INR", Some("rcpt_1".to_string()))
            .await
            .unwrap();

        assert_eq!(order.id, "order_gw_001");
        assert_eq!(order.amount, 50000);
        assert_eq!(order.currency, "INR");
    }

    #[tokio::test]
    async fn create_order_maps_gateway_rejection_to_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/orders"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "code": "BAD_REQUEST_ERROR", "description": "amount too small" }
            })))
            .mount(&server)
            .await;

        let client = GatewayClient::new(test_config(&server.uri()));
        let err = client.create_order(1, "INR", None).await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
    }

    #[tokio::test]
    async fn create_order_fails_closed_without_credentials() {
        let client = GatewayClient::new(GatewayConfig {
            key_id: String::new(),
            key_secret: Secret::new(String::new()),
            api_base_url: "http://localhost".to_string(),
        });
        let err = client.create_order(100, "INR", None).await.unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }
}
