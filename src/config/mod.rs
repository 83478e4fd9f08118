use anyhow::{anyhow, Result};
use dotenvy::dotenv;
use secrecy::Secret;
use serde::Deserialize;
use std::env;

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub gateway: GatewayConfig,
    pub upi: UpiConfig,
    pub token: TokenConfig,
    pub recorder: RecorderConfig,
    pub service_name: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Clone, Debug)]
pub struct DatabaseConfig {
    pub url: Secret<String>,
    pub db_name: String,
}

/// External payment gateway credentials. Empty key id / secret means the
/// gateway path is unconfigured; self-issued QR orders still work.
#[derive(Deserialize, Clone, Debug)]
pub struct GatewayConfig {
    pub key_id: String,
    pub key_secret: Secret<String>,
    pub api_base_url: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct UpiConfig {
    /// Payee virtual payment address, e.g. `merchant@bank`.
    pub vpa: String,
    pub payee_name: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct TokenConfig {
    pub secret: Secret<String>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct RecorderConfig {
    /// Whether `save` requires a date of birth. Older deployments of this
    /// service relaxed the constraint; the flag keeps that variance explicit.
    pub require_dob: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let host = env::var("PAYMENT_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PAYMENT_SERVICE_PORT")
            .unwrap_or_else(|_| "4000".to_string())
            .parse()?;

        let db_url = env::var("PAYMENT_DATABASE_URL")
            .map_err(|_| anyhow!("PAYMENT_DATABASE_URL must be set"))?;
        let db_name =
            env::var("PAYMENT_DATABASE_NAME").unwrap_or_else(|_| "consult_payments".to_string());

        let gateway_key_id = env::var("GATEWAY_KEY_ID").unwrap_or_default();
        let gateway_key_secret = env::var("GATEWAY_KEY_SECRET").unwrap_or_default();
        let gateway_api_base_url = env::var("GATEWAY_API_BASE_URL")
            .unwrap_or_else(|_| "https://api.razorpay.com/v1".to_string());

        let vpa = env::var("UPI_VPA").unwrap_or_default();
        let payee_name =
            env::var("UPI_PAYEE_NAME").unwrap_or_else(|_| "Consultation Desk".to_string());

        let token_secret = env::var("PAYMENT_TOKEN_SECRET").unwrap_or_default();

        let require_dob = env::var("PAYMENT_REQUIRE_DOB")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);

        Ok(Self {
            server: ServerConfig { host, port },
            database: DatabaseConfig {
                url: Secret::new(db_url),
                db_name,
            },
            gateway: GatewayConfig {
                key_id: gateway_key_id,
                key_secret: Secret::new(gateway_key_secret),
                api_base_url: gateway_api_base_url,
            },
            upi: UpiConfig { vpa, payee_name },
            token: TokenConfig {
                secret: Secret::new(token_secret),
            },
            recorder: RecorderConfig { require_dob },
            service_name: "consult-payments".to_string(),
        })
    }
}
