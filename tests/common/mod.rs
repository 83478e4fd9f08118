use consult_payments::config::{
    Config, DatabaseConfig, GatewayConfig, RecorderConfig, ServerConfig, TokenConfig, UpiConfig,
};
use consult_payments::services::InMemoryPaymentStore;
use consult_payments::{app_router, AppState};
use secrecy::Secret;
use std::sync::Arc;

pub const TOKEN_SECRET: &str = "test_token_secret";
pub const GATEWAY_SECRET: &str = "test_gateway_secret";

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub store: InMemoryPaymentStore,
}

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: Secret::new("mongodb://localhost:27017".to_string()),
            db_name: "unused".to_string(),
        },
        gateway: GatewayConfig {
            key_id: "key_test_123".to_string(),
            key_secret: Secret::new(GATEWAY_SECRET.to_string()),
            api_base_url: "https://gateway.invalid/v1".to_string(),
        },
        upi: UpiConfig {
            vpa: "merchant@bank".to_string(),
            payee_name: "Test Merchant".to_string(),
        },
        token: TokenConfig {
            secret: Secret::new(TOKEN_SECRET.to_string()),
        },
        recorder: RecorderConfig { require_dob: true },
        service_name: "consult-payments-test".to_string(),
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(test_config()).await
    }

    /// Spawn the app on a random port over a fresh in-memory store.
    pub async fn spawn_with(config: Config) -> Self {
        let store = InMemoryPaymentStore::new();
        let state = AppState::new(config, Arc::new(store.clone()));
        let router = app_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });

        TestApp {
            address: format!("http://127.0.0.1:{}", port),
            client: reqwest::Client::new(),
            store,
        }
    }
}

/// Signature the gateway would attach to a completed checkout.
#[allow(dead_code)]
pub fn gateway_signature(order_id: &str, payment_id: &str) -> String {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    let mut mac = Hmac::<Sha256>::new_from_slice(GATEWAY_SECRET.as_bytes()).unwrap();
    mac.update(format!("{}|{}", order_id, payment_id).as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
