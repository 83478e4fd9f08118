pub mod config;
pub mod dtos;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

use axum::{
    routing::{get, post},
    Router,
};
use mongodb::{options::ClientOptions, Client};
use secrecy::ExposeSecret;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use config::Config;
use services::{
    ClaimVerifier, GatewayClient, MongoPaymentStore, OrderIssuer, PaymentRecorder, PaymentStore,
    TokenCodec, UpiService,
};

/// Shared per-request state: configuration and long-lived collaborators,
/// acquired once at startup and never mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub issuer: OrderIssuer,
    pub claims: ClaimVerifier,
    pub recorder: PaymentRecorder,
}

impl AppState {
    /// Wire the core components around an externally supplied store.
    pub fn new(config: Config, store: Arc<dyn PaymentStore>) -> Self {
        let codec = TokenCodec::new(config.token.secret.clone());
        let gateway = GatewayClient::new(config.gateway.clone());
        let upi = UpiService::new(config.upi.clone());

        let issuer = OrderIssuer::new(gateway.clone(), upi, codec.clone());
        let claims = ClaimVerifier::new(gateway, codec);
        let recorder = PaymentRecorder::new(store, claims.clone(), config.recorder.require_dob);

        Self {
            config,
            issuer,
            claims,
            recorder,
        }
    }
}

/// Build the HTTP router over the given state.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/orders", post(handlers::orders::create_order))
        .route("/orders/qr", post(handlers::orders::create_qr_order))
        .route("/payments/verify", post(handlers::payments::verify_payment))
        .route("/payments", post(handlers::payments::save_payment))
        .route("/payments/confirm", post(handlers::payments::confirm_payment))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .with_state(state)
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    pub async fn build(config: Config) -> anyhow::Result<Self> {
        let mut client_options = ClientOptions::parse(config.database.url.expose_secret()).await?;
        client_options.app_name = Some(config.service_name.clone());

        let client = Client::with_options(client_options)?;
        let db = client.database(&config.database.db_name);
        let store: Arc<dyn PaymentStore> = Arc::new(MongoPaymentStore::new(&db));

        let state = AppState::new(config.clone(), store);

        // Absent secrets must be visible at startup, not at first use.
        if config.gateway.key_id.is_empty() || config.gateway.key_secret.expose_secret().is_empty()
        {
            tracing::warn!("gateway credentials not configured - gateway orders will be refused");
        }
        if config.token.secret.expose_secret().is_empty() {
            tracing::warn!("payment token secret not set - self-issued orders will be refused");
        }
        if config.upi.vpa.is_empty() {
            tracing::warn!("payee VPA not set - UPI payment requests will be refused");
        }

        let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
        let listener = TcpListener::bind(addr).await?;
        let port = listener.local_addr()?.port();

        let router = app_router(state);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> anyhow::Result<()> {
        tracing::info!("Listening on port {}", self.port);
        axum::serve(self.listener, self.router).await?;
        Ok(())
    }
}
