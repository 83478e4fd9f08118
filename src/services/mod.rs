pub mod claims;
pub mod gateway;
pub mod orders;
pub mod recorder;
pub mod repository;
pub mod token;
pub mod upi;

pub use claims::ClaimVerifier;
pub use gateway::GatewayClient;
pub use orders::OrderIssuer;
pub use recorder::PaymentRecorder;
pub use repository::{InMemoryPaymentStore, MongoPaymentStore, PaymentStore};
pub use token::TokenCodec;
pub use upi::UpiService;
