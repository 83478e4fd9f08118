use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Durable record of a claimed payment.
///
/// The store enforces no uniqueness on `email`, `order_id` or `payment_id`;
/// duplicate records per real-world payment are tolerated and reconciled
/// downstream, never deduplicated here.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PaymentRecord {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub dob: Option<String>,
    pub birth_time: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    /// Amount in currency major units.
    pub amount: f64,
    pub order_id: Option<String>,
    pub payment_id: Option<String>,
    pub status: PaymentStatus,
    /// Manually supplied reconciliation code, set by the confirm path.
    pub reference_number: Option<String>,
    pub payment_confirmed_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// `Pending` and `Failed` exist as extension points; no current operation
/// transitions a record into them.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Confirmed,
    Failed,
}
