//! Payment record storage.
//!
//! The recorder talks to storage through the `PaymentStore` port so tests
//! can run against the in-memory implementation while deployments use Mongo.

use async_trait::async_trait;
use mongodb::{bson::doc, Collection, Database};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::AppError;
use crate::models::PaymentRecord;

#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Cheap readiness probe; the recorder refuses writes when this is false.
    async fn is_ready(&self) -> bool;

    /// Append a record. Always an insert; existing records are never updated.
    async fn insert(&self, record: PaymentRecord) -> Result<(), AppError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<PaymentRecord>, AppError>;
}

#[derive(Clone)]
pub struct MongoPaymentStore {
    db: Database,
    collection: Collection<PaymentRecord>,
}

impl MongoPaymentStore {
    pub fn new(db: &Database) -> Self {
        Self {
            db: db.clone(),
            collection: db.collection("payments"),
        }
    }
}

#[async_trait]
impl PaymentStore for MongoPaymentStore {
    async fn is_ready(&self) -> bool {
        self.db.run_command(doc! { "ping": 1 }, None).await.is_ok()
    }

    async fn insert(&self, record: PaymentRecord) -> Result<(), AppError> {
        self.collection.insert_one(record, None).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<PaymentRecord>, AppError> {
        let record = self.collection.find_one(doc! { "_id": id }, None).await?;
        Ok(record)
    }
}

/// In-memory store used by tests and local development.
#[derive(Clone)]
pub struct InMemoryPaymentStore {
    records: Arc<RwLock<Vec<PaymentRecord>>>,
    ready: Arc<AtomicBool>,
}

impl InMemoryPaymentStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
            ready: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Flip readiness, e.g. to exercise the store-unavailable path.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    pub async fn records(&self) -> Vec<PaymentRecord> {
        self.records.read().await.clone()
    }
}

impl Default for InMemoryPaymentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    async fn insert(&self, record: PaymentRecord) -> Result<(), AppError> {
        self.records.write().await.push(record);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<PaymentRecord>, AppError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id.to_string() == id).cloned())
    }
}
