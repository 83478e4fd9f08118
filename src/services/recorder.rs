//! Payment recording.
//!
//! The recorder is the only component that writes payment records. It
//! validates business-required fields, re-checks any supplied verification
//! token before touching the store, and always appends: the confirm path
//! inserts a fresh record rather than updating one in place, and duplicate
//! records for the same order are reconciled downstream, not here.

use anyhow::anyhow;
use mongodb::bson::DateTime;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::dtos::{ConfirmPaymentRequest, SavePaymentRequest};
use crate::error::AppError;
use crate::models::{PaymentRecord, PaymentStatus};
use crate::services::claims::ClaimVerifier;
use crate::services::repository::PaymentStore;

#[derive(Clone)]
pub struct PaymentRecorder {
    store: Arc<dyn PaymentStore>,
    claims: ClaimVerifier,
    require_dob: bool,
}

impl PaymentRecorder {
    pub fn new(store: Arc<dyn PaymentStore>, claims: ClaimVerifier, require_dob: bool) -> Self {
        Self {
            store,
            claims,
            require_dob,
        }
    }

    /// Persist a first-time payment record.
    pub async fn save(&self, input: SavePaymentRequest) -> Result<PaymentRecord, AppError> {
        input.validate()?;

        if input.amount <= 0.0 {
            return Err(AppError::Validation(anyhow!(
                "amount must be greater than zero"
            )));
        }

        if self.require_dob && input.dob.as_deref().map_or(true, |d| d.trim().is_empty()) {
            return Err(AppError::Validation(anyhow!("dob is required")));
        }

        if let Some(token) = input.verification_token.as_deref() {
            let order_id = input.order_id.as_deref().ok_or_else(|| {
                AppError::Validation(anyhow!(
                    "order_id is required when a verification token is supplied"
                ))
            })?;
            self.check_token(order_id, input.amount, token)?;
        }

        let now = DateTime::now();
        let record = PaymentRecord {
            id: Uuid::new_v4(),
            full_name: input.full_name,
            email: input.email,
            phone: input.phone,
            dob: input.dob,
            birth_time: input.birth_time,
            country: input.country,
            state: input.state,
            city: input.city,
            amount: input.amount,
            order_id: input.order_id,
            payment_id: input.payment_id,
            status: PaymentStatus::Confirmed,
            reference_number: None,
            payment_confirmed_at: None,
            created_at: now,
            updated_at: now,
        };

        self.append(record).await
    }

    /// Persist a confirmation carrying a manual reconciliation reference.
    ///
    /// Always inserts a new record, even when one already exists for the
    /// same order; there is no idempotency key on this path.
    pub async fn confirm(&self, input: ConfirmPaymentRequest) -> Result<PaymentRecord, AppError> {
        input.validate()?;

        if input.reference_number.trim().is_empty() {
            return Err(AppError::Validation(anyhow!(
                "reference_number cannot be blank"
            )));
        }

        if let Some(amount) = input.amount {
            if amount <= 0.0 {
                return Err(AppError::Validation(anyhow!(
                    "amount must be greater than zero"
                )));
            }
        }

        if let Some(token) = input.verification_token.as_deref() {
            // A token is only checkable when both halves of what it binds
            // are present; fail validation before any store traffic.
            let order_id = input.order_id.as_deref().ok_or_else(|| {
                AppError::Validation(anyhow!(
                    "order_id is required when a verification token is supplied"
                ))
            })?;
            let amount = input.amount.ok_or_else(|| {
                AppError::Validation(anyhow!(
                    "amount is required when a verification token is supplied"
                ))
            })?;
            self.check_token(order_id, amount, token)?;
        }

        let now = DateTime::now();
        let record = PaymentRecord {
            id: Uuid::new_v4(),
            full_name: input.full_name.unwrap_or_default(),
            email: input.email,
            phone: input.phone,
            dob: input.dob,
            birth_time: input.birth_time,
            country: input.country,
            state: input.state,
            city: input.city,
            amount: input.amount.unwrap_or_default(),
            order_id: input.order_id,
            payment_id: None,
            status: PaymentStatus::Confirmed,
            reference_number: Some(input.reference_number),
            payment_confirmed_at: Some(now),
            created_at: now,
            updated_at: now,
        };

        self.append(record).await
    }

    fn check_token(&self, order_id: &str, amount: f64, token: &str) -> Result<(), AppError> {
        if self.claims.verify_self_claim(order_id, amount, token)? {
            Ok(())
        } else {
            tracing::warn!(order_id = %order_id, "verification token rejected");
            Err(AppError::Authenticity)
        }
    }

    async fn append(&self, record: PaymentRecord) -> Result<PaymentRecord, AppError> {
        if !self.store.is_ready().await {
            return Err(AppError::StoreUnavailable);
        }

        self.store.insert(record.clone()).await?;

        tracing::info!(
            record_id = %record.id,
            order_id = ?record.order_id,
            amount = record.amount,
            "payment record written"
        );

        Ok(record)
    }
}
