//! Self-issued UPI payment requests.
//!
//! Builds `upi://pay` intent payloads for the QR path, where no gateway
//! callback ever arrives and authenticity rests on the verification token.

use anyhow::anyhow;
use base64::{engine::general_purpose, Engine as _};
use chrono::Utc;
use image::{DynamicImage, Luma};
use qrcode::QrCode;
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::io::Cursor;

use crate::config::UpiConfig;
use crate::error::AppError;
use crate::services::token::canonical_amount;

/// Transport constraint on the `tn` note field.
const MAX_NOTE_CHARS: usize = 60;

#[derive(Clone)]
pub struct UpiService {
    config: UpiConfig,
}

impl UpiService {
    pub fn new(config: UpiConfig) -> Self {
        Self { config }
    }

    /// Generate a locally unique order id.
    ///
    /// Timestamp plus random suffix keeps collisions negligible at this
    /// deployment's volume; uniqueness is not cryptographically guaranteed.
    pub fn new_order_id(&self) -> String {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(6)
            .map(char::from)
            .collect();
        format!("order_{}_{}", Utc::now().timestamp_millis(), suffix)
    }

    /// Render the payment-request payload for an order.
    ///
    /// The order id rides along as the `tr` reconciliation tag. An invalid
    /// payee VPA is a configuration error; we never emit a malformed payload.
    pub fn payment_request(
        &self,
        amount: f64,
        note: Option<&str>,
        order_id: &str,
    ) -> Result<String, AppError> {
        if !is_valid_vpa(&self.config.vpa) {
            return Err(AppError::Configuration(anyhow!(
                "payee VPA is missing or malformed"
            )));
        }

        let note = note.filter(|n| !n.trim().is_empty()).unwrap_or("Payment");
        let note: String = note.chars().take(MAX_NOTE_CHARS).collect();

        Ok(format!(
            "upi://pay?pa={}&pn={}&am={}&cu=INR&tn={}&tr={}",
            self.config.vpa,
            urlencoding::encode(&self.config.payee_name),
            canonical_amount(amount),
            urlencoding::encode(&note),
            order_id
        ))
    }

    /// Render a payload as a QR code, base64-encoded PNG.
    pub fn qr_png_base64(&self, payload: &str) -> Result<String, AppError> {
        let code = QrCode::new(payload).map_err(|e| AppError::Internal(anyhow::Error::new(e)))?;
        let image = code.render::<Luma<u8>>().build();

        let dynamic_image = DynamicImage::ImageLuma8(image);
        let mut buffer = Cursor::new(Vec::new());
        dynamic_image
            .write_to(&mut buffer, image::ImageOutputFormat::Png)
            .map_err(|e| AppError::Internal(anyhow::Error::new(e)))?;

        Ok(general_purpose::STANDARD.encode(buffer.get_ref()))
    }
}

/// Strict syntactic check for a payee VPA (`name@bank`).
fn is_valid_vpa(vpa: &str) -> bool {
    let Some((user, handle)) = vpa.split_once('@') else {
        return false;
    };
    !user.is_empty()
        && user.len() <= 256
        && user
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        && !handle.is_empty()
        && handle.len() <= 64
        && handle.chars().all(|c| c.is_ascii_alphabetic())
}
