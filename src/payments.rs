//! Simulated payment intents.
//!
//! Intents live in the moka cache only. Confirmation waits a fixed delay and
//! always succeeds; there is no gateway behind this.

use std::{io::Cursor, sync::Arc, time::Duration};

use base64::Engine;
use chrono::{DateTime, Utc};
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::QrCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::cache::AppCache;

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("Payment intent {0} not found")]
    IntentNotFound(Uuid),

    #[error("Invalid payment amount: {0}")]
    InvalidAmount(Decimal),

    #[error("QR code generation failed: {0}")]
    QrCode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    RequiresConfirmation,
    Succeeded,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    pub id: Uuid,
    pub registration_id: Uuid,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency: String,
    pub client_secret: String,
    pub status: PaymentStatus,
    /// PNG QR code (data URL) encoding the registration reference
    pub qr_code: String,
    pub created_at: DateTime<Utc>,
}

/// Request to create a payment intent
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntentRequest {
    pub registration_id: Uuid,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
}

/// Stub gateway backed by the intent cache
#[derive(Clone)]
pub struct PaymentGateway {
    cache: AppCache,
    confirm_delay: Duration,
}

impl PaymentGateway {
    pub fn new(cache: AppCache, confirm_delay: Duration) -> Self {
        Self {
            cache,
            confirm_delay,
        }
    }

    pub async fn create_intent(
        &self,
        registration_id: Uuid,
        amount: Decimal,
        currency: &str,
    ) -> Result<PaymentIntent, PaymentError> {
        if amount <= Decimal::ZERO {
            return Err(PaymentError::InvalidAmount(amount));
        }

        let id = Uuid::new_v4();
        let intent = PaymentIntent {
            id,
            registration_id,
            amount,
            currency: currency.to_string(),
            client_secret: format!("pi_{}_secret_{}", id.simple(), Uuid::new_v4().simple()),
            status: PaymentStatus::RequiresConfirmation,
            qr_code: confirmation_qr(&registration_reference(registration_id))?,
            created_at: Utc::now(),
        };

        self.cache
            .payment_intents
            .insert(id, Arc::new(intent.clone()))
            .await;
        info!(intent = %id, registration = %registration_id, %amount, "Created payment intent");

        Ok(intent)
    }

    /// Wait the configured delay, then mark the intent succeeded
    pub async fn confirm(&self, intent_id: Uuid) -> Result<PaymentIntent, PaymentError> {
        let intent = self
            .cache
            .payment_intents
            .get(&intent_id)
            .await
            .ok_or(PaymentError::IntentNotFound(intent_id))?;

        if intent.status == PaymentStatus::Succeeded {
            return Ok((*intent).clone());
        }

        tokio::time::sleep(self.confirm_delay).await;

        let mut confirmed = (*intent).clone();
        confirmed.status = PaymentStatus::Succeeded;
        self.cache
            .payment_intents
            .insert(intent_id, Arc::new(confirmed.clone()))
            .await;
        info!(intent = %intent_id, "Payment confirmed");

        Ok(confirmed)
    }
}

/// Short human-readable reference printed on tickets
pub fn registration_reference(registration_id: Uuid) -> String {
    let simple = registration_id.simple().to_string();
    format!("DMC-{}", simple[..8].to_uppercase())
}

/// Render `data` as a PNG QR code data URL
pub fn confirmation_qr(data: &str) -> Result<String, PaymentError> {
    let code = QrCode::new(data.as_bytes()).map_err(|e| PaymentError::QrCode(e.to_string()))?;
    let image = code.render::<Luma<u8>>().min_dimensions(200, 200).build();

    let mut png = Vec::new();
    DynamicImage::ImageLuma8(image)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| PaymentError::QrCode(e.to_string()))?;

    Ok(format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    ))
}
