//! Simulated checkout

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::warn;
use uuid::Uuid;

use crate::db;
use crate::error::{ApiError, AppError};
use crate::fetch::ApiResponse;
use crate::models::registration::STATUS_PAID;
use crate::payments::{CreateIntentRequest, PaymentError, PaymentIntent, PaymentStatus};
use crate::AppState;

const PAYMENT_FAILED: &str = "Payment could not be completed. Please try again.";

/// Create a payment intent for a pending registration
pub async fn create_intent(
    State(state): State<AppState>,
    Json(request): Json<CreateIntentRequest>,
) -> Result<ApiResponse<PaymentIntent>, ApiError> {
    let registration = db::get_registration(&state.db, request.registration_id)
        .await
        .map_err(|e| match e {
            AppError::NotFound => ApiError::NotFound("Registration".to_string()),
            other => other.into(),
        })?;

    registration
        .check_payable(request.amount)
        .map_err(ApiError::BadRequest)?;

    let intent = state
        .payments
        .create_intent(registration.id, registration.total, &registration.currency)
        .await?;
    Ok(ApiResponse::ok(intent))
}

/// Confirm a payment intent and mark its registration paid
pub async fn confirm(
    State(state): State<AppState>,
    Path(intent_id): Path<Uuid>,
) -> Result<ApiResponse<PaymentIntent>, ApiError> {
    let intent = state.payments.confirm(intent_id).await.map_err(|err| {
        warn!(intent = %intent_id, "Payment confirmation failed: {}", err);
        confirmation_error(err)
    })?;

    if let Some(status) = registration_status(&intent) {
        db::set_registration_status(&state.db, intent.registration_id, status).await?;
    }
    Ok(ApiResponse::ok(intent))
}

/// Visitor-facing error for a failed confirmation
fn confirmation_error(err: PaymentError) -> ApiError {
    match err {
        PaymentError::IntentNotFound(_) => ApiError::NotFound("Payment intent".to_string()),
        _ => ApiError::Payment(PAYMENT_FAILED.to_string()),
    }
}

/// Registration status implied by a confirmed intent
fn registration_status(intent: &PaymentIntent) -> Option<&'static str> {
    match intent.status {
        PaymentStatus::Succeeded => Some(STATUS_PAID),
        PaymentStatus::RequiresConfirmation => None,
    }
}
