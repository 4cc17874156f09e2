//! Registration submission

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::info;

use crate::db;
use crate::error::ApiError;
use crate::fetch::ApiResponse;
use crate::models::registration::STATUS_PENDING_PAYMENT;
use crate::models::{initial_status, Registration, RegistrationFormData};
use crate::payments::registration_reference;
use crate::pricing::{services, PricingBreakdown};
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    pub registration: Registration,
    pub reference: String,
    pub pricing: PricingBreakdown,
    /// False when a promo code covered the whole amount
    pub payment_required: bool,
}

/// Validate, price server-side and store a registration
pub async fn submit(
    State(state): State<AppState>,
    Json(form): Json<RegistrationFormData>,
) -> Result<(StatusCode, ApiResponse<RegistrationResponse>), ApiError> {
    form.validate().map_err(ApiError::Validation)?;

    if !state.content.is_live() {
        return Err(ApiError::Unavailable(
            "Registrations cannot be accepted right now. Please try again later.".to_string(),
        ));
    }

    let table = services::active_price_table(&state.content);
    let pricing = services::quote(&form.selections(), &table)?;

    let status = initial_status(pricing.total);
    let payment_required = status == STATUS_PENDING_PAYMENT;

    let registration = db::insert_registration(
        &state.db,
        state.content.live_event().map(|e| e.id),
        &form,
        &pricing,
        status,
    )
    .await?;

    info!(
        registration = %registration.id,
        package = %registration.package,
        total = %registration.total,
        "Registration submitted"
    );

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(RegistrationResponse {
            reference: registration_reference(registration.id),
            registration,
            pricing,
            payment_required,
        }),
    ))
}
