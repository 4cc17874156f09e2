//! Pricing API routes.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::error::ApiError;
use crate::fetch::ApiResponse;
use crate::AppState;

use super::requests::QuoteRequest;
use super::responses::{PriceListResponse, PricingBreakdown};
use super::services;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/pricing", get(price_list))
        .route("/api/registrations/quote", post(quote))
}

async fn price_list(State(state): State<AppState>) -> ApiResponse<PriceListResponse> {
    let table = services::active_price_table(&state.content);
    ApiResponse::ok(services::price_list(&table))
}

async fn quote(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Result<ApiResponse<PricingBreakdown>, ApiError> {
    let table = services::active_price_table(&state.content);
    let breakdown = services::quote(&request.selections, &table)?;
    Ok(ApiResponse::ok(breakdown))
}
