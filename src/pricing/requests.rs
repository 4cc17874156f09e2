//! Request DTOs for pricing API endpoints.

use serde::Deserialize;

use super::models::PricingSelections;

/// Request to price a registration before it is submitted
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    #[serde(flatten)]
    pub selections: PricingSelections,
}
