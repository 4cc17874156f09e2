//! Registration pricing.
//!
//! Prices a registration form against the current event's price table.

pub mod calculators;
pub mod models;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

// Re-export commonly used items
pub use calculators::{calculate_breakdown, round_money};
pub use models::{Accommodation, CertificateType, FoodPreference, PriceTable, PricingSelections};
pub use responses::{PackagePrice, PricingBreakdown};
pub use routes::router;
pub use services::PricingError;
