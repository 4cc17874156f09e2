//! Response DTOs for pricing API endpoints.

use rust_decimal::Decimal;
use serde::Serialize;

/// One priced line of a registration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    pub key: String,
    pub label: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
}

impl LineItem {
    pub fn new(key: &str, label: impl Into<String>, amount: Decimal) -> Self {
        Self {
            key: key.to_string(),
            label: label.into(),
            amount,
        }
    }
}

/// Itemized cost of a registration. Derived on demand, never a source of truth.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingBreakdown {
    pub currency: String,
    pub items: Vec<LineItem>,
    #[serde(with = "rust_decimal::serde::str")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub discount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,
    pub promo_applied: bool,
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
}

/// Public view of an event's price list (promo codes are not disclosed)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceListResponse {
    pub currency: String,
    pub packages: Vec<PackagePrice>,
    #[serde(with = "rust_decimal::serde::str")]
    pub accommodation_shared: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub accommodation_single: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub certificate_hardcopy: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub materials_kit: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub networking_dinner: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct PackagePrice {
    pub key: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
}
