//! Pricing services.
//!
//! Resolve the price table for the current event and quote registrations
//! against it.

use tracing::debug;

use crate::content::ContentSource;

use super::calculators::calculate_breakdown;
use super::models::{PriceTable, PricingSelections};
use super::responses::{PackagePrice, PriceListResponse, PricingBreakdown};

/// Pricing calculation error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    #[error("Unknown registration package: {0}")]
    UnknownPackage(String),

    #[error("Pricing configuration error: {0}")]
    Configuration(String),
}

/// Price table of the event currently shown on the site
pub fn active_price_table(content: &ContentSource) -> PriceTable {
    content
        .event()
        .map(|event| event.pricing)
        .unwrap_or_default()
}

/// Validate the table, then itemize the selections against it
pub fn quote(
    selections: &PricingSelections,
    table: &PriceTable,
) -> Result<PricingBreakdown, PricingError> {
    table.validate().map_err(PricingError::Configuration)?;
    let breakdown = calculate_breakdown(selections, table)?;
    debug!(
        package = %selections.package,
        total = %breakdown.total,
        promo_applied = breakdown.promo_applied,
        "Quoted registration"
    );
    Ok(breakdown)
}

/// Public price list for the registration page
pub fn price_list(table: &PriceTable) -> PriceListResponse {
    PriceListResponse {
        currency: table.currency.clone(),
        packages: table
            .packages
            .iter()
            .map(|(key, price)| PackagePrice {
                key: key.clone(),
                price: *price,
            })
            .collect(),
        accommodation_shared: table.accommodation.shared,
        accommodation_single: table.accommodation.single,
        certificate_hardcopy: table.certificate.hardcopy,
        materials_kit: table.materials_kit,
        networking_dinner: table.networking_dinner,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_pricing_error_display() {
        let err = PricingError::UnknownPackage("5-day".to_string());
        assert!(err.to_string().contains("5-day"));

        let err = PricingError::Configuration("No packages configured".to_string());
        assert!(err.to_string().contains("No packages"));
    }

    #[test]
    fn test_quote_rejects_invalid_table() {
        let mut table = PriceTable::default();
        table.networking_dinner = dec!(-10);
        let selections = PricingSelections {
            package: "1-day".to_string(),
            ..Default::default()
        };

        assert!(matches!(
            quote(&selections, &table),
            Err(PricingError::Configuration(_))
        ));
    }

    #[test]
    fn test_price_list_omits_promo_codes() {
        let list = price_list(&PriceTable::default());
        assert_eq!(list.packages.len(), 3);
        let json = serde_json::to_string(&list).unwrap();
        assert!(!json.contains("EARLYBIRD"));
    }
}
