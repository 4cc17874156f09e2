//! Pricing tables and registration selections.
//!
//! An event carries its own `PriceTable` (stored as JSON alongside the event).

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Largest single amount a table may hold; registrations store totals as NUMERIC(12, 2)
pub const MAX_AMOUNT: Decimal = dec!(9999999999.99);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accommodation {
    #[default]
    None,
    Shared,
    Single,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodPreference {
    #[default]
    None,
    Vegetarian,
    NonVegetarian,
    Vegan,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificateType {
    #[default]
    Digital,
    Hardcopy,
}

/// Accommodation surcharges by tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccommodationRates {
    pub shared: Decimal,
    pub single: Decimal,
}

/// Meal surcharges by preference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodRates {
    pub vegetarian: Decimal,
    pub non_vegetarian: Decimal,
    pub vegan: Decimal,
}

/// Certificate fees by type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateRates {
    pub digital: Decimal,
    pub hardcopy: Decimal,
}

/// Discount granted by a promo code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Discount {
    /// Percentage of the subtotal (0-100)
    Percentage(Decimal),
    /// Fixed amount off the subtotal
    Flat(Decimal),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromoCode {
    pub code: String,
    pub discount: Discount,
}

/// Full price list for one event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceTable {
    pub currency: String,
    /// Base registration price by package key (e.g. "1-day", "2-day")
    pub packages: BTreeMap<String, Decimal>,
    pub accommodation: AccommodationRates,
    pub food: FoodRates,
    pub certificate: CertificateRates,
    pub materials_kit: Decimal,
    pub networking_dinner: Decimal,
    #[serde(default)]
    pub promo_codes: Vec<PromoCode>,
}

impl PriceTable {
    pub fn accommodation_rate(&self, tier: Accommodation) -> Decimal {
        match tier {
            Accommodation::None => Decimal::ZERO,
            Accommodation::Shared => self.accommodation.shared,
            Accommodation::Single => self.accommodation.single,
        }
    }

    pub fn food_rate(&self, preference: FoodPreference) -> Decimal {
        match preference {
            FoodPreference::None => Decimal::ZERO,
            FoodPreference::Vegetarian => self.food.vegetarian,
            FoodPreference::NonVegetarian => self.food.non_vegetarian,
            FoodPreference::Vegan => self.food.vegan,
        }
    }

    pub fn certificate_fee(&self, certificate: CertificateType) -> Decimal {
        match certificate {
            CertificateType::Digital => self.certificate.digital,
            CertificateType::Hardcopy => self.certificate.hardcopy,
        }
    }

    /// Look up a promo code, ignoring case and surrounding whitespace
    pub fn find_promo(&self, code: &str) -> Option<&PromoCode> {
        let code = code.trim();
        if code.is_empty() {
            return None;
        }
        self.promo_codes
            .iter()
            .find(|promo| promo.code.eq_ignore_ascii_case(code))
    }

    /// Reject tables with negative or oversized prices and out-of-range percentages
    pub fn validate(&self) -> Result<(), String> {
        let mut amounts: Vec<(&str, Decimal)> = vec![
            ("accommodation.shared", self.accommodation.shared),
            ("accommodation.single", self.accommodation.single),
            ("food.vegetarian", self.food.vegetarian),
            ("food.nonVegetarian", self.food.non_vegetarian),
            ("food.vegan", self.food.vegan),
            ("certificate.digital", self.certificate.digital),
            ("certificate.hardcopy", self.certificate.hardcopy),
            ("materialsKit", self.materials_kit),
            ("networkingDinner", self.networking_dinner),
        ];
        amounts.extend(self.packages.iter().map(|(key, price)| (key.as_str(), *price)));

        if let Some((name, _)) = amounts.iter().find(|(_, amount)| amount.is_sign_negative()) {
            return Err(format!("Negative price for {name}"));
        }
        if let Some((name, _)) = amounts.iter().find(|(_, amount)| *amount > MAX_AMOUNT) {
            return Err(format!("Price for {name} exceeds {MAX_AMOUNT}"));
        }

        for promo in &self.promo_codes {
            match promo.discount {
                Discount::Percentage(p) if p < Decimal::ZERO || p > dec!(100) => {
                    return Err(format!("Promo {} percentage out of range", promo.code));
                }
                Discount::Flat(amount) if amount.is_sign_negative() => {
                    return Err(format!("Promo {} has a negative amount", promo.code));
                }
                Discount::Flat(amount) if amount > MAX_AMOUNT => {
                    return Err(format!("Promo {} amount exceeds {MAX_AMOUNT}", promo.code));
                }
                _ => {}
            }
        }

        if self.packages.is_empty() {
            return Err("No packages configured".to_string());
        }
        Ok(())
    }
}

impl Default for PriceTable {
    fn default() -> Self {
        Self {
            currency: "INR".to_string(),
            packages: BTreeMap::from([
                ("1-day".to_string(), dec!(15000)),
                ("2-day".to_string(), dec!(27000)),
                ("3-day".to_string(), dec!(38000)),
            ]),
            accommodation: AccommodationRates {
                shared: dec!(4500),
                single: dec!(7500),
            },
            food: FoodRates {
                vegetarian: dec!(1500),
                non_vegetarian: dec!(2000),
                vegan: dec!(1800),
            },
            certificate: CertificateRates {
                digital: dec!(0),
                hardcopy: dec!(500),
            },
            materials_kit: dec!(2500),
            networking_dinner: dec!(3000),
            promo_codes: vec![
                PromoCode {
                    code: "EARLYBIRD".to_string(),
                    discount: Discount::Percentage(dec!(10)),
                },
                PromoCode {
                    code: "STUDENT2000".to_string(),
                    discount: Discount::Flat(dec!(2000)),
                },
            ],
        }
    }
}

/// Options picked on the registration form that affect the price
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingSelections {
    pub package: String,
    #[serde(default)]
    pub accommodation: Accommodation,
    #[serde(default)]
    pub food_preference: FoodPreference,
    #[serde(default)]
    pub certificate: CertificateType,
    #[serde(default)]
    pub materials_kit: bool,
    #[serde(default)]
    pub networking_dinner: bool,
    #[serde(default)]
    pub promo_code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_is_valid() {
        assert!(PriceTable::default().validate().is_ok());
    }

    #[test]
    fn test_find_promo_ignores_case_and_whitespace() {
        let table = PriceTable::default();
        assert_eq!(table.find_promo("  earlybird ").unwrap().code, "EARLYBIRD");
        assert!(table.find_promo("").is_none());
        assert!(table.find_promo("FREESTUFF").is_none());
    }

    #[test]
    fn test_validate_rejects_negative_price() {
        let mut table = PriceTable::default();
        table.materials_kit = dec!(-1);
        assert!(table.validate().unwrap_err().contains("materialsKit"));
    }

    #[test]
    fn test_validate_rejects_oversized_price() {
        let mut table = PriceTable::default();
        table.packages.insert("vip".to_string(), Decimal::MAX);
        assert!(table.validate().unwrap_err().contains("vip"));

        table.packages.insert("vip".to_string(), MAX_AMOUNT);
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_percentage_over_100() {
        let mut table = PriceTable::default();
        table.promo_codes.push(PromoCode {
            code: "TOOMUCH".to_string(),
            discount: Discount::Percentage(dec!(150)),
        });
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_promo_code_json_shape() {
        let promo: PromoCode = serde_json::from_value(serde_json::json!({
            "code": "SPRING",
            "discount": { "kind": "flat", "value": "750" }
        }))
        .unwrap();
        assert_eq!(promo.discount, Discount::Flat(dec!(750)));
    }

    #[test]
    fn test_selections_defaults() {
        let selections: PricingSelections =
            serde_json::from_value(serde_json::json!({ "package": "2-day" })).unwrap();
        assert_eq!(selections.accommodation, Accommodation::None);
        assert_eq!(selections.food_preference, FoodPreference::None);
        assert_eq!(selections.certificate, CertificateType::Digital);
        assert!(!selections.materials_kit);
    }
}
