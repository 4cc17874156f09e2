//! Core pricing calculation functions.
//!
//! Pure functions for pricing math - no database access.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use super::models::{Discount, PriceTable, PricingSelections};
use super::responses::{LineItem, PricingBreakdown};
use super::PricingError;

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// Banker's rounding rounds to the nearest even number when the value is exactly
/// halfway between two possibilities. This reduces cumulative rounding bias.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use masterclass_web::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Discount a promo grants on `subtotal`, never negative
pub fn discount_amount(discount: &Discount, subtotal: Decimal) -> Result<Decimal, PricingError> {
    let amount = match discount {
        Discount::Percentage(percent) => {
            let scaled = subtotal
                .checked_mul(*percent)
                .ok_or_else(|| overflow("discount"))?;
            round_money(scaled / Decimal::ONE_HUNDRED, 2)
        }
        Discount::Flat(amount) => *amount,
    };
    Ok(amount.max(Decimal::ZERO))
}

fn overflow(what: &str) -> PricingError {
    PricingError::Configuration(format!("{what} is out of range"))
}

/// Itemize a registration and apply any promo code.
///
/// The base price is always the first line; optional extras only appear
/// when they cost something. The total is floored at zero.
pub fn calculate_breakdown(
    selections: &PricingSelections,
    table: &PriceTable,
) -> Result<PricingBreakdown, PricingError> {
    let base = table
        .packages
        .get(&selections.package)
        .copied()
        .ok_or_else(|| PricingError::UnknownPackage(selections.package.clone()))?;

    let mut items = vec![LineItem::new(
        "base",
        format!("Registration ({})", selections.package),
        base,
    )];

    let optional = [
        (
            "accommodation",
            "Accommodation",
            table.accommodation_rate(selections.accommodation),
        ),
        ("food", "Meals", table.food_rate(selections.food_preference)),
        (
            "certificate",
            "Certificate",
            table.certificate_fee(selections.certificate),
        ),
        (
            "materials_kit",
            "Materials kit",
            if selections.materials_kit {
                table.materials_kit
            } else {
                Decimal::ZERO
            },
        ),
        (
            "networking_dinner",
            "Networking dinner",
            if selections.networking_dinner {
                table.networking_dinner
            } else {
                Decimal::ZERO
            },
        ),
    ];

    items.extend(
        optional
            .into_iter()
            .filter(|(_, _, amount)| *amount > Decimal::ZERO)
            .map(|(key, label, amount)| LineItem::new(key, label, amount)),
    );

    let subtotal = items
        .iter()
        .try_fold(Decimal::ZERO, |sum, item| sum.checked_add(item.amount))
        .ok_or_else(|| overflow("subtotal"))?;

    let promo = selections
        .promo_code
        .as_deref()
        .and_then(|code| table.find_promo(code));
    let discount = match promo {
        Some(p) => discount_amount(&p.discount, subtotal)?,
        None => Decimal::ZERO,
    };

    let total = (subtotal - discount).max(Decimal::ZERO);

    Ok(PricingBreakdown {
        currency: table.currency.clone(),
        items,
        subtotal,
        discount,
        promo_code: promo.map(|p| p.code.clone()),
        promo_applied: promo.is_some(),
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::models::{
        Accommodation, CertificateType, FoodPreference, PromoCode,
    };
    use rust_decimal_macros::dec;

    fn selections(package: &str) -> PricingSelections {
        PricingSelections {
            package: package.to_string(),
            ..Default::default()
        }
    }

    fn everything(package: &str) -> PricingSelections {
        PricingSelections {
            package: package.to_string(),
            accommodation: Accommodation::Single,
            food_preference: FoodPreference::NonVegetarian,
            certificate: CertificateType::Hardcopy,
            materials_kit: true,
            networking_dinner: true,
            promo_code: None,
        }
    }

    // ==================== round_money tests ====================

    #[test]
    fn test_round_money_bankers_rounding_to_even() {
        assert_eq!(round_money(dec!(2.5), 0), dec!(2));
        assert_eq!(round_money(dec!(3.5), 0), dec!(4));
        assert_eq!(round_money(dec!(2.25), 1), dec!(2.2));
        assert_eq!(round_money(dec!(2.35), 1), dec!(2.4));
    }

    #[test]
    fn test_round_money_normal_rounding() {
        assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
        assert_eq!(round_money(dec!(1.236), 2), dec!(1.24));
    }

    // ==================== calculate_breakdown tests ====================

    #[test]
    fn test_no_add_ons_costs_base_price() {
        let table = PriceTable::default();
        let breakdown = calculate_breakdown(&selections("2-day"), &table).unwrap();

        assert_eq!(breakdown.items.len(), 1);
        assert_eq!(breakdown.subtotal, dec!(27000));
        assert_eq!(breakdown.total, dec!(27000));
        assert_eq!(breakdown.discount, dec!(0));
        assert!(!breakdown.promo_applied);
    }

    #[test]
    fn test_all_add_ons_itemized() {
        let table = PriceTable::default();
        let breakdown = calculate_breakdown(&everything("1-day"), &table).unwrap();

        let keys: Vec<_> = breakdown.items.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "base",
                "accommodation",
                "food",
                "certificate",
                "materials_kit",
                "networking_dinner"
            ]
        );
        // 15000 + 7500 + 2000 + 500 + 2500 + 3000
        assert_eq!(breakdown.total, dec!(30500));
    }

    #[test]
    fn test_shared_accommodation_and_vegan_meals() {
        let table = PriceTable::default();
        let mut s = selections("1-day");
        s.accommodation = Accommodation::Shared;
        s.food_preference = FoodPreference::Vegan;

        let breakdown = calculate_breakdown(&s, &table).unwrap();
        assert_eq!(breakdown.total, dec!(15000) + dec!(4500) + dec!(1800));
    }

    #[test]
    fn test_percentage_promo() {
        let table = PriceTable::default();
        let mut s = everything("1-day");
        s.promo_code = Some("earlybird".to_string());

        let breakdown = calculate_breakdown(&s, &table).unwrap();
        assert!(breakdown.promo_applied);
        assert_eq!(breakdown.promo_code.as_deref(), Some("EARLYBIRD"));
        assert_eq!(breakdown.discount, dec!(3050));
        assert_eq!(breakdown.total, dec!(27450));
    }

    #[test]
    fn test_percentage_promo_rounds_to_cents() {
        let mut table = PriceTable::default();
        table.packages.insert("workshop".to_string(), dec!(99.99));
        table.promo_codes.push(PromoCode {
            code: "THIRD".to_string(),
            discount: Discount::Percentage(dec!(33.3333)),
        });
        let mut s = selections("workshop");
        s.promo_code = Some("THIRD".to_string());

        let breakdown = calculate_breakdown(&s, &table).unwrap();
        assert_eq!(breakdown.discount, dec!(33.33));
        assert_eq!(breakdown.total, dec!(66.66));
    }

    #[test]
    fn test_unknown_promo_is_ignored() {
        let table = PriceTable::default();
        let mut s = selections("3-day");
        s.promo_code = Some("NOPE".to_string());

        let breakdown = calculate_breakdown(&s, &table).unwrap();
        assert!(!breakdown.promo_applied);
        assert!(breakdown.promo_code.is_none());
        assert_eq!(breakdown.total, dec!(38000));
    }

    #[test]
    fn test_flat_discount_larger_than_subtotal_floors_at_zero() {
        let mut table = PriceTable::default();
        table.promo_codes.push(PromoCode {
            code: "SPONSOR".to_string(),
            discount: Discount::Flat(dec!(1000000)),
        });
        let mut s = everything("1-day");
        s.promo_code = Some("SPONSOR".to_string());

        let breakdown = calculate_breakdown(&s, &table).unwrap();
        assert_eq!(breakdown.total, dec!(0));
    }

    #[test]
    fn test_total_matches_items_minus_discount_for_all_combinations() {
        let table = PriceTable::default();
        let accommodations = [Accommodation::None, Accommodation::Shared, Accommodation::Single];
        let foods = [
            FoodPreference::None,
            FoodPreference::Vegetarian,
            FoodPreference::NonVegetarian,
            FoodPreference::Vegan,
        ];
        let certificates = [CertificateType::Digital, CertificateType::Hardcopy];
        let promos = [None, Some("EARLYBIRD"), Some("STUDENT2000")];

        for package in table.packages.keys() {
            for accommodation in accommodations {
                for food_preference in foods {
                    for certificate in certificates {
                        for (materials_kit, networking_dinner) in
                            [(false, false), (true, false), (false, true), (true, true)]
                        {
                            for promo in promos {
                                let s = PricingSelections {
                                    package: package.clone(),
                                    accommodation,
                                    food_preference,
                                    certificate,
                                    materials_kit,
                                    networking_dinner,
                                    promo_code: promo.map(str::to_string),
                                };
                                let b = calculate_breakdown(&s, &table).unwrap();
                                let sum: Decimal = b.items.iter().map(|i| i.amount).sum();

                                assert!(b.total >= Decimal::ZERO);
                                assert_eq!(b.subtotal, sum);
                                assert_eq!(b.total, (sum - b.discount).max(Decimal::ZERO));
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_unknown_package_is_an_error() {
        let table = PriceTable::default();
        let err = calculate_breakdown(&selections("10-day"), &table).unwrap_err();
        assert!(matches!(err, PricingError::UnknownPackage(ref p) if p == "10-day"));
    }

    #[test]
    fn test_overflowing_table_is_a_configuration_error() {
        let mut table = PriceTable::default();
        table.packages.insert("vip".to_string(), Decimal::MAX);

        let mut picked = selections("vip");
        picked.materials_kit = true;
        let err = calculate_breakdown(&picked, &table).unwrap_err();
        assert!(matches!(err, PricingError::Configuration(_)));
    }

    #[test]
    fn test_percentage_discount_overflow_is_an_error() {
        let err = discount_amount(&Discount::Percentage(dec!(50)), Decimal::MAX).unwrap_err();
        assert!(matches!(err, PricingError::Configuration(_)));
    }
}
