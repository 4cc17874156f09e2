//! Registration form and stored registrations

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::pricing::{Accommodation, CertificateType, FoodPreference, PricingSelections};

use super::validation::{is_email, FieldError, Validator};

/// Everything the visitor enters on the registration form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationFormData {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub qualification: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub city: String,
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
    #[serde(default)]
    pub accept_terms: bool,
}

impl RegistrationFormData {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        Validator::new()
            .required("fullName", &self.full_name)
            .required("email", &self.email)
            .check(
                "email",
                self.email.trim().is_empty() || is_email(&self.email),
                "Enter a valid email address",
            )
            .required("phone", &self.phone)
            .check(
                "phone",
                self.phone.trim().is_empty()
                    || self.phone.chars().filter(char::is_ascii_digit).count() >= 7,
                "Enter a valid phone number",
            )
            .required("package", &self.package)
            .check(
                "acceptTerms",
                self.accept_terms,
                "You must accept the terms and conditions",
            )
            .finish()
    }

    /// The subset of the form that affects the price
    pub fn selections(&self) -> PricingSelections {
        PricingSelections {
            package: self.package.clone(),
            accommodation: self.accommodation,
            food_preference: self.food_preference,
            certificate: self.certificate,
            materials_kit: self.materials_kit,
            networking_dinner: self.networking_dinner,
            promo_code: self.promo_code.clone(),
        }
    }
}

/// Submitted registration
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: Uuid,
    pub event_id: Option<Uuid>,
    pub full_name: String,
    pub email: String,
    pub package: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
    pub currency: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

pub const STATUS_PENDING_PAYMENT: &str = "pending_payment";
pub const STATUS_PAID: &str = "paid";

/// Status a new registration is stored with. Nothing is left to pay when a
/// promo covers the whole amount.
pub fn initial_status(total: Decimal) -> &'static str {
    if total > Decimal::ZERO {
        STATUS_PENDING_PAYMENT
    } else {
        STATUS_PAID
    }
}

impl Registration {
    pub fn is_paid(&self) -> bool {
        self.status == STATUS_PAID
    }

    /// Check that a payment of `amount` may be started for this registration
    pub fn check_payable(&self, amount: Decimal) -> Result<(), String> {
        if self.is_paid() {
            return Err("This registration has already been paid".to_string());
        }
        if self.total != amount {
            return Err("Amount does not match the registration total".to_string());
        }
        Ok(())
    }
}
