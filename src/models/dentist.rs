//! Dentist (speaker) profiles

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::validation::{FieldError, Validator};

/// Optional social profile links
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
}

/// Masterclass instructor profile. Read-only from the website.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dentist {
    pub id: Uuid,
    pub name: String,
    pub credentials: String,
    pub specialty: String,
    pub bio: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[sqlx(json)]
    #[serde(default)]
    pub social_links: SocialLinks,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub years_of_experience: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub display_order: i32,
}

fn default_active() -> bool {
    true
}

impl Dentist {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        Validator::new()
            .required("name", &self.name)
            .required("credentials", &self.credentials)
            .required("specialty", &self.specialty)
            .required("bio", &self.bio)
            .check(
                "yearsOfExperience",
                self.years_of_experience >= 0,
                "Cannot be negative",
            )
            .url("socialLinks.website", self.social_links.website.as_deref())
            .url("socialLinks.linkedin", self.social_links.linkedin.as_deref())
            .url("socialLinks.instagram", self.social_links.instagram.as_deref())
            .url("socialLinks.twitter", self.social_links.twitter.as_deref())
            .finish()
    }

    /// "Dr. Name, Credentials" line used on cards
    pub fn display_name(&self) -> String {
        if self.credentials.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.credentials)
        }
    }
}

/// Active dentists in display order
pub fn active_in_display_order(mut dentists: Vec<Dentist>) -> Vec<Dentist> {
    dentists.retain(|d| d.is_active);
    dentists.sort_by(|a, b| {
        a.display_order
            .cmp(&b.display_order)
            .then_with(|| a.name.cmp(&b.name))
    });
    dentists
}
