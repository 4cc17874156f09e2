//! Attendee testimonials

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::validation::{FieldError, Validator};

pub const MAX_REVIEW_TEXT_LEN: usize = 1000;

/// Attendee review as stored
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub credential: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    pub rating: i32,
    pub text: String,
    #[serde(default)]
    pub event_id: Option<Uuid>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub is_approved: bool,
    #[serde(default)]
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
}

/// Review submitted from the website
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub name: String,
    #[serde(default)]
    pub credential: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    pub rating: i32,
    pub text: String,
    #[serde(default)]
    pub event_id: Option<Uuid>,
}

impl NewReview {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        Validator::new()
            .required("name", &self.name)
            .required("text", &self.text)
            .max_chars("text", &self.text, MAX_REVIEW_TEXT_LEN)
            .check(
                "rating",
                (1..=5).contains(&self.rating),
                "Rating must be between 1 and 5",
            )
            .url("photoUrl", self.photo_url.as_deref())
            .finish()
    }
}

/// Approved reviews only, featured first, newest first within each group
pub fn featured_first(mut reviews: Vec<Review>) -> Vec<Review> {
    reviews.retain(|r| r.is_approved);
    reviews.sort_by(|a, b| {
        b.is_featured
            .cmp(&a.is_featured)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    reviews
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Duration;

    pub(crate) fn review(name: &str, featured: bool, age_days: i64) -> Review {
        Review {
            id: Uuid::new_v4(),
            name: name.to_string(),
            credential: "BDS".to_string(),
            photo_url: None,
            rating: 5,
            text: "Hands-on sessions were excellent.".to_string(),
            event_id: None,
            is_verified: true,
            is_approved: true,
            is_featured: featured,
            created_at: Utc::now() - Duration::days(age_days),
        }
    }

    fn new_review(rating: i32, text: &str) -> NewReview {
        NewReview {
            name: "Dr. Kavya".to_string(),
            credential: "BDS".to_string(),
            photo_url: None,
            rating,
            text: text.to_string(),
            event_id: None,
        }
    }

    #[test]
    fn test_rating_bounds() {
        assert!(new_review(1, "Good").validate().is_ok());
        assert!(new_review(5, "Good").validate().is_ok());
        assert!(new_review(0, "Good").validate().is_err());
        assert!(new_review(6, "Good").validate().is_err());
    }

    #[test]
    fn test_text_limit() {
        let at_limit = "a".repeat(MAX_REVIEW_TEXT_LEN);
        let over_limit = "a".repeat(MAX_REVIEW_TEXT_LEN + 1);
        assert!(new_review(4, &at_limit).validate().is_ok());

        let errors = new_review(4, &over_limit).validate().unwrap_err();
        assert_eq!(errors[0].field, "text");
    }

    #[test]
    fn test_featured_first_ordering() {
        let mut pending = review("Pending", true, 0);
        pending.is_approved = false;

        let reviews = vec![
            review("Old regular", false, 10),
            review("New regular", false, 1),
            pending,
            review("Old featured", true, 30),
            review("New featured", true, 2),
        ];

        let names: Vec<_> = featured_first(reviews).into_iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec!["New featured", "Old featured", "New regular", "Old regular"]
        );
    }
}
