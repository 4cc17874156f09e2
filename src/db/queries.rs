//! Database queries for site content and registrations

use chrono::{DateTime, Utc};
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Dentist, Event, NewReview, Registration, RegistrationFormData, Review};
use crate::pricing::PricingBreakdown;

/// Get all active dentists in display order
pub async fn list_active_dentists(pool: &PgPool) -> Result<Vec<Dentist>> {
    let dentists = sqlx::query_as::<_, Dentist>(
        r#"
        SELECT
            id,
            name,
            credentials,
            specialty,
            bio,
            image_url,
            achievements,
            social_links,
            topics,
            institution,
            years_of_experience,
            is_active,
            display_order
        FROM dentists
        WHERE is_active = true
        ORDER BY display_order, name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(dentists)
}

/// Get a single active dentist
pub async fn get_dentist(pool: &PgPool, id: Uuid) -> Result<Dentist> {
    let dentist = sqlx::query_as::<_, Dentist>(
        r#"
        SELECT
            id,
            name,
            credentials,
            specialty,
            bio,
            image_url,
            achievements,
            social_links,
            topics,
            institution,
            years_of_experience,
            is_active,
            display_order
        FROM dentists
        WHERE id = $1
          AND is_active = true
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(dentist)
}

/// Approved reviews, featured first then newest
pub async fn list_featured_reviews(pool: &PgPool, limit: i64) -> Result<Vec<Review>> {
    let reviews = sqlx::query_as::<_, Review>(
        r#"
        SELECT
            id,
            name,
            credential,
            photo_url,
            rating,
            text,
            event_id,
            is_verified,
            is_approved,
            is_featured,
            created_at
        FROM reviews
        WHERE is_approved = true
        ORDER BY is_featured DESC, created_at DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(reviews)
}

/// Store a visitor-submitted review. It stays hidden until approved.
pub async fn insert_review(pool: &PgPool, review: &NewReview) -> Result<Review> {
    let stored = sqlx::query_as::<_, Review>(
        r#"
        INSERT INTO reviews (id, name, credential, photo_url, rating, text, event_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING
            id,
            name,
            credential,
            photo_url,
            rating,
            text,
            event_id,
            is_verified,
            is_approved,
            is_featured,
            created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(review.name.trim())
    .bind(review.credential.trim())
    .bind(&review.photo_url)
    .bind(review.rating)
    .bind(review.text.trim())
    .bind(review.event_id)
    .fetch_one(pool)
    .await?;

    Ok(stored)
}

/// The next active event that has not yet ended
pub async fn get_current_event(pool: &PgPool, now: DateTime<Utc>) -> Result<Event> {
    let event = sqlx::query_as::<_, Event>(
        r#"
        SELECT id, title, slug, venue, city, starts_at, ends_at, is_active, pricing
        FROM events
        WHERE is_active = true
          AND ends_at > $1
        ORDER BY starts_at
        LIMIT 1
        "#,
    )
    .bind(now)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(event)
}

/// Store a submitted registration together with the price it was quoted
pub async fn insert_registration(
    pool: &PgPool,
    event_id: Option<Uuid>,
    form: &RegistrationFormData,
    pricing: &PricingBreakdown,
    status: &str,
) -> Result<Registration> {
    let registration = sqlx::query_as::<_, Registration>(
        r#"
        INSERT INTO registrations
            (id, event_id, full_name, email, package, total, currency, status, form, pricing)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING id, event_id, full_name, email, package, total, currency, status, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(event_id)
    .bind(form.full_name.trim())
    .bind(form.email.trim())
    .bind(&form.package)
    .bind(pricing.total)
    .bind(&pricing.currency)
    .bind(status)
    .bind(Json(form))
    .bind(Json(pricing))
    .fetch_one(pool)
    .await?;

    Ok(registration)
}

/// Get a registration by id
pub async fn get_registration(pool: &PgPool, id: Uuid) -> Result<Registration> {
    let registration = sqlx::query_as::<_, Registration>(
        r#"
        SELECT id, event_id, full_name, email, package, total, currency, status, created_at
        FROM registrations
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(registration)
}

/// Update a registration's status
pub async fn set_registration_status(pool: &PgPool, id: Uuid, status: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE registrations
        SET status = $2
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(status)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}
