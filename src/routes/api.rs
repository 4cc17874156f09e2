//! JSON API handlers for site content

use std::time::Instant;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cache::CacheStats;
use crate::carousel::{Carousel, CarouselAction, SlideDirection};
use crate::content::ContentStatus;
use crate::countdown::TimeRemaining;
use crate::db;
use crate::error::{ApiError, AppError};
use crate::fetch::ApiResponse;
use crate::models::{Dentist, Event, NewReview, Review};
use crate::AppState;

/// List active dentists
pub async fn list_dentists(State(state): State<AppState>) -> ApiResponse<Vec<Dentist>> {
    ApiResponse::list(state.content.speakers())
}

/// Single dentist profile
pub async fn get_dentist(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Dentist>, ApiError> {
    let dentist = state.find_dentist(id).await.map_err(|e| match e {
        AppError::NotFound => ApiError::NotFound("Dentist".to_string()),
        other => other.into(),
    })?;
    Ok(ApiResponse::ok(dentist))
}

#[derive(Debug, Deserialize)]
pub struct ReviewListQuery {
    #[serde(default)]
    pub featured: bool,
    pub limit: Option<usize>,
}

/// Approved reviews, featured first
pub async fn list_reviews(
    State(state): State<AppState>,
    Query(query): Query<ReviewListQuery>,
) -> ApiResponse<Vec<Review>> {
    let mut reviews = state.content.testimonials();
    if query.featured {
        reviews.retain(|r| r.is_featured);
    }
    if let Some(limit) = query.limit {
        reviews.truncate(limit);
    }
    ApiResponse::list(reviews)
}

/// Submit a review for moderation
pub async fn create_review(
    State(state): State<AppState>,
    Json(review): Json<NewReview>,
) -> Result<(StatusCode, ApiResponse<Review>), ApiError> {
    review.validate().map_err(ApiError::Validation)?;

    if !state.content.is_live() {
        return Err(ApiError::Unavailable(
            "Reviews cannot be submitted right now. Please try again later.".to_string(),
        ));
    }

    let stored = db::insert_review(&state.db, &review).await?;
    tracing::info!(review = %stored.id, rating = stored.rating, "Review submitted for moderation");

    Ok((StatusCode::CREATED, ApiResponse::ok(stored)))
}

/// The event currently promoted on the site
pub async fn current_event(State(state): State<AppState>) -> Result<ApiResponse<Event>, ApiError> {
    state
        .content
        .event()
        .map(ApiResponse::ok)
        .ok_or_else(|| ApiError::NotFound("Event".to_string()))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountdownResponse {
    pub target: DateTime<Utc>,
    pub remaining: TimeRemaining,
    pub elapsed: bool,
}

/// Time left until the event starts
pub async fn countdown(State(state): State<AppState>) -> ApiResponse<CountdownResponse> {
    let remaining = state.countdown.current();
    ApiResponse::ok(CountdownResponse {
        target: state.countdown.target(),
        remaining,
        elapsed: remaining.is_elapsed(),
    })
}

#[derive(Debug, Deserialize)]
pub struct CarouselQuery {
    #[serde(default)]
    pub index: usize,
    pub action: Option<String>,
    pub target: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct CarouselSlide {
    pub index: usize,
    pub total: usize,
    pub direction: SlideDirection,
    pub review: Review,
}

fn parse_action(query: &CarouselQuery) -> Result<Option<CarouselAction>, ApiError> {
    match query.action.as_deref() {
        None => Ok(None),
        Some("next") => Ok(Some(CarouselAction::Next)),
        Some("previous") | Some("prev") => Ok(Some(CarouselAction::Previous)),
        Some("goto") => query
            .target
            .map(|target| Some(CarouselAction::GoTo(target)))
            .ok_or_else(|| ApiError::BadRequest("goto requires a target index".to_string())),
        Some(other) => Err(ApiError::BadRequest(format!(
            "Unknown carousel action: {other}"
        ))),
    }
}

/// One navigation step of the testimonial carousel
pub async fn carousel(
    State(state): State<AppState>,
    Query(query): Query<CarouselQuery>,
) -> Result<ApiResponse<CarouselSlide>, ApiError> {
    let action = parse_action(&query)?;
    let reviews = state.content.testimonials();
    if reviews.is_empty() {
        return Err(ApiError::NotFound("Testimonials".to_string()));
    }

    let now = Instant::now();
    let mut carousel = Carousel::at(reviews.len(), query.index, now);
    if let Some(action) = action {
        carousel.apply(action, now);
    }

    let index = carousel.index();
    Ok(ApiResponse::ok(CarouselSlide {
        index,
        total: carousel.len(),
        direction: carousel.direction(),
        review: reviews[index].clone(),
    }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub cache: CacheStats,
    pub content: ContentStatus,
}

/// Liveness plus cache and content status
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        cache: state.cache.stats(),
        content: state.content.status(),
    })
}
