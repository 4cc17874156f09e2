//! HTTP route handlers

pub mod api;
pub mod pages;
pub mod payments;
pub mod registrations;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

/// Site pages and JSON API (pricing routes live in `crate::pricing`)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::home))
        .route("/speakers", get(pages::speakers))
        .route("/speakers/:id", get(pages::speaker))
        .route("/health", get(api::health))
        .route("/api/dentists", get(api::list_dentists))
        .route("/api/dentists/:id", get(api::get_dentist))
        .route("/api/reviews", get(api::list_reviews).post(api::create_review))
        .route("/api/events/current", get(api::current_event))
        .route("/api/countdown", get(api::countdown))
        .route("/api/testimonials/carousel", get(api::carousel))
        .route("/api/registrations", post(registrations::submit))
        .route("/api/payments/intent", post(payments::create_intent))
        .route("/api/payments/:id/confirm", post(payments::confirm))
}
