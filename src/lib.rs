//! Dental Masterclass website backend.
//!
//! Serves the event pages and the JSON API behind them: speakers,
//! testimonials, the event countdown, registration pricing and a simulated
//! checkout. Site content is read from Postgres when `LIVE_CONTENT` is on
//! and falls back to bundled sample content otherwise.

pub mod cache;
pub mod carousel;
pub mod config;
pub mod content;
pub mod countdown;
pub mod db;
pub mod error;
pub mod fetch;
pub mod models;
pub mod payments;
pub mod pricing;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header::CONTENT_TYPE, Method},
    Router,
};
use sqlx::PgPool;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer,
};
use tracing::debug;
use uuid::Uuid;

use cache::AppCache;
use config::Config;
use content::{ContentSource, FallbackContent};
use countdown::Countdown;
use error::AppError;
use models::Dentist;
use payments::PaymentGateway;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub cache: AppCache,
    pub content: Arc<ContentSource>,
    pub countdown: Arc<Countdown>,
    pub payments: PaymentGateway,
    pub config: Arc<Config>,
}

impl AppState {
    /// Build the state and start the initial content fetch and the countdown.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn new(config: Config, db: PgPool, fallback: FallbackContent) -> Self {
        let target = fallback.event.starts_at;
        let content = Arc::new(ContentSource::new(db.clone(), fallback, config.live_content));
        content.activate();

        let cache = AppCache::new();
        Self {
            payments: PaymentGateway::new(cache.clone(), config.payment_delay),
            countdown: Arc::new(Countdown::start(target)),
            db,
            cache,
            content,
            config: Arc::new(config),
        }
    }

    /// Look up a dentist: cache, then loaded content, then the database
    pub async fn find_dentist(&self, id: Uuid) -> error::Result<Dentist> {
        if let Some(cached) = self.cache.dentists.get(&id).await {
            debug!("Cache HIT for dentist: {}", id);
            return Ok((*cached).clone());
        }
        debug!("Cache MISS for dentist: {}", id);

        let dentist = match self.content.find_speaker(id) {
            Some(dentist) => dentist,
            None if self.content.is_live() => db::get_dentist(&self.db, id).await?,
            None => return Err(AppError::NotFound),
        };

        self.cache
            .dentists
            .insert(id, Arc::new(dentist.clone()))
            .await;
        Ok(dentist)
    }
}

/// Assemble the full application router
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .merge(routes::router())
        .merge(pricing::router())
        .nest_service("/static", ServeDir::new(&state.config.static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use serde_json::{json, Value};
    use std::str::FromStr;
    use tower::ServiceExt;

    use crate::content::tests::offline_pool;

    fn offline_state() -> AppState {
        let config = Config {
            live_content: false,
            payment_delay: Duration::from_millis(10),
            ..Config::default()
        };
        AppState::new(config, offline_pool(), FallbackContent::bundled().unwrap())
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = app(offline_state()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn decimal(value: &Value) -> Decimal {
        Decimal::from_str(value.as_str().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_list_dentists_uses_fallback() {
        let (status, body) = send(get("/api/dentists")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 3);
        assert_eq!(body["data"][0]["name"], "Dr. Meera Iyer");
    }

    #[tokio::test]
    async fn test_unknown_dentist_is_404() {
        let uri = format!("/api/dentists/{}", Uuid::new_v4());
        let (status, body) = send(get(&uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_quote_applies_promo() {
        let request = post_json(
            "/api/registrations/quote",
            json!({
                "package": "2-day",
                "accommodation": "single",
                "promoCode": "earlybird"
            }),
        );
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(decimal(&body["data"]["subtotal"]), dec!(34500));
        assert_eq!(decimal(&body["data"]["total"]), dec!(31050));
        assert_eq!(body["data"]["promoApplied"], true);
    }

    #[tokio::test]
    async fn test_quote_unknown_package_is_400() {
        let request = post_json("/api/registrations/quote", json!({ "package": "5-day" }));
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_countdown_targets_event_start() {
        let (status, body) = send(get("/api/countdown")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["target"], "2027-02-12T03:30:00Z");
        assert!(body["data"]["remaining"]["days"].is_number());
    }

    #[tokio::test]
    async fn test_carousel_wraps_backwards() {
        let (status, body) = send(get("/api/testimonials/carousel?index=0&action=prev")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["index"], 2);
        assert_eq!(body["data"]["direction"], "backward");
    }

    #[tokio::test]
    async fn test_carousel_rejects_unknown_action() {
        let (status, _) = send(get("/api/testimonials/carousel?action=shuffle")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_review_validation_errors() {
        let request = post_json(
            "/api/reviews",
            json!({ "name": "", "rating": 7, "text": "Great" }),
        );
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["details"].as_array().unwrap().len() >= 2);
    }

    #[tokio::test]
    async fn test_review_submission_unavailable_offline() {
        let request = post_json(
            "/api/reviews",
            json!({ "name": "Dr. Kavya Rao", "rating": 5, "text": "Superb hands-on sessions." }),
        );
        let (status, _) = send(request).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_registration_requires_terms_and_contact() {
        let request = post_json(
            "/api/registrations",
            json!({
                "fullName": "Dr. Kavya Rao",
                "email": "not-an-email",
                "phone": "",
                "package": "2-day"
            }),
        );
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let fields: Vec<&str> = body["details"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|d| d["field"].as_str())
            .collect();
        assert!(fields.contains(&"email"));
        assert!(fields.contains(&"phone"));
        assert!(fields.contains(&"acceptTerms"));
    }

    #[tokio::test]
    async fn test_registration_unavailable_offline() {
        let request = post_json(
            "/api/registrations",
            json!({
                "fullName": "Dr. Kavya Rao",
                "email": "kavya@brightsmiles.in",
                "phone": "+91 98450 67890",
                "package": "2-day",
                "acceptTerms": true
            }),
        );
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_confirm_unknown_intent_is_404() {
        let uri = format!("/api/payments/{}/confirm", Uuid::new_v4());
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_health_reports_content_mode() {
        let (status, body) = send(get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["content"]["live"], false);
    }

    #[tokio::test]
    async fn test_home_page_renders() {
        let response = app(offline_state()).oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("Advanced Endodontics"));
        assert!(html.contains("Dr. Meera Iyer"));
    }

    #[tokio::test]
    async fn test_speaker_page_404_for_unknown_id() {
        let uri = format!("/speakers/{}", Uuid::new_v4());
        let response = app(offline_state()).oneshot(get(&uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_find_dentist_populates_cache() {
        let state = offline_state();
        let id = state.content.speakers()[1].id;

        let dentist = state.find_dentist(id).await.unwrap();
        assert_eq!(dentist.name, "Dr. Arjun Menon");
        assert!(state.cache.dentists.get(&id).await.is_some());
    }
}
