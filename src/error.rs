//! Error handling for the application

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::fetch::FetchError;
use crate::models::FieldError;
use crate::payments::PaymentError;
use crate::pricing::PricingError;

/// Error type for HTML page handlers
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Page not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "Page not found"),
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error")
            }
            AppError::Template(e) => {
                tracing::error!("Template error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Template error")
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
            }
        };

        let html = format!(
            r#"<!DOCTYPE html>
<html>
<head><title>{} - Dental Masterclass</title></head>
<body style="font-family: sans-serif; text-align: center; padding: 50px;">
    <h1>{}</h1>
    <p>{}</p>
    <a href="/">Return to homepage</a>
</body>
</html>"#,
            status.as_u16(),
            status.as_u16(),
            message
        );

        (status, axum::response::Html(html)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Error type for JSON API handlers.
///
/// Rendered as the `{ "success": false, "error": ... }` envelope.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("{0}")]
    Payment(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error envelope body
#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<FieldError>>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_)
            | ApiError::BadRequest(_)
            | ApiError::Pricing(PricingError::UnknownPackage(_)) => StatusCode::BAD_REQUEST,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Payment(_) => StatusCode::PAYMENT_REQUIRED,
            ApiError::Database(_)
            | ApiError::Internal(_)
            | ApiError::Pricing(PricingError::Configuration(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (message, details) = match self {
            ApiError::Database(e) => {
                tracing::error!("Database error: {}", e);
                ("Something went wrong. Please try again.".to_string(), None)
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ("Something went wrong. Please try again.".to_string(), None)
            }
            ApiError::Validation(errors) => ("Validation failed".to_string(), Some(errors)),
            other => (other.to_string(), None),
        };

        let body = ErrorBody {
            success: false,
            error: message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::NotFound => ApiError::NotFound("Resource".to_string()),
            AppError::Database(e) => ApiError::Database(e),
            AppError::Template(e) => ApiError::Internal(e.to_string()),
            AppError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::IntentNotFound(id) => ApiError::NotFound(format!("Payment intent {id}")),
            PaymentError::InvalidAmount(_) => ApiError::BadRequest(err.to_string()),
            PaymentError::QrCode(msg) => ApiError::Internal(msg),
        }
    }
}

/// Normalize server-side failures into the error a content fetcher reports.
impl From<AppError> for FetchError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::NotFound => FetchError::Status {
                status: StatusCode::NOT_FOUND.as_u16(),
                message: "Not found".to_string(),
            },
            AppError::Database(e) => FetchError::Transport(e.to_string()),
            other => FetchError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                message: other.to_string(),
            },
        }
    }
}

impl From<ApiError> for FetchError {
    fn from(err: ApiError) -> Self {
        FetchError::Status {
            status: err.status().as_u16(),
            message: err.to_string(),
        }
    }
}
