//! The `{ success, data, error, count }` envelope shared by every JSON endpoint.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use super::FetchError;

/// API response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            count: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            count: None,
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    /// Unwrap the payload, treating `success: false` or a missing payload as an
    /// application-level failure.
    pub fn into_result(self) -> Result<T, FetchError> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err(FetchError::Application(
                "Response contained no data".to_string(),
            )),
            (false, _) => Err(FetchError::Application(
                self.error.unwrap_or_else(|| "Request failed".to_string()),
            )),
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// Wrap a list and record its length in `count`
    pub fn list(items: Vec<T>) -> Self {
        let count = items.len();
        Self::ok(items).with_count(count)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
