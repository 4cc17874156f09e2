//! Normalized fetch errors.

/// Every failure a fetcher can report, collapsed into three kinds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The request never produced a response (connection, pool, timeout)
    #[error("Network error: {0}")]
    Transport(String),

    /// A non-2xx response with the server-supplied message
    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    /// A response with `success: false`
    #[error("{0}")]
    Application(String),
}

impl FetchError {
    /// Message suitable for showing to a visitor
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Transport(_) => {
                "Unable to reach the server. Please check your connection and try again.".to_string()
            }
            FetchError::Status { status, message } if message.is_empty() => {
                format!("Something went wrong (status {status}). Please try again.")
            }
            FetchError::Status { message, .. } => message.clone(),
            FetchError::Application(message) => message.clone(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
