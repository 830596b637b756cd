use thiserror::Error;

/// Failures talking to the workflow REST API.
///
/// Messages are kept as strings so the error can be cloned into
/// operator notices.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Network error: {message}")]
    Network { message: String },
    #[error("Request timed out: {message}")]
    Timeout { message: String },
    #[error("Not found: {resource}")]
    NotFound { resource: String },
    #[error("Rate limit exceeded")]
    RateLimited,
    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Invalid response from API: {message}")]
    Decode { message: String },
    #[error("Invalid API configuration: {message}")]
    InvalidConfig { message: String },
}

impl ApiError {
    /// Pulls a human readable message out of an error body. The API uses
    /// `detail`, `error` or `message` depending on the endpoint.
    pub fn from_status(status: u16, resource: &str, body: &str) -> Self {
        match status {
            404 => ApiError::NotFound {
                resource: resource.to_string(),
            },
            429 => ApiError::RateLimited,
            _ => ApiError::Status {
                status,
                message: extract_message(body),
            },
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout {
                message: err.to_string(),
            }
        } else if err.is_decode() {
            ApiError::Decode {
                message: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            ApiError::Status {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ApiError::Network {
                message: err.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode {
            message: err.to_string(),
        }
    }
}

fn extract_message(body: &str) -> String {
    let trimmed = body.trim();
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        for key in ["detail", "error", "message"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }
    if trimmed.is_empty() {
        "empty response body".to_string()
    } else {
        trimmed.to_string()
    }
}
