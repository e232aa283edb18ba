//! Backend Inventory Service REST client.
//!
//! # Architecture
//!
//! - Plain JSON-over-REST against the backend's `/api/*` endpoints
//! - The backend is the source of truth - no local sync, direct API calls
//! - In-memory caching via `moka` for reference data (5 minute TTL)
//! - Stock-bearing reads (products, open issues) are never cached
//!
//! # Example
//!
//! ```rust,ignore
//! use storekeeper_client::{ApiConfig, InventoryApi};
//!
//! let config = ApiConfig::from_env()?;
//! let api = InventoryApi::new(&config)?;
//!
//! // Page through the product catalog
//! let page = api.list_products(1, 25).await?;
//!
//! // Start issuing stock to a department
//! let issue_id = api
//!     .add_issue_line(department_id, staff_id, product_id, 5)
//!     .await?;
//! ```

mod cache;
mod categories;
mod conversions;
mod dashboard;
mod departments;
mod issues;
mod products;
mod receipts;
mod staff;
mod vendors;
mod wire;

pub mod types;

pub use types::*;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::ApiConfig;
use cache::CacheValue;

/// Errors that can occur when talking to the Backend Inventory Service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status carrying the backend's structured error payload.
    ///
    /// The message is preserved verbatim so callers can surface the
    /// backend's own wording (for example "Requested quantity exceeds
    /// available stock").
    #[error("Backend rejected the request (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    /// Non-success status without a structured payload.
    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Response parsed but carried an out-of-range or inconsistent value.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

// =============================================================================
// InventoryApi
// =============================================================================

/// Client for the Backend Inventory Service.
///
/// Cheap to clone: all clones share one HTTP connection pool and one
/// reference-data cache.
#[derive(Clone)]
pub struct InventoryApi {
    inner: Arc<InventoryApiInner>,
}

struct InventoryApiInner {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
    cache: Cache<String, CacheValue>,
}

impl InventoryApi {
    /// Create a new client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed
    /// (TLS backend initialization is the only realistic cause).
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(InventoryApiInner {
                client,
                base_url: config.base_url.clone(),
                api_token: config
                    .api_token
                    .as_ref()
                    .map(|token| token.expose_secret().to_string()),
                cache,
            }),
        })
    }

    /// Build a request for an endpoint path, attaching auth when configured.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.inner.base_url);
        let builder = self.inner.client.request(method, url);
        match &self.inner.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and deserialize the JSON response body.
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let body = self.execute_raw(request).await?;

        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %truncate(&body),
                    "Failed to parse backend response"
                );
                Err(ApiError::Parse(e))
            }
        }
    }

    /// Send a request where the response body carries nothing of interest
    /// (deletes and other 204-style endpoints).
    async fn execute_empty(&self, request: RequestBuilder) -> Result<(), ApiError> {
        self.execute_raw(request).await.map(|_| ())
    }

    /// Send a request and return the body after status handling.
    async fn execute_raw(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        // Check for rate limiting
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        // Read the body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %truncate(&body),
                "Backend returned non-success status"
            );
            return Err(rejection(status.as_u16(), &body));
        }

        Ok(body)
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Invalidate all cached reference data.
    pub async fn invalidate_reference_data(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

/// Structured error payload the backend attaches to rejections.
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    #[serde(alias = "message")]
    error: String,
}

/// Classify a non-success response.
///
/// A body with a structured `{"error": ...}` (or `{"message": ...}`) payload
/// becomes `Rejected` with the message verbatim; anything else becomes
/// `Status` with a truncated body.
fn rejection(status: u16, body: &str) -> ApiError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => ApiError::Rejected {
            status,
            message: parsed.error,
        },
        Err(_) => ApiError::Status {
            status,
            body: body.chars().take(200).collect(),
        },
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(500).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_with_error_payload() {
        let err = rejection(409, r#"{"error": "Requested quantity exceeds available stock"}"#);
        match err {
            ApiError::Rejected { status, message } => {
                assert_eq!(status, 409);
                assert_eq!(message, "Requested quantity exceeds available stock");
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn test_rejection_with_message_payload() {
        let err = rejection(422, r#"{"message": "quantity must be positive"}"#);
        match err {
            ApiError::Rejected { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "quantity must be positive");
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn test_rejection_with_unstructured_body() {
        let err = rejection(502, "<html>Bad Gateway</html>");
        match err {
            ApiError::Status { status, body } => {
                assert_eq!(status, 502);
                assert!(body.contains("Bad Gateway"));
            }
            other => panic!("expected Status, got {other:?}"),
        }
    }

    #[test]
    fn test_rejection_truncates_long_bodies() {
        let long_body = "x".repeat(1000);
        match rejection(500, &long_body) {
            ApiError::Status { body, .. } => assert_eq!(body.chars().count(), 200),
            other => panic!("expected Status, got {other:?}"),
        }
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::NotFound("Product 42".to_string());
        assert_eq!(err.to_string(), "Not found: Product 42");

        let err = ApiError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");

        let err = ApiError::Rejected {
            status: 409,
            message: "Issue already completed".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Backend rejected the request (HTTP 409): Issue already completed"
        );
    }
}
