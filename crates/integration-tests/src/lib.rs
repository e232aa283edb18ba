//! Shared helpers for tests against a live Backend Inventory Service.
//!
//! # Running
//!
//! Point `STOREKEEPER_API_URL` at a test backend (never a production one;
//! the tests create and delete real records) and run:
//!
//! ```bash
//! cargo test -p storekeeper-integration-tests -- --ignored
//! ```

use std::sync::Once;
use std::time::Duration;

use storekeeper_client::{ApiConfig, InventoryApi};

/// Base URL for the Backend Inventory Service (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("STOREKEEPER_API_URL").unwrap_or_else(|_| "http://localhost:4000".to_string())
}

/// Build a client against the configured backend.
#[must_use]
pub fn api() -> InventoryApi {
    init_tracing();
    let config = ApiConfig::new(base_url(), Duration::from_secs(10));
    InventoryApi::new(&config).expect("Failed to build the API client")
}

/// A unique name so reruns and concurrent runs cannot collide on records
/// left behind by failed cleanup.
#[must_use]
pub fn unique_name(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4())
}

static TRACING: Once = Once::new();

fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
