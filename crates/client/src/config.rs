//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREKEEPER_API_URL` - Base URL of the Backend Inventory Service
//!
//! ## Optional
//! - `STOREKEEPER_API_TOKEN` - Bearer token for authenticated deployments
//! - `STOREKEEPER_API_TIMEOUT_SECS` - Per-request timeout in seconds (default: 30)

use std::collections::HashMap;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "token-here",
    "xxx",
    "todo",
    "fixme",
    "insert",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Inventory API client configuration.
///
/// Implements `Debug` manually to redact the token field.
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL of the backend service, normalized without a trailing slash
    pub base_url: String,
    /// Bearer token for authenticated deployments (absent on dev backends)
    pub api_token: Option<SecretString>,
    /// Timeout applied to every HTTP request
    pub timeout: Duration,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the base URL is missing or malformed, the
    /// timeout is not a positive integer, or a provided token fails
    /// validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = get_required_env("STOREKEEPER_API_URL")?;
        let base_url = validate_base_url(&base_url, "STOREKEEPER_API_URL")?;
        let api_token = get_optional_validated_secret("STOREKEEPER_API_TOKEN")?;
        let timeout_secs = get_env_or_default(
            "STOREKEEPER_API_TIMEOUT_SECS",
            &DEFAULT_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("STOREKEEPER_API_TIMEOUT_SECS".to_string(), e.to_string())
        })?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "STOREKEEPER_API_TIMEOUT_SECS".to_string(),
                "timeout of zero would fail every request".to_string(),
            ));
        }

        Ok(Self {
            base_url,
            api_token,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Build a config directly, for tests and embedding scenarios where the
    /// environment is not the source of truth.
    #[must_use]
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: None,
            timeout,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate the backend base URL and normalize it for path joining.
///
/// The URL must parse and use an HTTP(S) scheme. Trailing slashes are
/// stripped so endpoint paths can be appended with a single `/`.
fn validate_base_url(raw: &str, var_name: &str) -> Result<String, ConfigError> {
    let parsed = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", parsed.scheme()),
        ));
    }
    Ok(raw.trim_end_matches('/').to_string())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real tokens have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the token issued by the backend."
            ),
        ));
    }

    Ok(())
}

/// Load a secret from the environment if set, validating it when present.
///
/// A missing variable is not an error: development backends commonly run
/// without authentication.
fn get_optional_validated_secret(key: &str) -> Result<Option<SecretString>, ConfigError> {
    match std::env::var(key) {
        Ok(value) => {
            validate_secret_strength(&value, key)?;
            Ok(Some(SecretString::from(value)))
        }
        Err(_) => Ok(None),
    }
}
