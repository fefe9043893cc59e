//! Application configuration loaded from environment variables.
//!
//! Everything that can degrade gracefully is optional: a missing Gemini key
//! means keyword-fallback classification, a missing GCP project means the
//! in-memory store. Neither aborts startup.

use std::env;

/// Default bound on free-text activity input, in characters.
const DEFAULT_MAX_INPUT_CHARS: usize = 1000;

/// Default timeout for the classification request, in seconds.
const DEFAULT_CLASSIFIER_TIMEOUT_SECS: u64 = 10;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini API key; None runs the classifier in fallback-only mode
    pub gemini_api_key: Option<String>,
    /// GCP project ID for Firestore; None runs the store memory-only
    pub gcp_project_id: Option<String>,
    /// Frontend URL for CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Timeout for the classification request (seconds)
    pub classifier_timeout_secs: u64,
    /// Maximum accepted length of free-text activity input (characters)
    pub max_input_chars: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            gemini_api_key: env::var("GEMINI_API_KEY")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            gcp_project_id: env::var("GCP_PROJECT_ID")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            classifier_timeout_secs: env::var("CLASSIFIER_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CLASSIFIER_TIMEOUT_SECS),
            max_input_chars: env::var("MAX_INPUT_CHARS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_INPUT_CHARS),
        })
    }

    /// Default config for testing only: no external services configured.
    pub fn test_default() -> Self {
        Self {
            gemini_api_key: None,
            gcp_project_id: None,
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            classifier_timeout_secs: DEFAULT_CLASSIFIER_TIMEOUT_SECS,
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
