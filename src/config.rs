//! Application configuration loaded from environment variables.
//!
//! Secrets are read once at startup and kept in memory for the lifetime
//! of the process.

use std::env;

/// Default session token validity.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;
/// Longest accepted session token lifetime (one year).
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Firestore / Firebase project ID
    pub firebase_project_id: String,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Gemini model used for chat replies
    pub chat_model: String,
    /// Gemini model used for meal plan generation
    pub meal_plan_model: String,
    /// Session token validity window in hours
    pub token_ttl_hours: i64,

    // --- Secrets ---
    /// HS256 signing key for session tokens (raw bytes)
    pub jwt_secret: Vec<u8>,
    /// Firebase web API key (Identity Toolkit)
    pub firebase_api_key: String,
    /// Google Generative Language API key
    pub google_api_key: String,
    /// USDA FoodData Central API key
    pub usda_api_key: String,
}

impl Config {
    /// Deterministic config for tests.
    pub fn test_default() -> Self {
        Self {
            firebase_project_id: "test-project".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            chat_model: "gemini-1.5-flash".to_string(),
            meal_plan_model: "gemini-2.5-flash-preview-05-20".to_string(),
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
            jwt_secret: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            firebase_api_key: "test_firebase_key".to_string(),
            google_api_key: "test_google_key".to_string(),
            usda_api_key: "test_usda_key".to_string(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honored for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            firebase_project_id: env::var("FIREBASE_PROJECT_ID")
                .unwrap_or_else(|_| "local-dev".to_string()),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            chat_model: env::var("GEMINI_CHAT_MODEL")
                .unwrap_or_else(|_| "gemini-1.5-flash".to_string()),
            meal_plan_model: env::var("GEMINI_MEAL_PLAN_MODEL")
                .unwrap_or_else(|_| "gemini-2.5-flash-preview-05-20".to_string()),
            token_ttl_hours: env::var("TOKEN_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|hours: &i64| (1..=MAX_TOKEN_TTL_HOURS).contains(hours))
                .unwrap_or(DEFAULT_TOKEN_TTL_HOURS),

            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| ConfigError::Missing("JWT_SECRET"))?
                .into_bytes(),
            firebase_api_key: required_trimmed("FIREBASE_API_KEY")?,
            google_api_key: required_trimmed("GOOGLE_API_KEY")?,
            usda_api_key: required_trimmed("USDA_API_KEY")?,
        })
    }
}

fn required_trimmed(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .map(|v| v.trim().to_string())
        .map_err(|_| ConfigError::Missing(name))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
