//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `FIREBASE_DATABASE_URL` - Realtime Database root (e.g. `https://shop-default-rtdb.firebaseio.com`)
//!
//! ## Optional
//! - `FIREBASE_AUTH_TOKEN` - Database secret or ID token appended as `?auth=`
//! - `CLOUDINARY_CLOUD_NAME` - Cloudinary cloud for image uploads
//! - `CLOUDINARY_UPLOAD_PRESET` - Unsigned upload preset (default: `book_store`)
//! - `HARAFISH_DATA_DIR` - Directory for local durable storage (default: `.harafish`)
//! - `HARAFISH_ADMIN_EMAIL` - Admin login email
//! - `HARAFISH_ADMIN_PASSWORD` - Admin login password
//! - `HARAFISH_BASE_URL` - Public URL used in book links (default: `http://localhost:3000`)
//! - `HARAFISH_WHATSAPP_NUMBER` - Reservation number, international format without `+`
//! - `LOADER_PACING_MS` - Delay before revealing the next page (default: 600)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_UPLOAD_PRESET: &str = "book_store";
const DEFAULT_DATA_DIR: &str = ".harafish";
const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_WHATSAPP_NUMBER: &str = "201034345458";
const DEFAULT_PACING_MS: &str = "600";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Remote document store configuration
    pub firebase: FirebaseConfig,
    /// Image host configuration, absent when uploads are disabled
    pub cloudinary: Option<CloudinaryConfig>,
    /// Admin credential check
    pub admin: AdminCredentials,
    /// Directory holding the local durable storage
    pub data_dir: PathBuf,
    /// Public base URL for book links
    pub base_url: Url,
    /// WhatsApp number reservations are sent to
    pub whatsapp_number: String,
    /// Pacing delay for the incremental loader
    pub loader_pacing: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Firebase Realtime Database configuration.
///
/// Implements `Debug` manually to redact the auth token.
#[derive(Clone)]
pub struct FirebaseConfig {
    /// Database root URL
    pub database_url: Url,
    /// Optional auth token sent as the `auth` query parameter
    pub auth_token: Option<SecretString>,
}

impl std::fmt::Debug for FirebaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseConfig")
            .field("database_url", &self.database_url.as_str())
            .field(
                "auth_token",
                &self.auth_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Cloudinary unsigned upload configuration.
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    /// Cloud name from the Cloudinary console
    pub cloud_name: String,
    /// Unsigned upload preset
    pub upload_preset: String,
}

/// Configured admin login.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone, Default)]
pub struct AdminCredentials {
    pub email: Option<String>,
    pub password: Option<SecretString>,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let firebase = FirebaseConfig::from_env()?;
        let cloudinary = CloudinaryConfig::from_env();
        let admin = AdminCredentials {
            email: get_optional_env("HARAFISH_ADMIN_EMAIL"),
            password: get_optional_env("HARAFISH_ADMIN_PASSWORD").map(SecretString::from),
        };
        let data_dir = PathBuf::from(get_env_or_default("HARAFISH_DATA_DIR", DEFAULT_DATA_DIR));
        let base_url = parse_url(
            "HARAFISH_BASE_URL",
            &get_env_or_default("HARAFISH_BASE_URL", DEFAULT_BASE_URL),
        )?;
        let whatsapp_number =
            get_env_or_default("HARAFISH_WHATSAPP_NUMBER", DEFAULT_WHATSAPP_NUMBER);
        let pacing_ms = get_env_or_default("LOADER_PACING_MS", DEFAULT_PACING_MS)
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("LOADER_PACING_MS".to_string(), e.to_string())
            })?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            firebase,
            cloudinary,
            admin,
            data_dir,
            base_url,
            whatsapp_number,
            loader_pacing: Duration::from_millis(pacing_ms),
            sentry_dsn,
        })
    }
}

impl FirebaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw = get_required_env("FIREBASE_DATABASE_URL")?;
        Ok(Self {
            database_url: parse_url("FIREBASE_DATABASE_URL", &raw)?,
            auth_token: get_optional_env("FIREBASE_AUTH_TOKEN").map(SecretString::from),
        })
    }
}

impl CloudinaryConfig {
    fn from_env() -> Option<Self> {
        let cloud_name = get_optional_env("CLOUDINARY_CLOUD_NAME")?;
        Some(Self {
            cloud_name,
            upload_preset: get_env_or_default("CLOUDINARY_UPLOAD_PRESET", DEFAULT_UPLOAD_PRESET),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a URL-valued variable.
fn parse_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
