use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_POOL_SIZE: u32 = 10;
const DEFAULT_MARKER_API_URL: &str = "https://www.datalab.to/api/v1/marker";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_SUPABASE_BUCKET: &str = "case-study-images";
const DEFAULT_STATUS_POLL_INTERVAL_MS: u64 = 1000;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// How session tokens are verified.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthKey {
    /// PEM public key published by Clerk (RS256).
    ClerkPublicKey(String),
    /// Shared HMAC secret (HS256), for local development.
    SharedSecret(String),
}

impl std::fmt::Debug for AuthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthKey::ClerkPublicKey(_) => f.write_str("ClerkPublicKey(..)"),
            AuthKey::SharedSecret(_) => f.write_str("SharedSecret(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub database_url: String,
    pub database_pool_size: u32,
    pub webhook_secret: String,
    pub marker_api_key: String,
    pub marker_api_url: String,
    pub marker_webhook_url: Option<String>,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_api_url: String,
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub supabase_bucket: String,
    pub auth_key: AuthKey,
    pub status_poll_interval: Duration,
    pub http_timeout_secs: u64,
    pub max_body_bytes: usize,
}

impl Settings {
    /// Reads settings from the process environment. Call `dotenv` first to
    /// pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_lookup(|name| vars.get(name).cloned())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env { lookup: &lookup };

        let auth_key = match (env.optional("CLERK_JWT_KEY"), env.optional("AUTH_JWT_SECRET")) {
            // Keys pasted into .env files often carry literal \n sequences
            (Some(pem), _) => AuthKey::ClerkPublicKey(pem.replace("\\n", "\n")),
            (None, Some(secret)) => AuthKey::SharedSecret(secret),
            (None, None) => return Err(ConfigError::Missing("CLERK_JWT_KEY or AUTH_JWT_SECRET")),
        };

        Ok(Self {
            port: env.parsed("PORT", DEFAULT_PORT)?,
            database_url: env.required("DATABASE_URL")?,
            database_pool_size: env.parsed("DATABASE_POOL_SIZE", DEFAULT_POOL_SIZE)?,
            webhook_secret: env.required("WEBHOOK_SECRET")?,
            marker_api_key: env.required("MARKER_API_KEY")?,
            marker_api_url: env
                .optional("MARKER_API_URL")
                .unwrap_or_else(|| DEFAULT_MARKER_API_URL.to_string()),
            marker_webhook_url: env.optional("MARKER_WEBHOOK_URL"),
            gemini_api_key: env.required("GEMINI_API_KEY")?,
            gemini_model: env
                .optional("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_api_url: env
                .optional("GEMINI_API_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_API_URL.to_string()),
            supabase_url: env.required("SUPABASE_URL")?,
            supabase_service_key: env.required("SUPABASE_SERVICE_KEY")?,
            supabase_bucket: env
                .optional("SUPABASE_BUCKET")
                .unwrap_or_else(|| DEFAULT_SUPABASE_BUCKET.to_string()),
            auth_key,
            status_poll_interval: Duration::from_millis(
                env.parsed("STATUS_POLL_INTERVAL_MS", DEFAULT_STATUS_POLL_INTERVAL_MS)?,
            ),
            http_timeout_secs: env.parsed("HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?,
            max_body_bytes: env.parsed("MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES)?,
        })
    }
}

struct Env<'a> {
    lookup: &'a dyn Fn(&str) -> Option<String>,
}

impl Env<'_> {
    fn optional(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn required(&self, name: &'static str) -> Result<String, ConfigError> {
        self.optional(name).ok_or(ConfigError::Missing(name))
    }

    fn parsed<T>(&self, name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match self.optional(name) {
            Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
                name,
                reason: e.to_string(),
            }),
            None => Ok(default),
        }
    }
}
