//! Runtime configuration read from environment variables.

use plainplates_errors::AppError;
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/plainplates.db?mode=rwc";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_MISTRAL_MODEL: &str = "mistral-large-latest";
pub const DEFAULT_MISTRAL_API_URL: &str = "https://api.mistral.ai/v1/chat/completions";
pub const OAUTH_CALLBACK_PATH: &str = "/auth/google/callback";

const MIN_SESSION_SECRET_BYTES: usize = 64;
const LLM_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub public_base_url: url::Url,
    pub google_client_id: String,
    pub google_client_secret: String,
    /// `None` means a random key is generated at startup.
    pub session_secret: Option<Vec<u8>>,
    pub mistral_api_key: String,
    pub mistral_model: String,
    pub mistral_api_url: String,
    pub llm_timeout: Duration,
    pub seed_sample_data: bool,
    pub submit_limit_per_minute: u32,
    pub submit_limit_per_hour: u32,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// Required: `GOOGLE_CLIENT_ID`, `GOOGLE_CLIENT_SECRET`, `MISTRAL_API_KEY`.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            optional(key)
                .ok_or_else(|| AppError::Config(format!("Missing required environment variable: {}", key)))
        };

        let bind_addr = optional("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid BIND_ADDR: {}", e)))?;

        let public_base_url = url::Url::parse(
            &optional("PUBLIC_BASE_URL").unwrap_or_else(|| DEFAULT_PUBLIC_BASE_URL.to_string()),
        )
        .map_err(|e| AppError::Config(format!("Invalid PUBLIC_BASE_URL: {}", e)))?;

        let session_secret = match optional("SESSION_SECRET") {
            Some(secret) if secret.len() < MIN_SESSION_SECRET_BYTES => {
                return Err(AppError::Config(format!(
                    "SESSION_SECRET must be at least {} bytes",
                    MIN_SESSION_SECRET_BYTES
                )));
            }
            Some(secret) => Some(secret.into_bytes()),
            None => None,
        };

        let seed_sample_data = match optional("SEED_SAMPLE_DATA").as_deref() {
            None => true,
            Some(v) => parse_bool(v).ok_or_else(|| {
                AppError::Config(format!("Invalid SEED_SAMPLE_DATA: {}", v))
            })?,
        };

        Ok(Self {
            database_url: optional("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            bind_addr,
            public_base_url,
            google_client_id: required("GOOGLE_CLIENT_ID")?,
            google_client_secret: required("GOOGLE_CLIENT_SECRET")?,
            session_secret,
            mistral_api_key: required("MISTRAL_API_KEY")?,
            mistral_model: optional("MISTRAL_MODEL")
                .unwrap_or_else(|| DEFAULT_MISTRAL_MODEL.to_string()),
            mistral_api_url: optional("MISTRAL_API_URL")
                .unwrap_or_else(|| DEFAULT_MISTRAL_API_URL.to_string()),
            llm_timeout: LLM_TIMEOUT,
            seed_sample_data,
            submit_limit_per_minute: parse_limit(&optional, "SUBMIT_LIMIT_PER_MINUTE", 5)?,
            submit_limit_per_hour: parse_limit(&optional, "SUBMIT_LIMIT_PER_HOUR", 20)?,
        })
    }

    pub fn oauth_redirect_uri(&self) -> String {
        format!(
            "{}{}",
            self.public_base_url.as_str().trim_end_matches('/'),
            OAUTH_CALLBACK_PATH
        )
    }

    /// Cookies get the `Secure` flag only when served over HTTPS.
    pub fn secure_cookies(&self) -> bool {
        self.public_base_url.scheme() == "https"
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn parse_limit(
    optional: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: u32,
) -> Result<u32, AppError> {
    match optional(key) {
        None => Ok(default),
        Some(v) => match v.trim().parse::<u32>() {
            Ok(limit) if limit > 0 => Ok(limit),
            _ => Err(AppError::Config(format!("Invalid {}: {}", key, v))),
        },
    }
}
