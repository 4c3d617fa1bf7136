use std::fmt;
use std::net::SocketAddr;

use crate::error::AppError;

/// Default Gemini model used for analysis requests.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";
/// Default Gemini API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// Default server bind address.
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Runtime configuration, resolved once at startup from the environment.
///
/// The API key stays server-side: it is never serialized, never logged
/// (see the manual `Debug` impl), and never reaches the browser.
#[derive(Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub bind: SocketAddr,
}

impl AppConfig {
    /// Resolve configuration from environment variables.
    ///
    /// `GEMINI_API_KEY` is required; `ADLIFT_MODEL`, `ADLIFT_BASE_URL`, and
    /// `ADLIFT_BIND` fall back to defaults.
    pub fn from_env() -> Result<Self, AppError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| AppError::Config("GEMINI_API_KEY is not set".into()))?;

        let model = env_or("ADLIFT_MODEL", DEFAULT_MODEL);
        let base_url = env_or("ADLIFT_BASE_URL", DEFAULT_BASE_URL);

        let bind_raw = env_or("ADLIFT_BIND", DEFAULT_BIND);
        let bind: SocketAddr = bind_raw
            .parse()
            .map_err(|_| AppError::Config(format!("ADLIFT_BIND is not a valid address: {bind_raw}")))?;

        Ok(Self {
            api_key,
            model,
            base_url,
            bind,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("bind", &self.bind)
            .finish()
    }
}
