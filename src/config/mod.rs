// src/config/mod.rs
// All tunables load from the environment (.env supported), with defaults
// that work for local development.

use std::path::PathBuf;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SunnyConfig {
    // ── Generative provider
    pub gemini_base_url: String,
    pub gemini_api_key: String,
    pub text_model: String,
    pub story_model: String,
    pub image_model: String,

    // ── Transport
    pub request_timeout: u64,

    // ── Persistence
    pub data_dir: String,

    // ── Logging
    pub log_level: String,
    pub debug_logging: bool,
}

// Handles values with trailing comments and extra whitespace; a parse
// failure falls back to the default rather than aborting startup.
fn env_var_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(val) => {
            let clean_val = val.split('#').next().unwrap_or("").trim();
            match clean_val.parse::<T>() {
                Ok(parsed) => parsed,
                Err(_) => {
                    eprintln!("Config: {} = '{}' (parse failed, using default)", key, val);
                    default
                }
            }
        }
        Err(_) => default,
    }
}

impl SunnyConfig {
    pub fn from_env() -> Self {
        // Load from .env file first if it exists
        let _ = dotenvy::dotenv();

        Self {
            gemini_base_url: env_var_or(
                "GEMINI_BASE_URL",
                "https://generativelanguage.googleapis.com".to_string(),
            ),
            gemini_api_key: env_var_or("GEMINI_API_KEY", String::new()),
            text_model: env_var_or("SUNNY_TEXT_MODEL", "gemini-3-flash-preview".to_string()),
            story_model: env_var_or("SUNNY_STORY_MODEL", "gemini-3-pro-preview".to_string()),
            image_model: env_var_or("SUNNY_IMAGE_MODEL", "gemini-2.5-flash-image".to_string()),
            request_timeout: env_var_or("SUNNY_REQUEST_TIMEOUT", 30),
            data_dir: env_var_or("SUNNY_DATA_DIR", String::new()),
            log_level: env_var_or("SUNNY_LOG_LEVEL", "info".to_string()),
            debug_logging: env_var_or("SUNNY_DEBUG_LOGGING", false),
        }
    }

    /// Full generateContent URL for a given model.
    pub fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.gemini_base_url, model
        )
    }

    /// Location of the single persisted profile slot.
    pub fn profile_path(&self) -> PathBuf {
        self.resolved_data_dir().join("profile.json")
    }

    fn resolved_data_dir(&self) -> PathBuf {
        if !self.data_dir.is_empty() {
            return PathBuf::from(&self.data_dir);
        }
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sunnypath")
    }

    pub fn is_debug(&self) -> bool {
        self.debug_logging || self.log_level.to_lowercase() == "debug"
    }
}

// Global config instance - loaded once at startup
pub static CONFIG: Lazy<SunnyConfig> = Lazy::new(SunnyConfig::from_env);
