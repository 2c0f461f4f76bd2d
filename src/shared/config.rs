//! Application configuration. API credentials, endpoint, speech command.

use serde::Deserialize;

pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct AppConfig {
    // ─────────────────────────────────────────────────────────────────────────
    // Generative Service Configuration
    // ─────────────────────────────────────────────────────────────────────────
    /// Gemini API key. Read from SAKURA_API_KEY, or plain API_KEY.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the Gemini REST API. Read from SAKURA_API_URL.
    #[serde(default)]
    pub api_url: Option<String>,

    /// Model name. Defaults to "gemini-2.5-flash". Read from SAKURA_MODEL.
    #[serde(default)]
    pub model: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Speech
    // ─────────────────────────────────────────────────────────────────────────
    /// Command line used to speak Japanese text, e.g. "espeak-ng -v ja".
    /// The text is appended as the last argument. Read from SAKURA_TTS_COMMAND.
    #[serde(default)]
    pub tts_command: Option<String>,
}

impl AppConfig {
    /// Read settings from the environment and the optional config file.
    /// `.env` must already be loaded (main does this before logging starts).
    pub fn load() -> Result<Self, config::ConfigError> {
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("SAKURA"));
        if let Ok(path) = std::env::var("SAKURA_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        let mut cfg: Self = c.build()?.try_deserialize()?;
        // API_KEY is read directly (no SAKURA_ prefix) so an existing .env keeps working
        if cfg.api_key.is_none() {
            cfg.api_key = std::env::var("API_KEY").ok();
        }
        Ok(cfg)
    }

    /// Returns the API key if configured and non-blank.
    pub fn api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("SAKURA_API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
    }

    /// Returns the API base URL. Defaults to the public Gemini endpoint.
    pub fn api_url_or_default(&self) -> String {
        self.api_url
            .clone()
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    /// Returns the model name. Defaults to "gemini-2.5-flash".
    pub fn model_or_default(&self) -> String {
        self.model
            .clone()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string())
    }

    /// Returns true if the API key is present.
    pub fn is_ai_configured(&self) -> bool {
        self.api_key().is_some()
    }
}
