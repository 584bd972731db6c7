//! Configuration types for the Gemini provider.

use serde::{Deserialize, Serialize};

/// Default Gemini API base URL.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default chat model used by the tutorials.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Configuration for the Gemini `generateContent` API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Gemini API key.
    pub api_key: String,
    /// Model name, without the `models/` prefix.
    pub model: String,
    /// Optional custom base URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Sampling temperature applied when the request carries no config of its own.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: None,
            temperature: None,
        }
    }
}

impl GeminiConfig {
    /// Create a new Gemini config with the given API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self { api_key: api_key.into(), model: model.into(), ..Default::default() }
    }

    /// Set custom base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the default sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Get the effective base URL.
    pub fn effective_base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(GEMINI_API_BASE)
    }

    /// Full `generateContent` endpoint for the configured model.
    pub fn generate_url(&self) -> String {
        let model = self.model.trim_start_matches("models/");
        let base = self.effective_base_url();
        format!("{}/models/{model}:generateContent", base.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeminiConfig::default();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.effective_base_url(), GEMINI_API_BASE);
    }

    #[test]
    fn test_generate_url_strips_models_prefix() {
        let config = GeminiConfig::new("key", "models/gemini-2.5-flash")
            .with_base_url("http://localhost:9999/");
        assert_eq!(
            config.generate_url(),
            "http://localhost:9999/models/gemini-2.5-flash:generateContent"
        );
    }
}
