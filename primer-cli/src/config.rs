use anyhow::Result;

/// Settings read from the environment (after `.env` is loaded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// `GOOGLE_API_KEY` wins over `GEMINI_API_KEY`; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = ["GOOGLE_API_KEY", "GEMINI_API_KEY"]
            .into_iter()
            .filter_map(&lookup)
            .find(|value| !value.trim().is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!("GOOGLE_API_KEY or GEMINI_API_KEY environment variable not set")
            })?;

        Ok(Self { api_key })
    }
}
