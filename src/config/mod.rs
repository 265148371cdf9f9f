use anyhow::Result;
use anyhow::anyhow;
use std::env;
use std::time::Duration;

use crate::classifier::Profile;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini API key, sent as the `key` query parameter
    pub api_key: String,

    /// Model id (e.g. gemini-2.5-flash)
    pub model: String,

    /// Scheme + host of the generative language API
    pub base_url: String,

    /// Which rubric / fallback pair to classify with
    pub profile: Profile,

    /// 0 disables extended reasoning
    pub thinking_budget: u32,

    /// None keeps the client without a timeout
    pub request_timeout: Option<Duration>,

    pub api_port: u16,
}

impl Config {
    /// Load from environment variables (dotenv recommended)
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source, `from_env` passes the process environment.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = var("GEMINI_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| anyhow!("Missing GEMINI_API_KEY"))?;

        let model = var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into());

        let base_url = var("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());

        let profile = match var("SENTIMENT_PROFILE") {
            Some(name) => Profile::from_name(&name)?,
            None => Profile::comment_tagger(),
        };

        let thinking_budget: u32 = var("THINKING_BUDGET")
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(0);

        let request_timeout = var("REQUEST_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        let api_port: u16 = var("API_PORT")
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(8080);

        Ok(Config {
            api_key,
            model,
            base_url,
            profile,
            thinking_budget,
            request_timeout,
            api_port,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_missing_api_key() {
        let err = load(&[]).unwrap_err();
        assert_eq!(err.to_string(), "Missing GEMINI_API_KEY");
    }

    #[test]
    fn test_blank_api_key() {
        let err = load(&[("GEMINI_API_KEY", "   ")]).unwrap_err();
        assert_eq!(err.to_string(), "Missing GEMINI_API_KEY");
    }

    #[test]
    fn test_defaults() {
        let cfg = load(&[("GEMINI_API_KEY", "k")]).unwrap();

        assert_eq!(cfg.api_key, "k");
        assert_eq!(cfg.model, DEFAULT_MODEL);
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.profile, Profile::comment_tagger());
        assert_eq!(cfg.thinking_budget, 0);
        assert_eq!(cfg.request_timeout, None);
        assert_eq!(cfg.api_port, 8080);
    }

    #[test]
    fn test_profile_selection() {
        let cfg = load(&[("GEMINI_API_KEY", "k"), ("SENTIMENT_PROFILE", "market-expert")]).unwrap();
        assert_eq!(cfg.profile, Profile::market_expert());
        assert_eq!(cfg.profile.fallback_sentinel, "EMPTY");

        let err = load(&[("GEMINI_API_KEY", "k"), ("SENTIMENT_PROFILE", "moonboy")]).unwrap_err();
        assert!(err.to_string().contains("Unknown SENTIMENT_PROFILE"));
    }

    #[test]
    fn test_timeout() {
        let cfg = load(&[("GEMINI_API_KEY", "k"), ("REQUEST_TIMEOUT_SECS", "0")]).unwrap();
        assert_eq!(cfg.request_timeout, None);

        let cfg = load(&[("GEMINI_API_KEY", "k"), ("REQUEST_TIMEOUT_SECS", "30")]).unwrap();
        assert_eq!(cfg.request_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_unparseable_numbers_fall_back() {
        let cfg = load(&[
            ("GEMINI_API_KEY", "k"),
            ("THINKING_BUDGET", "lots"),
            ("API_PORT", "99999"),
        ])
        .unwrap();
        assert_eq!(cfg.thinking_budget, 0);
        assert_eq!(cfg.api_port, 8080);

        let cfg = load(&[
            ("GEMINI_API_KEY", "k"),
            ("THINKING_BUDGET", "512"),
            ("API_PORT", "9000"),
        ])
        .unwrap();
        assert_eq!(cfg.thinking_budget, 512);
        assert_eq!(cfg.api_port, 9000);
    }
}
