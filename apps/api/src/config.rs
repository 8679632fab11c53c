use std::fmt;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::llm_client::settings::{
    parse_safety_settings, GenerationSettings, RequestLayout, SafetySetting,
};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_SAFETY_SETTINGS: &str = "HARM_CATEGORY_HATE_SPEECH=BLOCK_MEDIUM_AND_ABOVE";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Fails at startup if the API key is missing or a value does not parse.
#[derive(Clone)]
pub struct Config {
    pub google_api_key: String,
    pub api_base: String,
    pub temperature: f32,
    pub safety_settings: Vec<SafetySetting>,
    pub request_layout: RequestLayout,
    pub request_timeout: Duration,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let temperature = optional_var(&lookup, "GEMINI_TEMPERATURE", "0")
            .parse::<f32>()
            .context("GEMINI_TEMPERATURE must be a number")?;
        if !(0.0..=2.0).contains(&temperature) {
            bail!("GEMINI_TEMPERATURE must be between 0.0 and 2.0, got {temperature}");
        }

        let safety_settings = parse_safety_settings(&optional_var(
            &lookup,
            "GEMINI_SAFETY_SETTINGS",
            DEFAULT_SAFETY_SETTINGS,
        ))
        .context("GEMINI_SAFETY_SETTINGS is malformed")?;

        let request_layout = optional_var(&lookup, "GEMINI_REQUEST_LAYOUT", "combined")
            .parse::<RequestLayout>()
            .context("GEMINI_REQUEST_LAYOUT must be 'combined' or 'segmented'")?;

        let timeout_secs = optional_var(&lookup, "GEMINI_TIMEOUT_SECS", "60")
            .parse::<u64>()
            .context("GEMINI_TIMEOUT_SECS must be a whole number of seconds")?;
        if timeout_secs == 0 {
            bail!("GEMINI_TIMEOUT_SECS must be greater than zero");
        }

        Ok(Config {
            google_api_key: require_var(&lookup, "GOOGLE_API_KEY")?,
            api_base: optional_var(&lookup, "GEMINI_API_BASE", DEFAULT_API_BASE),
            temperature,
            safety_settings,
            request_layout,
            request_timeout: Duration::from_secs(timeout_secs),
            max_upload_bytes: optional_var(
                &lookup,
                "MAX_UPLOAD_BYTES",
                &DEFAULT_MAX_UPLOAD_BYTES.to_string(),
            )
            .parse::<usize>()
            .context("MAX_UPLOAD_BYTES must be a whole number of bytes")?,
            port: optional_var(&lookup, "PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_var(&lookup, "RUST_LOG", "info"),
        })
    }

    /// Settings handed to the Gemini client. The key travels with them so the
    /// client never reads the environment itself.
    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings {
            api_key: self.google_api_key.clone(),
            api_base: self.api_base.clone(),
            temperature: self.temperature,
            safety_settings: self.safety_settings.clone(),
            request_layout: self.request_layout,
            timeout: self.request_timeout,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("google_api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("temperature", &self.temperature)
            .field("safety_settings", &self.safety_settings)
            .field("request_layout", &self.request_layout)
            .field("request_timeout", &self.request_timeout)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("port", &self.port)
            .field("rust_log", &self.rust_log)
            .finish()
    }
}

fn require_var(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    let value = lookup(key)
        .with_context(|| format!("Required environment variable '{key}' is not set"))?;
    if value.trim().is_empty() {
        bail!("Required environment variable '{key}' is empty");
    }
    Ok(value)
}

fn optional_var(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::llm_client::settings::{HarmBlockThreshold, HarmCategory};

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    fn load_with_key(extra: &[(&str, &str)]) -> Result<Config> {
        let mut vars = vec![("GOOGLE_API_KEY", "test-key")];
        vars.extend_from_slice(extra);
        load(&vars)
    }

    fn sample_config() -> Config {
        Config {
            google_api_key: "secret-key-value".to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            temperature: 0.0,
            safety_settings: parse_safety_settings(DEFAULT_SAFETY_SETTINGS).unwrap(),
            request_layout: RequestLayout::Combined,
            request_timeout: Duration::from_secs(60),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            port: 8080,
            rust_log: "info".to_string(),
        }
    }

    #[test]
    fn test_debug_output_redacts_api_key() {
        let rendered = format!("{:?}", sample_config());
        assert!(!rendered.contains("secret-key-value"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_default_safety_setting_is_hate_speech_medium() {
        let settings = parse_safety_settings(DEFAULT_SAFETY_SETTINGS).unwrap();
        assert_eq!(settings.len(), 1);
        assert_eq!(settings[0].category, HarmCategory::HateSpeech);
        assert_eq!(settings[0].threshold, HarmBlockThreshold::BlockMediumAndAbove);
    }

    #[test]
    fn test_generation_settings_carry_key_and_layout() {
        let mut config = sample_config();
        config.request_layout = RequestLayout::Segmented;
        let settings = config.generation_settings();
        assert_eq!(settings.api_key, "secret-key-value");
        assert_eq!(settings.request_layout, RequestLayout::Segmented);
        assert_eq!(settings.temperature, 0.0);
    }

    #[test]
    fn test_defaults_apply_when_only_key_is_set() {
        let config = load_with_key(&[]).unwrap();
        assert_eq!(config.google_api_key, "test-key");
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.port, 8080);
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.request_layout, RequestLayout::Combined);
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.safety_settings.len(), 1);
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_overrides_are_read() {
        let config = load_with_key(&[
            ("PORT", "9000"),
            ("GEMINI_TEMPERATURE", "0.7"),
            ("GEMINI_REQUEST_LAYOUT", "segmented"),
            ("GEMINI_SAFETY_SETTINGS", "none"),
            ("GEMINI_TIMEOUT_SECS", "5"),
            ("MAX_UPLOAD_BYTES", "2048"),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.request_layout, RequestLayout::Segmented);
        assert!(config.safety_settings.is_empty());
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.max_upload_bytes, 2048);
    }

    #[test]
    fn test_missing_api_key_fails() {
        let err = load(&[]).unwrap_err();
        assert!(err.to_string().contains("GOOGLE_API_KEY"));
    }

    #[test]
    fn test_blank_api_key_fails() {
        let err = load(&[("GOOGLE_API_KEY", "   ")]).unwrap_err();
        assert!(err.to_string().contains("is empty"));
    }

    #[test]
    fn test_temperature_out_of_range_fails() {
        assert!(load_with_key(&[("GEMINI_TEMPERATURE", "2.5")]).is_err());
        assert!(load_with_key(&[("GEMINI_TEMPERATURE", "-0.1")]).is_err());
        assert!(load_with_key(&[("GEMINI_TEMPERATURE", "warm")]).is_err());
        assert!(load_with_key(&[("GEMINI_TEMPERATURE", "2.0")]).is_ok());
    }

    #[test]
    fn test_zero_timeout_fails() {
        let err = load_with_key(&[("GEMINI_TIMEOUT_SECS", "0")]).unwrap_err();
        assert!(err.to_string().contains("greater than zero"));
    }

    #[test]
    fn test_unknown_request_layout_fails() {
        assert!(load_with_key(&[("GEMINI_REQUEST_LAYOUT", "interleaved")]).is_err());
    }

    #[test]
    fn test_malformed_safety_settings_fail() {
        assert!(load_with_key(&[("GEMINI_SAFETY_SETTINGS", "HARM_CATEGORY_HATE_SPEECH")]).is_err());
    }

    #[test]
    fn test_invalid_port_fails() {
        assert!(load_with_key(&[("PORT", "70000")]).is_err());
    }
}
