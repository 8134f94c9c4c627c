use std::{fmt, str::FromStr};

use crate::llm::provider::Provider;

/// Settings for a single summarization call.
///
/// Built once from the environment (or a lookup in tests) and then only
/// replaced wholesale through the consuming `with_*` methods.
#[derive(Clone, PartialEq)]
pub struct LlmConfig {
    model: String,
    api_key: Option<String>,
    base_url: Option<String>,
    max_tokens: u32,
    temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: Self::DEFAULT_MODEL.into(),
            api_key: None,
            base_url: None,
            max_tokens: Self::DEFAULT_MAX_TOKENS,
            temperature: Self::DEFAULT_TEMPERATURE,
        }
    }
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl LlmConfig {
    pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
    pub const DEFAULT_MAX_TOKENS: u32 = 1000;
    pub const DEFAULT_TEMPERATURE: f32 = 0.7;

    pub const MODEL_ENV: &str = "LLM_MODEL";
    pub const API_KEY_ENV: &str = "LLM_API_KEY";
    pub const BASE_URL_ENV: &str = "LLM_BASE_URL";
    pub const MAX_TOKENS_ENV: &str = "LLM_MAX_TOKENS";
    pub const TEMPERATURE_ENV: &str = "LLM_TEMPERATURE";

    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Reads the configuration from process environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`.
    ///
    /// `LLM_API_KEY` wins; otherwise the key variable of the provider the
    /// model implies is consulted.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let model = value(Self::MODEL_ENV).unwrap_or_else(|| Self::DEFAULT_MODEL.into());
        let base_url = value(Self::BASE_URL_ENV);
        let api_key = value(Self::API_KEY_ENV).or_else(|| {
            Provider::infer(&model, base_url.as_deref())
                .and_then(|p| p.api_key_env())
                .and_then(value)
        });

        Self {
            model,
            api_key,
            base_url,
            max_tokens: parse_or(
                value(Self::MAX_TOKENS_ENV),
                Self::MAX_TOKENS_ENV,
                Self::DEFAULT_MAX_TOKENS,
            ),
            temperature: parse_or(
                value(Self::TEMPERATURE_ENV),
                Self::TEMPERATURE_ENV,
                Self::DEFAULT_TEMPERATURE,
            ),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// The API key, unless it is blank or an unfilled `YOUR_...` placeholder
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty() && !k.starts_with("YOUR_"))
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn provider(&self) -> Option<Provider> {
        Provider::infer(&self.model, self.base_url())
    }

    /// The base url requests go to: the configured one or the provider default
    pub fn endpoint(&self, provider: Provider) -> String {
        self.base_url()
            .unwrap_or(provider.default_base_url())
            .trim_end_matches('/')
            .to_string()
    }

    pub fn is_configured(&self) -> bool {
        match self.provider() {
            Some(provider) => !provider.requires_api_key() || self.api_key().is_some(),
            None => false,
        }
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> T
where
    T: FromStr + fmt::Display + Copy,
{
    let Some(raw) = raw else {
        return default;
    };

    raw.parse().unwrap_or_else(|_| {
        tracing::warn!(key, value = %raw, %default, "Invalid value, using default");
        default
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = LlmConfig::from_lookup(lookup(&[]));
        assert_eq!(config.model(), "gpt-4o-mini");
        assert_eq!(config.max_tokens(), 1000);
        assert_eq!(config.temperature(), 0.7);
        assert_eq!(config.api_key(), None);
        assert_eq!(config.base_url(), None);
        assert_eq!(config.provider(), Some(Provider::OpenAi));
        assert!(!config.is_configured());
    }

    #[test]
    fn test_reads_all_variables() {
        let config = LlmConfig::from_lookup(lookup(&[
            ("LLM_MODEL", "claude-3-5-haiku-latest"),
            ("LLM_API_KEY", "sk-ant-123"),
            ("LLM_BASE_URL", "https://proxy.internal/v1/"),
            ("LLM_MAX_TOKENS", "512"),
            ("LLM_TEMPERATURE", "0.2"),
        ]));
        assert_eq!(config.model(), "claude-3-5-haiku-latest");
        assert_eq!(config.api_key(), Some("sk-ant-123"));
        assert_eq!(config.max_tokens(), 512);
        assert_eq!(config.temperature(), 0.2);
        assert_eq!(config.provider(), Some(Provider::Anthropic));
        assert_eq!(config.endpoint(Provider::Anthropic), "https://proxy.internal/v1");
        assert!(config.is_configured());
    }

    #[test]
    fn test_provider_specific_key_fallback() {
        let config = LlmConfig::from_lookup(lookup(&[
            ("LLM_MODEL", "claude-3-opus-20240229"),
            ("OPENAI_API_KEY", "sk-openai"),
            ("ANTHROPIC_API_KEY", "sk-ant"),
        ]));
        assert_eq!(config.api_key(), Some("sk-ant"));
    }

    #[test]
    fn test_invalid_numbers_fall_back_to_defaults() {
        let config = LlmConfig::from_lookup(lookup(&[
            ("LLM_MAX_TOKENS", "lots"),
            ("LLM_TEMPERATURE", "warm"),
        ]));
        assert_eq!(config.max_tokens(), LlmConfig::DEFAULT_MAX_TOKENS);
        assert_eq!(config.temperature(), LlmConfig::DEFAULT_TEMPERATURE);
    }

    #[test]
    fn test_placeholder_and_blank_keys_count_as_missing() {
        let config = LlmConfig::new("gpt-4o").with_api_key("YOUR_PLACEHOLDER_LLM_API_KEY");
        assert_eq!(config.api_key(), None);

        let config = LlmConfig::new("gpt-4o").with_api_key("   ");
        assert_eq!(config.api_key(), None);
        assert!(!config.is_configured());
    }

    #[test]
    fn test_local_models_need_no_key() {
        let config = LlmConfig::new("ollama/llama3.1");
        assert!(config.is_configured());
        assert_eq!(config.endpoint(Provider::Local), "http://localhost:11434/v1");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = LlmConfig::new("gpt-4o").with_api_key("sk-secret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
