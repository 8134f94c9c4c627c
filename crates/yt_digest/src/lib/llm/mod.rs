pub mod anthropic;
pub mod config;
pub mod huggingface;
pub mod openai;
pub mod prompt;
pub mod provider;

use std::future::Future;

use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::error::SummaryError;
use anthropic::AnthropicClient;
use config::LlmConfig;
use huggingface::HuggingFaceClient;
use openai::OpenAIClient;
use prompt::Prompt;
use provider::Provider;

/// Generated text plus the usage the provider reported
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub tokens_used: u64,
}

pub trait Summarizer {
    fn complete(
        &self,
        prompt: &Prompt,
        config: &LlmConfig,
    ) -> impl Future<Output = Result<Completion, SummaryError>> + Send;
}

/// Outcome of [`summarize`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryResult {
    pub success: bool,
    pub summary: String,
    pub tokens_used: u64,
    pub model_used: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<SummaryError>,
}

impl SummaryResult {
    pub fn success(config: &LlmConfig, completion: Completion) -> Self {
        Self {
            success: true,
            summary: completion.text,
            tokens_used: completion.tokens_used,
            model_used: config.model().to_string(),
            error: None,
        }
    }

    pub fn failure(config: &LlmConfig, error: SummaryError) -> Self {
        Self {
            success: false,
            summary: String::new(),
            tokens_used: 0,
            model_used: config.model().to_string(),
            error: Some(error),
        }
    }
}

/// A concrete provider client, picked from [`LlmConfig::provider`]
#[derive(Debug, Clone)]
pub enum LlmClient {
    OpenAi(OpenAIClient),
    Anthropic(AnthropicClient),
    Local(OpenAIClient),
    HuggingFace(HuggingFaceClient),
}

impl LlmClient {
    /// Builds the client for the configured model.
    ///
    /// Fails without touching the network when the model cannot be routed or
    /// a cloud provider has no API key.
    pub fn from_config(config: &LlmConfig) -> Result<Self, SummaryError> {
        let provider = config.provider().ok_or_else(|| {
            SummaryError::unknown(format!(
                "Unsupported model {:?}: cannot tell which provider serves it",
                config.model()
            ))
        })?;

        let api_key = config.api_key();
        if provider.requires_api_key() && api_key.is_none() {
            let hint = match provider.api_key_env() {
                Some(env) => format!("{} or {env}", LlmConfig::API_KEY_ENV),
                None => LlmConfig::API_KEY_ENV.to_string(),
            };
            return Err(SummaryError::auth(format!(
                "No API key configured for {provider}; set {hint}"
            )));
        }

        let http = Client::builder()
            .timeout(provider.request_timeout())
            .build()
            .map_err(|e| SummaryError::unknown(format!("Failed to build HTTP client: {e}")))?;
        let base_url = config.endpoint(provider);
        let api_key = api_key.unwrap_or_default();

        let client = match provider {
            Provider::OpenAi => LlmClient::OpenAi(
                OpenAIClient::new(api_key)
                    .with_base_url(base_url)
                    .with_http_client(http),
            ),
            Provider::Local => {
                let client = if api_key.is_empty() {
                    OpenAIClient::anonymous()
                } else {
                    OpenAIClient::new(api_key)
                };
                LlmClient::Local(client.with_base_url(base_url).with_http_client(http))
            }
            Provider::Anthropic => LlmClient::Anthropic(
                AnthropicClient::new(api_key)
                    .with_base_url(base_url)
                    .with_http_client(http),
            ),
            Provider::HuggingFace => LlmClient::HuggingFace(
                HuggingFaceClient::new(api_key)
                    .with_base_url(base_url)
                    .with_http_client(http),
            ),
        };

        Ok(client)
    }

    pub fn provider(&self) -> Provider {
        match self {
            LlmClient::OpenAi(_) => Provider::OpenAi,
            LlmClient::Anthropic(_) => Provider::Anthropic,
            LlmClient::Local(_) => Provider::Local,
            LlmClient::HuggingFace(_) => Provider::HuggingFace,
        }
    }
}

impl Summarizer for LlmClient {
    async fn complete(
        &self,
        prompt: &Prompt,
        config: &LlmConfig,
    ) -> Result<Completion, SummaryError> {
        match self {
            LlmClient::OpenAi(client) | LlmClient::Local(client) => {
                client.complete(prompt, config).await
            }
            LlmClient::Anthropic(client) => client.complete(prompt, config).await,
            LlmClient::HuggingFace(client) => client.complete(prompt, config).await,
        }
    }
}

/// Summarizes `text` with the provider `config` points at.
///
/// Never fails outright; errors are carried in the returned result.
pub async fn summarize(text: &str, config: &LlmConfig, content_type: &str) -> SummaryResult {
    match LlmClient::from_config(config) {
        Ok(client) => {
            tracing::debug!(provider = %client.provider(), "Dispatching summary request");
            summarize_with(&client, text, config, content_type).await
        }
        Err(error) => {
            tracing::error!(model = config.model(), error = %error, "Cannot summarize");
            SummaryResult::failure(config, error)
        }
    }
}

/// [`summarize`] against an already constructed summarizer
#[tracing::instrument(skip(summarizer, text, config), fields(model = config.model()))]
pub async fn summarize_with<S: Summarizer>(
    summarizer: &S,
    text: &str,
    config: &LlmConfig,
    content_type: &str,
) -> SummaryResult {
    tracing::info!("Attempting to summarize text with LLM");

    if text.trim().is_empty() {
        tracing::warn!("No text provided for summarization");
        return SummaryResult::failure(
            config,
            SummaryError::unknown("No text provided for summarization"),
        );
    }

    let prompt = prompt::build(text, content_type);
    match summarizer.complete(&prompt, config).await {
        Ok(completion) => {
            tracing::info!(tokens_used = completion.tokens_used, "LLM summarization complete");
            SummaryResult::success(config, completion)
        }
        Err(error) => {
            tracing::error!(error = %error, "An error occurred during LLM summarization");
            SummaryResult::failure(config, error)
        }
    }
}

/// Reads the body of a provider response, mapping failure statuses
pub(crate) async fn check_response(resp: reqwest::Response) -> Result<String, SummaryError> {
    let status = resp.status();
    let body = resp.text().await?;

    if status.is_success() {
        return Ok(body);
    }

    let message = api_error_message(&body).unwrap_or_else(|| body.trim().to_string());
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(SummaryError::auth(format!(
            "API rejected credentials: {} - {message}",
            status.as_u16()
        ))),
        _ => Err(SummaryError::unknown(format!(
            "API error: {} - {message}",
            status.as_u16()
        ))),
    }
}

pub(crate) fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, SummaryError> {
    serde_json::from_str(body).map_err(|e| {
        tracing::error!(error = %e, "Failed to decode provider response");
        SummaryError::malformed(format!("Failed to decode provider response: {e}"))
    })
}

/// Pulls the message out of the common provider error envelopes:
/// `{"error": {"message": ..}}`, `{"error": ".."}` and `{"message": ..}`
fn api_error_message(body: &str) -> Option<String> {
    let json = serde_json::from_str::<Value>(body).ok()?;

    json["error"]["message"]
        .as_str()
        .or_else(|| json["error"].as_str())
        .or_else(|| json["message"].as_str())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SummaryErrorKind;

    #[test]
    fn test_error_envelopes() {
        let body = r#"{"error": {"message": "Incorrect API key", "type": "invalid_request_error"}}"#;
        assert_eq!(
            api_error_message(body).as_deref(),
            Some("Incorrect API key")
        );
        assert_eq!(
            api_error_message(r#"{"error": "Model is currently loading"}"#).as_deref(),
            Some("Model is currently loading")
        );
        assert_eq!(
            api_error_message(r#"{"message": "Forbidden"}"#).as_deref(),
            Some("Forbidden")
        );
        assert_eq!(api_error_message("<html>502</html>"), None);
    }

    #[test]
    fn test_from_config_requires_key_for_cloud_providers() {
        let config = LlmConfig::new("claude-3-5-haiku-latest");
        let err = LlmClient::from_config(&config).unwrap_err();
        assert_eq!(err.kind, SummaryErrorKind::AuthError);
        assert!(err.message.contains("ANTHROPIC_API_KEY"));
    }

    #[test]
    fn test_from_config_dispatches_on_provider() {
        let cases = [
            (LlmConfig::new("gpt-4o").with_api_key("k"), Provider::OpenAi),
            (
                LlmConfig::new("claude-sonnet-4-0").with_api_key("k"),
                Provider::Anthropic,
            ),
            (LlmConfig::new("ollama/llama3.1"), Provider::Local),
            (
                LlmConfig::new("hf/facebook/bart-large-cnn").with_api_key("k"),
                Provider::HuggingFace,
            ),
        ];

        for (config, expected) in cases {
            let client = LlmClient::from_config(&config).unwrap();
            assert_eq!(client.provider(), expected);
        }
    }

    #[test]
    fn test_unroutable_model_is_unknown() {
        let err = LlmClient::from_config(&LlmConfig::new("llama3")).unwrap_err();
        assert_eq!(err.kind, SummaryErrorKind::Unknown);
    }

    #[test]
    fn test_decode_body_reports_malformed() {
        let err = decode_body::<openai::CompletionResponse>("not json").unwrap_err();
        assert_eq!(err.kind, SummaryErrorKind::MalformedResponse);
    }
}
