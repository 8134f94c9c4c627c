use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::SummaryError,
    llm::{
        check_response, config::LlmConfig, decode_body, prompt::Prompt, provider::Provider,
        Completion, Summarizer,
    },
};

/// Client for the Anthropic messages API
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl AnthropicClient {
    const API_VERSION: &str = "2023-06-01";

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: Provider::Anthropic.default_base_url().into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_http_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub async fn send_messages_request(
        &self,
        model_name: impl Into<String>,
        prompt: &Prompt,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<MessagesResponse, SummaryError> {
        let body = serde_json::json!({
            "model": model_name.into(),
            "max_tokens": max_tokens,
            "temperature": temperature,
            "system": prompt.system,
            "messages": [
                {
                    "role": "user",
                    "content": prompt.user
                }
            ]
        });

        let resp = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", Self::API_VERSION)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        let body = check_response(resp).await?;
        decode_body(&body)
    }
}

#[derive(Debug, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    pub stop_reason: Option<String>,
    pub usage: Option<MessagesUsage>,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MessagesUsage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
}

impl Summarizer for AnthropicClient {
    async fn complete(
        &self,
        prompt: &Prompt,
        config: &LlmConfig,
    ) -> Result<Completion, SummaryError> {
        let model = Provider::Anthropic.api_model(config.model());

        let response = self
            .send_messages_request(model, prompt, config.max_tokens(), config.temperature())
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to summarize content"))?;

        if let Some(reason) = &response.stop_reason {
            tracing::debug!(stop_reason = %reason, "Completion finished");
        }

        let text = response
            .content
            .iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text.as_deref())
            .collect::<String>();

        if text.trim().is_empty() {
            return Err(SummaryError::malformed("No text content in messages response"));
        }

        Ok(Completion {
            text: text.trim().to_string(),
            tokens_used: response
                .usage
                .map(|u| u.input_tokens + u.output_tokens)
                .unwrap_or_default(),
        })
    }
}
