use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::SummaryError,
    llm::{
        check_response, config::LlmConfig, decode_body, prompt::Prompt, Completion, Summarizer,
    },
};

/// Client for the OpenAI chat completions API and servers that mimic it
#[derive(Debug, Clone)]
pub struct OpenAIClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl OpenAIClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: Some(api_key.into()),
            base_url: "https://api.openai.com/v1".into(),
        }
    }

    /// A client for a local server that takes no key
    pub fn anonymous() -> Self {
        Self {
            api_key: None,
            ..Self::new("")
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

    pub async fn send_completion_request(
        &self,
        model_name: impl Into<String>,
        prompt: &Prompt,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<CompletionResponse, SummaryError> {
        let body = serde_json::json!({
            "model": model_name.into(),
            "messages": [
                {
                    "role": "system",
                    "content": prompt.system
                },
                {
                    "role": "user",
                    "content": prompt.user
                }
            ],
            "max_tokens": max_tokens,
            "temperature": temperature,
        });

        let mut request = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let resp = request
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        let body = check_response(resp).await?;
        decode_body(&body)
    }
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    pub id: Option<String>,
    pub choices: Vec<CompletionChoice>,
    pub usage: Option<CompletionUsage>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    pub index: u32,
    pub message: CompletionMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionMessage {
    pub role: String,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

impl Summarizer for OpenAIClient {
    async fn complete(
        &self,
        prompt: &Prompt,
        config: &LlmConfig,
    ) -> Result<Completion, SummaryError> {
        let model = config
            .provider()
            .map(|p| p.api_model(config.model()))
            .unwrap_or(config.model());

        let response = self
            .send_completion_request(model, prompt, config.max_tokens(), config.temperature())
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to summarize content"))?;

        if let Some(reason) = response.choices.first().and_then(|c| c.finish_reason.as_deref()) {
            tracing::debug!(finish_reason = reason, "Completion finished");
        }

        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| SummaryError::malformed("No content in completion response"))?;

        Ok(Completion {
            text: text.trim().to_string(),
            tokens_used: response.usage.map(|u| u.total_tokens).unwrap_or_default(),
        })
    }
}
