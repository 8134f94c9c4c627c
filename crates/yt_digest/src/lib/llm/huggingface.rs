use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::SummaryError,
    llm::{
        check_response, config::LlmConfig, decode_body, prompt::Prompt, provider::Provider,
        Completion, Summarizer,
    },
};

/// Client for the Hugging Face serverless inference API
#[derive(Debug, Clone)]
pub struct HuggingFaceClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl HuggingFaceClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: Provider::HuggingFace.default_base_url().into(),
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

    pub async fn send_inference_request(
        &self,
        model_name: &str,
        prompt: &Prompt,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<Vec<InferenceOutput>, SummaryError> {
        let body = serde_json::json!({
            "inputs": format!("{}\n\n{}", prompt.system, prompt.user),
            "parameters": {
                "max_new_tokens": max_tokens,
                "temperature": temperature,
                "return_full_text": false
            },
            "options": {
                "wait_for_model": true
            }
        });

        let resp = self
            .client
            .post(format!("{}/models/{}", self.base_url, model_name))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        let body = check_response(resp).await?;
        decode_body(&body)
    }
}

/// Text generation models answer with `generated_text`, summarization
/// models with `summary_text`
#[derive(Debug, Deserialize)]
pub struct InferenceOutput {
    pub generated_text: Option<String>,
    pub summary_text: Option<String>,
}

impl Summarizer for HuggingFaceClient {
    async fn complete(
        &self,
        prompt: &Prompt,
        config: &LlmConfig,
    ) -> Result<Completion, SummaryError> {
        let model = Provider::HuggingFace.api_model(config.model());

        let outputs = self
            .send_inference_request(model, prompt, config.max_tokens(), config.temperature())
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to summarize content"))?;

        let text = outputs
            .into_iter()
            .next()
            .and_then(|o| o.generated_text.or(o.summary_text))
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| SummaryError::malformed("No generated text in inference response"))?;

        // the inference API does not report usage
        Ok(Completion {
            text: text.trim().to_string(),
            tokens_used: 0,
        })
    }
}
