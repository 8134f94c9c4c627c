use std::{fmt, time::Duration};

use serde::Serialize;

/// The LLM backends a model name can route to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    OpenAi,
    Anthropic,
    /// Any OpenAI compatible server: Ollama, LM Studio, vLLM, llama.cpp
    Local,
    HuggingFace,
}

impl Provider {
    const ROUTES: [(&str, Provider); 8] = [
        ("openai/", Provider::OpenAi),
        ("anthropic/", Provider::Anthropic),
        ("ollama/", Provider::Local),
        ("local/", Provider::Local),
        ("lmstudio/", Provider::Local),
        ("huggingface/", Provider::HuggingFace),
        ("hf/", Provider::HuggingFace),
        ("claude", Provider::Anthropic),
    ];

    const OPENAI_PREFIXES: [&str; 5] = ["gpt-", "chatgpt", "o1", "o3", "o4"];

    /// Works out which provider serves `model`.
    ///
    /// Names that match no known family are assumed to live on a configured
    /// `base_url`, including `org/model` names served by vLLM or TGI.
    pub fn infer(model: &str, base_url: Option<&str>) -> Option<Provider> {
        let model = model.trim().to_ascii_lowercase();

        if let Some((_, provider)) = Self::ROUTES
            .iter()
            .find(|(prefix, _)| model.starts_with(prefix))
        {
            return Some(*provider);
        }

        if Self::OPENAI_PREFIXES.iter().any(|p| model.starts_with(p)) {
            return Some(Provider::OpenAi);
        }

        if base_url.is_some() {
            return Some(Provider::Local);
        }

        // `org/model` repository names
        model.contains('/').then_some(Provider::HuggingFace)
    }

    /// The model name as the provider expects it, routing prefix removed
    pub fn api_model<'a>(&self, model: &'a str) -> &'a str {
        let model = model.trim();
        Self::ROUTES
            .iter()
            .filter(|(prefix, provider)| provider == self && prefix.ends_with('/'))
            .find_map(|(prefix, _)| {
                model
                    .get(..prefix.len())
                    .filter(|head| head.eq_ignore_ascii_case(prefix))
                    .map(|_| &model[prefix.len()..])
            })
            .unwrap_or(model)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OpenAI",
            Provider::Anthropic => "Anthropic",
            Provider::Local => "Local",
            Provider::HuggingFace => "Hugging Face",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::OpenAi => "https://api.openai.com/v1",
            Provider::Anthropic => "https://api.anthropic.com/v1",
            Provider::Local => "http://localhost:11434/v1",
            Provider::HuggingFace => "https://api-inference.huggingface.co",
        }
    }

    /// Provider specific variable consulted when `LLM_API_KEY` is unset
    pub fn api_key_env(&self) -> Option<&'static str> {
        match self {
            Provider::OpenAi => Some("OPENAI_API_KEY"),
            Provider::Anthropic => Some("ANTHROPIC_API_KEY"),
            Provider::Local => None,
            Provider::HuggingFace => Some("HUGGINGFACE_API_KEY"),
        }
    }

    pub fn requires_api_key(&self) -> bool {
        !matches!(self, Provider::Local)
    }

    pub fn request_timeout(&self) -> Duration {
        match self {
            // local inference on a laptop can take minutes for long transcripts
            Provider::Local => Duration::from_secs(300),
            _ => Duration::from_secs(60),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Model identifiers known to work with the summarizer
pub fn available_models() -> &'static [&'static str] {
    &[
        "gpt-4o-mini",
        "gpt-4o",
        "gpt-4.1-mini",
        "gpt-4.1",
        "o3-mini",
        "claude-3-5-haiku-latest",
        "claude-3-5-sonnet-latest",
        "claude-3-7-sonnet-latest",
        "claude-sonnet-4-0",
        "ollama/llama3.1",
        "ollama/mistral",
        "ollama/qwen2.5",
        "huggingface/mistralai/Mistral-7B-Instruct-v0.3",
        "huggingface/HuggingFaceH4/zephyr-7b-beta",
        "huggingface/facebook/bart-large-cnn",
    ]
}
