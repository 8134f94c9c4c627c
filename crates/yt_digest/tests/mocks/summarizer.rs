use std::sync::{Arc, Mutex};

use yt_digest::{llm::prompt::Prompt, Completion, LlmConfig, Summarizer, SummaryError};

#[derive(Clone)]
pub struct MockSummarizer {
    pub summary: String,
    pub tokens_used: u64,
    /// User prompts received, in order
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<SummaryError>,
}

impl MockSummarizer {
    pub fn new(summary: &str) -> Self {
        Self {
            summary: summary.to_string(),
            tokens_used: 42,
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(error: SummaryError) -> Self {
        Self {
            summary: String::new(),
            tokens_used: 0,
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(error),
        }
    }
}

impl Summarizer for MockSummarizer {
    async fn complete(
        &self,
        prompt: &Prompt,
        _config: &LlmConfig,
    ) -> Result<Completion, SummaryError> {
        self.calls.lock().unwrap().push(prompt.user.clone());
        if let Some(ref error) = self.fail_with {
            return Err(error.clone());
        }
        Ok(Completion {
            text: self.summary.clone(),
            tokens_used: self.tokens_used,
        })
    }
}
