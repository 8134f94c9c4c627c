pub mod builder;

use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::Serialize;

use crate::{
    llm::{config::LlmConfig, prompt, summarize_with, Summarizer, SummaryResult},
    yt::{
        subscriptions::{updates_text_block, SubscriptionUpdate},
        transcript::{TranscriptFetcher, TranscriptResult},
        CaptionSource, SubscriptionFeed,
    },
};

/// Transcript and summary for one requested video
#[derive(Debug, Clone, Serialize)]
pub struct VideoDigest {
    pub input: String,
    pub transcript: TranscriptResult,
    /// Absent when the transcript could not be fetched
    pub summary: Option<SummaryResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub updates: Vec<SubscriptionUpdate>,
    pub summary: SummaryResult,
    pub videos: Vec<VideoDigest>,
}

impl Report {
    /// Plain text rendering for the terminal
    pub fn render(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "YouTube Subscriber Report ({})\n\n",
            self.generated_at.format("%Y-%m-%d %H:%M UTC")
        ));

        if !self.updates.is_empty() {
            output.push_str("Updates:\n");
            output.push_str(&self.updates.iter().join("\n"));
            output.push_str("\n\n");
        }

        output.push_str("---Generated Report Summary---\n");
        output.push_str(&render_summary(&self.summary));
        output.push_str("\n---End of Report---\n");

        for video in &self.videos {
            output.push_str(&format!("\n## {}\n", video.input));
            output.push_str(&format!("{}\n", video.transcript.describe()));
            if let Some(summary) = &video.summary {
                output.push('\n');
                output.push_str(&render_summary(summary));
                output.push('\n');
            }
        }

        output
    }
}

fn render_summary(summary: &SummaryResult) -> String {
    match &summary.error {
        Some(error) => format!("Failed to generate summary: {error}"),
        None => summary.summary.clone(),
    }
}

/// Pulls subscription updates and videos through the summarizer
#[derive(Debug)]
pub struct ReportGenerator<F, S, C>
where
    F: SubscriptionFeed + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
    C: CaptionSource + Send + Sync + 'static,
{
    feed: F,
    summarizer: S,
    fetcher: TranscriptFetcher<C>,
    config: LlmConfig,
    videos: Vec<String>,
}

impl<F, S, C> ReportGenerator<F, S, C>
where
    F: SubscriptionFeed + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
    C: CaptionSource + Send + Sync + 'static,
{
    #[tracing::instrument(skip_all)]
    async fn summarize_updates(&self, updates: &[SubscriptionUpdate]) -> SummaryResult {
        let text = updates_text_block(updates);
        if updates.is_empty() {
            tracing::info!("No updates found, the LLM will receive a default message");
        }
        summarize_with(&self.summarizer, &text, &self.config, prompt::UPDATES).await
    }

    #[tracing::instrument(skip(self))]
    async fn digest_video(&self, input: &str) -> VideoDigest {
        let transcript = self.fetcher.fetch(input).await;

        let summary = match transcript.transcript.as_deref() {
            Some(text) if transcript.success => Some(
                summarize_with(&self.summarizer, text, &self.config, prompt::TRANSCRIPT).await,
            ),
            _ => {
                tracing::warn!(status = %transcript.describe(), "Skipping summary");
                None
            }
        };

        VideoDigest {
            input: input.to_string(),
            transcript,
            summary,
        }
    }

    /// Builds the report.
    ///
    /// Only a failing feed aborts; transcript and summary failures are
    /// recorded in the report.
    #[tracing::instrument(skip(self), fields(videos = self.videos.len()))]
    pub async fn run(&self) -> anyhow::Result<Report> {
        tracing::info!("Starting report generation");

        let updates = self.feed.fetch_updates().await?;
        tracing::info!(count = updates.len(), "Processing subscription updates");

        let summary = self.summarize_updates(&updates).await;

        let mut videos = Vec::with_capacity(self.videos.len());
        for input in &self.videos {
            videos.push(self.digest_video(input).await);
        }

        tracing::info!("Report generation complete");

        Ok(Report {
            generated_at: Utc::now(),
            updates,
            summary,
            videos,
        })
    }
}
