use std::{fmt, path::PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::yt::SubscriptionFeed;

pub const NO_UPDATES_MESSAGE: &str =
    "No new updates were found from your subscriptions to summarize.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateKind {
    #[default]
    Upload,
    Bulletin,
    #[serde(other)]
    Other,
}

impl fmt::Display for UpdateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UpdateKind::Upload => "upload",
            UpdateKind::Bulletin => "bulletin",
            UpdateKind::Other => "other",
        })
    }
}

/// A new upload or community post from a subscribed channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionUpdate {
    pub channel_name: String,
    #[serde(alias = "update_title")]
    pub title: String,
    #[serde(default, alias = "type")]
    pub kind: UpdateKind,
}

impl fmt::Display for SubscriptionUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "- Channel: {}, Title: {} (Type: {})",
            self.channel_name, self.title, self.kind
        )
    }
}

/// Renders updates as the text block handed to the summarizer
pub fn updates_text_block(updates: &[SubscriptionUpdate]) -> String {
    if updates.is_empty() {
        return NO_UPDATES_MESSAGE.to_string();
    }

    updates.iter().map(|u| format!("{u}\n")).collect()
}

/// A fixed list of updates
#[derive(Debug, Clone, Default)]
pub struct StaticFeed(pub Vec<SubscriptionUpdate>);

impl SubscriptionFeed for StaticFeed {
    async fn fetch_updates(&self) -> anyhow::Result<Vec<SubscriptionUpdate>> {
        tracing::info!(count = self.0.len(), "Using static subscription updates");
        Ok(self.0.clone())
    }
}

/// Updates exported to a JSON array on disk
#[derive(Debug, Clone)]
pub struct JsonFileFeed {
    path: PathBuf,
}

impl JsonFileFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SubscriptionFeed for JsonFileFeed {
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    async fn fetch_updates(&self) -> anyhow::Result<Vec<SubscriptionUpdate>> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read updates from {}", self.path.display()))?;

        let updates = serde_json::from_str::<Vec<SubscriptionUpdate>>(&raw)
            .with_context(|| format!("Failed to parse updates in {}", self.path.display()))?;

        tracing::info!(count = updates.len(), "Fetched subscription updates");
        Ok(updates)
    }
}
