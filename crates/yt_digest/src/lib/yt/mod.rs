pub mod scraper;
pub mod subscriptions;
pub mod transcript;

use std::future::Future;

use crate::{
    error::TranscriptError,
    parser::YtHtmlDocument,
    types::{CaptionTrack, PlayerResponse, VideoId},
};

/// Where caption data comes from.
///
/// Implementations only move bytes; classifying the responses is left to
/// [`transcript::TranscriptFetcher`].
pub trait CaptionSource {
    /// Loads the watch page for `video_id`
    fn watch_page(
        &self,
        video_id: &VideoId,
    ) -> impl Future<Output = Result<YtHtmlDocument, TranscriptError>> + Send;

    /// Queries the Innertube player endpoint for `video_id`
    fn player_response(
        &self,
        video_id: &VideoId,
        api_key: &str,
    ) -> impl Future<Output = Result<PlayerResponse, TranscriptError>> + Send;

    /// Downloads a caption track as a `fmt=json3` body
    fn timed_text(
        &self,
        track: &CaptionTrack,
    ) -> impl Future<Output = Result<String, TranscriptError>> + Send;
}

pub trait SubscriptionFeed {
    fn fetch_updates(
        &self,
    ) -> impl Future<Output = anyhow::Result<Vec<subscriptions::SubscriptionUpdate>>> + Send;
}
