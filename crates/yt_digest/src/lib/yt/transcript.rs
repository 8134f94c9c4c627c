use itertools::Itertools;
use serde::Serialize;

use crate::{
    error::TranscriptError,
    parser::{extract_video_id, parse_timed_text},
    types::{CaptionTrack, PlayerResponse, TranscriptSegment, VideoId},
    yt::CaptionSource,
};

/// A successfully fetched transcript
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transcript {
    pub video_id: VideoId,
    pub text: String,
    pub segments: Vec<TranscriptSegment>,
    pub language: String,
}

/// Preferred caption languages when none are configured
pub const DEFAULT_LANGUAGES: [&str; 3] = ["en", "en-US", "en-GB"];

const AUTO_GENERATED_FALLBACK: &str = "en";

/// Outcome of [`TranscriptFetcher::fetch`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptResult {
    pub success: bool,
    pub video_id: Option<VideoId>,
    pub transcript: Option<String>,
    pub structured_transcript: Vec<TranscriptSegment>,
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<TranscriptError>,
}

impl TranscriptResult {
    pub fn success(transcript: Transcript) -> Self {
        Self {
            success: true,
            video_id: Some(transcript.video_id),
            transcript: Some(transcript.text),
            structured_transcript: transcript.segments,
            language: Some(transcript.language),
            error: None,
        }
    }

    pub fn failure(video_id: Option<VideoId>, error: TranscriptError) -> Self {
        Self {
            success: false,
            video_id,
            transcript: None,
            structured_transcript: Vec::new(),
            language: None,
            error: Some(error),
        }
    }

    pub fn length_chars(&self) -> usize {
        self.transcript
            .as_deref()
            .map(|t| t.chars().count())
            .unwrap_or_default()
    }

    pub fn length_entries(&self) -> usize {
        self.structured_transcript.len()
    }

    /// One line status, for logs and CLI output
    pub fn describe(&self) -> String {
        match &self.error {
            Some(error) => format!("Failed: {error}"),
            None => format!(
                "Video ID: {} | Language: {} | Length: {} chars | Segments: {}",
                self.video_id.as_deref().unwrap_or("-"),
                self.language.as_deref().unwrap_or("-"),
                self.length_chars(),
                self.length_entries(),
            ),
        }
    }
}

/// Resolves a URL or id to a video, picks a caption track and downloads it
#[derive(Debug, Clone)]
pub struct TranscriptFetcher<S> {
    source: S,
    languages: Vec<String>,
}

impl<S: CaptionSource> TranscriptFetcher<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            languages: DEFAULT_LANGUAGES.iter().map(|l| l.to_string()).collect(),
        }
    }

    /// Overrides the preferred languages; an empty list keeps the defaults
    pub fn with_languages<L: Into<String>>(
        mut self,
        languages: impl IntoIterator<Item = L>,
    ) -> Self {
        let languages = languages.into_iter().map(Into::into).collect::<Vec<_>>();
        if !languages.is_empty() {
            self.languages = languages;
        }
        self
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Fetches the transcript for a YouTube URL or bare video id.
    ///
    /// Never fails outright; errors are carried in the returned result.
    #[tracing::instrument(skip(self))]
    pub async fn fetch(&self, url_or_id: &str) -> TranscriptResult {
        tracing::info!("Attempting to fetch transcript");

        let Some(video_id) = extract_video_id(url_or_id) else {
            tracing::error!("Could not extract video ID");
            return TranscriptResult::failure(None, TranscriptError::invalid_input(url_or_id));
        };

        match self.try_fetch(&video_id).await {
            Ok(transcript) => {
                tracing::info!(
                    video_id = %video_id,
                    language = %transcript.language,
                    length = transcript.text.len(),
                    "Successfully fetched transcript"
                );
                TranscriptResult::success(transcript)
            }
            Err(error) => {
                tracing::error!(video_id = %video_id, error = %error, "Error fetching transcript");
                TranscriptResult::failure(Some(video_id), error)
            }
        }
    }

    /// Fetches transcripts one after another
    pub async fn fetch_many<I>(&self, inputs: I) -> Vec<TranscriptResult>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut results = Vec::new();
        for input in inputs {
            results.push(self.fetch(input.as_ref()).await);
        }

        let successful = results.iter().filter(|r| r.success).count();
        tracing::info!(
            successful,
            total = results.len(),
            "Finished fetching transcripts"
        );

        results
    }

    async fn try_fetch(&self, video_id: &VideoId) -> Result<Transcript, TranscriptError> {
        let page = self.source.watch_page(video_id).await?;
        if page.is_request_blocked() {
            return Err(TranscriptError::request_blocked(
                "YouTube answered with a reCAPTCHA page",
            ));
        }

        let api_key = page.innertube_api_key()?;
        let player = self.source.player_response(video_id, api_key).await?;
        let tracks = caption_tracks(video_id, player)?;
        tracing::debug!(
            available = %tracks.iter().map(|t| &t.language_code).join(", "),
            "Available transcripts"
        );

        let (track, language) = select_track(&tracks, &self.languages)
            .ok_or_else(|| TranscriptError::no_transcript(video_id))?;
        tracing::info!(%language, "Using transcript");

        let body = self.source.timed_text(track).await?;
        let segments = parse_timed_text(&body)?;
        if segments.is_empty() {
            return Err(TranscriptError::unknown(format!(
                "Caption track {language} for video {video_id} came back empty"
            )));
        }

        let text = segments.iter().map(|s| s.text.as_str()).join("\n");

        Ok(Transcript {
            video_id: video_id.clone(),
            text,
            segments,
            language,
        })
    }
}

/// Classifies the player response, yielding its caption tracks
fn caption_tracks(
    video_id: &VideoId,
    player: PlayerResponse,
) -> Result<Vec<CaptionTrack>, TranscriptError> {
    if let Some(status) = player.playability_status {
        let reason = status.reason.unwrap_or_default();
        match status.status.as_str() {
            "OK" => {}
            "LOGIN_REQUIRED" if reason.contains("bot") => {
                return Err(TranscriptError::request_blocked(format!(
                    "YouTube asked to confirm this is not a bot ({reason})"
                )));
            }
            other => {
                return Err(TranscriptError::unknown(format!(
                    "Video {video_id} is unavailable ({other}): {reason}"
                )));
            }
        }
    }

    let tracks = player
        .captions
        .and_then(|c| c.player_captions_tracklist_renderer)
        .map(|r| r.caption_tracks)
        .unwrap_or_default();

    if tracks.is_empty() {
        return Err(TranscriptError::no_transcript(video_id));
    }

    Ok(tracks)
}

/// Picks a track and the language label to report for it.
///
/// For each preferred language a manually created track wins over an
/// auto-generated one. After that the auto-generated English track is used,
/// then whatever is listed first.
fn select_track<'a>(
    tracks: &'a [CaptionTrack],
    languages: &[String],
) -> Option<(&'a CaptionTrack, String)> {
    for language in languages {
        let matching = || tracks.iter().filter(|t| &t.language_code == language);
        if let Some(track) = matching()
            .find(|t| !t.is_generated())
            .or_else(|| matching().next())
        {
            return Some((track, language.clone()));
        }
        tracing::debug!(%language, "No transcript found for language");
    }

    if let Some(track) = tracks
        .iter()
        .find(|t| t.is_generated() && t.language_code == AUTO_GENERATED_FALLBACK)
    {
        return Some((track, format!("{AUTO_GENERATED_FALLBACK} (auto-generated)")));
    }

    tracks.first().map(|t| (t, t.language_code.clone()))
}
