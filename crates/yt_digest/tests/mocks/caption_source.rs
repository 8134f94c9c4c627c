use std::sync::{Arc, Mutex};

use yt_digest::{
    parser::YtHtmlDocument,
    types::{CaptionTrack, PlayerResponse, VideoId},
    yt::CaptionSource,
    TranscriptError,
};

#[derive(Clone)]
pub struct MockCaptionSource {
    pub html: String,
    pub player: String,
    pub timed_text: String,
    pub fail_with: Option<TranscriptError>,
    /// Every request made, as `"<endpoint>:<detail>"`
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl MockCaptionSource {
    pub fn new(html: &str, player: &str, timed_text: &str) -> Self {
        Self {
            html: html.to_string(),
            player: player.to_string(),
            timed_text: timed_text.to_string(),
            fail_with: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn from_fixtures() -> Self {
        Self::new(
            include_str!("../fixtures/watch.html"),
            include_str!("../fixtures/player.json"),
            include_str!("../fixtures/timed_text.json"),
        )
    }

    pub fn with_player(mut self, player: &str) -> Self {
        self.player = player.to_string();
        self
    }

    pub fn with_html(mut self, html: &str) -> Self {
        self.html = html.to_string();
        self
    }

    pub fn with_timed_text(mut self, timed_text: &str) -> Self {
        self.timed_text = timed_text.to_string();
        self
    }

    pub fn failing(error: TranscriptError) -> Self {
        Self {
            fail_with: Some(error),
            ..Self::from_fixtures()
        }
    }

    fn record(&self, call: String) -> Result<(), TranscriptError> {
        self.calls.lock().unwrap().push(call);
        match &self.fail_with {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

impl CaptionSource for MockCaptionSource {
    async fn watch_page(&self, video_id: &VideoId) -> Result<YtHtmlDocument, TranscriptError> {
        self.record(format!("watch:{video_id}"))?;
        Ok(YtHtmlDocument::new(self.html.clone()))
    }

    async fn player_response(
        &self,
        video_id: &VideoId,
        api_key: &str,
    ) -> Result<PlayerResponse, TranscriptError> {
        self.record(format!("player:{video_id}:{api_key}"))?;
        Ok(serde_json::from_str(&self.player).unwrap())
    }

    async fn timed_text(&self, track: &CaptionTrack) -> Result<String, TranscriptError> {
        self.record(format!("timedtext:{}", track.base_url))?;
        Ok(self.timed_text.clone())
    }
}
