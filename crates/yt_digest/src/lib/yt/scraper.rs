use reqwest::{Client, StatusCode, Url};
use serde_json::json;

use crate::{
    error::TranscriptError,
    parser::YtHtmlDocument,
    types::{CaptionTrack, PlayerResponse, VideoId},
    yt::CaptionSource,
};

/// Fetches caption data straight from youtube.com
#[derive(Debug, Clone)]
pub struct Scraper {
    client: Client,
    base_url: String,
}

impl Default for Scraper {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

impl Scraper {
    const BASE_URL: &str = "https://www.youtube.com";
    const CLIENT_NAME: &str = "ANDROID";
    const CLIENT_VERSION: &str = "20.10.38";

    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: Self::BASE_URL.into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn check_status(status: StatusCode, what: &str) -> Result<(), TranscriptError> {
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(TranscriptError::request_blocked(format!(
                "YouTube answered the {what} request with 429 Too Many Requests"
            )));
        }
        if !status.is_success() {
            return Err(TranscriptError::unknown(format!(
                "YouTube answered the {what} request with HTTP {status}"
            )));
        }
        Ok(())
    }
}

impl CaptionSource for Scraper {
    #[tracing::instrument(skip(self), fields(video_id = %video_id))]
    async fn watch_page(&self, video_id: &VideoId) -> Result<YtHtmlDocument, TranscriptError> {
        let resp = self
            .client
            .get(format!("{}/watch", self.base_url))
            .query(&[("v", video_id.as_str())])
            .header("Accept-Language", "en-US,en;q=0.9")
            // skips the EU cookie consent interstitial
            .header("Cookie", "CONSENT=YES+cb")
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        Self::check_status(resp.status(), "watch page")?;

        Ok(resp.text().await?.into())
    }

    #[tracing::instrument(skip(self, api_key), fields(video_id = %video_id))]
    async fn player_response(
        &self,
        video_id: &VideoId,
        api_key: &str,
    ) -> Result<PlayerResponse, TranscriptError> {
        let body = json!({
            "context": {
                "client": {
                    "clientName": Self::CLIENT_NAME,
                    "clientVersion": Self::CLIENT_VERSION,
                }
            },
            "videoId": video_id.as_str(),
        });

        let resp = self
            .client
            .post(format!("{}/youtubei/v1/player", self.base_url))
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        Self::check_status(resp.status(), "player")?;

        let player = resp
            .json::<PlayerResponse>()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to decode player response"))?;

        Ok(player)
    }

    #[tracing::instrument(skip_all, fields(language = %track.language_code))]
    async fn timed_text(&self, track: &CaptionTrack) -> Result<String, TranscriptError> {
        let url = json3_url(&track.base_url)?;

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        Self::check_status(resp.status(), "timed text")?;

        Ok(resp.text().await?)
    }
}

/// The caption track url with any `fmt` parameter replaced by `fmt=json3`
fn json3_url(base_url: &str) -> Result<Url, TranscriptError> {
    let mut url = Url::parse(base_url).map_err(|e| {
        TranscriptError::unknown(format!("Invalid caption track url {base_url:?}: {e}"))
    })?;

    let query = url
        .query_pairs()
        .filter(|(key, _)| *key != "fmt")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect::<Vec<_>>();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(query)
        .append_pair("fmt", "json3");

    Ok(url)
}
