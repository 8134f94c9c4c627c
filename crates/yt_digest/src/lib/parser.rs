//! # Yt Parser
//!
//! Helpers for turning user input and raw YouTube payloads into typed values:
//! video id extraction, watch page inspection and json3 caption parsing.

use std::{ops::Deref, sync::LazyLock};

use regex::Regex;

use crate::{
    error::Error,
    types::{TimedText, TranscriptSegment, VideoId},
};

static YT_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:youtube\.com/(?:watch\?(?:[^#\s]*&)?v=|embed/|v/|shorts/)|youtu\.be/)([A-Za-z0-9_-]{11})(?:[^A-Za-z0-9_-]|$)",
    )
    .unwrap()
});

static BARE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").unwrap());

static INNERTUBE_API_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""INNERTUBE_API_KEY":\s*"([A-Za-z0-9_-]+)""#).unwrap());

/// Extracts the video id from a watch, short, embed or `/v/` URL, or accepts
/// a bare 11 character id.
///
/// Returns `None` unless a complete id is found; a truncated or overlong id
/// is never returned.
pub fn extract_video_id(input: &str) -> Option<VideoId> {
    let input = input.trim();

    if let Some(id) = YT_URL_RE
        .captures(input)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str())
    {
        return Some(VideoId::new_unchecked(id));
    }

    BARE_ID_RE
        .is_match(input)
        .then(|| VideoId::new_unchecked(input))
}

/// Parses a `fmt=json3` timed text body into ordered transcript segments.
///
/// Events carrying no text (window setup, bare line breaks) are skipped.
#[tracing::instrument(skip_all)]
pub fn parse_timed_text(body: &str) -> Result<Vec<TranscriptSegment>, Error> {
    let timed_text = serde_json::from_str::<TimedText>(body)?;

    let segments = timed_text
        .events
        .into_iter()
        .filter_map(|event| {
            let text = event
                .segs?
                .into_iter()
                .map(|seg| seg.utf8)
                .collect::<String>()
                .trim()
                .to_string();

            if text.is_empty() {
                return None;
            }

            Some(TranscriptSegment {
                text,
                start: event.t_start_ms as f64 / 1000.0,
                duration: event.d_duration_ms as f64 / 1000.0,
            })
        })
        .collect();

    Ok(segments)
}

/// The html of a YouTube watch page
pub struct YtHtmlDocument(String);

impl Deref for YtHtmlDocument {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl YtHtmlDocument {
    pub fn new(doc: String) -> Self {
        YtHtmlDocument(doc)
    }

    /// The key the page uses for its own Innertube calls
    pub fn innertube_api_key(&self) -> Result<&str, Error> {
        INNERTUBE_API_KEY_RE
            .captures(self)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str())
            .ok_or(Error::ParseError(
                "Failed to extract INNERTUBE_API_KEY from the watch page",
            ))
    }

    /// YouTube serves a reCAPTCHA interstitial instead of the watch page
    /// to addresses it has flagged
    pub fn is_request_blocked(&self) -> bool {
        self.contains(r#"class="g-recaptcha""#)
    }
}

impl From<String> for YtHtmlDocument {
    fn from(value: String) -> Self {
        YtHtmlDocument(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "dQw4w9WgXcQ";

    #[test]
    fn test_all_url_shapes_extract_the_same_id() {
        let inputs = [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "dQw4w9WgXcQ",
            "https://www.youtube.com/v/dQw4w9WgXcQ",
            "https://youtube.com/shorts/dQw4w9WgXcQ",
            "https://m.youtube.com/watch?v=dQw4w9WgXcQ&t=42s",
            "https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ?si=abcdef",
            "  dQw4w9WgXcQ\n",
        ];

        for input in inputs {
            let id = extract_video_id(input);
            assert_eq!(
                id.as_deref(),
                Some(ID),
                "Failed to extract id from {input:?}"
            );
        }
    }

    #[test]
    fn test_any_eleven_id_characters_form_a_bare_id() {
        // ids are opaque, so word-like strings of the right shape pass
        for input in ["not-a-video", "abcdefghijk", "a-b_c-d_e-f"] {
            assert_eq!(extract_video_id(input).as_deref(), Some(input));
        }
    }

    #[test]
    fn test_unrecognized_input_yields_none() {
        let inputs = [
            "",
            "not a url",
            "https://vimeo.com/123456789",
            "https://www.youtube.com/watch?v=short",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQtoolong",
            "https://youtu.be/",
            "dQw4w9WgXc",
            "dQw4w9WgXcQQ",
            "dQw4w9 WgXcQ",
            "not a video",
        ];

        for input in inputs {
            assert!(
                extract_video_id(input).is_none(),
                "Expected no id for {input:?}"
            );
        }
    }

    #[test]
    fn test_from_str_reports_invalid_input() {
        let err = "https://example.com".parse::<VideoId>().unwrap_err();
        assert_eq!(err.kind, crate::TranscriptErrorKind::InvalidInput);

        let id = "https://youtu.be/dQw4w9WgXcQ".parse::<VideoId>().unwrap();
        assert_eq!(id.as_str(), ID);
    }

    #[test]
    fn test_innertube_key_extraction() {
        let html = r#"<script>ytcfg.set({"INNERTUBE_API_KEY":"AIzaSyA-test_key","INNERTUBE_CLIENT_NAME":"WEB"});</script>"#;
        let doc = YtHtmlDocument::from(html.to_string());
        assert_eq!(doc.innertube_api_key().unwrap(), "AIzaSyA-test_key");

        let doc = YtHtmlDocument::new("<html><body>nothing</body></html>".into());
        assert!(matches!(doc.innertube_api_key(), Err(Error::ParseError(_))));
    }

    #[test]
    fn test_recaptcha_page_is_blocked() {
        let doc = YtHtmlDocument::new(
            r#"<form><div class="g-recaptcha" data-sitekey="x"></div></form>"#.into(),
        );
        assert!(doc.is_request_blocked());

        let doc = YtHtmlDocument::new(r#"<div class="watch"></div>"#.into());
        assert!(!doc.is_request_blocked());
    }

    #[test]
    fn test_parse_timed_text() {
        let body = r#"{
            "wireMagic": "pb3",
            "events": [
                {"tStartMs": 0, "dDurationMs": 250000, "id": 1, "wpWinPosId": 1},
                {"tStartMs": 1360, "dDurationMs": 1680, "segs": [{"utf8": "[Music]"}]},
                {"tStartMs": 18800, "dDurationMs": 3960, "segs": [{"utf8": "we're no strangers"}, {"utf8": " to love"}]},
                {"tStartMs": 21000, "dDurationMs": 10, "segs": [{"utf8": "\n"}]},
                {"tStartMs": 22640, "dDurationMs": 4200, "segs": [{"utf8": "you know the rules"}]}
            ]
        }"#;

        let segments = parse_timed_text(body).expect("Failed to parse timed text");
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].text, "[Music]");
        assert_eq!(segments[0].start, 1.36);
        assert_eq!(segments[0].duration, 1.68);
        assert_eq!(segments[1].text, "we're no strangers to love");
        assert_eq!(segments[2].start, 22.64);
    }

    #[test]
    fn test_parse_timed_text_rejects_garbage() {
        assert!(matches!(parse_timed_text("<xml/>"), Err(Error::Json(_))));
    }
}
