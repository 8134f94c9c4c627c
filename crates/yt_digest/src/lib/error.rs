use std::fmt;

use serde::Serialize;

/// Errors raised while parsing YouTube payloads
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Parse error: {0}")]
    ParseError(&'static str),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptErrorKind {
    InvalidInput,
    NoTranscriptAvailable,
    RequestBlocked,
    Unknown,
}

impl fmt::Display for TranscriptErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TranscriptErrorKind::InvalidInput => "invalid input",
            TranscriptErrorKind::NoTranscriptAvailable => "no transcript available",
            TranscriptErrorKind::RequestBlocked => "request blocked",
            TranscriptErrorKind::Unknown => "unknown error",
        };
        f.write_str(label)
    }
}

/// A transcript fetch failure, returned to the caller rather than raised
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct TranscriptError {
    pub kind: TranscriptErrorKind,
    pub message: String,
}

impl TranscriptError {
    const BLOCKED_REMEDIATION: &str = "YouTube is blocking requests from this IP address. \
        This usually happens on cloud provider networks (AWS, GCP, Azure, ...). \
        Run the fetcher from a residential network or route it through a proxy, \
        and wait before trying again.";

    pub fn new(kind: TranscriptErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_input(input: &str) -> Self {
        Self::new(
            TranscriptErrorKind::InvalidInput,
            format!("Invalid YouTube URL or video ID: {input:?}"),
        )
    }

    pub fn no_transcript(video_id: &str) -> Self {
        Self::new(
            TranscriptErrorKind::NoTranscriptAvailable,
            format!("No transcripts available for video {video_id}"),
        )
    }

    /// Blocked requests always carry the remediation text
    pub fn request_blocked(detail: impl fmt::Display) -> Self {
        Self::new(
            TranscriptErrorKind::RequestBlocked,
            format!("{detail}. {}", Self::BLOCKED_REMEDIATION),
        )
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(TranscriptErrorKind::Unknown, message)
    }
}

impl From<reqwest::Error> for TranscriptError {
    fn from(e: reqwest::Error) -> Self {
        TranscriptError::unknown(format!("HTTP error: {e}"))
    }
}

impl From<Error> for TranscriptError {
    fn from(e: Error) -> Self {
        TranscriptError::unknown(e.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryErrorKind {
    AuthError,
    NetworkError,
    MalformedResponse,
    Unknown,
}

impl fmt::Display for SummaryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SummaryErrorKind::AuthError => "authentication error",
            SummaryErrorKind::NetworkError => "network error",
            SummaryErrorKind::MalformedResponse => "malformed response",
            SummaryErrorKind::Unknown => "unknown error",
        };
        f.write_str(label)
    }
}

/// A summarization failure with a human readable message
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct SummaryError {
    pub kind: SummaryErrorKind,
    pub message: String,
}

impl SummaryError {
    pub fn new(kind: SummaryErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(SummaryErrorKind::AuthError, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(SummaryErrorKind::MalformedResponse, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(SummaryErrorKind::Unknown, message)
    }
}

impl From<reqwest::Error> for SummaryError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SummaryError::new(SummaryErrorKind::NetworkError, format!("Request timed out: {e}"))
        } else if e.is_decode() {
            SummaryError::malformed(format!("Failed to decode response: {e}"))
        } else {
            SummaryError::new(SummaryErrorKind::NetworkError, format!("HTTP error: {e}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocked_error_carries_remediation() {
        let err = TranscriptError::request_blocked("YouTube returned a reCAPTCHA page");
        assert_eq!(err.kind, TranscriptErrorKind::RequestBlocked);
        assert!(err.message.starts_with("YouTube returned a reCAPTCHA page."));
        assert!(err.message.contains("proxy"));
    }

    #[test]
    fn kinds_serialize_as_snake_case() {
        let err = SummaryError::auth("missing key");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "auth_error");
        assert_eq!(json["message"], "missing key");
    }
}
