mod error;
pub mod llm;
pub mod parser;
mod report;
pub mod tracing;
pub mod types;
pub mod yt;

pub use error::{Error, SummaryError, SummaryErrorKind, TranscriptError, TranscriptErrorKind};
pub use llm::{
    config::LlmConfig,
    provider::{available_models, Provider},
    summarize, summarize_with, Completion, LlmClient, Summarizer, SummaryResult,
};
pub use report::{builder::ReportBuilder, Report, ReportGenerator, VideoDigest};
pub use types::{TranscriptSegment, VideoId};
pub use yt::transcript::{Transcript, TranscriptFetcher, TranscriptResult};
