use crate::{
    llm::{config::LlmConfig, Summarizer},
    yt::{transcript::TranscriptFetcher, CaptionSource, SubscriptionFeed},
    ReportGenerator,
};

pub struct ReportBuilder<F = (), S = (), C = ()> {
    feed: F,
    summarizer: S,
    caption_source: C,
    config: LlmConfig,
    languages: Vec<String>,
    videos: Vec<String>,
}

impl ReportBuilder {
    pub fn new(config: LlmConfig) -> Self {
        Self {
            feed: (),
            summarizer: (),
            caption_source: (),
            config,
            languages: Vec::new(),
            videos: Vec::new(),
        }
    }
}

impl<F, S, C> ReportBuilder<F, S, C> {
    pub fn feed<F2: SubscriptionFeed + Send + Sync + 'static>(
        self,
        feed: F2,
    ) -> ReportBuilder<F2, S, C> {
        ReportBuilder {
            feed,
            summarizer: self.summarizer,
            caption_source: self.caption_source,
            config: self.config,
            languages: self.languages,
            videos: self.videos,
        }
    }

    pub fn summarizer<S2: Summarizer + Send + Sync + 'static>(
        self,
        summarizer: S2,
    ) -> ReportBuilder<F, S2, C> {
        ReportBuilder {
            feed: self.feed,
            summarizer,
            caption_source: self.caption_source,
            config: self.config,
            languages: self.languages,
            videos: self.videos,
        }
    }

    pub fn caption_source<C2: CaptionSource + Send + Sync + 'static>(
        self,
        caption_source: C2,
    ) -> ReportBuilder<F, S, C2> {
        ReportBuilder {
            feed: self.feed,
            summarizer: self.summarizer,
            caption_source,
            config: self.config,
            languages: self.languages,
            videos: self.videos,
        }
    }

    /// Preferred caption languages, in order
    pub fn languages<L: Into<String>>(mut self, languages: impl IntoIterator<Item = L>) -> Self {
        self.languages = languages.into_iter().map(Into::into).collect();
        self
    }

    /// Video URLs or ids to transcribe and summarize alongside the updates
    pub fn videos<V: Into<String>>(mut self, videos: impl IntoIterator<Item = V>) -> Self {
        self.videos = videos.into_iter().map(Into::into).collect();
        self
    }
}

impl<F, S, C> ReportBuilder<F, S, C>
where
    F: SubscriptionFeed + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
    C: CaptionSource + Send + Sync + 'static,
{
    pub fn build(self) -> ReportGenerator<F, S, C> {
        ReportGenerator {
            feed: self.feed,
            summarizer: self.summarizer,
            fetcher: TranscriptFetcher::new(self.caption_source).with_languages(self.languages),
            config: self.config,
            videos: self.videos,
        }
    }
}
