use std::{path::PathBuf, process::ExitCode};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

use yt_digest::{
    available_models, summarize,
    tracing::init_tracing_subscriber,
    yt::{
        scraper::Scraper,
        subscriptions::{JsonFileFeed, StaticFeed},
        transcript::DEFAULT_LANGUAGES,
        SubscriptionFeed,
    },
    LlmClient, LlmConfig, ReportBuilder, TranscriptFetcher,
};

#[derive(Parser)]
#[command(
    name = "yt-digest",
    about = "Fetch YouTube transcripts and summarize them with an LLM"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch transcripts for one or more videos
    Transcript {
        /// YouTube URLs or video IDs
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Preferred caption language, may be repeated (default: en, en-US, en-GB)
        #[arg(long = "lang")]
        languages: Vec<String>,

        /// Print the full results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Summarize a video transcript or a text file
    Summarize {
        /// YouTube URL or video ID
        #[arg(required_unless_present = "file", conflicts_with = "file")]
        input: Option<String>,

        /// Summarize the contents of this file instead of a video
        #[arg(long)]
        file: Option<PathBuf>,

        /// Preferred caption language, may be repeated
        #[arg(long = "lang")]
        languages: Vec<String>,

        /// Content type label used to pick the prompt
        #[arg(long)]
        content_type: Option<String>,

        /// Model to use, overrides LLM_MODEL
        #[arg(long)]
        model: Option<String>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Summarize subscription updates and, optionally, videos into a report
    Report {
        /// JSON file with an array of subscription updates
        #[arg(long, env = "YT_DIGEST_UPDATES")]
        updates: Option<PathBuf>,

        /// Video URL or ID to include, may be repeated
        #[arg(long = "video")]
        videos: Vec<String>,

        /// Preferred caption language, may be repeated
        #[arg(long = "lang")]
        languages: Vec<String>,

        /// Model to use, overrides LLM_MODEL
        #[arg(long)]
        model: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List known model identifiers and the current configuration
    Models,
}

/// `--model` stands in for `LLM_MODEL` so the provider key fallback follows it
fn llm_config(model: Option<String>) -> LlmConfig {
    LlmConfig::from_lookup(|key| match (&model, key) {
        (Some(model), LlmConfig::MODEL_ENV) => Some(model.clone()),
        _ => std::env::var(key).ok(),
    })
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run_report<F: SubscriptionFeed + Send + Sync + 'static>(
    feed: F,
    config: LlmConfig,
    videos: Vec<String>,
    languages: Vec<String>,
    json: bool,
) -> anyhow::Result<bool> {
    let summarizer = LlmClient::from_config(&config).context("Cannot build the LLM client")?;

    let generator = ReportBuilder::new(config)
        .feed(feed)
        .summarizer(summarizer)
        .caption_source(Scraper::default())
        .languages(languages)
        .videos(videos)
        .build();

    let report = generator.run().await?;

    if json {
        print_json(&report)?;
    } else {
        print!("{}", report.render());
    }

    Ok(report.summary.success)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    // returning, rather than exiting, lets the sentry guard flush on drop
    match run(cli).await? {
        true => Ok(ExitCode::SUCCESS),
        false => Ok(ExitCode::FAILURE),
    }
}

/// Runs one subcommand, reporting whether everything it asked for succeeded
async fn run(cli: Cli) -> anyhow::Result<bool> {
    let succeeded = match cli.command {
        Command::Transcript {
            inputs,
            languages,
            json,
        } => {
            let fetcher = TranscriptFetcher::new(Scraper::default()).with_languages(languages);
            let results = fetcher.fetch_many(&inputs).await;

            if json {
                print_json(&results)?;
            } else {
                for result in &results {
                    println!("{}", result.describe());
                    if let Some(transcript) = &result.transcript {
                        println!("\n{transcript}\n");
                    }
                }
            }

            results.iter().all(|r| r.success)
        }
        Command::Summarize {
            input,
            file,
            languages,
            content_type,
            model,
            json,
        } => {
            let config = llm_config(model);

            let (text, default_content_type) = match (file, input) {
                (Some(path), _) => {
                    let text = tokio::fs::read_to_string(&path)
                        .await
                        .with_context(|| format!("Failed to read {}", path.display()))?;
                    (text, "text")
                }
                (None, Some(input)) => {
                    let fetcher =
                        TranscriptFetcher::new(Scraper::default()).with_languages(languages);
                    let transcript = fetcher.fetch(&input).await;
                    match transcript.transcript {
                        Some(text) if transcript.success => (text, "transcript"),
                        _ => {
                            eprintln!("{}", transcript.describe());
                            return Ok(false);
                        }
                    }
                }
                (None, None) => anyhow::bail!("Either an input or --file is required"),
            };

            let content_type = content_type.as_deref().unwrap_or(default_content_type);
            let result = summarize(&text, &config, content_type).await;

            if json {
                print_json(&result)?;
            } else if let Some(error) = &result.error {
                eprintln!("Failed to generate summary: {error}");
            } else {
                println!("{}", result.summary);
                eprintln!(
                    "\nModel: {} | Tokens used: {}",
                    result.model_used, result.tokens_used
                );
            }

            result.success
        }
        Command::Report {
            updates,
            videos,
            languages,
            model,
            json,
        } => {
            let config = llm_config(model);
            match updates {
                Some(path) => {
                    run_report(JsonFileFeed::new(path), config, videos, languages, json).await?
                }
                None => {
                    tracing::warn!("No updates file given, reporting on videos only");
                    run_report(StaticFeed::default(), config, videos, languages, json).await?
                }
            }
        }
        Command::Models => {
            let config = LlmConfig::from_env();
            println!("Available models:");
            for model in available_models() {
                println!("  {model}");
            }
            println!();
            println!("Configured model: {}", config.model());
            println!(
                "Provider: {}",
                config
                    .provider()
                    .map(|p| p.name())
                    .unwrap_or("unknown")
            );
            println!("Max tokens: {}", config.max_tokens());
            println!("Temperature: {}", config.temperature());
            println!("Configured: {}", config.is_configured());
            println!(
                "Default caption languages: {}",
                DEFAULT_LANGUAGES.join(", ")
            );
            true
        }
    };

    Ok(succeeded)
}
