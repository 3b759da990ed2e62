//! # Financial News Sentiment
//!
//! Fetches financial news for a keyword and/or a set of ticker symbols,
//! scores every article's sentiment, and writes an aggregated markdown
//! report.
//!
//! ## Usage
//!
//! ```sh
//! MARKETAUX_API_KEY=... fin_news_sentiment --keyword inflação -o relatorio_inflacao.md
//! MARKETAUX_API_KEY=... fin_news_sentiment --symbols TSLA,AAPL --language en
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Fetching**: One request to the news API for the query
//! 2. **Normalizing**: Raw records become canonical articles with safe defaults
//! 3. **Scoring**: Each article's text is classified (bounded concurrency)
//! 4. **Aggregating**: Undated articles dropped, the rest sorted and counted
//! 5. **Output**: Markdown report (and optionally JSON) written to disk

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod aggregate;
mod cli;
mod error;
mod models;
mod normalize;
mod outputs;
mod pipeline;
mod sentiment;
mod sources;
mod utils;

use cli::{Cli, ScorerKind};
use sentiment::huggingface::HuggingFaceScorer;
use sentiment::llm::LlmScorer;
use sources::marketaux::MarketauxSource;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("fin_news_sentiment starting up");

    let args = Cli::parse();
    debug!(
        keyword = ?args.keyword,
        symbols = ?args.symbols,
        language = %args.language,
        scorer = ?args.scorer,
        "Parsed CLI arguments"
    );

    let timeout = Duration::from_secs(args.timeout_secs);
    let api_token = args.api_token.clone().unwrap_or_else(|| {
        warn!("MARKETAUX_API_KEY is not set; the news request will be rejected");
        String::new()
    });
    let source =
        MarketauxSource::new(api_token, args.limit, timeout)?.with_base_url(args.news_url.clone());
    let opts = args.run_options();

    let view = match args.scorer {
        ScorerKind::HuggingFace => {
            let mut scorer = HuggingFaceScorer::new(
                &args.hf_model,
                args.hf_token.clone(),
                Duration::from_secs(args.score_timeout_secs),
            )?;
            if let Some(endpoint) = &args.hf_endpoint {
                scorer = scorer.with_endpoint(endpoint.clone());
            }
            info!(model = %args.hf_model, "Using hosted classifier");
            pipeline::run(&source, &scorer, &opts).await?
        }
        ScorerKind::Llm => {
            let scorer = LlmScorer::load(args.config.as_deref(), &args.template).await?;
            info!(template = %args.template, "Using LLM classifier");
            pipeline::run(&source, &scorer, &opts).await?
        }
    };

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        received = view.received,
        reported = view.total,
        path = %opts.output_filename.display(),
        "Execution complete"
    );

    Ok(())
}
