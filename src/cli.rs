//! Command-line interface definitions.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Credentials can come from flags or environment variables.

use crate::models::NewsQuery;
use crate::pipeline::{DEFAULT_OUTPUT_FILENAME, DEFAULT_TITLE, RunOptions};
use crate::sentiment::{huggingface, llm};
use crate::sources::marketaux;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Which sentiment backend scores the articles.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScorerKind {
    /// Hosted text-classification model
    HuggingFace,
    /// OpenAI-compatible LLM configured through awful_aj
    Llm,
}

/// Command-line arguments for one report run.
///
/// # Examples
///
/// ```sh
/// # Portuguese news about inflation
/// fin_news_sentiment --keyword inflação -o relatorio_inflacao.md -t "Inflation sentiment"
///
/// # English news about two tickers
/// fin_news_sentiment --symbols TSLA,AAPL --language en -o stocks.md
///
/// # Score with an LLM instead of the hosted classifier
/// fin_news_sentiment -k petrobras --scorer llm --template sentiment_classifier
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Free-text search keyword
    #[arg(short, long)]
    pub keyword: Option<String>,

    /// Ticker symbols to search for, comma separated
    #[arg(short, long, value_delimiter = ',')]
    pub symbols: Vec<String>,

    /// Language code of the news to fetch
    #[arg(short, long, default_value = "pt")]
    pub language: String,

    /// Path of the markdown report (overwritten)
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILENAME)]
    pub output_filename: PathBuf,

    /// Report title
    #[arg(short, long, default_value = DEFAULT_TITLE)]
    pub title: String,

    /// Also write the aggregated report as JSON to this path
    #[arg(long)]
    pub json_output: Option<PathBuf>,

    /// Marketaux API token
    #[arg(long, env = "MARKETAUX_API_KEY", hide_env_values = true)]
    pub api_token: Option<String>,

    /// News API endpoint
    #[arg(long, default_value = marketaux::MARKETAUX_URL)]
    pub news_url: String,

    /// Maximum number of articles to request
    #[arg(long, default_value_t = 100)]
    pub limit: usize,

    /// HTTP timeout for the news fetch, in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// HTTP timeout for each hosted classifier call, in seconds
    #[arg(long, default_value_t = 60)]
    pub score_timeout_secs: u64,

    /// Sentiment backend
    #[arg(long, value_enum, default_value_t = ScorerKind::HuggingFace)]
    pub scorer: ScorerKind,

    /// Text-classification model for the hosted backend
    #[arg(long, env = "HF_SENTIMENT_MODEL", default_value = huggingface::DEFAULT_MODEL)]
    pub hf_model: String,

    /// Access token for the hosted backend
    #[arg(long, env = "HF_API_TOKEN", hide_env_values = true)]
    pub hf_token: Option<String>,

    /// Full inference endpoint, replacing the hosted model URL
    #[arg(long, env = "HF_ENDPOINT")]
    pub hf_endpoint: Option<String>,

    /// Optional path to the LLM config.yaml file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Chat template used by the LLM backend
    #[arg(long, default_value = llm::DEFAULT_TEMPLATE)]
    pub template: String,

    /// Maximum number of articles scored concurrently
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u16).range(1..))]
    pub score_concurrency: u16,
}

impl Cli {
    pub fn query(&self) -> NewsQuery {
        NewsQuery {
            keyword: self.keyword.clone().filter(|k| !k.trim().is_empty()),
            symbols: self
                .symbols
                .iter()
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect(),
            language: self.language.clone(),
        }
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            query: self.query(),
            output_filename: self.output_filename.clone(),
            title: self.title.clone(),
            json_output: self.json_output.clone(),
            score_concurrency: self.score_concurrency as usize,
        }
    }
}
