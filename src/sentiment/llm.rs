//! LLM-backed sentiment scoring.
//!
//! Uses the `awful_aj` client to send each text through a chat template that
//! instructs an OpenAI-compatible model to answer with a JSON verdict:
//!
//! ```json
//! {"label": "POS", "probabilities": {"NEG": 0.05, "NEU": 0.15, "POS": 0.80}}
//! ```
//!
//! The template (by default `sentiment_classifier`) lives in the `awful_aj`
//! config directory alongside `config.yaml`.

use super::{ScoreOutput, SentimentScorer, canonical_bucket};
use crate::error::{Error, Result};
use crate::utils::{looks_truncated, truncate_for_log};
use awful_aj::api::ask;
use awful_aj::{config, config::AwfulJadeConfig, config_dir, template, template::ChatTemplate};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

pub const DEFAULT_TEMPLATE: &str = "sentiment_classifier";

#[derive(Debug, Deserialize)]
struct Verdict {
    label: String,
    #[serde(default)]
    probabilities: HashMap<String, f64>,
}

pub struct LlmScorer {
    config: AwfulJadeConfig,
    template: ChatTemplate,
}

impl LlmScorer {
    /// Load the LLM configuration and the chat template.
    ///
    /// `config_path` defaults to `config.yaml` in the `awful_aj` config dir.
    #[instrument(level = "info", skip_all, fields(template = %template_name))]
    pub async fn load(
        config_path: Option<&str>,
        template_name: &str,
    ) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        let template = template::load_template(template_name).await?;
        info!("Loaded sentiment template");

        let config_path = match config_path {
            Some(path) => path.to_string(),
            None => config_dir()?.join("config.yaml").to_string_lossy().into_owned(),
        };
        let config = config::load_config(&config_path)
            .map_err(|e| format!("failed to load LLM config {config_path}: {e}"))?;
        info!(%config_path, "Loaded LLM configuration");

        Ok(Self { config, template })
    }
}

impl fmt::Debug for LlmScorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmScorer").finish_non_exhaustive()
    }
}

impl SentimentScorer for LlmScorer {
    #[instrument(level = "debug", skip_all, fields(bytes = text.len()))]
    async fn score(&self, text: &str) -> Result<ScoreOutput> {
        let t0 = Instant::now();
        let reply = ask(&self.config, text.to_string(), &self.template, None, None)
            .await
            .map_err(|e| Error::Llm(e.to_string()))?;
        debug!(elapsed_ms = t0.elapsed().as_millis(), "LLM replied");
        parse_verdict(&reply)
    }
}

/// Parse the model's JSON verdict, tolerating a markdown code fence around it.
fn parse_verdict(reply: &str) -> Result<ScoreOutput> {
    let body = strip_code_fence(reply);
    let verdict: Verdict = serde_json::from_str(body).map_err(|e| {
        if looks_truncated(&e) {
            warn!(reply_preview = %truncate_for_log(reply, 300), "LLM verdict was cut off");
            Error::Model(format!("truncated verdict: {e}"))
        } else {
            Error::Json(e)
        }
    })?;

    Ok(ScoreOutput {
        label: canonical_bucket(&verdict.label),
        probabilities: verdict
            .probabilities
            .into_iter()
            .map(|(k, v)| (canonical_bucket(&k), v))
            .collect(),
    })
}

fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    match trimmed.strip_prefix("```") {
        Some(rest) => {
            let rest = rest.strip_prefix("json").unwrap_or(rest);
            rest.strip_suffix("```").unwrap_or(rest).trim()
        }
        None => trimmed,
    }
}
