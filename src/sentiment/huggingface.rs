//! Hosted text-classification model.
//!
//! Sends each text to a model-hosting inference endpoint and reads back the
//! per-label scores. The default model is a Portuguese/Spanish sentiment
//! classifier that answers with `NEG`, `NEU` and `POS`.

use super::{ScoreOutput, SentimentScorer, canonical_bucket};
use crate::error::{Error, Result};
use crate::utils::truncate_for_log;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

pub const HF_INFERENCE_URL: &str = "https://router.huggingface.co/hf-inference/models";
pub const DEFAULT_MODEL: &str = "pysentimiento/robertuito-sentiment-analysis";

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

/// The endpoint answers `[[{label, score}, ..]]` for a single input, but
/// some deployments drop the outer list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassificationResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

pub struct HuggingFaceScorer {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl HuggingFaceScorer {
    pub fn new(model: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/{}", HF_INFERENCE_URL, model.trim_matches('/')),
            token,
        })
    }

    /// Override the full model endpoint (self-hosted inference servers).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

impl fmt::Debug for HuggingFaceScorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HuggingFaceScorer")
            .field("client", &"<reqwest::Client>")
            .field("endpoint", &self.endpoint)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl SentimentScorer for HuggingFaceScorer {
    #[instrument(level = "debug", skip_all, fields(endpoint = %self.endpoint, bytes = text.len()))]
    async fn score(&self, text: &str) -> Result<ScoreOutput> {
        let t0 = Instant::now();
        let body = json!({
            "inputs": text,
            "options": { "wait_for_model": true },
        });

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        let status = response.status();
        let payload = response.text().await?;
        if !status.is_success() {
            return Err(Error::Status {
                status,
                body: truncate_for_log(&payload, 300),
            });
        }

        let out = parse_classification(&payload)?;
        debug!(
            label = %out.label,
            elapsed_ms = t0.elapsed().as_millis(),
            "Classified text"
        );
        Ok(out)
    }
}

/// Turn a classification payload into a [`ScoreOutput`], picking the
/// highest-scoring label as the winner.
fn parse_classification(body: &str) -> Result<ScoreOutput> {
    let scores = match serde_json::from_str::<ClassificationResponse>(body)? {
        ClassificationResponse::Nested(mut outer) => {
            if outer.is_empty() {
                Vec::new()
            } else {
                outer.swap_remove(0)
            }
        }
        ClassificationResponse::Flat(scores) => scores,
    };

    let best = scores
        .iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .ok_or_else(|| Error::Model("classifier returned no labels".to_string()))?;

    Ok(ScoreOutput {
        label: canonical_bucket(&best.label),
        probabilities: scores
            .iter()
            .map(|s| (canonical_bucket(&s.label), s.score))
            .collect(),
    })
}
