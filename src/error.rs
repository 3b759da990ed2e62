//! Error types shared by the news source and sentiment backends.
//!
//! None of these are fatal to a run: the news source turns them into an empty
//! result and the sentiment attacher turns them into the fallback score. They
//! exist so each backend can use `?` internally and log one precise cause.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Model error: {0}")]
    Model(String),

    #[error("LLM error: {0}")]
    Llm(String),
}

pub type Result<T> = std::result::Result<T, Error>;
