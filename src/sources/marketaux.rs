//! Marketaux financial news API.
//!
//! Queries the [`/v1/news/all`](https://www.marketaux.com/documentation)
//! endpoint, which can search by free text, by ticker symbols, or both.
//! Similar stories are grouped server-side and entity filtering is switched
//! on, so results lean towards articles that actually mention the tickers.

use super::NewsSource;
use crate::error::{Error, Result};
use crate::models::{NewsQuery, RawArticle};
use crate::utils::truncate_for_log;
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument};
use url::Url;

pub const MARKETAUX_URL: &str = "https://api.marketaux.com/v1/news/all";

/// Envelope of a `/news/all` response. Only `data` is used.
#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    data: Vec<RawArticle>,
}

pub struct MarketauxSource {
    client: Client,
    base_url: String,
    api_token: String,
    limit: usize,
}

impl MarketauxSource {
    /// Build a source with a client that gives up after `timeout`.
    pub fn new(api_token: impl Into<String>, limit: usize, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: MARKETAUX_URL.to_string(),
            api_token: api_token.into(),
            limit,
        })
    }

    /// Point the source at a different endpoint (a proxy or a mirror).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Full request URL for `query`, credential included.
    pub fn request_url(&self, query: &NewsQuery) -> Result<Url> {
        let mut params: Vec<(&str, String)> = vec![
            ("api_token", self.api_token.clone()),
            ("language", query.language.clone()),
            ("filter_entities", "true".to_string()),
            ("group_similar", "true".to_string()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(keyword) = query.keyword.as_deref().filter(|k| !k.is_empty()) {
            params.push(("search", keyword.to_string()));
        }
        if !query.symbols.is_empty() {
            params.push(("symbols", query.symbols.join(",")));
        }
        Ok(Url::parse_with_params(&self.base_url, &params)?)
    }

    /// Transport errors are stripped of their URL, which carries the token.
    async fn try_fetch(&self, query: &NewsQuery) -> Result<Vec<RawArticle>> {
        let url = self.request_url(query)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Http(e.without_url()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Status {
                status,
                body: truncate_for_log(&body, 300),
            });
        }
        let body = response
            .text()
            .await
            .map_err(|e| Error::Http(e.without_url()))?;
        parse_response(&body)
    }
}

impl fmt::Debug for MarketauxSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarketauxSource")
            .field("client", &"<reqwest::Client>")
            .field("base_url", &self.base_url)
            .field("api_token", &"<redacted>")
            .field("limit", &self.limit)
            .finish()
    }
}

impl NewsSource for MarketauxSource {
    #[instrument(level = "info", skip_all, fields(keyword = ?query.keyword, symbols = ?query.symbols, language = %query.language))]
    async fn fetch(&self, query: &NewsQuery) -> Vec<RawArticle> {
        let t0 = Instant::now();
        info!(base_url = %self.base_url, "Fetching news from Marketaux");
        match self.try_fetch(query).await {
            Ok(articles) => {
                info!(
                    count = articles.len(),
                    elapsed_ms = t0.elapsed().as_millis(),
                    "Fetched Marketaux articles"
                );
                articles
            }
            Err(e) => {
                error!(
                    error = %e,
                    elapsed_ms = t0.elapsed().as_millis(),
                    "Failed to fetch news from Marketaux; continuing with no articles"
                );
                Vec::new()
            }
        }
    }
}

/// Read the `data` array from a response body.
fn parse_response(body: &str) -> Result<Vec<RawArticle>> {
    let parsed: NewsResponse = serde_json::from_str(body)?;
    debug!(count = parsed.data.len(), "Parsed Marketaux response");
    Ok(parsed.data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> MarketauxSource {
        MarketauxSource::new("secret", 100, Duration::from_secs(10)).unwrap()
    }

    fn params(url: &Url) -> Vec<(String, String)> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    fn param(url: &Url, key: &str) -> Option<String> {
        params(url).into_iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    #[test]
    fn test_request_url_with_keyword() {
        let query = NewsQuery {
            keyword: Some("inflação".to_string()),
            ..Default::default()
        };
        let url = source().request_url(&query).unwrap();
        assert!(url.as_str().starts_with(MARKETAUX_URL));
        assert_eq!(param(&url, "api_token").as_deref(), Some("secret"));
        assert_eq!(param(&url, "language").as_deref(), Some("pt"));
        assert_eq!(param(&url, "search").as_deref(), Some("inflação"));
        assert_eq!(param(&url, "filter_entities").as_deref(), Some("true"));
        assert_eq!(param(&url, "group_similar").as_deref(), Some("true"));
        assert_eq!(param(&url, "limit").as_deref(), Some("100"));
        assert_eq!(param(&url, "symbols"), None);
    }

    #[test]
    fn test_request_url_with_symbols() {
        let query = NewsQuery {
            keyword: None,
            symbols: vec!["TSLA".to_string(), "AAPL".to_string()],
            language: "en".to_string(),
        };
        let url = source().request_url(&query).unwrap();
        assert_eq!(param(&url, "symbols").as_deref(), Some("TSLA,AAPL"));
        assert_eq!(param(&url, "language").as_deref(), Some("en"));
        assert_eq!(param(&url, "search"), None);
    }

    #[test]
    fn test_request_url_without_filters() {
        let url = source().request_url(&NewsQuery::default()).unwrap();
        assert_eq!(param(&url, "search"), None);
        assert_eq!(param(&url, "symbols"), None);
    }

    #[test]
    fn test_debug_redacts_token() {
        let rendered = format!("{:?}", source());
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_parse_response() {
        let body = r#"{
            "meta": {"found": 2, "returned": 2, "limit": 100, "page": 1},
            "data": [
                {
                    "uuid": "a1",
                    "title": "Tesla beats estimates",
                    "description": "Quarterly deliveries up",
                    "snippet": "Tesla reported",
                    "url": "https://example.com/tsla",
                    "published_at": "2025-09-30T10:00:00.000000Z",
                    "entities": [{"symbol": "TSLA"}]
                },
                {"uuid": "a2", "title": null}
            ]
        }"#;
        let articles = parse_response(body).unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title.as_deref(), Some("Tesla beats estimates"));
        assert_eq!(articles[0].description.as_deref(), Some("Quarterly deliveries up"));
        assert!(articles[0].text.is_none());
        assert!(articles[1].title.is_none());
    }

    #[test]
    fn test_parse_response_without_data() {
        let articles = parse_response(r#"{"meta": {}}"#).unwrap();
        assert!(articles.is_empty());
    }

    #[test]
    fn test_parse_response_rejects_garbage() {
        assert!(parse_response("<html>rate limited</html>").is_err());
    }

    #[tokio::test]
    async fn test_fetch_failure_yields_empty() {
        // Nothing listens on port 9 on loopback; the connect fails fast.
        let src = MarketauxSource::new("secret", 10, Duration::from_secs(2))
            .unwrap()
            .with_base_url("http://127.0.0.1:9/v1/news/all");
        let articles = src.fetch(&NewsQuery::default()).await;
        assert!(articles.is_empty());
    }

    #[tokio::test]
    async fn test_transport_error_hides_token() {
        let src = MarketauxSource::new("SUPERSECRET", 10, Duration::from_secs(2))
            .unwrap()
            .with_base_url("http://127.0.0.1:9/v1/news/all");
        let err = src.try_fetch(&NewsQuery::default()).await.unwrap_err();
        assert!(matches!(err, Error::Http(_)));
        let rendered = err.to_string();
        assert!(!rendered.contains("SUPERSECRET"));
        assert!(!rendered.contains("api_token"));
    }

    /// Serve `connections` requests on loopback, each answered with `response`.
    async fn serve_canned(response: &'static str, connections: usize) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            for _ in 0..connections {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await.unwrap();
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.unwrap();
            }
        });
        format!("http://{}/v1/news/all", addr)
    }

    #[tokio::test]
    async fn test_rejected_request_yields_empty() {
        const UNAUTHORIZED: &str = "HTTP/1.1 401 Unauthorized\r\n\
            Content-Type: application/json\r\n\
            Content-Length: 59\r\n\
            Connection: close\r\n\
            \r\n\
            {\"error\":{\"code\":\"invalid_api_token\",\"message\":\"Invalid.\"}}";
        let base_url = serve_canned(UNAUTHORIZED, 2).await;
        let src = MarketauxSource::new("wrong", 10, Duration::from_secs(5))
            .unwrap()
            .with_base_url(base_url);

        let articles = src.fetch(&NewsQuery::default()).await;
        assert!(articles.is_empty());

        let err = src.try_fetch(&NewsQuery::default()).await.unwrap_err();
        match err {
            Error::Status { status, body } => {
                assert_eq!(status.as_u16(), 401);
                assert!(body.contains("invalid_api_token"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }
}
