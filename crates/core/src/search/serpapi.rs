use crate::config::Settings;
use crate::domain::market::CompetitorEntry;
use crate::error::{AdvisoryError, Result};
use crate::search::SearchClient;
use anyhow::Context;
use serde::Deserialize;
use std::time::Duration;

const SERVICE: &str = "search";
const ENGINE: &str = "google";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const UNKNOWN_TITLE: &str = "Unknown";
const UNKNOWN_LINK: &str = "#";
const UNKNOWN_SNIPPET: &str = "No description available.";

#[derive(Clone)]
pub struct SerpApiClient {
    http: reqwest::Client,
    api_key: String,
    url: String,
}

impl std::fmt::Debug for SerpApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerpApiClient")
            .field("url", &self.url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl SerpApiClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let api_key = settings.require_search_api_key()?.to_string();

        let timeout_secs = std::env::var("SEARCH_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self::new(
            api_key,
            settings.search_url.clone(),
            Duration::from_secs(timeout_secs),
        )
    }

    pub fn new(api_key: String, url: String, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build search http client")?;

        Ok(Self { http, api_key, url })
    }
}

#[async_trait::async_trait]
impl SearchClient for SerpApiClient {
    async fn search(&self, query: &str) -> Result<Vec<CompetitorEntry>> {
        let res = self
            .http
            .get(&self.url)
            .query(&[
                ("engine", ENGINE),
                ("q", query),
                ("api_key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AdvisoryError::transport(SERVICE, e))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|e| AdvisoryError::transport(SERVICE, e))?;

        if !status.is_success() {
            return Err(AdvisoryError::Upstream {
                service: SERVICE,
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed = serde_json::from_str::<SearchResponse>(&text)
            .map_err(|e| AdvisoryError::malformed(SERVICE, format!("{e}: {text}")))?;

        // The API reports some failures (bad key, exhausted quota) with a 200.
        if let Some(error) = parsed.error {
            return Err(AdvisoryError::Upstream {
                service: SERVICE,
                status: status.as_u16(),
                body: error,
            });
        }

        tracing::debug!(
            query,
            results = parsed.organic_results.len(),
            "search completed"
        );

        Ok(parsed
            .organic_results
            .into_iter()
            .map(OrganicResult::into_entry)
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
}

impl OrganicResult {
    fn into_entry(self) -> CompetitorEntry {
        CompetitorEntry {
            title: self.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            link: self.link.unwrap_or_else(|| UNKNOWN_LINK.to_string()),
            snippet: self.snippet.unwrap_or_else(|| UNKNOWN_SNIPPET.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn client(server: &mockito::ServerGuard) -> SerpApiClient {
        SerpApiClient::new(
            "serp-key".to_string(),
            format!("{}/search.json", server.url()),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn organic(n: usize) -> Vec<serde_json::Value> {
        (1..=n)
            .map(|i| {
                json!({
                    "position": i,
                    "title": format!("Startup {i}"),
                    "link": format!("https://startup{i}.example"),
                    "snippet": format!("Snippet {i}"),
                })
            })
            .collect()
    }

    #[tokio::test]
    async fn sends_engine_query_and_key_and_keeps_rank_order() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/search.json")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("engine".into(), "google".into()),
                Matcher::UrlEncoded("q".into(), "fintech startups in Lagos".into()),
                Matcher::UrlEncoded("api_key".into(), "serp-key".into()),
            ]))
            .with_status(200)
            .with_body(json!({"organic_results": organic(3)}).to_string())
            .expect(1)
            .create_async()
            .await;

        let results = client(&server)
            .search("fintech startups in Lagos")
            .await
            .unwrap();

        let titles: Vec<_> = results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["Startup 1", "Startup 2", "Startup 3"]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn returns_every_organic_result_in_order() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/search.json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({"organic_results": organic(8)}).to_string())
            .create_async()
            .await;

        let results = client(&server).search("anything").await.unwrap();
        assert_eq!(results.len(), 8);
        assert_eq!(results[7].title, "Startup 8");
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let client = SerpApiClient::new(
            "serp-key".to_string(),
            "http://127.0.0.1:1/search.json".to_string(),
            Duration::from_millis(500),
        )
        .unwrap();

        let err = client.search("anything").await.unwrap_err();
        assert!(matches!(err, AdvisoryError::Transport { .. }));
    }

    #[tokio::test]
    async fn missing_fields_get_placeholders_and_missing_list_is_empty() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/search.json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({"organic_results": [{"title": "Only a title"}]}).to_string())
            .create_async()
            .await;

        let results = client(&server).search("q").await.unwrap();
        assert_eq!(
            results,
            vec![CompetitorEntry {
                title: "Only a title".to_string(),
                link: UNKNOWN_LINK.to_string(),
                snippet: UNKNOWN_SNIPPET.to_string(),
            }]
        );

        let parsed: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.organic_results.is_empty());
    }

    #[tokio::test]
    async fn error_payload_and_bad_status_fail_the_call() {
        let mut server = mockito::Server::new_async().await;
        let _ok_with_error = server
            .mock("GET", "/search.json")
            .match_query(Matcher::UrlEncoded("q".into(), "quota".into()))
            .with_status(200)
            .with_body(r#"{"error":"Your account has run out of searches."}"#)
            .create_async()
            .await;
        let _server_error = server
            .mock("GET", "/search.json")
            .match_query(Matcher::UrlEncoded("q".into(), "boom".into()))
            .with_status(503)
            .with_body("unavailable")
            .create_async()
            .await;

        let err = client(&server).search("quota").await.unwrap_err();
        assert!(err.to_string().contains("run out of searches"));

        let err = client(&server).search("boom").await.unwrap_err();
        assert!(matches!(err, AdvisoryError::Upstream { status: 503, .. }));
    }
}
