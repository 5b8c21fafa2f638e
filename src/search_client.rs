//! Search service access.
//!
//! [`SearchIndex`] is the seam between the sync pipeline and the external
//! search service. [`MeiliClient`] implements it over the Meilisearch REST
//! API:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | [`configure_index`](SearchIndex::configure_index) | `POST /indexes`, then `PATCH /indexes/{uid}/settings` |
//! | [`upsert_documents`](SearchIndex::upsert_documents) | `PUT /indexes/{uid}/documents?primaryKey=id` |
//! | [`delete_document`](SearchIndex::delete_document) | `DELETE /indexes/{uid}/documents/{id}` |
//!
//! # Retry Strategy
//!
//! - HTTP 429 and 5xx → retry with exponential backoff
//! - Other 4xx → fail immediately
//! - Network errors → retry
//! - Backoff: 1s, 2s, 4s, 8s, 16s, 32s (capped at 2^5)
//!
//! Upserts are keyed by document id, so a retried push never duplicates.

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use content_gate_core::{DocumentId, IndexDocument, IndexSettings};
use reqwest::{Method, StatusCode, Url};
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::SearchConfig;

/// Write access to the search service's indexes.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Create the index if needed and apply its attribute settings.
    async fn configure_index(&self, settings: &IndexSettings) -> Result<()>;

    /// Insert or replace documents by id.
    async fn upsert_documents(&self, index: &str, documents: &[IndexDocument]) -> Result<()>;

    /// Remove one document by id. Removing an absent document is not an error.
    async fn delete_document(&self, index: &str, id: &DocumentId) -> Result<()>;
}

/// Meilisearch-compatible HTTP client.
pub struct MeiliClient {
    host: Url,
    api_key: String,
    http: reqwest::Client,
    max_retries: u32,
    base_delay: Duration,
}

impl MeiliClient {
    /// Build a client from `[search]` settings.
    ///
    /// # Errors
    ///
    /// Fails when no host is configured or the host is not a valid base URL.
    pub fn new(config: &SearchConfig) -> Result<Self> {
        if !config.is_configured() {
            bail!("search service is not configured (set MEILISEARCH_HOST or [search].host)");
        }

        let host = Url::parse(config.host.trim())
            .with_context(|| format!("Invalid search host: {}", config.host))?;
        if host.cannot_be_a_base() {
            bail!("Invalid search host: {}", config.host);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            host,
            api_key: config.api_key.clone(),
            http,
            max_retries: config.max_retries,
            base_delay: Duration::from_secs(1),
        })
    }

    /// Override the first backoff delay (doubles on every retry).
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.host.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("Invalid search host: {}", self.host))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send one request, retrying transient failures.
    async fn send(&self, method: Method, url: Url, body: Option<&Value>) -> Result<()> {
        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay * (1u32 << (attempt - 1).min(5));
                tracing::warn!(
                    %url,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "retrying search service request"
                );
                tokio::time::sleep(delay).await;
            }

            let mut request = self.http.request(method.clone(), url.clone());
            if !self.api_key.is_empty() {
                request = request.bearer_auth(&self.api_key);
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return Ok(());
                    }

                    let body_text = response.text().await.unwrap_or_default();

                    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                        last_err = Some(anyhow!("search service error {}: {}", status, body_text));
                        continue;
                    }

                    bail!("search service error {}: {}", status, body_text);
                }
                Err(e) => {
                    last_err = Some(e.into());
                    continue;
                }
            }
        }

        Err(last_err.unwrap_or_else(|| anyhow!("search service request failed after retries")))
    }
}

#[async_trait]
impl SearchIndex for MeiliClient {
    async fn configure_index(&self, settings: &IndexSettings) -> Result<()> {
        // Creating an existing index is accepted; the service reports the
        // conflict on its task queue, not on this response.
        let create = json!({ "uid": settings.index_name, "primaryKey": "id" });
        self.send(Method::POST, self.endpoint(&["indexes"])?, Some(&create))
            .await
            .with_context(|| format!("Failed to create index '{}'", settings.index_name))?;

        let body = json!({
            "searchableAttributes": settings.searchable_attributes,
            "displayedAttributes": settings.displayed_attributes,
        });
        self.send(
            Method::PATCH,
            self.endpoint(&["indexes", settings.index_name, "settings"])?,
            Some(&body),
        )
        .await
        .with_context(|| format!("Failed to update settings of index '{}'", settings.index_name))?;

        tracing::info!(index = settings.index_name, "index settings applied");
        Ok(())
    }

    async fn upsert_documents(&self, index: &str, documents: &[IndexDocument]) -> Result<()> {
        if documents.is_empty() {
            return Ok(());
        }

        let mut url = self.endpoint(&["indexes", index, "documents"])?;
        url.query_pairs_mut().append_pair("primaryKey", "id");

        let body = serde_json::to_value(documents)?;
        self.send(Method::PUT, url, Some(&body))
            .await
            .with_context(|| format!("Failed to upsert documents into '{}'", index))?;

        tracing::debug!(index, count = documents.len(), "documents upserted");
        Ok(())
    }

    async fn delete_document(&self, index: &str, id: &DocumentId) -> Result<()> {
        let id = id.to_string();
        self.send(
            Method::DELETE,
            self.endpoint(&["indexes", index, "documents", &id])?,
            None,
        )
        .await
        .with_context(|| format!("Failed to delete document {} from '{}'", id, index))?;

        tracing::debug!(index, id = %id, "document deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(host: &str) -> SearchConfig {
        SearchConfig {
            host: host.to_string(),
            ..SearchConfig::default()
        }
    }

    #[test]
    fn test_unconfigured_host_rejected() {
        let err = MeiliClient::new(&config("")).err().unwrap();
        assert!(err.to_string().contains("not configured"));
    }

    #[test]
    fn test_invalid_host_rejected() {
        assert!(MeiliClient::new(&config("not a url")).is_err());
        assert!(MeiliClient::new(&config("mailto:search@example.com")).is_err());
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let client = MeiliClient::new(&config("http://search.local:7700/")).unwrap();
        let url = client.endpoint(&["indexes", "blog-posts", "settings"]).unwrap();
        assert_eq!(url.as_str(), "http://search.local:7700/indexes/blog-posts/settings");
    }

    #[test]
    fn test_endpoint_keeps_host_prefix() {
        let client = MeiliClient::new(&config("https://proxy.local/meili")).unwrap();
        let url = client.endpoint(&["indexes"]).unwrap();
        assert_eq!(url.as_str(), "https://proxy.local/meili/indexes");
    }

    #[test]
    fn test_endpoint_escapes_document_ids() {
        let client = MeiliClient::new(&config("http://search.local:7700")).unwrap();
        let url = client
            .endpoint(&["indexes", "videos", "documents", "a/b c"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://search.local:7700/indexes/videos/documents/a%2Fb%20c"
        );
    }
}
