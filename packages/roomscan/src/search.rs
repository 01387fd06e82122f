//! Reverse image search client and its fallback policy.
//!
//! The remote backend may return results, return nothing, or fail
//! outright. Transport and parse failures are absorbed here at the
//! boundary; the pipeline driver only ever sees a (possibly empty) result
//! list from this client.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::DEFAULT_SEARCH_ENDPOINT;
use crate::error::Result;
use crate::traits::ReverseSearcher;
use crate::types::SearchResult;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// What to hand back when the backend returns nothing or fails.
///
/// Observed deployments disagree on this behavior, so it is explicit and
/// caller-configurable rather than baked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Pass an empty list through unchanged; the caller decides what an
    /// item with no candidates means. The default.
    #[default]
    PropagateEmpty,

    /// Synthesize a single placeholder result so downstream consumers
    /// always have something to display.
    Placeholder,
}

impl FallbackPolicy {
    /// The result list to use when the search produced nothing.
    pub(crate) fn fallback_items(self) -> Vec<SearchResult> {
        match self {
            FallbackPolicy::PropagateEmpty => Vec::new(),
            FallbackPolicy::Placeholder => vec![SearchResult {
                url: "https://example.com/".to_string(),
                site: Some("example.com".to_string()),
                title: Some("No match found".to_string()),
                price_hint: None,
            }],
        }
    }
}

/// Client for the hosted reverse image search API.
///
/// POSTs crop bytes as a multipart `image` part and expects a
/// `{"results": [...]}` envelope back.
pub struct ReverseSearchClient {
    client: reqwest::Client,
    endpoint: String,
    policy: FallbackPolicy,
}

impl Default for ReverseSearchClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ReverseSearchClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .expect("Failed to create HTTP client"),
            endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            policy: FallbackPolicy::default(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_policy(mut self, policy: FallbackPolicy) -> Self {
        self.policy = policy;
        self
    }

    async fn try_search(&self, crop_path: &Path) -> std::result::Result<Vec<SearchResult>, BoxError> {
        let bytes = tokio::fs::read(crop_path).await?;
        debug!(bytes = bytes.len(), endpoint = %self.endpoint, "uploading crop");

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(
                crop_path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "crop.jpg".to_string()),
            )
            .mime_str("image/jpeg")?;
        let form = reqwest::multipart::Form::new().part("image", part);

        let resp = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        let envelope: SearchEnvelope = resp.json().await?;
        Ok(envelope.results)
    }
}

#[async_trait]
impl ReverseSearcher for ReverseSearchClient {
    async fn search(&self, crop_path: &Path) -> Result<Vec<SearchResult>> {
        info!(crop = %crop_path.display(), "reverse searching");

        let results = match self.try_search(crop_path).await {
            Ok(results) => results,
            Err(err) => {
                warn!(crop = %crop_path.display(), error = %err, "reverse search failed");
                return Ok(self.policy.fallback_items());
            }
        };

        if results.is_empty() {
            debug!("reverse search returned no results");
            return Ok(self.policy.fallback_items());
        }

        info!(count = results.len(), "reverse search returned results");
        Ok(results)
    }
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(default)]
    results: Vec<SearchResult>,
}
