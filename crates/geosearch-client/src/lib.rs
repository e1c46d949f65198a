//! HTTP adapters for the two external collaborators: the search index and
//! the embedding endpoint. Both are blocking calls with the configured
//! request timeout; neither retries — retry policy belongs to the caller.

use std::time::Duration;

use anyhow::{anyhow, ensure, Context};
use reqwest::blocking::Client;
use serde_json::Value;
use tracing::debug;

use geosearch_core::config::SearchSettings;
use geosearch_core::traits::{EmbeddingProvider, SearchBackend};
use geosearch_core::types::RawSearchResults;

/// OpenSearch-compatible `_search` client.
pub struct OpenSearchBackend {
    http: Client,
    endpoint: String,
    index: String,
    auth: Option<(String, String)>,
}

impl OpenSearchBackend {
    pub fn from_settings(settings: &SearchSettings) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("building search backend client")?;
        let auth = match (&settings.username, &settings.password) {
            (Some(user), Some(pass)) => Some((user.clone(), pass.clone())),
            _ => None,
        };
        Ok(Self {
            http,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            index: settings.index.clone(),
            auth,
        })
    }
}

impl SearchBackend for OpenSearchBackend {
    fn search(&self, query: &Value) -> anyhow::Result<RawSearchResults> {
        let url = format!("{}/{}/_search", self.endpoint, self.index);
        debug!(%url, "posting search query");

        let mut request = self.http.post(&url).json(query);
        if let Some((user, pass)) = &self.auth {
            request = request.basic_auth(user, Some(pass));
        }

        let response = request.send().context("search request failed")?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(anyhow!("search returned {}: {}", status, body));
        }
        response
            .json::<RawSearchResults>()
            .context("decoding search response")
    }
}

/// Client for the text-to-vector endpoint. Sends the raw query text as
/// `text/plain` and expects a JSON float array back.
pub struct EmbeddingEndpoint {
    http: Client,
    endpoint: String,
    dim: usize,
}

impl EmbeddingEndpoint {
    /// `dim` of 0 disables length checking for deployments where the model
    /// dimension is not known up front.
    pub fn new(endpoint: &str, dim: usize, timeout_secs: u64) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("building embedding client")?;
        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
            dim,
        })
    }

    pub fn from_settings(settings: &SearchSettings) -> anyhow::Result<Option<Self>> {
        match &settings.embedding_endpoint {
            Some(endpoint) => Ok(Some(Self::new(
                endpoint,
                settings.embedding_dim.unwrap_or(0),
                settings.timeout_secs,
            )?)),
            None => Ok(None),
        }
    }
}

impl EmbeddingProvider for EmbeddingEndpoint {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        let response = self
            .http
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(text.to_string())
            .send()
            .context("embedding request failed")?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(anyhow!("embedding endpoint returned {}: {}", status, body));
        }

        let vector: Vec<f32> = response.json().context("decoding embedding response")?;
        ensure!(!vector.is_empty(), "embedding endpoint returned an empty vector");
        if self.dim > 0 {
            ensure!(
                vector.len() == self.dim,
                "embedding length {} does not match expected dimension {}",
                vector.len(),
                self.dim
            );
        }
        Ok(vector)
    }
}
