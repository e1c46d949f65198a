use crate::types::RawSearchResults;
use serde_json::Value;

/// Turns free text into a fixed-length vector. Implementations live behind a
/// network boundary; a failure here must not silently degrade to keyword
/// search once semantic mode was requested.
pub trait EmbeddingProvider: Send + Sync {
    fn dim(&self) -> usize;
    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>>;
}

/// Executes one assembled query document against the search index and
/// returns the raw hit set plus aggregations. No retries: the caller owns
/// retry policy.
pub trait SearchBackend: Send + Sync {
    fn search(&self, query: &Value) -> anyhow::Result<RawSearchResults>;
}
