//! Domain types shared by the query assembler, the backend adapters, and the
//! response transformer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Response language. Unrecognised values fall back to English so a bad
/// `lang` parameter never rejects a request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Language {
    En,
    Fr,
}

impl Language {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("fr") => Language::Fr,
            _ => Language::En,
        }
    }

    /// Suffix used to look up language variants in the mapping registry.
    pub fn suffix(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
        }
    }
}

/// How the caller wants the query executed. `Semantic` requests an embedding
/// for the query text; `Keyword` never touches the embedding service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMethod {
    Keyword,
    Semantic,
}

impl SearchMethod {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("semantic") => SearchMethod::Semantic,
            _ => SearchMethod::Keyword,
        }
    }
}

/// A normalized search request, ready for query assembly.
///
/// Invariant: `embedding` is `Some` only when `query_text` is non-empty —
/// there is nothing to embed otherwise, and the assembler relies on this to
/// decide between hybrid and pure-filter mode.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query_text: String,
    pub language: Language,
    pub page_offset: u64,
    pub page_size: u64,
    pub embedding: Option<Vec<f32>>,
}

impl SearchRequest {
    pub fn is_hybrid(&self) -> bool {
        self.embedding.is_some()
    }
}

/// One hit as reported by the backend. `source` is the stored document and
/// is read-only to the transformer.
#[derive(Debug, Clone, Deserialize)]
pub struct RawHit {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_score")]
    pub score: Option<f64>,
    #[serde(rename = "_source")]
    pub source: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HitTotal {
    pub value: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HitSet {
    #[serde(default)]
    pub total: Option<HitTotal>,
    #[serde(default)]
    pub hits: Vec<RawHit>,
}

/// The raw result of one backend call: the hit page plus aggregation buckets.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSearchResults {
    #[serde(default)]
    pub hits: HitSet,
    #[serde(default)]
    pub aggregations: Map<String, Value>,
}

impl RawSearchResults {
    /// Backend-reported total across all pages, 0 when absent.
    pub fn total_hits(&self) -> u64 {
        self.hits.total.as_ref().map(|t| t.value).unwrap_or(0)
    }
}
