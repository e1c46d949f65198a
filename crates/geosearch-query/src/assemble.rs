//! Hybrid Query Assembler: lexical match, optional k-NN clause, boost terms,
//! filters, pagination, and aggregations combined into one query document.

use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::debug;

use geosearch_core::error::Result;
use geosearch_core::mapping::FieldMappingRegistry;
use geosearch_core::types::SearchRequest;

use crate::filter::FilterSpec;
use crate::sort::SortSpec;

/// Facets that always get a terms aggregation attached, so the caller can
/// render facet counts alongside results.
pub const AGGREGATED_FACETS: &[&str] = &[
    "mappable",
    "protocol",
    "org",
    "source_system",
    "eo_collection",
    "topic_category",
    "theme",
];

fn default_lexical_fields() -> Vec<String> {
    [
        "description^4",
        "title^3",
        "keywords^2",
        "topicCategory",
        "organisation",
        "systemName",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_lexical_boost() -> f64 {
    0.3
}
fn default_mappable_boost() -> f64 {
    1.0
}
fn default_knn_k() -> u64 {
    30
}
fn default_min_score() -> f64 {
    0.55
}
fn default_agg_size() -> u64 {
    100
}
fn default_page_size() -> u64 {
    10
}
fn default_max_page_size() -> u64 {
    100
}

/// Scoring and shape knobs for the assembled query. The defaults are tuning
/// parameters, not correctness requirements; deployments override them under
/// the `tuning` config key.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryTuning {
    /// Weighted lexical field set, `field^boost` syntax. Free-text fields
    /// carry the higher weights.
    #[serde(default = "default_lexical_fields")]
    pub lexical_fields: Vec<String>,
    /// Scale-down applied to the whole lexical clause so BM25 scores do not
    /// dominate the vector similarity score in hybrid mode.
    #[serde(default = "default_lexical_boost")]
    pub lexical_boost: f64,
    #[serde(default = "default_mappable_boost")]
    pub mappable_boost: f64,
    #[serde(default = "default_knn_k")]
    pub knn_k: u64,
    /// Floor suppressing low-confidence vector matches; hybrid mode only.
    #[serde(default = "default_min_score")]
    pub min_score: f64,
    #[serde(default = "default_agg_size")]
    pub agg_size: u64,
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
}

impl Default for QueryTuning {
    fn default() -> Self {
        Self {
            lexical_fields: default_lexical_fields(),
            lexical_boost: default_lexical_boost(),
            mappable_boost: default_mappable_boost(),
            knn_k: default_knn_k(),
            min_score: default_min_score(),
            agg_size: default_agg_size(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

/// Build the full query document. Filters always land in the bool filter
/// context — they gate inclusion and never affect scoring. The k-NN clause
/// and the `min_score` floor exist only when an embedding is present.
pub fn assemble(
    request: &SearchRequest,
    filters: &[FilterSpec],
    sort: &SortSpec,
    registry: &FieldMappingRegistry,
    tuning: &QueryTuning,
) -> Result<Value> {
    let language = request.language;
    let filter_clauses: Vec<Value> = filters.iter().map(FilterSpec::to_clause).collect();
    let filter_count = filter_clauses.len();
    let vector_field = registry.first_field("vector", language)?;

    let bool_query = if let Some(embedding) = &request.embedding {
        let mappable_field = registry.first_field("mappable", language)?;
        // Disjunctive hybrid: lexical, mappable boost, k-NN. At least one
        // must match; filters still gate everything.
        json!({
            "bool": {
                "should": [
                    {
                        "multi_match": {
                            "query": &request.query_text,
                            "fields": &tuning.lexical_fields,
                            "boost": tuning.lexical_boost
                        }
                    },
                    {
                        "term": {
                            mappable_field: { "value": true, "boost": tuning.mappable_boost }
                        }
                    },
                    {
                        "knn": {
                            vector_field: { "vector": embedding, "k": tuning.knn_k }
                        }
                    }
                ],
                "minimum_should_match": 1,
                "filter": filter_clauses
            }
        })
    } else if !request.query_text.is_empty() {
        // Keyword-only: plain lexical match at full weight, default scoring.
        json!({
            "bool": {
                "must": [
                    {
                        "multi_match": {
                            "query": &request.query_text,
                            "fields": &tuning.lexical_fields
                        }
                    }
                ],
                "filter": filter_clauses
            }
        })
    } else {
        // No query text: pure filter query, backend default scoring.
        json!({ "bool": { "filter": filter_clauses } })
    };

    let mut aggs = Map::new();
    for facet in AGGREGATED_FACETS {
        let field = registry.first_field(facet, language)?;
        aggs.insert(
            facet.to_string(),
            json!({ "terms": { "field": field, "size": tuning.agg_size } }),
        );
    }

    let mut query = json!({
        "from": request.page_offset,
        "size": request.page_size,
        "_source": { "excludes": [vector_field] },
        "query": bool_query,
        "aggs": Value::Object(aggs),
    });

    if request.is_hybrid() {
        query["min_score"] = json!(tuning.min_score);
    }
    if let Some(sort_clause) = sort.to_clause() {
        query["sort"] = json!([sort_clause]);
    }

    debug!(
        hybrid = request.is_hybrid(),
        filters = filter_count,
        from = request.page_offset,
        size = request.page_size,
        "assembled search query"
    );
    Ok(query)
}
