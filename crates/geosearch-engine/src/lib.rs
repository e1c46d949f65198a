//! The request-scoped search pipeline: parameters in, response envelope out.
//!
//! One request makes at most one embedding call and one backend call, both
//! blocking. Validation happens before either, so malformed input never
//! costs backend work. The pipeline holds no mutable state; concurrent
//! requests share only the read-only registry.

use tracing::{debug, info};

use geosearch_core::error::{Error, Result};
use geosearch_core::mapping::FieldMappingRegistry;
use geosearch_core::traits::{EmbeddingProvider, SearchBackend};
use geosearch_core::types::{Language, SearchMethod, SearchRequest};
use geosearch_query::params::parse_pagination;
use geosearch_query::sort::popularity_sort;
use geosearch_query::{assemble, build_filters, build_sort, QueryTuning, SearchParams};
use geosearch_response::{transform, ResponseEnvelope};

pub struct SearchPipeline<B: SearchBackend> {
    backend: B,
    embedder: Option<Box<dyn EmbeddingProvider>>,
    registry: FieldMappingRegistry,
    tuning: QueryTuning,
}

impl<B: SearchBackend> SearchPipeline<B> {
    pub fn new(
        backend: B,
        embedder: Option<Box<dyn EmbeddingProvider>>,
        registry: FieldMappingRegistry,
        tuning: QueryTuning,
    ) -> Self {
        Self {
            backend,
            embedder,
            registry,
            tuning,
        }
    }

    /// Run one search end to end. Filter and sort validation fails fast;
    /// embedding and backend failures propagate with the operation attached
    /// and are never retried here.
    pub fn search(&self, params: &SearchParams) -> Result<ResponseEnvelope> {
        let language = Language::parse(params.lang.as_deref());
        let method = SearchMethod::parse(params.method.as_deref());
        let query_text = params.query_text();

        let filters = build_filters(params, &self.registry, language)?;
        let (page_offset, page_size) = parse_pagination(
            params.from.as_deref(),
            params.size.as_deref(),
            self.tuning.default_page_size,
            self.tuning.max_page_size,
        );

        // Without query text there is no relevance signal: popularity wins
        // over whatever sort the caller asked for.
        let sort = if query_text.is_empty() {
            popularity_sort(&self.registry, language)?
        } else {
            build_sort(
                &self.registry,
                language,
                params.sort.as_deref(),
                params.order.as_deref(),
            )?
        };

        let embedding = if method == SearchMethod::Semantic && !query_text.is_empty() {
            Some(self.embed(query_text)?)
        } else {
            None
        };

        let request = SearchRequest {
            query_text: query_text.to_string(),
            language,
            page_offset,
            page_size,
            embedding,
        };

        let query = assemble(&request, &filters, &sort, &self.registry, &self.tuning)?;
        debug!(query = %query, "executing search");

        let raw = self
            .backend
            .search(&query)
            .map_err(|source| Error::Backend {
                op: "search",
                source,
            })?;
        info!(
            total_hits = raw.total_hits(),
            returned = raw.hits.hits.len(),
            hybrid = request.is_hybrid(),
            "search completed"
        );

        let vector_field = self.registry.first_field("vector", language)?.to_string();
        let geometry_field = self.registry.first_field("geometry", language)?.to_string();
        Ok(transform(&raw, &vector_field, &geometry_field))
    }

    /// Once semantic mode is requested, an embedding failure is a hard
    /// error; falling back to keyword-only would silently change semantics.
    fn embed(&self, query_text: &str) -> Result<Vec<f32>> {
        let embedder = self.embedder.as_ref().ok_or_else(|| Error::Embedding {
            op: "embed_query",
            source: anyhow::anyhow!("no embedding provider configured"),
        })?;
        let vector = embedder
            .embed(query_text)
            .map_err(|source| Error::Embedding {
                op: "embed_query",
                source,
            })?;
        if vector.is_empty() {
            return Err(Error::Embedding {
                op: "embed_query",
                source: anyhow::anyhow!("embedding service returned an empty vector"),
            });
        }
        Ok(vector)
    }

    pub fn registry(&self) -> &FieldMappingRegistry {
        &self.registry
    }

    pub fn tuning(&self) -> &QueryTuning {
        &self.tuning
    }
}
