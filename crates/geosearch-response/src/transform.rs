//! Turns the raw hit page into the response envelope.
//!
//! Each hit becomes one single-feature GeoJSON FeatureCollection, in the
//! backend's returned order. Transformation problems are per-hit: a hit
//! missing its geometry is logged and dropped, and the rest of the page is
//! still returned.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use geosearch_core::types::{RawHit, RawSearchResults};

#[derive(Debug, Clone, Serialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub geometry: Value,
    pub properties: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub features: Vec<Feature>,
}

/// The response envelope, constructed once per request.
///
/// `returned_hits` is the literal backend page count and is not reduced when
/// a malformed hit is dropped, so callers can detect partial pages.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseEnvelope {
    pub total_hits: u64,
    pub returned_hits: usize,
    pub aggs: Map<String, Value>,
    pub items: Vec<FeatureCollection>,
}

/// Build the envelope from one backend result. `vector_field` and
/// `geometry_field` are the registry-resolved document field names to strip
/// and to extract, respectively.
pub fn transform(
    raw: &RawSearchResults,
    vector_field: &str,
    geometry_field: &str,
) -> ResponseEnvelope {
    let mut items = Vec::with_capacity(raw.hits.hits.len());

    for (row_num, hit) in raw.hits.hits.iter().enumerate() {
        match feature_from_hit(hit, row_num + 1, vector_field, geometry_field) {
            Some(feature) => items.push(FeatureCollection {
                kind: "FeatureCollection",
                features: vec![feature],
            }),
            None => {
                warn!(id = %hit.id, field = geometry_field, "hit missing geometry, dropped");
            }
        }
    }

    ResponseEnvelope {
        total_hits: raw.total_hits(),
        returned_hits: raw.hits.hits.len(),
        aggs: raw.aggregations.clone(),
        items,
    }
}

/// One hit to one Feature: rank metadata first, then the source document
/// minus the vector and geometry fields. Built as a fresh ordered map, the
/// source is never mutated.
fn feature_from_hit(
    hit: &RawHit,
    row_num: usize,
    vector_field: &str,
    geometry_field: &str,
) -> Option<Feature> {
    let geometry = hit.source.get(geometry_field)?.clone();

    let mut properties = Map::new();
    properties.insert("row_num".to_string(), Value::from(row_num as u64));
    properties.insert(
        "relevancy".to_string(),
        hit.score.map(Value::from).unwrap_or(Value::Null),
    );
    for (key, value) in &hit.source {
        if key == vector_field || key == geometry_field {
            continue;
        }
        properties.insert(key.clone(), value.clone());
    }

    Some(Feature {
        kind: "Feature",
        geometry,
        properties,
    })
}
