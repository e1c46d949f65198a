//! Sort Builder: logical sort key + order + language to a concrete sort
//! specification, with a relevance fallback.

use serde_json::{json, Value};

use geosearch_core::error::Result;
use geosearch_core::mapping::FieldMappingRegistry;
use geosearch_core::types::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("asc") => SortOrder::Ascending,
            _ => SortOrder::Descending,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

/// `Relevance` is the sentinel for "omit explicit sort, rely on scoring".
#[derive(Debug, Clone, PartialEq)]
pub enum SortSpec {
    Relevance,
    Field { field: String, order: SortOrder },
}

impl SortSpec {
    /// `None` for relevance: the query's own scoring already orders hits.
    pub fn to_clause(&self) -> Option<Value> {
        match self {
            SortSpec::Relevance => None,
            SortSpec::Field { field, order } => {
                Some(json!({ field: { "order": order.as_str() } }))
            }
        }
    }
}

/// Map a logical sort key to its field, resolving language variants through
/// the registry. Unknown keys fall back to relevance rather than failing:
/// a bad sort preference should not reject an otherwise valid request.
pub fn build_sort(
    registry: &FieldMappingRegistry,
    language: Language,
    sort_key: Option<&str>,
    sort_order: Option<&str>,
) -> Result<SortSpec> {
    let key = sort_key.map(str::trim).unwrap_or("");
    let order = SortOrder::parse(sort_order);

    let logical = match key.to_ascii_lowercase().as_str() {
        "" | "relevance" | "relevancy" | "_score" => return Ok(SortSpec::Relevance),
        "date" => "sort_date",
        "popularity" => "sort_popularity",
        "title" => "sort_title",
        "org" | "organisation" | "organization" => "sort_org",
        _ => return Ok(SortSpec::Relevance),
    };

    let field = registry.first_field(logical, language)?.to_string();
    Ok(SortSpec::Field { field, order })
}

/// The fallback ordering for empty query text, where there is no relevance
/// signal to rank by.
pub fn popularity_sort(registry: &FieldMappingRegistry, language: Language) -> Result<SortSpec> {
    let field = registry.first_field("sort_popularity", language)?.to_string();
    Ok(SortSpec::Field {
        field,
        order: SortOrder::Descending,
    })
}
