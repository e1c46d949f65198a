//! Filter Builder: one logical filter in, one validated `FilterSpec` out.
//!
//! Every `FilterSpec` serializes independently to the backend's bool/filter syntax.
//! Multi-value filters are case-insensitive substring matches; distinct
//! logical filters are AND-combined by the assembler.

use chrono::{Datelike, Duration, Local, NaiveDate};
use serde_json::{json, Value};

use geosearch_core::error::{Error, Result};
use geosearch_core::mapping::FieldMappingRegistry;
use geosearch_core::types::Language;

use crate::params::SearchParams;

pub const SUPPORTED_RELATIONS: &[&str] = &["intersects", "disjoint", "within", "contains"];

/// Start-date sentinels the upstream catalogue emits for "no date".
const NO_DATE_SENTINELS: &[&str] = &["null", "not available; indisponible"];

/// Logical names that filter as case-insensitive wildcard disjunctions.
const WILDCARD_FILTERS: &[&str] = &[
    "org",
    "theme",
    "type",
    "protocol",
    "source_system",
    "eo_collection",
    "polarization",
    "orbit_direction",
    "topic_category",
];

/// A validated, self-contained filter clause.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterSpec {
    /// Matches when ANY field contains ANY term as a substring.
    Wildcard { fields: Vec<String>, terms: Vec<String> },
    /// Exact match on a single field.
    Term { field: String, value: Value },
    /// Inclusive date range; one-sided when only one bound is present.
    Range {
        field: String,
        from: Option<String>,
        to: Option<String>,
    },
    /// Bounding-box predicate on a geo_shape field.
    Spatial {
        field: String,
        bbox: BoundingBox,
        relation: String,
    },
}

/// `south|west|north|east`, already range-checked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl FilterSpec {
    /// Serialize to one clause of the backend's native filter syntax.
    pub fn to_clause(&self) -> Value {
        match self {
            FilterSpec::Wildcard { fields, terms } => {
                let should: Vec<Value> = terms
                    .iter()
                    .flat_map(|term| {
                        fields.iter().map(move |field| {
                            json!({
                                "wildcard": {
                                    field: {
                                        "value": format!("*{}*", term),
                                        "case_insensitive": true
                                    }
                                }
                            })
                        })
                    })
                    .collect();
                json!({
                    "bool": {
                        "should": should,
                        "minimum_should_match": 1
                    }
                })
            }
            FilterSpec::Term { field, value } => json!({ "term": { field: value } }),
            FilterSpec::Range { field, from, to } => {
                let mut bounds = serde_json::Map::new();
                if let Some(from) = from {
                    bounds.insert("gte".to_string(), Value::String(from.clone()));
                }
                if let Some(to) = to {
                    bounds.insert("lte".to_string(), Value::String(to.clone()));
                }
                json!({ "range": { field: bounds } })
            }
            FilterSpec::Spatial {
                field,
                bbox,
                relation,
            } => json!({
                "geo_shape": {
                    field: {
                        "shape": {
                            "type": "envelope",
                            "coordinates": [[bbox.west, bbox.north], [bbox.east, bbox.south]]
                        },
                        "relation": relation
                    }
                }
            }),
        }
    }
}

/// Comma-split, trim, drop empties. An all-empty result means the filter was
/// not specified.
fn split_tokens(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Build a wildcard filter for `logical_name` or `None` when the raw value
/// carries no usable tokens.
pub fn build_wildcard_filter(
    logical_name: &str,
    raw_value: &str,
    registry: &FieldMappingRegistry,
    language: Language,
) -> Result<Option<FilterSpec>> {
    let terms = split_tokens(raw_value);
    if terms.is_empty() {
        return Ok(None);
    }
    let fields = registry.resolve(logical_name, language)?.to_vec();
    Ok(Some(FilterSpec::Wildcard { fields, terms }))
}

/// Boolean term filter for the `mappable` flag.
pub fn build_mappable_filter(
    raw_value: &str,
    registry: &FieldMappingRegistry,
    language: Language,
) -> Result<Option<FilterSpec>> {
    let trimmed = raw_value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let flag = match trimmed.to_ascii_lowercase().as_str() {
        "true" | "1" => true,
        "false" | "0" => false,
        other => {
            return Err(Error::FilterValidation(format!(
                "mappable must be true or false, got '{}'",
                other
            )))
        }
    };
    let field = registry.first_field("mappable", language)?.to_string();
    Ok(Some(FilterSpec::Term {
        field,
        value: Value::Bool(flag),
    }))
}

/// Inclusive range filter over a date field. Both bounds absent means the
/// filter was not specified. Partial dates widen to cover the whole period.
pub fn build_date_filter(
    field: &str,
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> Result<Option<FilterSpec>> {
    let from = match start_date {
        Some(raw) => normalize_start_date(raw)?,
        None => None,
    };
    let to = match end_date {
        Some(raw) => normalize_end_date(raw)?,
        None => None,
    };
    if from.is_none() && to.is_none() {
        return Ok(None);
    }
    Ok(Some(FilterSpec::Range {
        field: field.to_string(),
        from,
        to,
    }))
}

/// Widen a start bound: `YYYY` becomes January 1st, `YYYY-MM` the first of
/// the month. Catalogue no-date sentinels are treated as unspecified.
fn normalize_start_date(raw: &str) -> Result<Option<String>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || NO_DATE_SENTINELS.contains(&trimmed.to_ascii_lowercase().as_str()) {
        return Ok(None);
    }
    if let Some(year) = parse_year(trimmed) {
        return Ok(Some(format!("{:04}-01-01", year)));
    }
    if let Some((year, month)) = parse_year_month(trimmed)? {
        return Ok(Some(format!("{:04}-{:02}-01", year, month)));
    }
    Ok(Some(trimmed.to_string()))
}

/// Widen an end bound the other way: `YYYY` becomes December 31st, `YYYY-MM`
/// the last day of the month. `present` means today.
fn normalize_end_date(raw: &str) -> Result<Option<String>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || NO_DATE_SENTINELS.contains(&trimmed.to_ascii_lowercase().as_str()) {
        return Ok(None);
    }
    if trimmed.eq_ignore_ascii_case("present") {
        return Ok(Some(Local::now().date_naive().format("%Y-%m-%d").to_string()));
    }
    if let Some(year) = parse_year(trimmed) {
        return Ok(Some(format!("{:04}-12-31", year)));
    }
    if let Some((year, month)) = parse_year_month(trimmed)? {
        let last = last_day_of_month(year, month)?;
        return Ok(Some(last.format("%Y-%m-%d").to_string()));
    }
    Ok(Some(trimmed.to_string()))
}

fn parse_year(s: &str) -> Option<i32> {
    if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}

fn parse_year_month(s: &str) -> Result<Option<(i32, u32)>> {
    if s.len() != 7 || s.as_bytes()[4] != b'-' {
        return Ok(None);
    }
    let (year, month) = (&s[..4], &s[5..]);
    if !year.bytes().all(|b| b.is_ascii_digit()) || !month.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(None);
    }
    let year: i32 = year
        .parse()
        .map_err(|_| Error::FilterValidation(format!("invalid date '{}'", s)))?;
    let month: u32 = month
        .parse()
        .map_err(|_| Error::FilterValidation(format!("invalid date '{}'", s)))?;
    if !(1..=12).contains(&month) {
        return Err(Error::FilterValidation(format!("invalid month in '{}'", s)));
    }
    Ok(Some((year, month)))
}

fn last_day_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    first_of_next
        .map(|d| d - Duration::days(1))
        .filter(|d| d.year() == year)
        .ok_or_else(|| Error::FilterValidation(format!("invalid date {:04}-{:02}", year, month)))
}

/// Parse and validate a `south|west|north|east` bounding box. A malformed
/// bbox rejects the whole request: the caller explicitly asked for a
/// geographic bound, so it cannot be silently dropped.
pub fn build_spatial_filter(
    field: &str,
    bbox: &str,
    relation: Option<&str>,
) -> Result<FilterSpec> {
    let relation = relation.map(str::trim).filter(|r| !r.is_empty()).unwrap_or("intersects");
    if !SUPPORTED_RELATIONS.contains(&relation) {
        return Err(Error::FilterValidation(format!(
            "unsupported relation '{}', must be one of {}",
            relation,
            SUPPORTED_RELATIONS.join(", ")
        )));
    }

    let components: Vec<f64> = bbox
        .split('|')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(|c| {
            c.parse::<f64>().map_err(|_| {
                Error::FilterValidation(format!("bbox component '{}' is not numeric", c))
            })
        })
        .collect::<Result<_>>()?;
    if components.len() != 4 {
        return Err(Error::FilterValidation(format!(
            "bbox must have exactly 4 components (south|west|north|east), got {}",
            components.len()
        )));
    }

    let bbox = BoundingBox {
        south: components[0],
        west: components[1],
        north: components[2],
        east: components[3],
    };
    if !(-90.0..=90.0).contains(&bbox.south) || !(-90.0..=90.0).contains(&bbox.north) {
        return Err(Error::FilterValidation(
            "latitude values must be between -90 and 90".to_string(),
        ));
    }
    if !(-180.0..=180.0).contains(&bbox.west) || !(-180.0..=180.0).contains(&bbox.east) {
        return Err(Error::FilterValidation(
            "longitude values must be between -180 and 180".to_string(),
        ));
    }

    Ok(FilterSpec::Spatial {
        field: field.to_string(),
        bbox,
        relation: relation.to_string(),
    })
}

/// Build every filter named by the request. Unspecified filters are skipped;
/// a malformed one fails the request before any backend call.
pub fn build_filters(
    params: &SearchParams,
    registry: &FieldMappingRegistry,
    language: Language,
) -> Result<Vec<FilterSpec>> {
    let mut filters = Vec::new();

    for name in WILDCARD_FILTERS {
        if let Some(raw) = params.get(name) {
            if let Some(filter) = build_wildcard_filter(name, raw, registry, language)? {
                filters.push(filter);
            }
        }
    }

    if let Some(raw) = params.mappable.as_deref() {
        if let Some(filter) = build_mappable_filter(raw, registry, language)? {
            filters.push(filter);
        }
    }

    if params.begin.is_some() || params.end.is_some() {
        let begin_field = registry.first_field("begin", language)?;
        let end_field = registry.first_field("end", language)?;
        if let Some(filter) = build_date_filter(begin_field, params.begin.as_deref(), None)? {
            filters.push(filter);
        }
        if let Some(filter) = build_date_filter(end_field, None, params.end.as_deref())? {
            filters.push(filter);
        }
    }

    if let Some(bbox) = params.bbox.as_deref() {
        if !bbox.trim().is_empty() {
            let geo_field = registry.first_field("geometry", language)?;
            filters.push(build_spatial_filter(
                geo_field,
                bbox,
                params.relation.as_deref(),
            )?);
        }
    }

    Ok(filters)
}
