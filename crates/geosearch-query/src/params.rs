//! Raw request parameters as they arrive from the transport layer.
//!
//! Everything is an optional string here; normalization and validation
//! happen in the filter/sort builders and the assembler, never at the edge.

/// The logical request-parameter contract. Field names match the public
/// query-string names one-to-one.
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    pub q: Option<String>,
    pub method: Option<String>,
    pub lang: Option<String>,
    pub org: Option<String>,
    pub source_system: Option<String>,
    pub theme: Option<String>,
    pub topic_category: Option<String>,
    pub r#type: Option<String>,
    pub protocol: Option<String>,
    pub mappable: Option<String>,
    pub eo_collection: Option<String>,
    pub polarization: Option<String>,
    pub orbit_direction: Option<String>,
    pub begin: Option<String>,
    pub end: Option<String>,
    pub bbox: Option<String>,
    pub relation: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub size: Option<String>,
    pub from: Option<String>,
}

impl SearchParams {
    /// Build from `key=value` pairs, ignoring unknown keys.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = SearchParams::default();
        for (key, value) in pairs {
            let value = value.into();
            match key.as_ref() {
                "q" => params.q = Some(value),
                "method" => params.method = Some(value),
                "lang" => params.lang = Some(value),
                "org" => params.org = Some(value),
                "source_system" => params.source_system = Some(value),
                "theme" => params.theme = Some(value),
                "topic_category" => params.topic_category = Some(value),
                "type" => params.r#type = Some(value),
                "protocol" => params.protocol = Some(value),
                "mappable" => params.mappable = Some(value),
                "eo_collection" => params.eo_collection = Some(value),
                "polarization" => params.polarization = Some(value),
                "orbit_direction" => params.orbit_direction = Some(value),
                "begin" => params.begin = Some(value),
                "end" => params.end = Some(value),
                "bbox" => params.bbox = Some(value),
                "relation" => params.relation = Some(value),
                "sort" => params.sort = Some(value),
                "order" => params.order = Some(value),
                "size" => params.size = Some(value),
                "from" => params.from = Some(value),
                _ => {}
            }
        }
        params
    }

    /// Look up a multi-value facet filter by its logical name.
    pub fn get(&self, name: &str) -> Option<&str> {
        let value = match name {
            "org" => &self.org,
            "source_system" => &self.source_system,
            "theme" => &self.theme,
            "topic_category" => &self.topic_category,
            "type" => &self.r#type,
            "protocol" => &self.protocol,
            "eo_collection" => &self.eo_collection,
            "polarization" => &self.polarization,
            "orbit_direction" => &self.orbit_direction,
            _ => &None,
        };
        value.as_deref()
    }

    /// Trimmed query text; an absent `q` is the empty query.
    pub fn query_text(&self) -> &str {
        self.q.as_deref().map(str::trim).unwrap_or("")
    }
}

/// Pagination with safe defaulting: non-numeric or missing input falls back
/// to offset 0 and the default page size; the page size is clamped to the
/// configured maximum and never below 1.
pub fn parse_pagination(
    from: Option<&str>,
    size: Option<&str>,
    default_size: u64,
    max_size: u64,
) -> (u64, u64) {
    let from = from
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(0);
    let size = size
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default_size)
        .clamp(1, max_size);
    (from, size)
}
