//! Field Mapping Registry: the single place where logical filter, sort, and
//! aggregation names are resolved to concrete document field paths.
//!
//! Loaded once at startup from a JSON object of
//! `logical name -> [field path, ...]` and never mutated afterwards, so it is
//! safe to share by reference across any number of concurrent requests.
//! Language variants are expressed as suffixed keys (`org_fr`, `sort_title_fr`);
//! resolution tries the suffixed key first and falls back to the base key.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::Language;

/// Logical names every deployment must map. Missing any of these is a
/// startup failure, not a per-request one.
pub const REQUIRED_KEYS: &[&str] = &[
    "org",
    "theme",
    "type",
    "protocol",
    "mappable",
    "source_system",
    "eo_collection",
    "polarization",
    "orbit_direction",
    "topic_category",
    "begin",
    "end",
    "geometry",
    "vector",
    "sort_date",
    "sort_popularity",
    "sort_title",
    "sort_org",
];

#[derive(Debug, Clone)]
pub struct FieldMappingRegistry {
    map: HashMap<String, Vec<String>>,
}

impl FieldMappingRegistry {
    /// Load and validate the registry from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read field mappings {}: {}", path.display(), e))
        })?;
        let map: HashMap<String, Vec<String>> = serde_json::from_str(&raw).map_err(|e| {
            Error::Config(format!("cannot parse field mappings {}: {}", path.display(), e))
        })?;
        Self::from_map(map)
    }

    /// Build the registry from an already-parsed map. Used by tests and by
    /// callers embedding the mapping in their own configuration.
    pub fn from_map(map: HashMap<String, Vec<String>>) -> Result<Self> {
        let registry = Self { map };
        registry.validate()?;
        Ok(registry)
    }

    fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = REQUIRED_KEYS
            .iter()
            .copied()
            .filter(|k| self.map.get(*k).map(|v| v.is_empty()).unwrap_or(true))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::Config(format!(
                "field mappings missing required keys: {}",
                missing.join(", ")
            )))
        }
    }

    /// Resolve a logical name to its field paths, preferring the
    /// language-suffixed variant when one is mapped.
    pub fn resolve(&self, name: &str, language: Language) -> Result<&[String]> {
        let suffixed = format!("{}_{}", name, language.suffix());
        if let Some(fields) = self.map.get(&suffixed) {
            if !fields.is_empty() {
                return Ok(fields);
            }
        }
        match self.map.get(name) {
            Some(fields) if !fields.is_empty() => Ok(fields),
            _ => Err(Error::Config(format!(
                "no field mapping for logical name '{}'",
                name
            ))),
        }
    }

    /// First mapped field path; used where exactly one field is meaningful
    /// (sorts, aggregations, the geometry and vector fields).
    pub fn first_field(&self, name: &str, language: Language) -> Result<&str> {
        Ok(self.resolve(name, language)?[0].as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }
}
