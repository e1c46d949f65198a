use std::collections::HashMap;
use std::io::Write;

use geosearch_core::mapping::{FieldMappingRegistry, REQUIRED_KEYS};
use geosearch_core::types::Language;
use geosearch_core::Error;

fn full_mapping() -> HashMap<String, Vec<String>> {
    let mut map: HashMap<String, Vec<String>> = REQUIRED_KEYS
        .iter()
        .map(|k| (k.to_string(), vec![format!("doc.{}", k)]))
        .collect();
    map.insert("org_fr".to_string(), vec!["doc.org_fr".to_string()]);
    map
}

#[test]
fn loads_from_json_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let json = serde_json::to_string(&full_mapping()).unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let registry = FieldMappingRegistry::from_path(file.path()).expect("load");
    assert_eq!(
        registry.resolve("theme", Language::En).unwrap().to_vec(),
        vec!["doc.theme".to_string()]
    );
}

#[test]
fn missing_required_key_fails_at_startup() {
    let mut map = full_mapping();
    map.remove("vector");
    map.remove("geometry");

    let err = FieldMappingRegistry::from_map(map).unwrap_err();
    match err {
        Error::Config(msg) => {
            assert!(msg.contains("vector"), "message names the key: {}", msg);
            assert!(msg.contains("geometry"), "message names the key: {}", msg);
        }
        other => panic!("expected Config error, got {:?}", other),
    }
}

#[test]
fn empty_field_list_counts_as_missing() {
    let mut map = full_mapping();
    map.insert("org".to_string(), Vec::new());

    assert!(FieldMappingRegistry::from_map(map).is_err());
}

#[test]
fn language_variant_preferred_over_base() {
    let registry = FieldMappingRegistry::from_map(full_mapping()).unwrap();

    assert_eq!(
        registry.resolve("org", Language::Fr).unwrap().to_vec(),
        vec!["doc.org_fr".to_string()]
    );
    // No en variant mapped: falls back to the base key.
    assert_eq!(
        registry.resolve("org", Language::En).unwrap().to_vec(),
        vec!["doc.org".to_string()]
    );
}

#[test]
fn unknown_logical_name_is_a_config_error() {
    let registry = FieldMappingRegistry::from_map(full_mapping()).unwrap();
    assert!(matches!(
        registry.resolve("nope", Language::En),
        Err(Error::Config(_))
    ));
}

#[test]
fn unreadable_file_is_a_config_error() {
    assert!(matches!(
        FieldMappingRegistry::from_path("/nonexistent/mappings.json"),
        Err(Error::Config(_))
    ));
}
