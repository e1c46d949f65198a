use std::collections::HashMap;

use serde_json::json;

use geosearch_core::mapping::{FieldMappingRegistry, REQUIRED_KEYS};
use geosearch_core::types::Language;
use geosearch_core::Error;
use geosearch_query::filter::{
    build_date_filter, build_filters, build_mappable_filter, build_spatial_filter,
    build_wildcard_filter, BoundingBox, FilterSpec,
};
use geosearch_query::SearchParams;

fn registry() -> FieldMappingRegistry {
    let mut map: HashMap<String, Vec<String>> = REQUIRED_KEYS
        .iter()
        .map(|k| (k.to_string(), vec![format!("doc.{}", k)]))
        .collect();
    map.insert(
        "org".to_string(),
        vec!["organisation".to_string(), "contact.organisation".to_string()],
    );
    FieldMappingRegistry::from_map(map).expect("test registry")
}

#[test]
fn wildcard_builds_n_by_m_disjunction() {
    let reg = registry();
    let spec = build_wildcard_filter("org", "nrcan, eccc", &reg, Language::En)
        .unwrap()
        .expect("filter present");

    let FilterSpec::Wildcard { fields, terms } = &spec else {
        panic!("expected wildcard, got {:?}", spec);
    };
    assert_eq!(fields.len(), 2);
    assert_eq!(terms, &["nrcan".to_string(), "eccc".to_string()]);

    let clause = spec.to_clause();
    let should = clause["bool"]["should"].as_array().unwrap();
    assert_eq!(should.len(), 4, "2 fields x 2 tokens");
    assert_eq!(clause["bool"]["minimum_should_match"], 1);
    assert_eq!(
        should[0]["wildcard"]["organisation"]["value"],
        json!("*nrcan*")
    );
    assert_eq!(
        should[0]["wildcard"]["organisation"]["case_insensitive"],
        json!(true)
    );
}

#[test]
fn wildcard_trims_and_drops_empty_tokens() {
    let reg = registry();
    let spec = build_wildcard_filter("theme", " water , ,  ice ", &reg, Language::En)
        .unwrap()
        .expect("filter present");
    let FilterSpec::Wildcard { terms, .. } = spec else {
        panic!("expected wildcard");
    };
    assert_eq!(terms, vec!["water".to_string(), "ice".to_string()]);
}

#[test]
fn all_empty_value_means_filter_omitted_not_error() {
    let reg = registry();
    assert!(build_wildcard_filter("theme", " , ,", &reg, Language::En)
        .unwrap()
        .is_none());
    assert!(build_wildcard_filter("theme", "", &reg, Language::En)
        .unwrap()
        .is_none());
}

#[test]
fn mappable_parses_booleans_and_rejects_junk() {
    let reg = registry();
    let spec = build_mappable_filter("true", &reg, Language::En)
        .unwrap()
        .expect("filter present");
    assert_eq!(
        spec.to_clause(),
        json!({ "term": { "doc.mappable": true } })
    );

    assert!(build_mappable_filter("  ", &reg, Language::En)
        .unwrap()
        .is_none());
    assert!(matches!(
        build_mappable_filter("maybe", &reg, Language::En),
        Err(Error::FilterValidation(_))
    ));
}

#[test]
fn date_filter_bounds() {
    // Both bounds: inclusive range on both ends.
    let spec = build_date_filter("published", Some("2020-01-15"), Some("2021-06-30"))
        .unwrap()
        .expect("range present");
    assert_eq!(
        spec.to_clause(),
        json!({ "range": { "published": { "gte": "2020-01-15", "lte": "2021-06-30" } } })
    );

    // One bound: half-open.
    let spec = build_date_filter("published", Some("2020-01-15"), None)
        .unwrap()
        .expect("range present");
    assert_eq!(
        spec.to_clause(),
        json!({ "range": { "published": { "gte": "2020-01-15" } } })
    );

    // Neither: omitted.
    assert!(build_date_filter("published", None, None).unwrap().is_none());
}

#[test]
fn partial_dates_widen_to_the_whole_period() {
    let spec = build_date_filter("published", Some("2019"), Some("2020-02"))
        .unwrap()
        .expect("range present");
    assert_eq!(
        spec.to_clause(),
        json!({ "range": { "published": { "gte": "2019-01-01", "lte": "2020-02-29" } } })
    );
}

#[test]
fn no_date_sentinels_are_ignored() {
    assert!(build_date_filter("published", Some("null"), None)
        .unwrap()
        .is_none());
    assert!(
        build_date_filter("published", Some("not available; indisponible"), None)
            .unwrap()
            .is_none()
    );
}

#[test]
fn present_end_bound_becomes_a_concrete_date() {
    let spec = build_date_filter("published", None, Some("present"))
        .unwrap()
        .expect("range present");
    let FilterSpec::Range { to: Some(to), .. } = spec else {
        panic!("expected upper bound");
    };
    assert_eq!(to.len(), 10, "YYYY-MM-DD, got '{}'", to);
}

#[test]
fn bbox_with_two_components_is_rejected() {
    assert!(matches!(
        build_spatial_filter("coordinates", "10|20", None),
        Err(Error::FilterValidation(_))
    ));
}

#[test]
fn bbox_with_non_numeric_component_is_rejected() {
    assert!(matches!(
        build_spatial_filter("coordinates", "10|west|30|40", None),
        Err(Error::FilterValidation(_))
    ));
}

#[test]
fn bbox_out_of_range_is_rejected() {
    assert!(build_spatial_filter("coordinates", "95|20|30|40", None).is_err());
    assert!(build_spatial_filter("coordinates", "10|-200|30|40", None).is_err());
}

#[test]
fn valid_bbox_with_within_relation() {
    let spec = build_spatial_filter("coordinates", "10|20|30|40", Some("within")).unwrap();
    let FilterSpec::Spatial {
        bbox, relation, ..
    } = &spec
    else {
        panic!("expected spatial");
    };
    assert_eq!(relation, "within");
    assert_eq!(
        *bbox,
        BoundingBox {
            south: 10.0,
            west: 20.0,
            north: 30.0,
            east: 40.0
        }
    );

    let clause = spec.to_clause();
    assert_eq!(
        clause["geo_shape"]["coordinates"]["shape"]["coordinates"],
        json!([[20.0, 30.0], [40.0, 10.0]])
    );
    assert_eq!(clause["geo_shape"]["coordinates"]["relation"], json!("within"));
}

#[test]
fn relation_defaults_to_intersects_and_rejects_unknown() {
    let spec = build_spatial_filter("coordinates", "10|20|30|40", None).unwrap();
    let FilterSpec::Spatial { relation, .. } = spec else {
        panic!("expected spatial");
    };
    assert_eq!(relation, "intersects");

    assert!(matches!(
        build_spatial_filter("coordinates", "10|20|30|40", Some("touches")),
        Err(Error::FilterValidation(_))
    ));
}

#[test]
fn build_filters_combines_all_specified_filters() {
    let reg = registry();
    let params = SearchParams::from_pairs([
        ("org", "nrcan"),
        ("theme", "water,ice"),
        ("mappable", "true"),
        ("begin", "2020"),
        ("end", "2021"),
        ("bbox", "41|-141|84|-52"),
        ("relation", "within"),
    ]);

    let filters = build_filters(&params, &reg, Language::En).expect("valid filters");
    // org + theme + mappable + begin range + end range + spatial
    assert_eq!(filters.len(), 6);
    assert!(filters
        .iter()
        .any(|f| matches!(f, FilterSpec::Spatial { .. })));
}

#[test]
fn build_filters_skips_unspecified_and_empty() {
    let reg = registry();
    let params = SearchParams::from_pairs([("org", " , "), ("bbox", "  ")]);
    let filters = build_filters(&params, &reg, Language::En).expect("valid filters");
    assert!(filters.is_empty());
}

#[test]
fn build_filters_fails_fast_on_bad_bbox() {
    let reg = registry();
    let params = SearchParams::from_pairs([("bbox", "41|-141")]);
    assert!(matches!(
        build_filters(&params, &reg, Language::En),
        Err(Error::FilterValidation(_))
    ));
}
