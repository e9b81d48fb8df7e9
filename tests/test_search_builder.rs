//! SearchQueryBuilder, SearchParams URL mirroring, and the free-text debouncer.

use std::time::{Duration, Instant};

use tcg_companion::filters::{FilterKind, FilterSet};
use tcg_companion::search_builder::{Debouncer, SearchParams, SearchQueryBuilder};

fn pair(k: &str, v: &str) -> (String, String) {
    (k.to_string(), v.to_string())
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

#[test]
fn new_builder_has_defaults() {
    let params = SearchQueryBuilder::new().build();
    assert_eq!(params, SearchParams::default());
    assert_eq!(params.page, 1);
    assert_eq!(params.page_size, 20);
    assert!(params.filters.is_empty());
}

#[test]
fn page_is_clamped_to_one() {
    let params = SearchQueryBuilder::new().page(0).build();
    assert_eq!(params.page, 1);
}

#[test]
fn page_size_is_clamped() {
    assert_eq!(SearchQueryBuilder::new().page_size(0).build().page_size, 1);
    assert_eq!(SearchQueryBuilder::new().page_size(500).build().page_size, 100);
    assert_eq!(SearchQueryBuilder::new().page_size(50).build().page_size, 50);
}

#[test]
fn changing_query_resets_page() {
    let mut builder = SearchQueryBuilder::new();
    builder.query("goblin").page(4);
    assert_eq!(builder.build().page, 4);

    builder.query("goblin");
    assert_eq!(builder.build().page, 4, "same text keeps the page");

    builder.query("elf");
    assert_eq!(builder.build().page, 1);
}

#[test]
fn changing_sort_or_filters_resets_page() {
    let mut builder = SearchQueryBuilder::new();
    builder.page(3).sort("name_asc");
    assert_eq!(builder.build().page, 1);

    builder.page(3).filter(FilterKind::And, "color", "R", "Red");
    assert_eq!(builder.build().page, 1);

    builder.page(3).filter(FilterKind::And, "color", "R", "Red");
    assert_eq!(builder.build().page, 3, "duplicate filter is not a change");

    let mut replacement = FilterSet::new();
    replacement.add(FilterKind::Not, "type", "Land", "Not land");
    builder.filters(replacement);
    assert_eq!(builder.build().page, 1);
}

#[test]
fn from_params_continues_previous_request() {
    let first = SearchQueryBuilder::new().query("bolt").page(2).build();
    let next = SearchQueryBuilder::from_params(first.clone()).page(3).build();
    assert_eq!(next.free_text, "bolt");
    assert_eq!(next.page, 3);
}

// ---------------------------------------------------------------------------
// Query pairs
// ---------------------------------------------------------------------------

#[test]
fn to_query_pairs_orders_core_fields_then_filters() {
    let params = SearchQueryBuilder::new()
        .query("  goblin guide ")
        .sort("price_desc")
        .filter(FilterKind::Or, "color", "R", "Red")
        .filter(FilterKind::Not, "rarity", "common", "Not common")
        .page(2)
        .page_size(40)
        .build();

    assert_eq!(
        params.to_query_pairs(),
        vec![
            pair("q", "goblin guide"),
            pair("sort", "price_desc"),
            pair("page", "2"),
            pair("per_page", "40"),
            pair("or_color", "R"),
            pair("not_rarity", "common"),
        ]
    );
}

#[test]
fn empty_text_and_sort_are_omitted() {
    let params = SearchQueryBuilder::new().query("   ").build();
    assert_eq!(
        params.to_query_pairs(),
        vec![pair("page", "1"), pair("per_page", "20")]
    );
}

#[test]
fn query_pairs_mirror_back_into_params() {
    let params = SearchQueryBuilder::new()
        .query("dragon")
        .sort("name_asc")
        .filter(FilterKind::And, "set_name", "Alpha", "Alpha")
        .page(5)
        .page_size(10)
        .build();

    let restored = SearchParams::from_query_pairs(&params.to_query_pairs());
    assert_eq!(restored.free_text, "dragon");
    assert_eq!(restored.sort_key, "name_asc");
    assert_eq!(restored.page, 5);
    assert_eq!(restored.page_size, 10);
    assert!(restored.filters.contains(FilterKind::And, "set_name", "Alpha"));
}

#[test]
fn from_query_pairs_tolerates_bad_numbers_and_unknown_keys() {
    let pairs = [
        ("page", "abc"),
        ("per_page", "-3"),
        ("utm_source", "mail"),
        ("or_color", "U"),
    ];
    let params = SearchParams::from_query_pairs(&pairs);
    assert_eq!(params.page, 1);
    assert_eq!(params.page_size, 20);
    assert_eq!(params.filters.len(), 1);
}

#[test]
fn query_string_is_percent_encoded() {
    let params = SearchQueryBuilder::new()
        .query("fire & ice")
        .filter(FilterKind::And, "type", "Sorcery/Instant", "Spells")
        .build();
    assert_eq!(
        params.to_query_string(),
        "q=fire+%26+ice&page=1&per_page=20&and_type=Sorcery%2FInstant"
    );
}

#[test]
fn query_string_encodes_non_ascii_as_utf8() {
    let params = SearchQueryBuilder::new().query("Éclair").build();
    assert_eq!(params.to_query_string(), "q=%C3%89clair&page=1&per_page=20");
}

#[test]
fn search_url_matches_mirrored_query_string() {
    let params = SearchQueryBuilder::new()
        .query("fire & ice")
        .filter(FilterKind::Or, "color", "R", "Red")
        .build();
    let url = params.to_url("http://cards.example/").unwrap();
    assert_eq!(url.path(), "/api/search");
    assert_eq!(url.query(), Some(params.to_query_string().as_str()));

    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    let restored = SearchParams::from_query_pairs(&pairs);
    assert_eq!(restored.free_text, "fire & ice");
    assert!(restored.filters.contains(FilterKind::Or, "color", "R"));
}

#[test]
fn invalid_base_url_is_rejected() {
    let params = SearchQueryBuilder::new().build();
    assert!(params.to_url("not a url").is_err());
}

// ---------------------------------------------------------------------------
// Debouncer
// ---------------------------------------------------------------------------

#[test]
fn debouncer_releases_after_quiet_period() {
    let start = Instant::now();
    let mut debouncer = Debouncer::default();

    debouncer.input("gob", start);
    assert_eq!(debouncer.poll(start + Duration::from_millis(100)), None);
    assert_eq!(
        debouncer.poll(start + Duration::from_millis(300)),
        Some("gob".to_string())
    );
    assert_eq!(debouncer.poll(start + Duration::from_millis(900)), None);
}

#[test]
fn debouncer_restarts_on_new_input() {
    let start = Instant::now();
    let mut debouncer = Debouncer::new(Duration::from_millis(300));

    debouncer.input("g", start);
    debouncer.input("go", start + Duration::from_millis(200));
    assert_eq!(debouncer.poll(start + Duration::from_millis(350)), None);
    assert_eq!(
        debouncer.remaining(start + Duration::from_millis(350)),
        Some(Duration::from_millis(150))
    );
    assert_eq!(
        debouncer.poll(start + Duration::from_millis(500)),
        Some("go".to_string())
    );
    assert!(!debouncer.is_pending());
}

#[test]
fn debouncer_cancel_drops_pending_input() {
    let start = Instant::now();
    let mut debouncer = Debouncer::default();
    debouncer.input("elf", start);
    debouncer.cancel();
    assert_eq!(debouncer.poll(start + Duration::from_secs(1)), None);
    assert_eq!(debouncer.remaining(start), None);
}
