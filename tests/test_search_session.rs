//! SearchSession: stale results on failure, pagination helpers.

mod common;

use common::sample_card;
use tcg_companion::models::{Pagination, SearchResponse};
use tcg_companion::queries::SearchSession;
use tcg_companion::{CompanionError, SearchQueryBuilder};

fn response(page: u32, total_pages: u32) -> SearchResponse {
    SearchResponse {
        cards: vec![sample_card(page as i64, "Result")],
        pagination: Pagination {
            current_page: page,
            total_pages,
            per_page: 20,
            total_cards: total_pages as u64 * 20,
            has_next: page < total_pages,
            has_prev: page > 1,
        },
    }
}

#[test]
fn successful_refresh_replaces_results() {
    let mut session = SearchSession::new();
    let params = SearchQueryBuilder::new().query("bolt").build();

    assert!(session.refresh_with(params.clone(), |p| Ok(response(p.page, 3))));
    assert_eq!(session.params(), Some(&params));
    assert_eq!(session.response().unwrap().pagination.current_page, 1);
    assert!(!session.has_error());
}

#[test]
fn failed_refresh_keeps_previous_results_and_flags_error() {
    let mut session = SearchSession::new();
    let first = SearchQueryBuilder::new().query("bolt").build();
    session.refresh_with(first.clone(), |p| Ok(response(p.page, 3)));

    let second = SearchQueryBuilder::new().query("shock").build();
    let replaced = session.refresh_with(second, |_| {
        Err(CompanionError::Api {
            status: 500,
            message: "boom".to_string(),
        })
    });

    assert!(!replaced);
    assert!(session.has_error());
    assert!(session.last_error().unwrap().contains("boom"));
    assert_eq!(session.params(), Some(&first));
    assert_eq!(session.response().unwrap().cards.len(), 1);

    // A later success clears the flag.
    session.refresh_with(first, |p| Ok(response(p.page, 3)));
    assert!(!session.has_error());
}

#[test]
fn next_and_prev_page_follow_pagination() {
    let mut session = SearchSession::new();
    assert!(session.next_page().is_none());

    let params = SearchQueryBuilder::new().query("bolt").page(2).build();
    session.refresh_with(params, |p| Ok(response(p.page, 3)));

    let next = session.next_page().unwrap();
    assert_eq!(next.page, 3);
    assert_eq!(next.free_text, "bolt");
    let prev = session.prev_page().unwrap();
    assert_eq!(prev.page, 1);

    session.refresh_with(next, |p| Ok(response(p.page, 3)));
    assert!(session.next_page().is_none());
}

#[test]
fn next_page_stops_at_the_largest_page_number() {
    let mut session = SearchSession::new();
    let params = SearchQueryBuilder::new().page(u32::MAX).build();
    session.refresh_with(params, |_| {
        let mut last = response(u32::MAX - 1, u32::MAX);
        last.pagination.current_page = u32::MAX;
        last.pagination.has_next = true;
        Ok(last)
    });
    assert!(session.next_page().is_none());
}

#[test]
fn goto_page_checks_range() {
    let mut session = SearchSession::new();
    assert!(session.goto_page(1).is_err());

    session.refresh_with(SearchQueryBuilder::new().build(), |p| Ok(response(p.page, 4)));
    assert_eq!(session.goto_page(4).unwrap().page, 4);
    assert!(session.goto_page(0).is_err());
    assert!(session.goto_page(5).is_err());
}

#[test]
fn search_response_parses_backend_shape() {
    let body = serde_json::json!({
        "cards": [
            { "id": 11, "name": "Goblin Guide", "set_name": "Zendikar", "number": "126",
              "image_url": "https://img.example/11.png", "mana_cost": "{R}" }
        ],
        "pagination": {
            "current_page": 1, "total_pages": 5, "per_page": 20,
            "total_cards": 93, "has_next": true, "has_prev": false
        }
    });
    let parsed: SearchResponse = serde_json::from_value(body).unwrap();
    assert_eq!(parsed.cards[0].name, "Goblin Guide");
    assert_eq!(parsed.cards[0].label(), "Goblin Guide (Zendikar #126)");
    assert_eq!(parsed.cards[0].extra["mana_cost"], "{R}");
    assert_eq!(parsed.pagination.total_cards, 93);
    assert!(parsed.pagination.has_next);
}
