//! Session store implementations, the hand, and the print list.

mod common;

use std::fs;

use common::{artless_card, print_item, sample_card};
use tcg_companion::config;
use tcg_companion::store::{self, FileStore, MemoryStore, SessionStore};
use tcg_companion::{CompanionClient, Hand, PrintList};

// ---------------------------------------------------------------------------
// Stores
// ---------------------------------------------------------------------------

fn exercise_store(session: &dyn SessionStore) {
    assert_eq!(session.get_raw("hand").unwrap(), None);

    session.set_raw("hand", "[1,2]").unwrap();
    assert_eq!(session.get_raw("hand").unwrap().as_deref(), Some("[1,2]"));

    session.set_raw("hand", "[3]").unwrap();
    assert_eq!(session.get_raw("hand").unwrap().as_deref(), Some("[3]"));

    session.remove("hand").unwrap();
    session.remove("hand").unwrap();
    assert_eq!(session.get_raw("hand").unwrap(), None);

    session.set_raw("a", "1").unwrap();
    session.set_raw("b", "2").unwrap();
    session.clear().unwrap();
    assert_eq!(session.get_raw("a").unwrap(), None);
    assert_eq!(session.get_raw("b").unwrap(), None);
}

#[test]
fn memory_store_basic_operations() {
    exercise_store(&MemoryStore::new());
}

#[test]
fn file_store_basic_operations() {
    let tmp = tempfile::tempdir().unwrap();
    let session = FileStore::new(Some(tmp.path().join("session"))).unwrap();
    exercise_store(&session);
}

#[test]
fn file_store_persists_across_instances() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().to_path_buf();
    {
        let session = FileStore::new(Some(dir.clone())).unwrap();
        store::save(&session, config::DECK_COUNTER_KEY, &5u64).unwrap();
    }
    let session = FileStore::new(Some(dir.clone())).unwrap();
    let count: Option<u64> = store::load(&session, config::DECK_COUNTER_KEY).unwrap();
    assert_eq!(count, Some(5));
    assert!(dir.join("deck_counter.json").exists());
}

#[test]
fn file_store_sanitizes_keys() {
    let tmp = tempfile::tempdir().unwrap();
    let session = FileStore::new(Some(tmp.path().to_path_buf())).unwrap();
    session.set_raw("../escape", "1").unwrap();
    assert!(tmp.path().join("___escape.json").exists());
    assert_eq!(session.get_raw("../escape").unwrap().as_deref(), Some("1"));
}

#[test]
fn file_store_clear_leaves_foreign_files_alone() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().to_path_buf();
    fs::write(dir.join("package.json"), "{}").unwrap();
    fs::write(dir.join("notes.txt"), "keep").unwrap();

    {
        let session = FileStore::new(Some(dir.clone())).unwrap();
        session.set_raw(config::HAND_KEY, "[]").unwrap();
        session.set_raw("custom", "1").unwrap();
    }
    // A later instance still knows what the earlier one wrote.
    let session = FileStore::new(Some(dir.clone())).unwrap();
    session.clear().unwrap();

    assert!(!dir.join("hand.json").exists());
    assert!(!dir.join("custom.json").exists());
    assert_eq!(fs::read_to_string(dir.join("package.json")).unwrap(), "{}");
    assert!(dir.join("notes.txt").exists());
}

#[test]
fn file_store_forgets_removed_keys() {
    let tmp = tempfile::tempdir().unwrap();
    let session = FileStore::new(Some(tmp.path().to_path_buf())).unwrap();
    session.set_raw("a", "1").unwrap();
    session.remove("a").unwrap();

    // Recreated by hand after removal: no longer owned by the store.
    fs::write(tmp.path().join("a.json"), "mine").unwrap();
    session.clear().unwrap();
    assert!(tmp.path().join("a.json").exists());
}

#[test]
fn corrupt_entry_is_dropped_on_load() {
    let session = MemoryStore::new();
    session.set_raw(config::HAND_KEY, "{not json").unwrap();
    let hand = Hand::load(&session).unwrap();
    assert!(hand.is_empty());
    assert_eq!(session.get_raw(config::HAND_KEY).unwrap(), None);
}

// ---------------------------------------------------------------------------
// Hand
// ---------------------------------------------------------------------------

#[test]
fn hand_merges_repeated_adds() {
    let mut hand = Hand::new();
    let bolt = sample_card(1, "Lightning Bolt");
    hand.add(&bolt, 2);
    hand.add(&bolt, 1);
    hand.add(&sample_card(2, "Shock"), 1);
    hand.add(&sample_card(3, "Zero"), 0);

    assert_eq!(hand.items().len(), 2);
    assert_eq!(hand.quantity_of(1), 3);
    assert_eq!(hand.quantity_of(3), 0);
    assert_eq!(hand.total_items(), 4);
}

#[test]
fn hand_total_does_not_overflow() {
    let mut hand = Hand::new();
    hand.add(&sample_card(1, "Lightning Bolt"), u32::MAX);
    hand.add(&sample_card(1, "Lightning Bolt"), 1);
    hand.add(&sample_card(2, "Shock"), u32::MAX);
    assert_eq!(hand.quantity_of(1), u32::MAX);
    assert_eq!(hand.total_items(), 2 * u64::from(u32::MAX));
}

#[test]
fn hand_set_quantity_and_remove() {
    let mut hand = Hand::new();
    hand.add(&sample_card(1, "Lightning Bolt"), 2);
    hand.add(&sample_card(2, "Shock"), 1);

    assert!(hand.set_quantity(1, 4));
    assert_eq!(hand.quantity_of(1), 4);
    assert!(hand.set_quantity(2, 0));
    assert_eq!(hand.quantity_of(2), 0);
    assert!(!hand.set_quantity(99, 1));

    assert_eq!(hand.remove(1).unwrap().quantity, 4);
    assert!(hand.is_empty());
}

#[test]
fn hand_annotates_results_by_card_id() {
    let mut hand = Hand::new();
    hand.add(&sample_card(2, "Shock"), 3);
    let page_two = vec![sample_card(5, "Fireblast"), sample_card(2, "Shock")];
    let annotated = hand.annotate(&page_two);
    assert_eq!(annotated[0].1, 0);
    assert_eq!(annotated[1].1, 3);
}

#[test]
fn hand_round_trips_through_store() {
    let session = MemoryStore::new();
    let mut hand = Hand::new();
    hand.add(&sample_card(1, "Lightning Bolt"), 2);
    hand.save(&session).unwrap();
    assert_eq!(Hand::load(&session).unwrap(), hand);
}

// ---------------------------------------------------------------------------
// Print list
// ---------------------------------------------------------------------------

#[test]
fn print_list_merges_by_url_and_flattens_per_copy() {
    let mut list = PrintList::new();
    list.add(print_item("a.png", "Alpha", 2));
    list.add(print_item("b.png", "Beta", 1));
    list.add(print_item("a.png", "Alpha", 1));
    list.add(print_item("c.png", "Gamma", 0));

    assert_eq!(list.items().len(), 2);
    assert_eq!(list.total_copies(), 4);
    let names: Vec<&str> = list.flatten().iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Alpha", "Alpha", "Beta"]);
}

#[test]
fn print_list_quantity_updates() {
    let mut list = PrintList::from_items(vec![
        print_item("a.png", "Alpha", 2),
        print_item("b.png", "Beta", 1),
    ]);
    assert!(list.set_quantity("a.png", 5));
    assert!(list.set_quantity("b.png", 0));
    assert!(!list.set_quantity("z.png", 1));
    assert_eq!(list.total_copies(), 5);
    assert!(list.remove("a.png").is_some());
    assert!(list.is_empty());
}

#[test]
fn print_list_takes_cards_with_art_only() {
    let mut list = PrintList::new();
    assert!(list.add_card(&sample_card(1, "Lightning Bolt"), 4));
    assert!(!list.add_card(&artless_card(2, "Mystery"), 1));
    assert_eq!(list.total_copies(), 4);
    assert_eq!(list.items()[0].set_name.as_deref(), Some("Alpha"));
}

#[test]
fn print_list_extends_from_hand() {
    let mut hand = Hand::new();
    hand.add(&sample_card(1, "Lightning Bolt"), 2);
    hand.add(&artless_card(2, "Mystery"), 1);

    let mut list = PrintList::new();
    list.extend_from_hand(&hand);
    assert_eq!(list.items().len(), 1);
    assert_eq!(list.total_copies(), 2);
}

// ---------------------------------------------------------------------------
// Client session lifecycle
// ---------------------------------------------------------------------------

#[test]
fn logout_clears_session_state() {
    let mut client = CompanionClient::builder()
        .base_url("http://localhost:1")
        .auth_token("secret")
        .in_memory_session()
        .build()
        .unwrap();

    let mut hand = Hand::new();
    hand.add(&sample_card(1, "Lightning Bolt"), 1);
    client.save_hand(&hand).unwrap();
    let mut list = PrintList::new();
    list.add(print_item("a.png", "Alpha", 1));
    client.save_print_list(&list).unwrap();

    assert!(client.to_string().contains("authenticated=true"));
    client.logout().unwrap();

    assert!(client.hand().unwrap().is_empty());
    assert!(client.print_list().unwrap().is_empty());
    assert!(client.to_string().contains("authenticated=false"));
}
