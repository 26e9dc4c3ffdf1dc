// Cursor integration tests.
//
// The cursor walks slots in index order. Invariants exercised:
// - A new cursor rests on the first live entry, or is already at the end.
// - `advance` returns true iff it lands on a live entry; at the end it is
//   a no-op returning false.
// - `key`/`value`/`entry` are None exactly when the cursor is at the end.
// - A full walk visits every live entry once and skips tombstones.
mod common;

use std::collections::{BTreeMap, BTreeSet};
use strmap::Table;

// Test: cursor over an empty table.
// Verifies: at_end immediately; no key; advance refuses to move.
#[test]
fn empty_table_is_exhausted_at_creation() {
    let t: Table<String> = Table::new();
    let mut c = t.cursor();
    assert!(c.at_end());
    assert_eq!(c.key(), None);
    assert_eq!(c.value(), None);
    assert!(!c.advance());
    assert!(c.at_end());
}

// Test: manual walk with advance/key/value.
// Assumes: slot order is unrelated to insertion order.
// Verifies: every entry is visited once with its own value.
#[test]
fn manual_walk_visits_each_entry() {
    common::init_logger();
    let mut t = Table::new();
    let mut expected = BTreeMap::new();
    for i in 0..50 {
        let k = format!("entry-{}", i);
        t.insert(&k, i * 3).unwrap();
        expected.insert(k, i * 3);
    }

    let mut got = BTreeMap::new();
    let mut c = t.cursor();
    let mut steps = 0;
    while let Some(k) = c.key() {
        let v = c.value().expect("value present while key is");
        assert!(got.insert(k.to_string(), *v).is_none());
        let moved = c.advance();
        steps += 1;
        assert_eq!(moved, !c.at_end());
    }
    assert_eq!(steps, 50);
    assert_eq!(got, expected);
    assert!(!c.advance());
}

// Test: tombstones are invisible to the cursor.
// Verifies: removed keys never show up; survivors all do.
#[test]
fn walk_skips_removed_entries() {
    let mut t = Table::new();
    for i in 0..15 {
        t.insert(&format!("k{}", i), i).unwrap();
    }
    for i in (0..15).step_by(2) {
        t.remove(&format!("k{}", i));
    }

    let mut keys = BTreeSet::new();
    let mut c = t.cursor();
    while !c.at_end() {
        keys.insert(c.key().unwrap().to_string());
        c.advance();
    }
    let expected: BTreeSet<String> = (1..15).step_by(2).map(|i| format!("k{}", i)).collect();
    assert_eq!(keys, expected);
}

// Test: independent cursors.
// Verifies: cloned cursors advance independently over the same table.
#[test]
fn cloned_cursor_is_independent() {
    let mut t = Table::new();
    t.insert("a", 1).unwrap();
    t.insert("b", 2).unwrap();

    let mut c1 = t.cursor();
    let c2 = c1.clone();
    let first = c2.key();
    c1.advance();
    assert_eq!(c2.key(), first);
    assert_ne!(c1.key(), first);
}

// Test: Iterator adapter.
// Verifies: iter/keys/values agree with a manual cursor walk.
#[test]
fn iter_matches_cursor() {
    let mut t = Table::new();
    for i in 0..30 {
        t.insert(&format!("x{}", i), i).unwrap();
    }

    let mut walked = Vec::new();
    let mut c = t.cursor();
    while let Some((k, v)) = c.entry() {
        walked.push((k, *v));
        c.advance();
    }
    let iterated: Vec<(&str, i32)> = t.iter().map(|(k, v)| (k, *v)).collect();
    assert_eq!(walked, iterated);
    assert_eq!(t.keys().count(), 30);
    assert_eq!(t.values().sum::<i32>(), (0..30).sum());
}
