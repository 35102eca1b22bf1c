use logsight::frequency::{top_key, FrequencyTable};

fn table(entries: &[(&str, u64)]) -> FrequencyTable {
    entries.iter().copied().collect()
}

#[test]
fn increment_counts_and_keeps_first_seen_order() {
    let mut t = FrequencyTable::new();
    assert_eq!(t.increment("b"), 1);
    assert_eq!(t.increment("a"), 1);
    assert_eq!(t.increment("b"), 2);
    assert_eq!(t.get("b"), Some(2));
    assert_eq!(t.get("missing"), None);
    assert_eq!(t.keys().collect::<Vec<_>>(), vec!["b", "a"]);
    assert_eq!(t.total(), 3);
    assert_eq!(t.len(), 2);
}

#[test]
fn top_key_prefers_first_inserted_among_ties() {
    let t = table(&[("a", 2), ("b", 2), ("c", 1)]);
    assert_eq!(top_key(&t), Some("a"));
    assert_eq!(top_key(&t), Some("a"));
    assert_eq!(t, table(&[("a", 2), ("b", 2), ("c", 1)]));

    let reversed = table(&[("b", 2), ("a", 2), ("c", 1)]);
    assert_eq!(top_key(&reversed), Some("b"));
}

#[test]
fn top_key_finds_strict_maximum_anywhere() {
    let t = table(&[("a", 1), ("b", 1), ("c", 5), ("d", 5)]);
    assert_eq!(t.top(), Some("c"));
}

#[test]
fn top_key_of_empty_table_is_none() {
    assert_eq!(top_key(&FrequencyTable::new()), None);
}

#[test]
fn equality_is_order_sensitive() {
    assert_ne!(table(&[("a", 1), ("b", 1)]), table(&[("b", 1), ("a", 1)]));
}

#[test]
fn serializes_as_map_in_first_seen_order() {
    let t = table(&[("500", 1), ("200", 3), ("404", 2)]);
    let json = serde_json::to_string(&t).unwrap();
    assert_eq!(json, r#"{"500":1,"200":3,"404":2}"#);

    let back: FrequencyTable = serde_json::from_str(&json).unwrap();
    assert_eq!(back, t);
}

#[test]
fn clear_empties_the_table() {
    let mut t = table(&[("a", 1)]);
    t.clear();
    assert!(t.is_empty());
    assert_eq!(t.increment("a"), 1);
}
