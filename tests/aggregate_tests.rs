use logsight::aggregate::{is_error_status, Aggregator};
use logsight::extract::{extract, ParsedFields};

#[test]
fn observe_counts_every_call_in_total() {
    let mut agg = Aggregator::new();
    agg.observe(&ParsedFields::default());
    agg.observe(&extract("garbage"));
    agg.observe(&extract(r#"1.1.1.1 "GET /a" 200"#));
    let snap = agg.snapshot();
    assert_eq!(snap.total, 3);
    assert_eq!(snap.addresses.get("1.1.1.1"), Some(1));
    assert_eq!(snap.paths.get("/a"), Some(1));
    assert_eq!(snap.statuses.get("200"), Some(1));
}

#[test]
fn only_404_and_500_are_errors() {
    let mut agg = Aggregator::new();
    for status in ["404", "500", "403", "502", "503", "200", "404"] {
        agg.observe(&ParsedFields { status: Some(status), ..Default::default() });
    }
    assert_eq!(agg.errors(), 3);
    assert!(is_error_status("404"));
    assert!(is_error_status("500"));
    assert!(!is_error_status("403"));
    assert!(!is_error_status("501"));
}

#[test]
fn status_sum_never_exceeds_total() {
    let lines = [
        r#"1.1.1.1 "GET /a" 200"#,
        "no status here",
        r#"- " 404"#,
        "1.1.1.2 only an address",
    ];
    let mut agg = Aggregator::new();
    for line in lines {
        agg.observe(&extract(line));
    }
    let snap = agg.snapshot();
    assert_eq!(snap.total, 4);
    assert_eq!(snap.statuses.total(), 2);
    assert!(snap.total >= snap.errors);
}

#[test]
fn reset_clears_all_state() {
    let mut agg = Aggregator::new();
    agg.observe(&extract(r#"1.1.1.1 "GET /a" 500"#));
    agg.reset();
    let snap = agg.snapshot();
    assert_eq!(snap, Aggregator::new().snapshot());
}

#[test]
fn snapshot_does_not_disturb_running_state() {
    let mut agg = Aggregator::new();
    agg.observe(&extract(r#"1.1.1.1 "GET /a" 404"#));
    let first = agg.snapshot();
    agg.observe(&extract(r#"1.1.1.1 "GET /a" 404"#));
    assert_eq!(first.total, 1);
    let second = agg.into_snapshot();
    assert_eq!(second.total, 2);
    assert_eq!(second.errors, 2);
    assert_eq!(second.addresses.get("1.1.1.1"), Some(2));
}
