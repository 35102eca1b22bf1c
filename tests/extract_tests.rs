use logsight::extract::{extract, scan_address, scan_request_path, scan_status, ParsedFields};
use once_cell::sync::Lazy;
use regex::Regex;

// Reference patterns the scanners must agree with. `[0-9]` rather than `\d`
// because only ASCII digits count.
static RE_ADDRESS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9]+\.[0-9]+\.[0-9]+\.[0-9]+)").unwrap());
static RE_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r#""(GET|POST) ([^ ]+)"#).unwrap());
static RE_STATUS: Lazy<Regex> = Lazy::new(|| Regex::new(r#"" ([0-9]{3})"#).unwrap());

fn oracle(line: &str) -> ParsedFields<'_> {
    ParsedFields {
        address: RE_ADDRESS.captures(line).and_then(|c| c.get(1)).map(|m| m.as_str()),
        path: RE_PATH.captures(line).and_then(|c| c.get(2)).map(|m| m.as_str()),
        status: RE_STATUS.captures(line).and_then(|c| c.get(1)).map(|m| m.as_str()),
    }
}

const TRICKY_LINES: &[&str] = &[
    r#"10.0.0.1 - - "GET /a HTTP/1.1" 200 -"#,
    r#"10.0.0.2 - - "POST /a HTTP/1.1" 500 -"#,
    r#"999.888.777.666 - - "GET /x HTTP/1.1" 404 12"#,
    r#"1.2.3.4.5 - - "GET /deep/path?q=1&r=2 HTTP/1.0" 301 -"#,
    r#"1.2.3 - - "GET /short HTTP/1.1" 200 -"#,
    r#"1.2.3. - - "GET / HTTP/1.1" 200 -"#,
    r#" 1.2.3.4 leading space "GET /a" 200"#,
    r#"a1.2.3.4 "GET /a" 200"#,
    r#"1..2.3.4 "GET /a" 200"#,
    r#"1.2.3.4"#,
    r#"1.2.3.4"GET /glued" 2001"#,
    r#"x "PUT /nope HTTP/1.1" 201 -"#,
    r#"x "DELETE /nope" 204"#,
    r#"x "GET  /double-space" 200"#,
    r#"x "GET " 200"#,
    r#"x "GET"#,
    r#"x ""GET /after-empty-quote HTTP/1.1" 418"#,
    r#"x "get /lowercase" 200"#,
    r#"x "GET /tab	separated HTTP/1.1" 200"#,
    r#"x "GET /quote"inside HTTP/1.1" 200"#,
    r#"x "POST /first" "GET /second" 201"#,
    r#"x " abc" 404"#,
    r#"x " 12" " 345"#,
    r#"x "  200"#,
    r#"x " 20"#,
    r#"x "GET /ünïcödé HTTP/1.1" 200 -"#,
    r#"١٢.٣.٤.٥ "GET /arabic-digits" ٢٠٠"#,
    "",
    "malformed line with no structure",
    "\"",
];

#[test]
fn scanners_agree_with_reference_patterns() {
    for line in TRICKY_LINES {
        assert_eq!(extract(line), oracle(line), "line: {line:?}");
    }
}

#[test]
fn common_log_line_yields_all_three_fields() {
    let fields = extract(r#"1.2.3.4 - - [10/Oct/2000:13:55:36 -0700] "GET /x HTTP/1.1" 200 2326"#);
    assert_eq!(fields.address, Some("1.2.3.4"));
    assert_eq!(fields.path, Some("/x"));
    assert_eq!(fields.status, Some("200"));
}

#[test]
fn address_must_start_the_line() {
    assert_eq!(scan_address("host 1.2.3.4 GET"), None);
    assert_eq!(scan_address(" 1.2.3.4"), None);
    assert_eq!(scan_address("-"), None);
}

#[test]
fn address_is_not_range_checked() {
    assert_eq!(scan_address("999.999.999.999 x"), Some("999.999.999.999"));
    assert_eq!(scan_address("0001.2.3.45678"), Some("0001.2.3.45678"));
}

#[test]
fn path_takes_token_after_method_only() {
    assert_eq!(scan_request_path(r#""POST /api/v1/items?x=1 HTTP/2""#), Some("/api/v1/items?x=1"));
    assert_eq!(scan_request_path(r#""HEAD /x HTTP/1.1""#), None);
    assert_eq!(scan_request_path("GET /no-quote HTTP/1.1"), None);
}

#[test]
fn path_token_runs_to_end_of_line() {
    assert_eq!(scan_request_path(r#"x "GET /tail"#), Some("/tail"));
}

#[test]
fn status_takes_exactly_three_digits() {
    assert_eq!(scan_status(r#""GET /a" 2000"#), Some("200"));
    assert_eq!(scan_status(r#""GET /a" 20"#), None);
    assert_eq!(scan_status(r#""GET /a" -"#), None);
}

#[test]
fn fields_are_independent() {
    let only_status = extract(r#"- " 503"#);
    assert_eq!(only_status, ParsedFields { address: None, path: None, status: Some("503") });

    let only_address = extract("10.1.1.1 nothing else");
    assert_eq!(only_address.address, Some("10.1.1.1"));
    assert!(only_address.path.is_none() && only_address.status.is_none());

    assert!(extract("malformed line with no structure").is_empty());
}
