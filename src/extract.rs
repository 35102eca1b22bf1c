//! Field extraction for access-log lines of the shape
//! `IP ... "METHOD PATH ..." STATUS ...`.
//!
//! Each field has its own scanner. The scanners are independent passes over
//! the same line and match digit runs, never validated addresses.

/// Fields pulled out of one line. Every field is independently optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParsedFields<'a> {
    pub address: Option<&'a str>,
    pub path: Option<&'a str>,
    pub status: Option<&'a str>,
}

impl ParsedFields<'_> {
    pub fn is_empty(&self) -> bool {
        self.address.is_none() && self.path.is_none() && self.status.is_none()
    }
}

const METHODS: [&[u8]; 2] = [b"GET ", b"POST "];

pub fn extract(line: &str) -> ParsedFields<'_> {
    ParsedFields {
        address: scan_address(line),
        path: scan_request_path(line),
        status: scan_status(line),
    }
}

/// Dotted-quad prefix: four digit runs joined by three dots, anchored at the
/// start of the line. Octet values are not checked.
pub fn scan_address(line: &str) -> Option<&str> {
    let bytes = line.as_bytes();
    let mut pos = 0;
    for group in 0..4 {
        let run = digit_run(&bytes[pos..]);
        if run == 0 {
            return None;
        }
        pos += run;
        if group < 3 {
            if bytes.get(pos) != Some(&b'.') {
                return None;
            }
            pos += 1;
        }
    }
    Some(&line[..pos])
}

/// First `"GET <token>` or `"POST <token>`; returns the token, which runs
/// until the next space or the end of the line.
pub fn scan_request_path(line: &str) -> Option<&str> {
    let bytes = line.as_bytes();
    for quote in quote_positions(bytes) {
        let rest = &bytes[quote + 1..];
        let Some(method) = METHODS.iter().find(|m| rest.starts_with(m)) else {
            continue;
        };
        let start = quote + 1 + method.len();
        let len = bytes[start..].iter().take_while(|&&b| b != b' ').count();
        if len > 0 {
            return Some(&line[start..start + len]);
        }
    }
    None
}

/// First quote followed by a space and three digits; returns the digits.
/// Whatever follows the third digit is ignored.
pub fn scan_status(line: &str) -> Option<&str> {
    let bytes = line.as_bytes();
    for quote in quote_positions(bytes) {
        let start = quote + 2;
        if bytes.get(quote + 1) != Some(&b' ') {
            continue;
        }
        match bytes.get(start..start + 3) {
            Some(code) if code.iter().all(u8::is_ascii_digit) => {
                return Some(&line[start..start + 3]);
            }
            _ => {}
        }
    }
    None
}

fn digit_run(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

fn quote_positions(bytes: &[u8]) -> impl Iterator<Item = usize> + '_ {
    bytes
        .iter()
        .enumerate()
        .filter_map(|(i, &b)| (b == b'"').then_some(i))
}
