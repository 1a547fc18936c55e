//! Search box query parser
//!
//! Turns a single line typed into the search box into [`SearchFilters`]:
//! - `from:alice@example.com` or `from:"Alice Smith"` - sender filter
//! - `subject:meeting` - subject filter
//! - `after:2024-01-01` - start date (inclusive)
//! - `before:2024/01/31` - end date (inclusive, whole day)
//!
//! Everything else is joined into the free-text query. Operators with an
//! unparseable date are dropped.

use super::filters::{SearchFilters, parse_date};

const OPERATORS: [&str; 4] = ["from", "subject", "after", "before"];

/// Parse a search line into structured filters
pub fn parse_query(input: &str) -> SearchFilters {
    let mut filters = SearchFilters::default();
    let mut terms: Vec<String> = Vec::new();
    let mut rest = input;

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }

        if let Some((key, value, consumed)) = parse_operator(rest) {
            match key.as_str() {
                "from" => filters.from = value,
                "subject" => filters.subject = value,
                "after" => {
                    if let Ok(date) = parse_date(&value) {
                        filters.start_date = date;
                    }
                }
                "before" => {
                    if let Ok(date) = parse_date(&value) {
                        filters.end_date = date;
                    }
                }
                _ => {}
            }
            rest = &rest[consumed..];
        } else {
            let (word, consumed) = parse_value(rest);
            if !word.is_empty() {
                terms.push(word);
            }
            rest = &rest[consumed..];
        }
    }

    filters.query = terms.join(" ");
    filters
}

/// Parse an operator like `from:value` or `from:"quoted value"`
///
/// Returns the lowercased key, the value and the number of bytes consumed.
fn parse_operator(input: &str) -> Option<(String, String, usize)> {
    let colon = input.find(':')?;
    let key = &input[..colon];
    if key.chars().any(char::is_whitespace) {
        return None;
    }
    let key = key.to_lowercase();
    if !OPERATORS.contains(&key.as_str()) {
        return None;
    }

    let (value, value_len) = parse_value(&input[colon + 1..]);
    if value.is_empty() {
        return None;
    }
    Some((key, value, colon + 1 + value_len))
}

/// Parse a quoted phrase or a bare word, returning it and the bytes consumed
fn parse_value(input: &str) -> (String, usize) {
    if let Some(quoted) = input.strip_prefix('"') {
        return match quoted.find('"') {
            Some(end) => (quoted[..end].to_string(), end + 2),
            None => (quoted.to_string(), input.len()),
        };
    }

    let end = input.find(char::is_whitespace).unwrap_or(input.len());
    (input[..end].to_string(), end)
}
