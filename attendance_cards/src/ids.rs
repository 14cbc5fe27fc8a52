use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

// Three digits minimum, so hour fragments such as the 6 in "6:26" never
// count as an identifier.
static ID_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]{3,}").unwrap());
static HOUR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,2}:\d{2}$").unwrap());
static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"-?\d+(?:[.,]\d+)?").unwrap());

/// Collects the identifiers written in a free text cell.
///
/// Every maximal run of three or more ASCII digits is one identifier,
/// whatever separates them ("1001, 1002", "1001/1002", "leg. 1001").
pub fn extract_ids(text: &str) -> BTreeSet<String> {
    ID_RUN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Orders by value without parsing: fewer significant digits is smaller,
/// then the digits themselves.
fn numeric_key(id: &str) -> Option<(usize, &str)> {
    if id.len() >= 3 && id.bytes().all(|b| b.is_ascii_digit()) {
        let significant = id.trim_start_matches('0');
        Some((significant.len(), significant))
    } else {
        None
    }
}

fn compare_ids(a: &str, b: &str) -> Ordering {
    match (numeric_key(a), numeric_key(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Deduplicates and orders identifiers.
///
/// Identifiers made of at least three digits are sorted by their value.
/// There is no size limit on them. Anything else (too short or not all
/// digits) goes after them in lexical order.
pub fn normalize_ids<I, S>(ids: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut res: Vec<String> = ids
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .filter(|s| seen.insert(s.clone()))
        .collect();
    res.sort_by(|a, b| compare_ids(a, b));
    res
}

/// Reads the number written in a count cell, 0 when there is none.
///
/// Hours (`H:MM`) are not counts. A comma is read as the decimal point.
pub fn parse_count(value: &str) -> f64 {
    let s = value.trim();
    if s.is_empty() || HOUR.is_match(s) {
        return 0.0;
    }
    NUMBER
        .find(s)
        .and_then(|m| m.as_str().replace(',', ".").parse::<f64>().ok())
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_runs_of_three_digits_or_more() {
        let ids: Vec<String> = extract_ids("1001, 1002; leg.1003/45 6:26 1001")
            .into_iter()
            .collect();
        assert_eq!(ids, vec!["1001", "1002", "1003"]);
    }

    #[test]
    fn hours_are_not_identifiers() {
        assert!(extract_ids("6:26").is_empty());
        assert!(extract_ids("").is_empty());
    }

    #[test]
    fn normalize_sorts_numerically_then_lexically() {
        assert_eq!(
            normalize_ids(["002", "0450", "5"]),
            vec!["002", "0450", "5"]
        );
        assert_eq!(
            normalize_ids(["1200", "abc", "999", "1200", "12a"]),
            vec!["999", "1200", "12a", "abc"]
        );
    }

    #[test]
    fn normalize_handles_huge_and_equal_values() {
        let huge = "123456789012345678901234567890";
        assert_eq!(
            normalize_ids(["0100", huge, "100"]),
            vec!["0100", "100", huge]
        );
        assert_eq!(
            normalize_ids(["200000000000000000000", "30000000000000000000", "000"]),
            vec!["000", "30000000000000000000", "200000000000000000000"]
        );
    }

    #[test]
    fn counts() {
        assert_eq!(parse_count("3"), 3.0);
        assert_eq!(parse_count(" 2,5 personas"), 2.5);
        assert_eq!(parse_count("-1"), -1.0);
        assert_eq!(parse_count("6:26"), 0.0);
        assert_eq!(parse_count("n/a"), 0.0);
        assert_eq!(parse_count(""), 0.0);
    }
}
