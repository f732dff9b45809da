//! Tests for candidate selection

use super::select;
use crate::decode::Candidate;

fn candidates(values: &[&str]) -> Vec<Candidate> {
    values.iter().copied().map(Candidate::new).collect()
}

#[test]
fn test_empty_list_selects_nothing() {
    assert_eq!(select(&[]), None);
}

#[test]
fn test_numeric_candidate_wins_regardless_of_position() {
    let cases = vec![
        (vec!["5000112637922"], "5000112637922"),
        (vec!["https://qr.example", "5000112637922"], "5000112637922"),
        (vec!["abc", "def", "012345678905"], "012345678905"),
        (vec!["TEXT", "111", "222"], "111"),
    ];
    for (values, expected) in cases {
        assert_eq!(select(&candidates(&values)), Some(expected), "{:?}", values);
    }
}

#[test]
fn test_falls_back_to_first_without_numeric() {
    assert_eq!(
        select(&candidates(&["CODE128-XY", "https://qr.example"])),
        Some("CODE128-XY")
    );
}

#[test]
fn test_first_numeric_among_several() {
    assert_eq!(
        select(&candidates(&["96385074", "4006381333931"])),
        Some("96385074")
    );
}

#[test]
fn test_empty_value_is_not_numeric() {
    // An empty raw value never counts as a digit-only barcode
    assert_eq!(select(&candidates(&["", "42"])), Some("42"));
    assert_eq!(select(&candidates(&["", "abc"])), Some(""));
}
