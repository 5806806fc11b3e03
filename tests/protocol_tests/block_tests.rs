//! Block Parser Tests
//!
//! Tests for key/value splitting, ordered mappings and info parsing.

use bloomd::protocol::{parse_field, split_pair, to_mapping, Block, FilterInfo, Mapping};
use bloomd::BloomdError;

// =============================================================================
// Helper Functions
// =============================================================================

/// An info block the way bloomd prints it
fn bloomd_info_lines() -> Vec<&'static str> {
    vec![
        "capacity 100000",
        "checks 12",
        "check_hits 3",
        "check_misses 9",
        "in_memory 0",
        "page_ins 0",
        "page_outs 0",
        "probability 0.000100",
        "sets 7",
        "set_hits 7",
        "set_misses 0",
        "size 7",
        "storage 240141",
    ]
}

// =============================================================================
// Pair Splitting Tests
// =============================================================================

#[test]
fn test_split_pair_on_first_space() {
    assert_eq!(split_pair("a 1").unwrap(), ("a", "1"));
    assert_eq!(split_pair("foo 100 0 0").unwrap(), ("foo", "100 0 0"));
    assert_eq!(split_pair("foo ").unwrap(), ("foo", ""));
}

#[test]
fn test_split_pair_without_space_is_protocol_error() {
    let err = split_pair("malformed").unwrap_err();
    assert!(matches!(err, BloomdError::Protocol(_)));
}

// =============================================================================
// Mapping Tests
// =============================================================================

#[test]
fn test_to_mapping_preserves_order() {
    let mapping = to_mapping(&["zeta 1", "alpha 2", "mid 3"]).unwrap();
    let keys: Vec<&str> = mapping.keys().collect();
    assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn test_to_mapping_duplicate_key_last_wins() {
    let mapping = to_mapping(&["a 1", "b 2", "a 3"]).unwrap();

    assert_eq!(mapping.len(), 2);
    assert_eq!(mapping.get("a"), Some("3"));

    // The overwritten key keeps its first position
    let pairs: Vec<(&str, &str)> = mapping.iter().collect();
    assert_eq!(pairs, vec![("a", "3"), ("b", "2")]);
}

#[test]
fn test_to_mapping_rejects_malformed_line() {
    let err = to_mapping(&["a 1", "broken", "b 2"]).unwrap_err();
    assert!(matches!(err, BloomdError::Protocol(ref msg) if msg.contains("broken")));
}

#[test]
fn test_list_line_keeps_internal_spaces() {
    let block = Block::new(vec!["foo 100 0 0 00 0 0 0.0100 0".to_string()]);
    let mapping = block.to_mapping().unwrap();

    assert_eq!(mapping.get("foo"), Some("100 0 0 00 0 0 0.0100 0"));
}

#[test]
fn test_mapping_insert_returns_previous() {
    let mut mapping = Mapping::new();
    assert_eq!(mapping.insert("k", "v1"), None);
    assert_eq!(mapping.insert("k", "v2"), Some("v1".to_string()));
    assert!(mapping.contains_key("k"));
    assert!(!mapping.contains_key("other"));
}

#[test]
fn test_mapping_from_iterator() {
    let mapping: Mapping = vec![("x", "1"), ("y", "2")].into_iter().collect();
    let owned: Vec<(String, String)> = mapping.into_iter().collect();
    assert_eq!(
        owned,
        vec![
            ("x".to_string(), "1".to_string()),
            ("y".to_string(), "2".to_string())
        ]
    );
}

// =============================================================================
// Field Parsing Tests
// =============================================================================

#[test]
fn test_parse_field_space_and_colon_forms() {
    assert_eq!(parse_field("capacity 100000", "capacity").unwrap(), "100000");
    assert_eq!(parse_field("capacity:100000", "capacity").unwrap(), "100000");
    assert_eq!(parse_field("probability 0.01", "probability").unwrap(), "0.01");
}

#[test]
fn test_parse_field_rejects_wrong_shape() {
    assert!(parse_field("checks 5", "capacity").is_err());
    assert!(parse_field("capacityX 5", "capacity").is_err());
    assert!(parse_field("capacity", "capacity").is_err());
    assert!(parse_field("capacity ", "capacity").is_err());
}

// =============================================================================
// Filter Info Tests
// =============================================================================

#[test]
fn test_filter_info_from_bloomd_block() {
    let info = FilterInfo::from_lines(&bloomd_info_lines()).unwrap();

    assert_eq!(info.capacity, 100000);
    assert!((info.probability - 0.0001).abs() < 1e-12);
    assert!(!info.in_memory);
    assert_eq!(info.size, Some(7));
    assert_eq!(info.storage, Some(240141));
    assert_eq!(info.sets, Some(7));
    assert_eq!(info.checks, Some(12));
}

#[test]
fn test_filter_info_ignores_line_order() {
    let mut lines = bloomd_info_lines();
    lines.reverse();

    let info = FilterInfo::from_lines(&lines).unwrap();
    assert_eq!(info.capacity, 100000);
    assert_eq!(info.checks, Some(12));
}

#[test]
fn test_filter_info_colon_form_and_in_memory() {
    let lines = ["capacity:500", "probability:0.01", "in_memory:1"];
    let info = FilterInfo::from_lines(&lines).unwrap();

    assert_eq!(info.capacity, 500);
    assert_eq!(info.probability, 0.01);
    assert!(info.in_memory);
    assert_eq!(info.size, None);
}

#[test]
fn test_filter_info_missing_field_fails() {
    let lines = ["capacity 500", "in_memory 0"];
    let err = FilterInfo::from_lines(&lines).unwrap_err();
    assert!(matches!(err, BloomdError::Protocol(ref msg) if msg.contains("probability")));
}

#[test]
fn test_filter_info_bad_values_fail() {
    let bad_capacity = ["capacity lots", "probability 0.01", "in_memory 0"];
    assert!(matches!(
        FilterInfo::from_lines(&bad_capacity),
        Err(BloomdError::Protocol(_))
    ));

    let bad_flag = ["capacity 10", "probability 0.01", "in_memory 2"];
    assert!(matches!(
        FilterInfo::from_lines(&bad_flag),
        Err(BloomdError::Protocol(_))
    ));

    let bad_prob = ["capacity 10", "probability abc", "in_memory 0"];
    assert!(matches!(
        FilterInfo::from_lines(&bad_prob),
        Err(BloomdError::Protocol(_))
    ));
}

#[test]
fn test_filter_info_from_block() {
    let block = Block::new(bloomd_info_lines().into_iter().map(String::from).collect());
    let info = FilterInfo::from_block(&block).unwrap();
    assert_eq!(info.capacity, 100000);
}
