//! Tests for value variants.

use super::*;

#[test]
fn test_aadhaar_variants() {
    let v = value_variants("2341 2341 2346", PIIType::Aadhaar);
    assert!(v.contains(&"2341 2341 2346".to_string()));
    assert!(v.contains(&"2341-2341-2346".to_string()));
    assert!(v.contains(&"234123412346".to_string()));
    assert_eq!(v.len(), 3);
}

#[test]
fn test_variants_sorted_longest_first() {
    let v = value_variants("9876543210", PIIType::Phone);
    assert!(v.windows(2).all(|w| w[0].len() >= w[1].len()));
    assert!(v.contains(&"+91 98765 43210".to_string()));
    assert!(v.contains(&"98765-43210".to_string()));
    assert!(v.contains(&"919876543210".to_string()));
}

#[test]
fn test_country_code_phone_reduces_to_national() {
    let v = value_variants("+91 9876543210", PIIType::Phone);
    assert!(v.contains(&"9876543210".to_string()));
    assert!(v.contains(&"+91-9876543210".to_string()));
}

#[test]
fn test_case_variants() {
    let v = value_variants("Asha@Example.com", PIIType::Email);
    assert!(v.contains(&"asha@example.com".to_string()));
    assert!(v.contains(&"ASHA@EXAMPLE.COM".to_string()));

    let pan = value_variants("abcde1234f", PIIType::Pan);
    assert!(pan.contains(&"ABCDE1234F".to_string()));
}

#[test]
fn test_single_char_variants_dropped() {
    assert!(value_variants("7", PIIType::EmployeeId).is_empty());
}

#[test]
fn test_matcher_isolation() {
    let m = VariantMatcher::new("9876543210", PIIType::Phone).unwrap();
    assert_eq!(m.find_all("x 9876543210 y"), vec![(2, 12)]);
    assert!(m.find_all("A9876543210").is_empty());
    assert!(m.find_all("98765432101").is_empty());
}

#[test]
fn test_matcher_regex_metacharacters() {
    let m = VariantMatcher::new("Sup3r$ecret!", PIIType::Password).unwrap();
    assert_eq!(m.find_all("password: Sup3r$ecret!"), vec![(10, 22)]);
}

#[test]
fn test_matcher_case_insensitive_types() {
    let m = VariantMatcher::new("asha@example.com", PIIType::Email).unwrap();
    assert_eq!(m.find_all("ASHA@EXAMPLE.COM").len(), 1);
    let pan = VariantMatcher::new("ABCDE1234F", PIIType::Pan).unwrap();
    assert!(pan.find_all("abcde1234f").is_empty());
}
