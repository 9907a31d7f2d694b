//! Tests for word-processing masking.

use super::*;
use crate::detection::PIIType;
use crate::masking::MaskingStrategy;

fn detection(pii_type: PIIType, value: &str) -> PIIDetection {
    PIIDetection::new(pii_type, value, value, 0.9, 1, 0, value.len(), None)
}

fn sample() -> WordModel {
    WordModel::new()
        .header_footer("Confidential - asha@example.com")
        .paragraph("Dear customer, your PAN ABCDE1234F is on file.")
        .table_cell("9876543210")
        .table_cell("Mumbai")
}

#[test]
fn test_every_block_kind_masked() {
    let mut doc = sample();
    let d = [
        detection(PIIType::Email, "asha@example.com"),
        detection(PIIType::Pan, "ABCDE1234F"),
        detection(PIIType::Phone, "9876543210"),
    ];
    let report = Masker::default()
        .mask_word(&mut doc, &d, &MaskingRequest::new(MaskingStrategy::Blackout))
        .unwrap();

    assert_eq!(report.masked, 3);
    assert!(report.skipped.is_empty());
    let text = doc.text();
    assert!(!text.contains("asha@example.com"));
    assert!(!text.contains("ABCDE1234F"));
    assert!(!text.contains("9876543210"));
    assert!(text.contains("Mumbai"));
    assert_eq!(doc.block_kind(0), Some(BlockKind::HeaderFooter));
}

#[test]
fn test_untouched_blocks_not_rewritten() {
    let mut doc = sample();
    let before = doc.blocks()[3].clone();
    let d = [detection(PIIType::Phone, "9876543210")];
    Masker::default()
        .mask_word(&mut doc, &d, &MaskingRequest::new(MaskingStrategy::Blackout))
        .unwrap();
    assert_eq!(doc.blocks()[3], before);
    assert_eq!(doc.blocks()[2].1, "██████████");
}

#[test]
fn test_value_absent_from_all_blocks() {
    let mut doc = sample();
    let d = [detection(PIIType::Aadhaar, "234123412346")];
    let report = Masker::default()
        .mask_word(&mut doc, &d, &MaskingRequest::new(MaskingStrategy::Blackout))
        .unwrap();
    assert_eq!(report.masked, 0);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(doc, sample());
}

#[test]
fn test_block_index_out_of_range() {
    let mut doc = WordModel::new().paragraph("x");
    assert!(doc.block_text(3).is_err());
    assert!(doc.set_block_text(3, "y".into()).is_err());
    assert_eq!(doc.block_kind(3), None);
}
