//! End-to-end detection, masking and decryption tests.
//!
//! Each test drives the public API the way a caller would: extract text,
//! detect, mask, and where the strategy is reversible, decrypt again.

use pii_core::crypto::{KdfAlgorithm, KdfParams};
use pii_core::detection::{BoundingBox, PageText, WordBox};
use pii_core::masking::raster::{BLACK, WHITE};
use pii_core::masking::{DecryptPipeline, DecryptStatus, HashMetaIndex, Masker, PageModel, Raster, WordModel};
use pii_core::{CoreConfig, DetectionPolicy, ExtractedText, FileCategory, MaskingRequest, MaskingStrategy, PIIDetector, PIIType};

fn detector() -> PIIDetector {
    PIIDetector::from_config(&CoreConfig::default()).unwrap()
}

fn masker() -> Masker {
    Masker::default().with_kdf(KdfParams { algorithm: KdfAlgorithm::Pbkdf2Sha256, iterations: 1_000 })
}

/// Hash-masking a CSV and decrypting it restores the file exactly.
#[test]
fn test_csv_hash_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("contacts.csv");
    let output = dir.path().join("contacts_masked.csv");
    let original = "name,phone,email\nAsha,9876543210,asha@example.com\n";
    std::fs::write(&input, original).unwrap();

    let policy = DetectionPolicy::for_category(FileCategory::Tabular);
    let detections = detector().detect_text(original, policy);
    assert!(detections.iter().any(|d| d.pii_type == PIIType::Phone && d.value == "9876543210"));

    let (report, sidecar) = masker()
        .mask_text_file(&input, &output, &detections, &MaskingRequest::hash("x"))
        .unwrap();
    let sidecar = sidecar.expect("hash masking writes a sidecar");
    assert_eq!(sidecar, dir.path().join("contacts_masked_hash_meta.json"));
    assert_eq!(report.masked, 2);

    let masked = std::fs::read_to_string(&output).unwrap();
    assert!(!masked.contains("9876543210"));
    assert!(!masked.contains("asha@example.com"));
    assert!(masked.starts_with("name,phone,email\nAsha,"));

    let index = HashMetaIndex::load(&sidecar).unwrap();
    let phone = index.iter().find(|(_, e)| e.pii_type == PIIType::Phone).unwrap();
    assert_eq!(phone.1.original_value.as_deref(), Some("9876543210"));
    assert!(masked.contains(phone.0));

    let outcome = DecryptPipeline::new(detector()).run_file(&output, "x", None, policy).unwrap();
    assert_eq!(outcome.status, DecryptStatus::Decrypted);
    assert_eq!(outcome.decrypted, 2);
    assert_eq!(outcome.text, original);
    assert!(outcome.detections.iter().any(|d| d.pii_type == PIIType::Phone));
}

#[test]
fn test_wrong_password_leaves_tokens() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("notes.txt");
    let output = dir.path().join("notes_masked.txt");
    std::fs::write(&input, "Call 9876543210 after lunch").unwrap();

    let detections = detector().detect_text("Call 9876543210 after lunch", DetectionPolicy::GENERIC);
    masker().mask_text_file(&input, &output, &detections, &MaskingRequest::hash("right")).unwrap();
    let masked = std::fs::read_to_string(&output).unwrap();

    let outcome = DecryptPipeline::new(detector())
        .run_file(&output, "wrong", None, DetectionPolicy::GENERIC)
        .unwrap();
    assert_eq!(outcome.status, DecryptStatus::NoValuesDecrypted);
    assert_eq!(outcome.failed, 1);
    assert_eq!(outcome.text, masked);
    assert!(outcome.detections.is_empty());
}

#[test]
fn test_irreversible_text_masking_keeps_layout() {
    let text = "Phone: 9876543210, PAN ABCDE1234F";
    let detections = detector().detect_text(text, DetectionPolicy::GENERIC);
    let masked = masker().mask_text(text, &detections, &MaskingRequest::new(MaskingStrategy::Blackout)).unwrap();

    assert_eq!(masked.text.chars().count(), text.chars().count());
    assert!(!masked.text.contains("9876543210"));
    assert!(!masked.text.contains("ABCDE1234F"));
    assert!(masked.text.starts_with("Phone: "));
    assert!(masked.report.meta.is_empty());
}

/// A passport scan is classified, incidental types are dropped, and only
/// the expected values are redacted on the page.
#[test]
fn test_passport_pdf_classified_and_masked() {
    let mut doc = PageModel::from_text(
        "REPUBLIC OF INDIA\nPASSPORT\nPassport No: J8369854\nNationality: INDIAN\n\
         Date of Birth: 12/05/1985\nPlace of Birth: MUMBAI\nContact: 9876543210",
    );
    let extracted = doc.extract();
    let detections = detector().detect(&extracted, DetectionPolicy::for_category(FileCategory::Paginated));
    let types: Vec<PIIType> = detections.iter().map(|d| d.pii_type).collect();
    assert_eq!(types, vec![PIIType::Passport, PIIType::DateOfBirth]);
    assert!(detections.iter().all(|d| d.bounding_box.is_some()));

    let report = masker().mask_paginated(&mut doc, &detections, &MaskingRequest::hash("pw")).unwrap();
    assert_eq!(report.masked, 2);
    assert_eq!(report.meta.len(), 2);

    let page = doc.page_text(1);
    assert!(!page.contains("J8369854"));
    assert!(!page.contains("12/05/1985"));
    assert!(page.contains("9876543210"));
    assert_eq!(doc.overlays(1).len(), 2);
}

#[test]
fn test_word_document_blocks_masked() {
    let mut doc = WordModel::new()
        .header_footer("Confidential - HR")
        .paragraph("Employee contact: asha@example.com")
        .table_cell("9876543210")
        .paragraph("No personal data here.");
    let detections = detector().detect_text(&doc.text(), DetectionPolicy::GENERIC);

    let report = masker()
        .mask_word(&mut doc, &detections, &MaskingRequest::new(MaskingStrategy::Blur))
        .unwrap();
    assert_eq!(report.masked, 2);
    let blocks = doc.blocks();
    assert_eq!(blocks[0].1, "Confidential - HR");
    assert!(!blocks[1].1.contains("asha@example.com"));
    assert!(!blocks[2].1.contains("9876543210"));
    assert_eq!(blocks[3].1, "No personal data here.");
}

#[test]
fn test_image_region_blacked_out() {
    let page = PageText {
        page: 1,
        text: "Email: asha@example.com".into(),
        word_boxes: vec![
            WordBox { start: 0, end: 6, bbox: BoundingBox::new(10.0, 10.0, 40.0, 20.0) },
            WordBox { start: 7, end: 23, bbox: BoundingBox::new(60.0, 10.0, 120.0, 20.0) },
        ],
    };
    let detections = detector().detect(&ExtractedText::default().with_page(page), DetectionPolicy::GENERIC);
    assert_eq!(detections.len(), 1);

    let mut image = Raster::new(200, 50, WHITE);
    let masked = masker()
        .mask_image(&mut image, &detections, &MaskingRequest::new(MaskingStrategy::Blackout))
        .unwrap();
    assert_eq!(masked.report.masked, 1);
    assert_eq!(image.pixel(100, 20), Some(BLACK));
    assert_eq!(image.pixel(20, 20), Some(WHITE));
}
