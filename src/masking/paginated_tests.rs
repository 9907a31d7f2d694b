//! Tests for paginated masking.

use super::*;
use crate::crypto::{KdfAlgorithm, KdfParams};
use crate::detection::{Occurrence, PIIType};

fn detection(pii_type: PIIType, value: &str, pages: &[u32]) -> PIIDetection {
    let mut d = PIIDetection::new(pii_type, value, value, 0.9, pages[0], 0, value.len(), None);
    d.all_occurrences = pages
        .iter()
        .map(|&page| Occurrence { page, start: 0, end: value.len(), value: value.to_string(), bounding_box: None })
        .collect();
    d.occurrence_count = d.all_occurrences.len();
    d
}

fn fast_masker() -> Masker {
    Masker::default().with_kdf(KdfParams { algorithm: KdfAlgorithm::Pbkdf2Sha256, iterations: 1_000 })
}

#[test]
fn test_search_positions() {
    let doc = PageModel::from_pages(["Name: Asha\nPhone: 9876543210"]);
    let hits = doc.search(1, "9876543210", false);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].page, 1);
    assert_eq!(hits[0].rect, BoundingBox::new(MARGIN + 7.0 * CHAR_WIDTH, MARGIN + LINE_HEIGHT, 60.0, LINE_HEIGHT));
}

#[test]
fn test_search_respects_word_boundaries_and_case() {
    let doc = PageModel::from_pages(["x19876543210 Asha@Example.com"]);
    assert!(doc.search(1, "9876543210", false).is_empty());
    assert!(doc.search(1, "asha@example.com", false).is_empty());
    let hits = doc.search(1, "asha@example.com", true);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].text, "Asha@Example.com");
    assert!(doc.search(2, "x", false).is_empty());
}

#[test]
fn test_from_text_paginates() {
    let text = (0..PageModel::lines_per_page() + 5).map(|i| format!("line {}", i)).collect::<Vec<_>>().join("\n");
    let doc = PageModel::from_text(&text);
    assert_eq!(doc.page_count(), 2);
    assert!(doc.page_text(2).starts_with(&format!("line {}", PageModel::lines_per_page())));
    assert_eq!(doc.page_size(1), Some((PAGE_WIDTH, PAGE_HEIGHT)));
    assert_eq!(doc.page_size(3), None);
}

#[test]
fn test_extract_word_boxes_line_up_with_search() {
    let doc = PageModel::from_pages(["Phone: 9876543210"]);
    let extracted = doc.extract();
    let page = &extracted.pages[0];
    let wb = page.word_boxes.iter().find(|w| &page.text[w.start..w.end] == "9876543210").unwrap();
    assert_eq!(wb.bbox, doc.search(1, "9876543210", false)[0].rect);
}

#[test]
fn test_overlaps_threshold() {
    let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
    let b = BoundingBox::new(4.0, 0.0, 10.0, 10.0);
    let c = BoundingBox::new(8.0, 0.0, 10.0, 10.0);
    assert!(overlaps(&a, &b, 0.5));
    assert!(!overlaps(&a, &c, 0.5));
}

#[test]
fn test_blackout_removes_text_and_rasterizes() {
    let mut doc = PageModel::from_pages(["Phone: 9876543210", "Call +91 9876543210 today"]);
    let d = [detection(PIIType::Phone, "9876543210", &[1, 2])];
    let report = Masker::default()
        .mask_paginated(&mut doc, &d, &MaskingRequest::new(MaskingStrategy::Blackout))
        .unwrap();

    assert_eq!(report.masked, 2);
    assert!(report.skipped.is_empty());
    assert!(doc.is_rasterized(1));
    assert!(doc.is_rasterized(2));
    assert_eq!(doc.page_text(1), "");
}

#[test]
fn test_overlapping_variants_redacted_once() {
    let mut doc = PageModel::from_pages(["Call +91 9876543210 today"]);
    let d = [detection(PIIType::Phone, "9876543210", &[1])];
    let request = MaskingRequest::hash("pw");
    let report = fast_masker().mask_paginated(&mut doc, &d, &request).unwrap();

    assert_eq!(report.masked, 1);
    assert_eq!(report.meta.len(), 1);
    assert!(!doc.is_rasterized(1));
    assert_eq!(doc.page_text(1), format!("Call {} today", " ".repeat(14)));
    assert_eq!(doc.overlays(1), report.meta.ciphertexts().map(str::to_string).collect::<Vec<_>>());
}

#[test]
fn test_hash_overlay_encrypts_text_as_found() {
    let mut doc = PageModel::from_pages(["Mail ASHA@Example.com today"]);
    let d = [detection(PIIType::Email, "asha@example.com", &[1])];
    let report = fast_masker().mask_paginated(&mut doc, &d, &MaskingRequest::hash("pw")).unwrap();

    assert_eq!(report.masked, 1);
    let (ciphertext, entry) = report.meta.iter().next().unwrap();
    assert_eq!(entry.original_value.as_deref(), Some("ASHA@Example.com"));
    assert_eq!(doc.overlays(1), vec![ciphertext.to_string()]);
    assert!(!doc.page_text(1).contains("ASHA@Example.com"));
}

#[test]
fn test_page_out_of_range_skipped() {
    let mut doc = PageModel::from_pages(["nothing"]);
    let d = [detection(PIIType::Phone, "9876543210", &[4])];
    let report = Masker::default()
        .mask_paginated(&mut doc, &d, &MaskingRequest::new(MaskingStrategy::Pixelate))
        .unwrap();
    assert_eq!(report.masked, 0);
    assert!(report.skipped.iter().any(|s| s.page == 4));
    assert!(!doc.is_rasterized(1));
}

#[test]
fn test_rendered_redaction_is_dark_before_degrade() {
    let mut doc = PageModel::from_pages(["Phone: 9876543210"]);
    let rect = doc.search(1, "9876543210", false)[0].rect;
    doc.add_redaction(1, rect, None).unwrap();
    assert_eq!(doc.apply_redactions(1).unwrap(), 1);

    let img = doc.render_page(1, 72).unwrap();
    let cx = (rect.x + rect.width / 2.0) as u32;
    let cy = (rect.y + rect.height / 2.0) as u32;
    assert_eq!(img.pixel(cx, cy), Some(BLACK));
    assert_eq!(img.width(), PAGE_WIDTH as u32);
}
