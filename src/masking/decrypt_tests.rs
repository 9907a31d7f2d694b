//! Tests for decrypt-and-redetect.

use super::*;
use crate::config::CoreConfig;
use crate::crypto::{KdfAlgorithm, KdfParams};
use crate::detection::PIIType;
use crate::masking::{Masker, MaskingRequest};

fn pipeline() -> DecryptPipeline {
    DecryptPipeline::new(PIIDetector::from_config(&CoreConfig::default()).unwrap())
}

fn masker() -> Masker {
    Masker::default().with_kdf(KdfParams { algorithm: KdfAlgorithm::Pbkdf2Sha512, iterations: 1_000 })
}

fn masked(text: &str, password: &str) -> (String, HashMetaIndex) {
    let detections = PIIDetector::from_config(&CoreConfig::default())
        .unwrap()
        .detect_text(text, DetectionPolicy::GENERIC);
    assert!(!detections.is_empty());
    let out = masker().mask_text(text, &detections, &MaskingRequest::hash(password)).unwrap();
    (out.text, out.report.meta)
}

#[test]
fn test_round_trip_restores_text_and_detections() {
    let original = "name,phone,email\nAsha,9876543210,asha@example.com\n";
    let (text, index) = masked(original, "correct horse");
    assert!(!text.contains("9876543210"));

    let outcome = pipeline().run(&text, "correct horse", &index, DetectionPolicy::GENERIC);
    assert_eq!(outcome.status, DecryptStatus::Decrypted);
    assert_eq!(outcome.text, original);
    assert_eq!(outcome.failed, 0);
    assert_eq!(outcome.decrypted, outcome.candidates);
    let types: Vec<PIIType> = outcome.detections.iter().map(|d| d.pii_type).collect();
    assert!(types.contains(&PIIType::Phone));
    assert!(types.contains(&PIIType::Email));
}

#[test]
fn test_wrong_password_decrypts_nothing() {
    let (text, index) = masked("Phone: 9876543210", "right");
    let outcome = pipeline().run(&text, "wrong", &index, DetectionPolicy::GENERIC);
    assert_eq!(outcome.status, DecryptStatus::NoValuesDecrypted);
    assert_eq!(outcome.text, text);
    assert_eq!(outcome.decrypted, 0);
    assert_eq!(outcome.failed, outcome.candidates);
    assert!(outcome.detections.is_empty());
}

#[test]
fn test_no_candidates() {
    let (_, index) = masked("Phone: 9876543210", "pw");
    let outcome = pipeline().run("plain text only", "pw", &index, DetectionPolicy::GENERIC);
    assert_eq!(outcome.status, DecryptStatus::NoCandidates);
    assert_eq!(outcome.candidates, 0);

    let empty = pipeline().run("QUJDREVGR0hJSktMTU5PUA==", "pw", &HashMetaIndex::new(), DetectionPolicy::GENERIC);
    assert_eq!(empty.status, DecryptStatus::NoCandidates);
}

#[test]
fn test_candidate_inside_longer_run() {
    let (text, index) = masked("9876543210", "pw");
    let glued = format!("AAAA{}", text);
    let found = DecryptPipeline::find_candidates(&glued, &index);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].start, 4);
    assert_eq!(found[0].ciphertext, text);
}

#[test]
fn test_short_runs_ignored() {
    assert!(base64_runs("abc def+/ 123").is_empty());
    assert_eq!(base64_runs("x: QUJDREVGR0hJSktMTU5PUA==;"), vec![(3, 27)]);
}

#[test]
fn test_run_file_uses_own_sidecar() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.txt");
    let output = dir.path().join("out.txt");
    std::fs::write(&input, "Email: asha@example.com").unwrap();

    let detections = PIIDetector::from_config(&CoreConfig::default())
        .unwrap()
        .detect_text("Email: asha@example.com", DetectionPolicy::GENERIC);
    masker().mask_text_file(&input, &output, &detections, &MaskingRequest::hash("pw")).unwrap();

    let outcome = pipeline().run_file(&output, "pw", None, DetectionPolicy::GENERIC).unwrap();
    assert_eq!(outcome.status, DecryptStatus::Decrypted);
    assert_eq!(outcome.text, "Email: asha@example.com");

    let by_dir = pipeline().run_file(&output, "pw", Some(dir.path()), DetectionPolicy::GENERIC).unwrap();
    assert_eq!(by_dir.text, outcome.text);
}
