//! Tests for the hash-meta sidecar.

use super::*;
use crate::crypto::{decrypt_value, encrypt_value, KdfParams};

fn token(value: &str) -> EncryptedToken {
    encrypt_value(value, "pw", KdfParams { algorithm: KdfAlgorithm::Pbkdf2Sha512, iterations: 1_000 }).unwrap()
}

#[test]
fn test_insert_and_rebuild_token() {
    let t = token("9876543210");
    let mut index = HashMetaIndex::new();
    index.insert(&t, Some("9876543210".into()), PIIType::Phone, 1);

    assert_eq!(index.len(), 1);
    assert!(index.contains(&t.ciphertext));
    assert_eq!(index.token(&t.ciphertext), Some(t.clone()));
    assert_eq!(decrypt_value(&index.token(&t.ciphertext).unwrap(), "pw").unwrap(), "9876543210");
    assert_eq!(index.get(&t.ciphertext).unwrap().page, 1);
    assert!(index.token("missing").is_none());
}

#[test]
fn test_sidecar_json_shape() {
    let t = token("asha@example.com");
    let mut index = HashMetaIndex::new();
    index.insert(&t, None, PIIType::Email, 2);

    let json: serde_json::Value = serde_json::to_value(&index).unwrap();
    let entry = &json[&t.ciphertext];
    assert_eq!(entry["hash_meta"]["algorithm"], "PBKDF2-SHA512");
    assert_eq!(entry["hash_meta"]["iterations"], 1_000);
    assert_eq!(entry["hash_meta"]["salt"], t.salt.as_str());
    assert_eq!(entry["pii_type"], "EMAIL");
    assert_eq!(entry["page"], 2);
    assert!(entry.get("original_value").is_none());
}

#[test]
fn test_missing_iterations_fall_back_to_standard() {
    let json = r#"{"Y3Q=": {"hash_meta": {"salt": "c2FsdA==", "iv": "aXY=", "algorithm": "PBKDF2-SHA256"},
                   "pii_type": "PHONE", "page": 1}}"#;
    let index: HashMetaIndex = serde_json::from_str(json).unwrap();
    let t = index.token("Y3Q=").unwrap();
    assert_eq!(t.iterations, KdfAlgorithm::Pbkdf2Sha256.standard_iterations());
    assert_eq!(t.algorithm, TOKEN_ALGORITHM);
}

#[test]
fn test_sidecar_path() {
    assert_eq!(
        HashMetaIndex::sidecar_path(Path::new("/tmp/out/report_masked.csv")),
        PathBuf::from("/tmp/out/report_masked_hash_meta.json")
    );
    assert_eq!(HashMetaIndex::sidecar_path(Path::new("notes.txt")), PathBuf::from("notes_hash_meta.json"));
}

#[test]
fn test_save_load_and_load_dir() {
    let dir = tempfile::tempdir().unwrap();
    let (a, b) = (token("one"), token("two"));

    let mut first = HashMetaIndex::new();
    first.insert(&a, None, PIIType::Phone, 1);
    first.save(&dir.path().join("a_hash_meta.json")).unwrap();
    assert_eq!(HashMetaIndex::load(&dir.path().join("a_hash_meta.json")).unwrap(), first);

    let mut second = HashMetaIndex::new();
    second.insert(&b, None, PIIType::Email, 1);
    second.save(&dir.path().join("b_hash_meta.json")).unwrap();

    std::fs::write(dir.path().join("broken_hash_meta.json"), "{not json").unwrap();
    std::fs::write(dir.path().join("unrelated.json"), "{}").unwrap();

    let merged = HashMetaIndex::load_dir(dir.path()).unwrap();
    assert_eq!(merged.len(), 2);
    assert!(merged.contains(&a.ciphertext) && merged.contains(&b.ciphertext));
}

#[test]
fn test_load_missing_file_errors() {
    assert!(matches!(HashMetaIndex::load(Path::new("/nonexistent/x_hash_meta.json")), Err(MaskingError::Io(_))));
}
