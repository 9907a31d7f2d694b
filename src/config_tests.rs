//! Tests for configuration loading.

use super::*;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let owned: Vec<(String, String)> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |key| owned.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
}

#[test]
fn test_defaults_are_valid() {
    let config = CoreConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.scoring.checksum_pass_confidence, 0.95);
    assert_eq!(config.scoring.checksum_fail_confidence, 0.65);
    assert_eq!(config.masking.kdf, KdfAlgorithm::Pbkdf2Sha512);
    assert!(config.masking.store_original_value);
}

#[test]
fn test_empty_toml_is_default() {
    assert_eq!(CoreConfig::from_toml("").unwrap(), CoreConfig::default());
}

#[test]
fn test_partial_toml() {
    let config = CoreConfig::from_toml(
        r#"
        [scoring]
        context_boost = 0.05

        [masking]
        kdf = "PBKDF2-SHA256"
        store_original_value = false

        [batch]
        workers = 3

        [logging]
        format = "json"

        [[archetypes]]
        name = "payslip"
        keywords = ["payslip", "net pay"]
        expected_types = ["pan", "bank_account"]
        "#,
    )
    .unwrap();

    assert_eq!(config.scoring.context_boost, 0.05);
    assert_eq!(config.scoring.max_confidence, 0.95);
    assert_eq!(config.masking.kdf, KdfAlgorithm::Pbkdf2Sha256);
    assert!(!config.masking.store_original_value);
    assert_eq!(config.batch.workers, 3);
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(config.archetypes[0].max_allowed_count, None);
    assert!(config.validate().is_ok());
}

#[test]
fn test_malformed_toml_rejected() {
    assert!(matches!(CoreConfig::from_toml("[scoring\n"), Err(ConfigError::Parse(_))));
}

#[test]
fn test_env_overrides() {
    let mut config = CoreConfig::default();
    config
        .apply_overrides(env(&[
            ("PII_CORE_WORKERS", "8"),
            ("PII_CORE_LOG_LEVEL", "debug"),
            ("PII_CORE_LOG_FORMAT", "JSON"),
            ("PII_CORE_KDF", "pbkdf2-sha256"),
        ]))
        .unwrap();
    assert_eq!(config.batch.workers, 8);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(config.masking.kdf, KdfAlgorithm::Pbkdf2Sha256);
}

#[test]
fn test_invalid_env_override() {
    let mut config = CoreConfig::default();
    let err = config.apply_overrides(env(&[("PII_CORE_WORKERS", "many")])).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "PII_CORE_WORKERS"));
    assert!(config.apply_overrides(env(&[("PII_CORE_KDF", "md5")])).is_err());
}

#[test]
fn test_validation_rejects_bad_values() {
    let mut config = CoreConfig::default();
    config.scoring.checksum_fail_confidence = 0.99;
    assert!(config.validate().is_err());

    let mut config = CoreConfig::default();
    config.scoring.context_boost = 1.5;
    assert!(config.validate().is_err());

    let mut config = CoreConfig::default();
    config.masking.pixelate_block = 0;
    assert!(config.validate().is_err());

    let mut config = CoreConfig::default();
    config.archetypes.push(ArchetypeConfig {
        name: "empty".into(),
        keywords: Vec::new(),
        expected_types: vec!["pan".into()],
        max_allowed_count: None,
    });
    assert!(config.validate().is_err());
}

#[test]
fn test_load_missing_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load(Some(&dir.path().join("absent.toml"))).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn test_load_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pii.toml");
    std::fs::write(&path, "[batch]\nqueue_size = 16\n").unwrap();
    let config = load(Some(&path)).unwrap();
    assert_eq!(config.batch.queue_size, 16);
}
