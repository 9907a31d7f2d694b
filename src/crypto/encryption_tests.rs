//! Tests for token encryption.

use super::*;

/// Low iteration count keeps the suite fast; one test below uses the
/// standard parameters.
fn fast(algorithm: KdfAlgorithm) -> KdfParams {
    KdfParams { algorithm, iterations: 1_000 }
}

fn create_test_key() -> zeroize::Zeroizing<[u8; KEY_SIZE]> {
    let mut key = zeroize::Zeroizing::new([0u8; KEY_SIZE]);
    for (i, byte) in key.iter_mut().enumerate() {
        *byte = i as u8;
    }
    key
}

#[test]
fn test_cipher_encrypt_decrypt() {
    let cipher = TokenCipher::new(create_test_key());
    let plaintext = b"9876543210";
    let (nonce, ciphertext) = cipher.encrypt(plaintext).unwrap();
    assert_eq!(ciphertext.len(), plaintext.len() + TAG_SIZE);
    assert_eq!(cipher.decrypt(&nonce, &ciphertext).unwrap(), plaintext);
}

#[test]
fn test_cipher_authentication_failure() {
    let cipher = TokenCipher::new(create_test_key());
    let (nonce, mut ciphertext) = cipher.encrypt(b"Test message").unwrap();
    ciphertext[0] ^= 0xFF;
    assert_eq!(cipher.decrypt(&nonce, &ciphertext), Err(EncryptionError::AuthenticationFailed));
}

#[test]
fn test_cipher_rejects_bad_nonce_size() {
    let cipher = TokenCipher::new(create_test_key());
    let (_, ciphertext) = cipher.encrypt(b"x").unwrap();
    assert_eq!(
        cipher.decrypt(&[0u8; 8], &ciphertext),
        Err(EncryptionError::InvalidNonce { expected: NONCE_SIZE, actual: 8 })
    );
}

#[test]
fn test_value_round_trip_both_kdfs() {
    for alg in [KdfAlgorithm::Pbkdf2Sha256, KdfAlgorithm::Pbkdf2Sha512] {
        for value in ["234123412346", "Sup3r$ecret!", "ünïcödé@example.com", ""] {
            let token = encrypt_value(value, "x", fast(alg)).unwrap();
            assert_eq!(token.kdf, alg);
            assert_eq!(decrypt_value(&token, "x").unwrap(), value);
        }
    }
}

#[test]
fn test_wrong_password_fails_authentication() {
    let token = encrypt_value("9876543210", "correct horse", fast(KdfAlgorithm::Pbkdf2Sha512)).unwrap();
    assert_eq!(decrypt_value(&token, "battery staple"), Err(EncryptionError::AuthenticationFailed));
}

#[test]
fn test_same_value_encrypts_differently() {
    let params = fast(KdfAlgorithm::Pbkdf2Sha512);
    let a = encrypt_value("9876543210", "x", params).unwrap();
    let b = encrypt_value("9876543210", "x", params).unwrap();
    assert_ne!(a.ciphertext, b.ciphertext);
    assert_ne!(a.salt, b.salt);
    assert_ne!(a.iv, b.iv);
    assert_eq!(decrypt_value(&a, "x").unwrap(), decrypt_value(&b, "x").unwrap());
}

#[test]
fn test_standard_parameters() {
    assert_eq!(KdfParams::standard(KdfAlgorithm::Pbkdf2Sha256).iterations, 100_000);
    assert_eq!(KdfParams::standard(KdfAlgorithm::Pbkdf2Sha512).iterations, 150_000);
    assert_eq!(KdfParams::default().algorithm, KdfAlgorithm::Pbkdf2Sha512);

    let token = encrypt_value("ABCPE1234F", "pw", KdfParams::default()).unwrap();
    assert_eq!(token.iterations, 150_000);
    assert_eq!(decrypt_value(&token, "pw").unwrap(), "ABCPE1234F");
}

#[test]
fn test_wire_format() {
    let token = encrypt_value("v", "pw", fast(KdfAlgorithm::Pbkdf2Sha256)).unwrap();
    let json: serde_json::Value = serde_json::to_value(&token).unwrap();
    assert_eq!(json["algorithm"], "AES-GCM-256");
    assert_eq!(json["kdf"], "PBKDF2-SHA256");
    assert_eq!(json["iterations"], 1_000);

    use base64::Engine;
    let b64 = base64::engine::general_purpose::STANDARD;
    assert_eq!(b64.decode(&token.salt).unwrap().len(), SALT_SIZE);
    assert_eq!(b64.decode(&token.iv).unwrap().len(), NONCE_SIZE);

    let back: EncryptedToken = serde_json::from_value(json).unwrap();
    assert_eq!(back, token);
}

#[test]
fn test_tampered_token_fields() {
    let token = encrypt_value("secret", "pw", fast(KdfAlgorithm::Pbkdf2Sha512)).unwrap();

    let mut bad_alg = token.clone();
    bad_alg.algorithm = "AES-CBC".into();
    assert!(matches!(decrypt_value(&bad_alg, "pw"), Err(EncryptionError::UnsupportedToken(_))));

    let mut bad_b64 = token.clone();
    bad_b64.ciphertext = "!!not base64!!".into();
    assert!(matches!(decrypt_value(&bad_b64, "pw"), Err(EncryptionError::InvalidEncoding(_))));

    let mut wrong_kdf = token.clone();
    wrong_kdf.kdf = KdfAlgorithm::Pbkdf2Sha256;
    assert_eq!(decrypt_value(&wrong_kdf, "pw"), Err(EncryptionError::AuthenticationFailed));

    let mut zero_iter = token;
    zero_iter.iterations = 0;
    assert!(matches!(decrypt_value(&zero_iter, "pw"), Err(EncryptionError::UnsupportedToken(_))));
}

#[test]
fn test_empty_password_rejected() {
    assert_eq!(
        encrypt_value("v", "", fast(KdfAlgorithm::Pbkdf2Sha512)),
        Err(EncryptionError::EmptyPassword)
    );
}

#[test]
fn test_kdf_algorithm_parse() {
    assert_eq!(KdfAlgorithm::parse("pbkdf2-sha256"), Some(KdfAlgorithm::Pbkdf2Sha256));
    assert_eq!(KdfAlgorithm::parse("SHA512"), Some(KdfAlgorithm::Pbkdf2Sha512));
    assert_eq!(KdfAlgorithm::parse("pbkdf2_sha512"), Some(KdfAlgorithm::Pbkdf2Sha512));
    assert_eq!(KdfAlgorithm::parse("scrypt"), None);
}

#[test]
fn test_fingerprint_is_stable_and_opaque() {
    let token = encrypt_value("9876543210", "pw", fast(KdfAlgorithm::Pbkdf2Sha512)).unwrap();
    assert_eq!(token.fingerprint(), token.fingerprint());
    assert_eq!(token.fingerprint().len(), 12);
    assert!(!token.fingerprint().contains("9876543210"));
}

#[test]
fn test_derive_key_deterministic() {
    let params = fast(KdfAlgorithm::Pbkdf2Sha256);
    let a = derive_key("pw", b"0123456789abcdef", params).unwrap();
    let b = derive_key("pw", b"0123456789abcdef", params).unwrap();
    let c = derive_key("pw2", b"0123456789abcdef", params).unwrap();
    assert_eq!(*a, *b);
    assert_ne!(*a, *c);
}
