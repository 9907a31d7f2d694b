//! Decrypt hash-masked text and re-run detection over the result.
//!
//! Every candidate token is attempted even after a failure, so the
//! work done does not depend on which tokens a password opens.

use std::path::Path;

use serde::Serialize;

use super::meta::HashMetaIndex;
use super::MaskingError;
use crate::crypto::{decrypt_value, EncryptionError};
use crate::detection::{DetectionPolicy, PIIDetection, PIIDetector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecryptStatus {
    /// At least one token decrypted.
    Decrypted,
    /// No known token appears in the text.
    NoCandidates,
    /// Tokens were found but none decrypted; usually a wrong password.
    NoValuesDecrypted,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecryptOutcome {
    pub status: DecryptStatus,
    /// Input with every decrypted token replaced by its plaintext.
    pub text: String,
    pub candidates: usize,
    pub decrypted: usize,
    pub failed: usize,
    /// Detection over `text`; empty unless something decrypted.
    pub detections: Vec<PIIDetection>,
}

/// Known token located in the text, as a byte span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenCandidate {
    pub start: usize,
    pub end: usize,
    pub ciphertext: String,
}

/// Shortest run treated as a possible token.
pub const MIN_TOKEN_LEN: usize = 16;

/// Maximal runs of the standard base64 alphabet, with up to two `=`
/// padding characters, at least [`MIN_TOKEN_LEN`] long.
fn base64_runs(text: &str) -> Vec<(usize, usize)> {
    let bytes = text.as_bytes();
    let is_b64 = |b: u8| b.is_ascii_alphanumeric() || b == b'+' || b == b'/';
    let mut runs = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if !is_b64(bytes[i]) {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && is_b64(bytes[i]) {
            i += 1;
        }
        let mut end = i;
        while end < bytes.len() && end - i < 2 && bytes[end] == b'=' {
            end += 1;
        }
        if end - start >= MIN_TOKEN_LEN {
            runs.push((start, end));
        }
        i = end;
    }
    runs
}

pub struct DecryptPipeline {
    detector: PIIDetector,
}

impl DecryptPipeline {
    pub fn new(detector: PIIDetector) -> Self { Self { detector } }

    /// Base64-looking runs that are, or contain, a ciphertext in `index`.
    pub fn find_candidates(text: &str, index: &HashMetaIndex) -> Vec<TokenCandidate> {
        let mut out = Vec::new();
        if index.is_empty() { return out; }

        for (run_start, run_end) in base64_runs(text) {
            let run = &text[run_start..run_end];
            if index.contains(run) {
                out.push(TokenCandidate { start: run_start, end: run_end, ciphertext: run.to_string() });
                continue;
            }
            let mut inner: Vec<TokenCandidate> = Vec::new();
            for key in index.ciphertexts() {
                for (at, _) in run.match_indices(key) {
                    let start = run_start + at;
                    let end = start + key.len();
                    if inner.iter().all(|c| end <= c.start || start >= c.end) {
                        inner.push(TokenCandidate { start, end, ciphertext: key.to_string() });
                    }
                }
            }
            out.extend(inner);
        }
        out.sort_by_key(|c| c.start);
        out
    }

    pub fn run(
        &self,
        masked_text: &str,
        password: &str,
        index: &HashMetaIndex,
        policy: DetectionPolicy,
    ) -> DecryptOutcome {
        let candidates = Self::find_candidates(masked_text, index);
        if candidates.is_empty() {
            tracing::info!(tokens = index.len(), "No hash tokens found in text");
            return DecryptOutcome {
                status: DecryptStatus::NoCandidates,
                text: masked_text.to_string(),
                candidates: 0,
                decrypted: 0,
                failed: 0,
                detections: Vec::new(),
            };
        }

        let mut replacements: Vec<(usize, usize, String)> = Vec::with_capacity(candidates.len());
        let mut failed = 0usize;
        for c in &candidates {
            let result = index
                .token(&c.ciphertext)
                .ok_or_else(|| EncryptionError::UnsupportedToken("missing metadata".into()))
                .and_then(|token| decrypt_value(&token, password));
            match result {
                Ok(plain) => replacements.push((c.start, c.end, plain)),
                Err(_) => failed += 1,
            }
        }

        if replacements.is_empty() {
            tracing::warn!(candidates = candidates.len(), "No tokens decrypted");
            return DecryptOutcome {
                status: DecryptStatus::NoValuesDecrypted,
                text: masked_text.to_string(),
                candidates: candidates.len(),
                decrypted: 0,
                failed,
                detections: Vec::new(),
            };
        }

        let mut text = String::with_capacity(masked_text.len());
        let mut cursor = 0;
        for (start, end, plain) in &replacements {
            text.push_str(&masked_text[cursor..*start]);
            text.push_str(plain);
            cursor = *end;
        }
        text.push_str(&masked_text[cursor..]);

        let detections = self.detector.detect_text(&text, policy);
        tracing::info!(
            candidates = candidates.len(),
            decrypted = replacements.len(),
            failed,
            detections = detections.len(),
            "Hash tokens decrypted"
        );
        DecryptOutcome {
            status: DecryptStatus::Decrypted,
            text,
            candidates: candidates.len(),
            decrypted: replacements.len(),
            failed,
            detections,
        }
    }

    /// Decrypt a masked text file. `meta` names a sidecar file or a
    /// directory of sidecars; by default the file's own sidecar is used,
    /// falling back to every sidecar in its directory.
    pub fn run_file(
        &self,
        path: &Path,
        password: &str,
        meta: Option<&Path>,
        policy: DetectionPolicy,
    ) -> Result<DecryptOutcome, MaskingError> {
        let text = std::fs::read_to_string(path)?;
        let index = match meta {
            Some(m) if m.is_dir() => HashMetaIndex::load_dir(m)?,
            Some(m) => HashMetaIndex::load(m)?,
            None => {
                let own = HashMetaIndex::sidecar_path(path);
                if own.is_file() {
                    HashMetaIndex::load(&own)?
                } else {
                    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
                    HashMetaIndex::load_dir(dir)?
                }
            }
        };
        Ok(self.run(&text, password, &index, policy))
    }
}

#[cfg(test)]
#[path = "decrypt_tests.rs"]
mod tests;
