//! Hash-meta sidecar: per-token key material for later decryption.
//!
//! Persisted next to a masked text/tabular artifact as
//! `<stem>_hash_meta.json`:
//!
//! ```json
//! {
//!   "<ciphertext b64>": {
//!     "hash_meta": {"salt": "..", "iv": "..", "algorithm": "PBKDF2-SHA512", "iterations": 150000},
//!     "original_value": "9876543210",
//!     "pii_type": "PHONE",
//!     "page": 1
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::MaskingError;
use crate::crypto::{EncryptedToken, KdfAlgorithm, TOKEN_ALGORITHM};
use crate::detection::PIIType;

pub const SIDECAR_SUFFIX: &str = "_hash_meta.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashMeta {
    pub salt: String,
    pub iv: String,
    /// Key-derivation algorithm.
    pub algorithm: KdfAlgorithm,
    /// Absent in older sidecars; the algorithm's standard count applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iterations: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashMetaEntry {
    pub hash_meta: HashMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_value: Option<String>,
    pub pii_type: PIIType,
    pub page: u32,
}

/// Ciphertext -> key material index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashMetaIndex {
    entries: BTreeMap<String, HashMetaEntry>,
}

impl HashMetaIndex {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn insert(&mut self, token: &EncryptedToken, original_value: Option<String>, pii_type: PIIType, page: u32) {
        let entry = HashMetaEntry {
            hash_meta: HashMeta {
                salt: token.salt.clone(),
                iv: token.iv.clone(),
                algorithm: token.kdf,
                iterations: Some(token.iterations),
            },
            original_value,
            pii_type,
            page,
        };
        self.entries.insert(token.ciphertext.clone(), entry);
    }

    pub fn get(&self, ciphertext: &str) -> Option<&HashMetaEntry> {
        self.entries.get(ciphertext)
    }

    pub fn contains(&self, ciphertext: &str) -> bool {
        self.entries.contains_key(ciphertext)
    }

    pub fn ciphertexts(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HashMetaEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Rebuild the full token for `ciphertext`.
    pub fn token(&self, ciphertext: &str) -> Option<EncryptedToken> {
        let meta = &self.entries.get(ciphertext)?.hash_meta;
        Some(EncryptedToken {
            salt: meta.salt.clone(),
            iv: meta.iv.clone(),
            ciphertext: ciphertext.to_string(),
            algorithm: TOKEN_ALGORITHM.to_string(),
            kdf: meta.algorithm,
            iterations: meta.iterations.unwrap_or_else(|| meta.algorithm.standard_iterations()),
        })
    }

    /// Absorb `other`; its entries win on key collision.
    pub fn merge(&mut self, other: HashMetaIndex) {
        self.entries.extend(other.entries);
    }

    /// `<dir>/<stem>_hash_meta.json` for a masked artifact at `artifact`.
    pub fn sidecar_path(artifact: &Path) -> PathBuf {
        let stem = artifact.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
        artifact.with_file_name(format!("{}{}", stem, SIDECAR_SUFFIX))
    }

    pub fn save(&self, path: &Path) -> Result<(), MaskingError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, MaskingError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Merge every sidecar in `dir`. Unreadable sidecars are logged and
    /// skipped.
    pub fn load_dir(dir: &Path) -> Result<Self, MaskingError> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.file_name().and_then(|n| n.to_str()).is_some_and(|n| n.ends_with(SIDECAR_SUFFIX)))
            .collect();
        paths.sort();

        let mut index = Self::new();
        for path in paths {
            match Self::load(&path) {
                Ok(found) => index.merge(found),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable sidecar"),
            }
        }
        Ok(index)
    }
}

#[cfg(test)]
#[path = "meta_tests.rs"]
mod tests;
