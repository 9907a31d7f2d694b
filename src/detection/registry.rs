//! Compiled pattern catalogs.
//!
//! Patterns are compiled once in [`PatternRegistry::new`]; the registry is
//! then shared read-only (behind an `Arc`) by every worker.

use regex::Regex;

use super::dedup::normalize;
use super::detection_types::RawMatch;
use super::label_patterns::LABEL_CATALOG;
use super::pii_patterns::{PatternSpec, GENERIC_CATALOG};
use super::pii_types::{PIICategory, PIIType};
use super::{DetectorSelection, RegistryError};

/// One PII type with its compiled patterns.
#[derive(Debug)]
pub struct CatalogEntry {
    pub pii_type: PIIType,
    pub category: PIICategory,
    pub base_confidence: f64,
    patterns: Vec<Regex>,
}

impl CatalogEntry {
    fn compile(spec: &PatternSpec) -> Result<Self, RegistryError> {
        let patterns = spec
            .patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|source| RegistryError::InvalidPattern {
                    pii_type: spec.pii_type,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            pii_type: spec.pii_type,
            category: spec.pii_type.category(),
            base_confidence: spec.base_confidence,
            patterns,
        })
    }

    pub fn pattern_count(&self) -> usize { self.patterns.len() }

    fn scan_into(&self, text: &str, out: &mut Vec<RawMatch>) {
        let from = out.len();
        for regex in &self.patterns {
            if regex.captures_len() > 1 {
                for caps in regex.captures_iter(text) {
                    // Group 1 is the value; fall back to the whole match.
                    if let Some(m) = caps.get(1).or_else(|| caps.get(0)) {
                        self.push(m.as_str(), m.start(), m.end(), from, out);
                    }
                }
            } else {
                for m in regex.find_iter(text) {
                    self.push(m.as_str(), m.start(), m.end(), from, out);
                }
            }
        }
    }

    fn push(&self, matched: &str, start: usize, end: usize, from: usize, out: &mut Vec<RawMatch>) {
        // Two patterns of one type firing on the same span is one match.
        if out[from..].iter().any(|r| r.start == start && r.end == end) {
            return;
        }
        out.push(RawMatch {
            pii_type: self.pii_type,
            matched_text: matched.to_string(),
            normalized_text: normalize(matched, self.pii_type),
            start,
            end,
            base_confidence: self.base_confidence,
        });
    }
}

/// Generic and label-anchored catalogs.
#[derive(Debug)]
pub struct PatternRegistry {
    generic: Vec<CatalogEntry>,
    label_anchored: Vec<CatalogEntry>,
}

impl PatternRegistry {
    pub fn new() -> Result<Self, RegistryError> {
        let generic = GENERIC_CATALOG.iter().map(CatalogEntry::compile).collect::<Result<Vec<_>, _>>()?;
        let label_anchored =
            LABEL_CATALOG.iter().map(CatalogEntry::compile).collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(
            generic_types = generic.len(),
            label_types = label_anchored.len(),
            patterns = generic.iter().chain(&label_anchored).map(|e| e.pattern_count()).sum::<usize>(),
            "Pattern registry compiled"
        );
        Ok(Self { generic, label_anchored })
    }

    pub fn catalog(&self, selection: DetectorSelection) -> &[CatalogEntry] {
        match selection {
            DetectorSelection::Generic => &self.generic,
            DetectorSelection::LabelAnchored => &self.label_anchored,
        }
    }

    pub fn entry(&self, selection: DetectorSelection, pii_type: PIIType) -> Option<&CatalogEntry> {
        self.catalog(selection).iter().find(|e| e.pii_type == pii_type)
    }

    /// Every pattern firing in `text`, ordered by start offset.
    ///
    /// Matches of different types over the same span are all kept.
    pub fn scan(&self, text: &str, selection: DetectorSelection) -> Vec<RawMatch> {
        let mut out = Vec::new();
        for entry in self.catalog(selection) {
            entry.scan_into(text, &mut out);
        }
        out.sort_by_key(|m| m.start);
        out
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
