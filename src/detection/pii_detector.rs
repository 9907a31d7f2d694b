//! PII detection entry point.
//!
//! # Security
//! Page text that is not already NFKC is normalized before scanning so
//! full-width digits and compatibility characters cannot slip past the
//! ASCII patterns. Offsets then refer to the normalized text and word
//! boxes for that page are not resolved.

use std::borrow::Cow;
use std::sync::Arc;

use unicode_normalization::{is_nfkc, UnicodeNormalization};

use super::classifier::{filter_by_context, DocumentClassifier, DocumentContext};
use super::dedup::{dedupe, remove_nested_spans, remove_substring_duplicates};
use super::detection_types::{BoundingBox, ExtractedText, PIIDetection, PageText};
use super::registry::PatternRegistry;
use super::scorer::ContextScorer;
use super::{DetectionPolicy, RegistryError};
use crate::config::CoreConfig;

/// Registry, scorer and classifier bundled for one process.
///
/// Cheap to clone; all parts are shared read-only.
#[derive(Clone)]
pub struct PIIDetector {
    registry: Arc<PatternRegistry>,
    scorer: Arc<ContextScorer>,
    classifier: Arc<DocumentClassifier>,
}

impl PIIDetector {
    pub fn new(
        registry: Arc<PatternRegistry>,
        scorer: Arc<ContextScorer>,
        classifier: Arc<DocumentClassifier>,
    ) -> Self {
        Self { registry, scorer, classifier }
    }

    /// Build every part from configuration. Fails only on catalog errors.
    pub fn from_config(config: &CoreConfig) -> Result<Self, RegistryError> {
        let extra = config
            .archetypes
            .iter()
            .map(|a| {
                DocumentContext::from_names(
                    a.name.clone(),
                    a.keywords.clone(),
                    &a.expected_types,
                    a.max_allowed_count,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(
            Arc::new(PatternRegistry::new()?),
            Arc::new(ContextScorer::new(config.scoring.clone())?),
            Arc::new(DocumentClassifier::new(extra)?),
        ))
    }

    pub fn registry(&self) -> &PatternRegistry { &self.registry }
    pub fn scorer(&self) -> &ContextScorer { &self.scorer }
    pub fn classifier(&self) -> &DocumentClassifier { &self.classifier }

    /// Detect PII across every page of `input`.
    ///
    /// Blank input yields an empty result. With `policy.classify`, a
    /// recognized archetype restricts and reorders the result; otherwise
    /// every kept type is deduplicated in scan order.
    pub fn detect(&self, input: &ExtractedText, policy: DetectionPolicy) -> Vec<PIIDetection> {
        if input.is_blank() {
            return Vec::new();
        }

        let mut raw_count = 0usize;
        let mut scored = Vec::new();
        for page in &input.pages {
            raw_count += self.scan_page(page, policy, &mut scored);
        }
        let scored_count = scored.len();
        let scored = remove_nested_spans(scored);

        let context = if policy.classify { self.classifier.classify(&input.full_text()) } else { None };
        let merged = match context {
            Some(ctx) => filter_by_context(scored, ctx),
            None => dedupe(scored),
        };
        let result = remove_substring_duplicates(merged);

        tracing::debug!(
            pages = input.pages.len(),
            raw = raw_count,
            scored = scored_count,
            kept = result.len(),
            archetype = context.map(|c| c.archetype.as_str()).unwrap_or("generic"),
            "Detection complete"
        );
        result
    }

    /// Single-page convenience wrapper.
    pub fn detect_text(&self, text: &str, policy: DetectionPolicy) -> Vec<PIIDetection> {
        self.detect(&ExtractedText::from_text(text), policy)
    }

    /// Returns the number of raw matches on the page.
    fn scan_page(&self, page: &PageText, policy: DetectionPolicy, out: &mut Vec<PIIDetection>) -> usize {
        let text: Cow<'_, str> = if is_nfkc(&page.text) {
            Cow::Borrowed(&page.text)
        } else {
            Cow::Owned(page.text.nfkc().collect())
        };
        let geometry_valid = matches!(text, Cow::Borrowed(_));

        let raws = self.registry.scan(&text, policy.selection);
        let count = raws.len();
        for raw in raws {
            let Some(confidence) = self.scorer.score(&text, &raw) else { continue };
            let bbox = if geometry_valid { resolve_bbox(page, raw.start, raw.end) } else { None };
            out.push(PIIDetection::new(
                raw.pii_type,
                raw.matched_text,
                raw.normalized_text,
                confidence,
                page.page,
                raw.start,
                raw.end,
                bbox,
            ));
        }
        count
    }
}

/// Union of the word boxes overlapping `start..end`.
fn resolve_bbox(page: &PageText, start: usize, end: usize) -> Option<BoundingBox> {
    page.word_boxes
        .iter()
        .filter(|w| w.start < end && w.end > start)
        .map(|w| w.bbox)
        .reduce(|acc, b| acc.union(&b))
}

#[cfg(test)]
#[path = "pii_tests.rs"]
mod tests;
