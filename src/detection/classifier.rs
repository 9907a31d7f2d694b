//! Document classification and context filtering.
//!
//! An archetype scores one point per distinct keyword found anywhere in
//! the document (ASCII case-insensitive substring). The strictly highest
//! non-zero score wins; ties and all-zero documents are generic.

use aho_corasick::{AhoCorasick, MatchKind};
use serde::{Deserialize, Serialize};

use super::classifier_rules::BUILTIN_ARCHETYPES;
use super::dedup::dedupe;
use super::detection_types::PIIDetection;
use super::pii_types::PIIType;
use super::RegistryError;

/// Static classification rule for one document archetype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentContext {
    pub archetype: String,
    pub keywords: Vec<String>,
    /// Kept types, in presentation priority order.
    pub expected_types: Vec<PIIType>,
    pub max_allowed_count: Option<usize>,
}

impl DocumentContext {
    /// Build from type names, accepting the lenient spellings of
    /// [`PIIType::from_name`].
    pub fn from_names(
        archetype: impl Into<String>,
        keywords: Vec<String>,
        type_names: &[String],
        max_allowed_count: Option<usize>,
    ) -> Result<Self, RegistryError> {
        let archetype = archetype.into();
        let expected_types = type_names
            .iter()
            .map(|n| {
                PIIType::from_name(n).ok_or_else(|| RegistryError::UnknownType {
                    archetype: archetype.clone(),
                    type_name: n.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { archetype, keywords, expected_types, max_allowed_count })
    }

    pub fn expects(&self, pii_type: PIIType) -> bool {
        let canonical = pii_type.canonical();
        self.expected_types.iter().any(|t| t.canonical() == canonical)
    }
}

pub struct DocumentClassifier {
    contexts: Vec<DocumentContext>,
    matcher: AhoCorasick,
    /// Keyword pattern index -> owning context index.
    owners: Vec<usize>,
}

impl DocumentClassifier {
    /// Built-in archetypes followed by `extra`, in that tie-break order.
    pub fn new(extra: Vec<DocumentContext>) -> Result<Self, RegistryError> {
        let mut contexts: Vec<DocumentContext> = BUILTIN_ARCHETYPES
            .iter()
            .map(|r| DocumentContext {
                archetype: r.name.to_string(),
                keywords: r.keywords.iter().map(|k| k.to_string()).collect(),
                expected_types: r.expected_types.to_vec(),
                max_allowed_count: r.max_allowed_count,
            })
            .collect();
        contexts.extend(extra);

        let mut keywords = Vec::new();
        let mut owners = Vec::new();
        for (i, ctx) in contexts.iter().enumerate() {
            for kw in &ctx.keywords {
                if kw.trim().is_empty() {
                    return Err(RegistryError::InvalidKeywords {
                        archetype: ctx.archetype.clone(),
                        reason: "empty keyword".into(),
                    });
                }
                keywords.push(kw.as_str());
                owners.push(i);
            }
        }

        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::Standard)
            .build(&keywords)
            .map_err(|e| RegistryError::InvalidKeywords {
                archetype: "*".into(),
                reason: e.to_string(),
            })?;

        Ok(Self { contexts, matcher, owners })
    }

    pub fn builtin() -> Result<Self, RegistryError> { Self::new(Vec::new()) }

    pub fn contexts(&self) -> &[DocumentContext] { &self.contexts }

    /// Distinct-keyword hit count per archetype, in catalog order.
    pub fn scores(&self, text: &str) -> Vec<usize> {
        let mut seen = vec![false; self.owners.len()];
        let mut scores = vec![0usize; self.contexts.len()];
        for m in self.matcher.find_overlapping_iter(text) {
            let pattern = m.pattern().as_usize();
            if !seen[pattern] {
                seen[pattern] = true;
                scores[self.owners[pattern]] += 1;
            }
        }
        scores
    }

    /// Winning archetype, or `None` for a generic document.
    pub fn classify(&self, text: &str) -> Option<&DocumentContext> {
        let scores = self.scores(text);
        let best = scores.iter().copied().max().unwrap_or(0);
        if best == 0 || scores.iter().filter(|&&s| s == best).count() > 1 {
            tracing::debug!(best, "Document classified as generic");
            return None;
        }
        let winner = scores.iter().position(|&s| s == best).map(|i| &self.contexts[i]);
        if let Some(ctx) = winner {
            tracing::debug!(archetype = %ctx.archetype, hits = best, "Document classified");
        }
        winner
    }
}

/// Keep only the types `context` expects, deduplicate, cap, and reorder by
/// the archetype's type priority.
///
/// Reordering places the first surviving detection of each expected type
/// at that type's slot; any further detections follow in their existing
/// order.
pub fn filter_by_context(detections: Vec<PIIDetection>, context: &DocumentContext) -> Vec<PIIDetection> {
    let kept: Vec<PIIDetection> = detections.into_iter().filter(|d| context.expects(d.pii_type)).collect();
    let mut kept = dedupe(kept);

    if let Some(max) = context.max_allowed_count {
        if kept.len() > max {
            kept.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
            kept.truncate(max);
        }
    }

    let mut slots: Vec<Option<PIIDetection>> = kept.into_iter().map(Some).collect();
    let mut ordered = Vec::with_capacity(slots.len());
    for expected in &context.expected_types {
        if let Some(slot) = slots.iter_mut().find(|s| s.as_ref().is_some_and(|d| d.pii_type == *expected)) {
            ordered.extend(slot.take());
        }
    }
    ordered.extend(slots.into_iter().flatten());

    for d in &mut ordered {
        d.document_type = Some(context.archetype.clone());
    }
    ordered
}

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;
