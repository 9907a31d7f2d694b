//! Plain-text and tabular masking.
//!
//! Every variant of every selected value is located first; spans are then
//! claimed longest-first so a shorter variant never splits a longer one,
//! and the output is rebuilt in a single pass. Bytes outside claimed
//! spans are copied unchanged.

use std::path::Path;

use super::meta::HashMetaIndex;
use super::strategy::{MaskingRequest, MaskingStrategy};
use super::variants::VariantMatcher;
use super::{MaskReport, Masker, MaskingError};
use crate::detection::PIIDetection;

#[derive(Debug, Clone, PartialEq)]
pub struct MaskedText {
    pub text: String,
    pub report: MaskReport,
}

/// Result of substituting within one text block.
pub(crate) struct Substitution {
    pub text: String,
    /// Per selected detection: whether any variant was found.
    pub found: Vec<bool>,
}

impl Masker {
    pub fn mask_text(
        &self,
        text: &str,
        detections: &[PIIDetection],
        request: &MaskingRequest,
    ) -> Result<MaskedText, MaskingError> {
        request.validate()?;
        let selected = request.select(detections);
        let mut report = MaskReport::default();

        let sub = self.substitute(text, &selected, request, &mut report)?;
        for (d, found) in selected.iter().zip(&sub.found) {
            if !found {
                report.skip(d.pii_type, d.page, "value not found in text");
            }
        }

        tracing::debug!(
            strategy = %request.strategy,
            masked = report.masked,
            skipped = report.skipped.len(),
            "Text masked"
        );
        Ok(MaskedText { text: sub.text, report })
    }

    /// Mask `input` into `output`. Hash masking also writes the sidecar
    /// next to `output`; the sidecar path is returned.
    pub fn mask_text_file(
        &self,
        input: &Path,
        output: &Path,
        detections: &[PIIDetection],
        request: &MaskingRequest,
    ) -> Result<(MaskReport, Option<std::path::PathBuf>), MaskingError> {
        let text = std::fs::read_to_string(input)?;
        let masked = self.mask_text(&text, detections, request)?;
        std::fs::write(output, &masked.text)?;

        let sidecar = if request.strategy == MaskingStrategy::Hash && !masked.report.meta.is_empty() {
            let path = HashMetaIndex::sidecar_path(output);
            masked.report.meta.save(&path)?;
            tracing::info!(sidecar = %path.display(), tokens = masked.report.meta.len(), "Hash-meta sidecar written");
            Some(path)
        } else {
            None
        };
        Ok((masked.report, sidecar))
    }

    pub(crate) fn substitute(
        &self,
        text: &str,
        selected: &[&PIIDetection],
        request: &MaskingRequest,
        report: &mut MaskReport,
    ) -> Result<Substitution, MaskingError> {
        let password = match request.strategy {
            MaskingStrategy::Hash => Some(request.password()?),
            _ => None,
        };

        let mut found = vec![false; selected.len()];
        let mut candidates: Vec<(usize, usize, usize)> = Vec::new();
        for (i, d) in selected.iter().enumerate() {
            let spans = VariantMatcher::new(&d.value, d.pii_type)?.find_all(text);
            found[i] = !spans.is_empty();
            candidates.extend(spans.into_iter().map(|(s, e)| (s, e, i)));
        }

        candidates.sort_by(|a, b| (b.1 - b.0).cmp(&(a.1 - a.0)).then(a.0.cmp(&b.0)));
        let mut claimed: Vec<(usize, usize, usize)> = Vec::with_capacity(candidates.len());
        for c in candidates {
            if claimed.iter().all(|k| c.1 <= k.0 || c.0 >= k.1) {
                claimed.push(c);
            }
        }
        claimed.sort_by_key(|c| c.0);

        let mut out = String::with_capacity(text.len());
        let mut cursor = 0;
        for (start, end, i) in claimed {
            out.push_str(&text[cursor..start]);
            let d = selected[i];
            let original = &text[start..end];
            match password {
                Some(pw) => {
                    let token = self.encrypt_occurrence(original, pw, d.pii_type, d.page, report)?;
                    out.push_str(&token.ciphertext);
                }
                None => {
                    let c = request.strategy.redaction_char();
                    out.extend(std::iter::repeat(c).take(original.chars().count()));
                }
            }
            report.masked += 1;
            cursor = end;
        }
        out.push_str(&text[cursor..]);

        Ok(Substitution { text: out, found })
    }
}

#[cfg(test)]
#[path = "text_tests.rs"]
mod tests;
