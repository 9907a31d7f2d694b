//! Deduplication of detections that denote the same logical value.

use std::collections::HashMap;

use super::detection_types::PIIDetection;
use super::pii_types::PIIType;

/// Comparison form of a value.
///
/// Strips whitespace, hyphens and underscores; numeric IDs keep digits
/// only (a leading `91` country code is dropped from 12-digit phone
/// numbers); email and UPI handles are lower-cased.
pub fn normalize(value: &str, pii_type: PIIType) -> String {
    if pii_type.is_numeric_id() {
        let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
        if pii_type == PIIType::Phone && digits.len() == 12 && digits.starts_with("91") {
            return digits[2..].to_string();
        }
        return digits;
    }
    let stripped: String =
        value.chars().filter(|c| !c.is_whitespace() && *c != '-' && *c != '_').collect();
    if pii_type.is_case_insensitive() { stripped.to_lowercase() } else { stripped }
}

/// Merge detections sharing `(type, normalized_value)`.
///
/// The first detection in input order is the representative; later ones
/// contribute their occurrences and counts. Confidence is the maximum of
/// the group. The total `occurrence_count` is preserved, and running this
/// on its own output is a no-op.
pub fn dedupe(detections: Vec<PIIDetection>) -> Vec<PIIDetection> {
    let mut index: HashMap<(PIIType, String), usize> = HashMap::with_capacity(detections.len());
    let mut merged: Vec<PIIDetection> = Vec::with_capacity(detections.len());

    for d in detections {
        let key = (d.pii_type, d.normalized_value.clone());
        match index.get(&key) {
            Some(&i) => {
                let rep = &mut merged[i];
                rep.occurrence_count += d.occurrence_count;
                rep.all_occurrences.extend(d.all_occurrences);
                if d.confidence > rep.confidence { rep.confidence = d.confidence; }
            }
            None => {
                index.insert(key, merged.len());
                merged.push(d);
            }
        }
    }
    merged
}

/// Drop detections whose normalized value is a strict substring of another
/// detection of the same type.
///
/// Of each such pair the higher-confidence one survives; on equal
/// confidence the longer one does.
pub fn remove_substring_duplicates(detections: Vec<PIIDetection>) -> Vec<PIIDetection> {
    let mut dropped = vec![false; detections.len()];
    for (i, short) in detections.iter().enumerate() {
        for (j, long) in detections.iter().enumerate() {
            if i == j
                || short.pii_type != long.pii_type
                || short.normalized_value.is_empty()
                || short.normalized_value.len() >= long.normalized_value.len()
                || !long.normalized_value.contains(&short.normalized_value)
            {
                continue;
            }
            if short.confidence > long.confidence { dropped[j] = true; } else { dropped[i] = true; }
        }
    }
    detections
        .into_iter()
        .zip(dropped)
        .filter_map(|(d, drop)| (!drop).then_some(d))
        .collect()
}

/// Drop detections nested inside a detection of another type on the same
/// page, when the enclosing one is at least as confident.
///
/// Runs on per-occurrence detections, before [`dedupe`]. Identical spans
/// are left alone; [`dedupe`] never merges across types.
pub fn remove_nested_spans(detections: Vec<PIIDetection>) -> Vec<PIIDetection> {
    let dropped: Vec<bool> = detections
        .iter()
        .map(|inner| {
            detections.iter().any(|outer| {
                outer.pii_type != inner.pii_type
                    && outer.page == inner.page
                    && outer.start <= inner.start
                    && inner.end <= outer.end
                    && (outer.start, outer.end) != (inner.start, inner.end)
                    && outer.confidence >= inner.confidence
            })
        })
        .collect();
    detections
        .into_iter()
        .zip(dropped)
        .filter_map(|(d, drop)| (!drop).then_some(d))
        .collect()
}

#[cfg(test)]
#[path = "dedup_tests.rs"]
mod tests;
