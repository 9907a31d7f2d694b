//! Textual variants of a detected value.
//!
//! A value found as `2341 2341 2346` may appear elsewhere in the document
//! as `234123412346` or `2341-2341-2346`; every form is masked.

use regex::Regex;

use super::MaskingError;
use crate::detection::PIIType;

/// Variants of `value`, longest first, without duplicates.
pub fn value_variants(value: &str, pii_type: PIIType) -> Vec<String> {
    let raw = value.trim();
    let mut out: Vec<String> = vec![raw.to_string()];

    let stripped: String = raw.chars().filter(|c| !c.is_whitespace() && *c != '-' && *c != '_').collect();
    out.push(stripped);

    if pii_type.is_numeric_id() {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        out.extend(grouped_forms(&digits, pii_type));
        out.push(digits);
    }
    if pii_type.is_case_insensitive() {
        out.push(raw.to_lowercase());
        out.push(raw.to_uppercase());
    }
    if matches!(pii_type, PIIType::Pan | PIIType::Ifsc | PIIType::Gstin | PIIType::Passport) {
        out.push(raw.to_uppercase());
    }

    out.retain(|v| v.chars().count() >= 2);
    out.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    out.dedup();
    out
}

fn grouped_forms(digits: &str, pii_type: PIIType) -> Vec<String> {
    let groups: &[&[usize]] = match (pii_type, digits.len()) {
        (PIIType::Aadhaar, 12) => &[&[4, 4, 4]],
        (PIIType::CreditCard, 16) => &[&[4, 4, 4, 4]],
        (PIIType::CreditCard, 15) => &[&[4, 6, 5]],
        (PIIType::Ssn, 9) => &[&[3, 2, 4]],
        (PIIType::Phone, 10) => &[&[5, 5]],
        (PIIType::Phone, 12) if digits.starts_with("91") => {
            return phone_forms(&digits[2..]);
        }
        _ => &[],
    };
    let mut out = Vec::new();
    for sizes in groups {
        for sep in [" ", "-"] {
            out.push(join_groups(digits, sizes, sep));
        }
    }
    if pii_type == PIIType::Phone && digits.len() == 10 {
        out.extend(phone_forms(digits));
    }
    out
}

/// Country-code forms of a 10-digit Indian mobile number.
fn phone_forms(national: &str) -> Vec<String> {
    let spaced = join_groups(national, &[5, 5], " ");
    vec![
        national.to_string(),
        spaced.clone(),
        format!("+91{}", national),
        format!("+91 {}", national),
        format!("+91-{}", national),
        format!("+91 {}", spaced),
        format!("91{}", national),
    ]
}

fn join_groups(digits: &str, sizes: &[usize], sep: &str) -> String {
    let mut parts = Vec::with_capacity(sizes.len());
    let mut at = 0;
    for &n in sizes {
        let end = (at + n).min(digits.len());
        parts.push(&digits[at..end]);
        at = end;
    }
    parts.join(sep)
}

/// Compiled search for one value's variants.
pub struct VariantMatcher {
    patterns: Vec<Regex>,
}

impl VariantMatcher {
    pub fn new(value: &str, pii_type: PIIType) -> Result<Self, MaskingError> {
        let flag = if pii_type.is_case_insensitive() { "(?i)" } else { "" };
        let patterns = value_variants(value, pii_type)
            .iter()
            .map(|v| {
                Regex::new(&format!("{}{}", flag, regex::escape(v)))
                    .map_err(|e| MaskingError::InvalidRequest(format!("variant pattern: {}", e)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Byte spans of every variant occurrence in `text`, longest variants
    /// first. Spans may overlap; callers claim them in order.
    ///
    /// A variant that begins or ends with an alphanumeric character must
    /// not continue a longer alphanumeric run.
    pub fn find_all(&self, text: &str) -> Vec<(usize, usize)> {
        let mut spans = Vec::new();
        for regex in &self.patterns {
            for m in regex.find_iter(text) {
                if is_isolated(text, m.start(), m.end()) && !spans.contains(&(m.start(), m.end())) {
                    spans.push((m.start(), m.end()));
                }
            }
        }
        spans
    }
}

fn is_isolated(text: &str, start: usize, end: usize) -> bool {
    let first = text[start..end].chars().next();
    let last = text[start..end].chars().next_back();
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    let joins = |edge: Option<char>, neighbour: Option<char>| {
        matches!((edge, neighbour), (Some(e), Some(n)) if e.is_alphanumeric() && n.is_alphanumeric())
    };
    !joins(first, before) && !joins(last, after)
}

#[cfg(test)]
#[path = "variants_tests.rs"]
mod tests;
