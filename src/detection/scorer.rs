//! Context-aware confidence scoring.
//!
//! Order of adjustments per raw match:
//! 1. discard matches shorter than `min_match_len` after trimming
//! 2. discard context-dependent types with no nearby keyword
//! 3. checksum types: pass sets the pass tier, fail sets the fail tier
//!    (final, no context boost)
//! 4. keyword within `context_window` chars before or after the match adds
//!    `context_boost` capped at `max_confidence`
//! 5. discard anything below `min_confidence`
//!
//! The match itself is never part of its own context: an address ending in
//! "Road" does not count as having an address keyword nearby.
//! Boosted scores are rounded to thousandths.

use std::collections::HashMap;

use regex::Regex;

use super::detection_types::RawMatch;
use super::pii_types::PIIType;
use super::validators::{luhn_check, verhoeff_check};
use super::RegistryError;
use crate::config::ScoringConfig;

/// Context keywords per type, matched case-insensitively on word bounds.
const CONTEXT_KEYWORDS: &[(PIIType, &str)] = &[
    (PIIType::Aadhaar, r"aadhaar|aadhar|uid|uidai|unique identification|enrol?ment"),
    (PIIType::Pan, r"pan|permanent account|income tax"),
    (PIIType::Passport, r"passport|nationality|republic"),
    (PIIType::VoterId, r"voter|epic|election|elector"),
    (PIIType::DrivingLicense, r"driving|licen[cs]e|dl|transport"),
    (PIIType::Ssn, r"ssn|social security"),
    (PIIType::CreditCard, r"card|credit|debit|visa|mastercard|amex|rupay|cvv|expiry"),
    (PIIType::BankAccount, r"account|a/c|acct|bank|savings|current"),
    (PIIType::Ifsc, r"ifsc|branch|bank"),
    (PIIType::UpiId, r"upi|vpa|pay"),
    (PIIType::Gstin, r"gstin|gst|tax"),
    (PIIType::Email, r"e-?mail|contact|mail"),
    (PIIType::Phone, r"phone|mobile|mob|tel|contact|call|whatsapp"),
    (PIIType::DateOfBirth, r"dob|d\.o\.b|birth|born"),
    (PIIType::Address, r"address|addr|residence|resident|street|road|city|pin ?code|pin"),
    (PIIType::IpAddress, r"ip|host|server|address"),
    (PIIType::MacAddress, r"mac|ethernet|wi-?fi|adapter"),
    (PIIType::Imei, r"imei|device|handset"),
    (PIIType::ApiKey, r"api|key|token|secret"),
    (PIIType::Jwt, r"token|bearer|jwt|authorization"),
    (PIIType::Username, r"user|user ?name|user ?id|login"),
    (PIIType::Password, r"password|passwd|pwd|passcode|pass"),
    (PIIType::EmployeeId, r"employee|emp|staff"),
];

/// Checksum validator for types that carry one.
fn checksum_for(pii_type: PIIType) -> Option<fn(&str) -> bool> {
    match pii_type {
        PIIType::CreditCard | PIIType::Imei => Some(luhn_check),
        PIIType::Aadhaar => Some(verhoeff_check),
        _ => None,
    }
}

pub struct ContextScorer {
    config: ScoringConfig,
    keywords: HashMap<PIIType, Regex>,
}

impl ContextScorer {
    pub fn new(config: ScoringConfig) -> Result<Self, RegistryError> {
        let mut keywords = HashMap::with_capacity(CONTEXT_KEYWORDS.len());
        for (pii_type, words) in CONTEXT_KEYWORDS {
            let regex = Regex::new(&format!(r"(?i)\b(?:{})\b", words))
                .map_err(|source| RegistryError::InvalidPattern { pii_type: *pii_type, source })?;
            keywords.insert(*pii_type, regex);
        }
        Ok(Self { config, keywords })
    }

    pub fn config(&self) -> &ScoringConfig { &self.config }

    /// Final confidence for `raw` within `text`, or `None` when discarded.
    pub fn score(&self, text: &str, raw: &RawMatch) -> Option<f64> {
        let cfg = &self.config;
        if raw.matched_text.trim().chars().count() < cfg.min_match_len {
            return None;
        }

        let has_context = self.has_context(text, raw);
        if raw.pii_type.requires_context() && !has_context {
            return None;
        }

        let confidence = match checksum_for(raw.pii_type).map(|check| check(&digits_only(raw))) {
            Some(false) => cfg.checksum_fail_confidence,
            Some(true) => boosted(cfg.checksum_pass_confidence, has_context, cfg),
            None => boosted(raw.base_confidence, has_context, cfg),
        };

        (confidence >= cfg.min_confidence).then_some(confidence)
    }

    /// Whether a keyword for the match's type appears just before or just
    /// after it.
    pub fn has_context(&self, text: &str, raw: &RawMatch) -> bool {
        let Some(regex) = self.keywords.get(&raw.pii_type) else { return false };
        let (before, after) = context_window(text, raw.start, raw.end, self.config.context_window);
        regex.is_match(before) || regex.is_match(after)
    }
}

const CONFIDENCE_SCALE: f64 = 1000.0;

fn boosted(confidence: f64, has_context: bool, cfg: &ScoringConfig) -> f64 {
    if !has_context {
        return confidence;
    }
    let sum = ((confidence + cfg.context_boost) * CONFIDENCE_SCALE).round() / CONFIDENCE_SCALE;
    sum.min(cfg.max_confidence).max(confidence)
}

fn digits_only(raw: &RawMatch) -> String {
    raw.matched_text.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// The `radius` chars before `start` and after `end`, snapped to char
/// boundaries. Neither slice includes the match.
pub(crate) fn context_window(text: &str, start: usize, end: usize, radius: usize) -> (&str, &str) {
    let start = start.min(text.len());
    let end = end.clamp(start, text.len());
    if radius == 0 {
        return ("", "");
    }
    let from = text[..start].char_indices().rev().nth(radius - 1).map_or(0, |(i, _)| i);
    let to = text[end..].char_indices().nth(radius).map_or(text.len(), |(i, _)| end + i);
    (&text[from..start], &text[end..to])
}

#[cfg(test)]
#[path = "scorer_tests.rs"]
mod tests;
