//! Generic PII catalog: patterns that fire anywhere in free text.
//!
//! When a pattern has a capture group, group 1 is the reported value and
//! the rest of the match is anchoring context. Credential patterns need an
//! explicit `:`, `=` or `is` after the keyword, and their values never end
//! in sentence punctuation.

use super::pii_types::PIIType;

/// Uncompiled catalog entry.
#[derive(Debug, Clone, Copy)]
pub struct PatternSpec {
    pub pii_type: PIIType,
    pub base_confidence: f64,
    pub patterns: &'static [&'static str],
}

pub const GENERIC_CATALOG: &[PatternSpec] = &[
    PatternSpec {
        pii_type: PIIType::Aadhaar,
        base_confidence: 0.85,
        patterns: &[r"\b[2-9][0-9]{3}[ -]?[0-9]{4}[ -]?[0-9]{4}\b"],
    },
    PatternSpec {
        pii_type: PIIType::Pan,
        base_confidence: 0.9,
        patterns: &[r"\b[A-Z]{5}[0-9]{4}[A-Z]\b"],
    },
    PatternSpec {
        pii_type: PIIType::Passport,
        base_confidence: 0.8,
        patterns: &[r"\b[A-PR-WY][1-9][0-9] ?[0-9]{4}[1-9]\b"],
    },
    PatternSpec {
        pii_type: PIIType::VoterId,
        base_confidence: 0.75,
        patterns: &[r"\b[A-Z]{3}[0-9]{7}\b"],
    },
    PatternSpec {
        pii_type: PIIType::DrivingLicense,
        base_confidence: 0.8,
        patterns: &[r"\b[A-Z]{2}[ -]?[0-9]{2}[ -]?(?:19|20)[0-9]{2}[ -]?[0-9]{7}\b"],
    },
    PatternSpec {
        pii_type: PIIType::Ssn,
        base_confidence: 0.8,
        patterns: &[r"\b[0-9]{3}-[0-9]{2}-[0-9]{4}\b"],
    },
    PatternSpec {
        pii_type: PIIType::CreditCard,
        base_confidence: 0.8,
        patterns: &[
            r"\b(?:[0-9]{4}[ -]?){3}[0-9]{4}\b",
            r"\b3[47][0-9]{2}[ -]?[0-9]{6}[ -]?[0-9]{5}\b",
        ],
    },
    PatternSpec {
        pii_type: PIIType::BankAccount,
        base_confidence: 0.45,
        patterns: &[r"\b[0-9]{9,18}\b"],
    },
    PatternSpec {
        pii_type: PIIType::Ifsc,
        base_confidence: 0.9,
        patterns: &[r"\b[A-Z]{4}0[A-Z0-9]{6}\b"],
    },
    PatternSpec {
        pii_type: PIIType::UpiId,
        base_confidence: 0.85,
        patterns: &[
            r"\b[A-Za-z0-9._-]{2,256}@(?:okaxis|oksbi|okhdfcbank|okicici|ybl|ibl|axl|paytm|upi|apl|waaxis|wahdfcbank|icici|sbi|hdfcbank|axisbank|kotak|idfcbank)\b",
        ],
    },
    PatternSpec {
        pii_type: PIIType::Gstin,
        base_confidence: 0.9,
        patterns: &[r"\b[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z][1-9A-Z]Z[0-9A-Z]\b"],
    },
    PatternSpec {
        pii_type: PIIType::Email,
        base_confidence: 0.95,
        patterns: &[r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b"],
    },
    PatternSpec {
        pii_type: PIIType::Phone,
        base_confidence: 0.75,
        patterns: &[
            r"(?:\+91[ -]?)?\b[6-9][0-9]{4}[ -]?[0-9]{5}\b",
            r"\+[1-9][0-9]{0,2}[ -]?[0-9]{6,12}\b",
        ],
    },
    PatternSpec {
        pii_type: PIIType::DateOfBirth,
        base_confidence: 0.45,
        patterns: &[
            r"\b(?:0?[1-9]|[12][0-9]|3[01])[/.-](?:0?[1-9]|1[0-2])[/.-](?:19|20)[0-9]{2}\b",
            r"\b(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\.?\s+[0-9]{1,2},?\s+(?:19|20)[0-9]{2}\b",
        ],
    },
    PatternSpec {
        pii_type: PIIType::Address,
        base_confidence: 0.6,
        patterns: &[
            r"\b[0-9]{1,5}[,/]?\s+(?:[A-Za-z.'-]+\s+){0,5}(?:Street|St|Avenue|Ave|Road|Rd|Lane|Ln|Nagar|Colony|Marg|Sector|Layout|Boulevard|Blvd|Drive|Dr)\b(?:,\s*[A-Za-z][A-Za-z ]{1,40})?(?:,?\s*[0-9]{6})?",
        ],
    },
    PatternSpec {
        pii_type: PIIType::IpAddress,
        base_confidence: 0.8,
        patterns: &[
            r"\b(?:(?:25[0-5]|2[0-4][0-9]|1?[0-9]?[0-9])\.){3}(?:25[0-5]|2[0-4][0-9]|1?[0-9]?[0-9])\b",
            r"\b(?:[a-fA-F0-9]{1,4}:){7}[a-fA-F0-9]{1,4}\b",
        ],
    },
    PatternSpec {
        pii_type: PIIType::MacAddress,
        base_confidence: 0.8,
        patterns: &[r"\b(?:[a-fA-F0-9]{2}[:-]){5}[a-fA-F0-9]{2}\b"],
    },
    PatternSpec {
        pii_type: PIIType::Imei,
        base_confidence: 0.7,
        patterns: &[r"\b[0-9]{15}\b"],
    },
    PatternSpec {
        pii_type: PIIType::ApiKey,
        base_confidence: 0.9,
        patterns: &[
            r"\bsk-[a-zA-Z0-9]{20,}\b",
            r"\bghp_[a-zA-Z0-9]{36}\b",
            r"\bxox[baprs]-[a-zA-Z0-9-]{10,}\b",
            r"\bAKIA[0-9A-Z]{16}\b",
            r"\bAIza[0-9A-Za-z_-]{35}\b",
        ],
    },
    PatternSpec {
        pii_type: PIIType::Jwt,
        base_confidence: 0.95,
        patterns: &[r"\beyJ[A-Za-z0-9_-]{10,}\.[A-Za-z0-9_-]{10,}\.[A-Za-z0-9_-]{10,}\b"],
    },
    PatternSpec {
        pii_type: PIIType::Username,
        base_confidence: 0.7,
        patterns: &[
            r"(?i)\b(?:user\s?name|user\s?id|login(?:\s?id)?)\s*(?:\bis\b|:|=)\s*([a-z0-9._@-]{2,63}[a-z0-9_@-])",
        ],
    },
    PatternSpec {
        pii_type: PIIType::Password,
        base_confidence: 0.7,
        patterns: &[r#"(?i)\b(?:password|passwd|pwd|passcode)\s*(?:\bis\b|:|=)\s*(\S{3,63}[^\s.,;:'")\]])"#],
    },
    PatternSpec {
        pii_type: PIIType::EmployeeId,
        base_confidence: 0.7,
        patterns: &[r"\bEMP[-_]?[0-9]{4,8}\b"],
    },
];
