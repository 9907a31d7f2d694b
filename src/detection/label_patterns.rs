//! Label-anchored PII catalog.
//!
//! Every pattern requires an explicit field label followed by `:` or `=`
//! before the value (group 1). Used for config files and forms where free
//! text is full of label:value pairs and incidental numbers.

use super::pii_patterns::PatternSpec;
use super::pii_types::PIIType;

pub const LABEL_CATALOG: &[PatternSpec] = &[
    PatternSpec {
        pii_type: PIIType::Username,
        base_confidence: 0.9,
        patterns: &[r"(?i)\b(?:user\s?name|user\s?id|login(?:\s?id)?)\s*[:=]\s*([^\s,;]{2,64})"],
    },
    PatternSpec {
        pii_type: PIIType::Password,
        base_confidence: 0.95,
        patterns: &[r"(?i)\b(?:password|passwd|pwd|passcode|pass)\s*[:=]\s*(\S{2,128})"],
    },
    PatternSpec {
        pii_type: PIIType::ApiKey,
        base_confidence: 0.95,
        patterns: &[
            r#"(?i)\b(?:api[\s_-]?key|secret(?:[\s_-]?key)?|access[\s_-]?token|auth[\s_-]?token|client[\s_-]?secret)\s*[:=]\s*["']?([A-Za-z0-9_./+-]{8,256})"#,
        ],
    },
    PatternSpec {
        pii_type: PIIType::BankAccount,
        base_confidence: 0.9,
        patterns: &[
            r"(?i)\b(?:account|acct|a/c)(?:\s*(?:no|number|num))?\.?\s*[:=]\s*([0-9][0-9 -]{6,22}[0-9])",
        ],
    },
    PatternSpec {
        pii_type: PIIType::Ifsc,
        base_confidence: 0.95,
        patterns: &[r"(?i)\bifsc(?:\s*code)?\s*[:=]\s*([a-z]{4}0[a-z0-9]{6})\b"],
    },
    PatternSpec {
        pii_type: PIIType::DateOfBirth,
        base_confidence: 0.95,
        patterns: &[
            r"(?i)\b(?:dob|d\.o\.b\.?|date\s+of\s+birth|birth\s*date)\s*[:=]\s*([0-9]{1,2}[/.-][0-9]{1,2}[/.-][0-9]{2,4})",
        ],
    },
    PatternSpec {
        pii_type: PIIType::Email,
        base_confidence: 0.95,
        patterns: &[r"(?i)\be-?mail(?:\s*id)?\s*[:=]\s*([a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,})"],
    },
    PatternSpec {
        pii_type: PIIType::Phone,
        base_confidence: 0.9,
        patterns: &[
            r"(?i)\b(?:phone|mobile|mob|tel|contact)(?:\s*(?:no|number))?\.?\s*[:=]\s*(\+?[0-9][0-9 -]{8,14}[0-9])",
        ],
    },
    PatternSpec {
        pii_type: PIIType::Aadhaar,
        base_confidence: 0.85,
        patterns: &[
            r"(?i)\b(?:uid|aadhaar|aadhar)(?:\s*(?:no|number))?\.?\s*[:=]\s*([0-9]{4}[ -]?[0-9]{4}[ -]?[0-9]{4})\b",
        ],
    },
    PatternSpec {
        pii_type: PIIType::Pan,
        base_confidence: 0.95,
        patterns: &[r"(?i)\bpan(?:\s*(?:no|number))?\.?\s*[:=]\s*([a-z]{5}[0-9]{4}[a-z])\b"],
    },
    PatternSpec {
        pii_type: PIIType::UpiId,
        base_confidence: 0.95,
        patterns: &[r"(?i)\bupi(?:\s*id)?\s*[:=]\s*([a-z0-9._-]{2,256}@[a-z]{2,64})\b"],
    },
    PatternSpec {
        pii_type: PIIType::Passport,
        base_confidence: 0.9,
        patterns: &[r"(?i)\bpassport(?:\s*(?:no|number))?\.?\s*[:=]\s*([a-z][0-9]{7})\b"],
    },
    PatternSpec {
        pii_type: PIIType::CreditCard,
        base_confidence: 0.85,
        patterns: &[
            r"(?i)\b(?:card(?:\s*(?:no|number))?|cc)\.?\s*[:=]\s*([0-9][0-9 -]{11,21}[0-9])",
        ],
    },
];
