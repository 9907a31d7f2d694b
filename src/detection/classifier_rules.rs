//! Built-in document archetypes, in tie-break order.

use super::pii_types::PIIType;

pub(super) struct ArchetypeRule {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub expected_types: &'static [PIIType],
    pub max_allowed_count: Option<usize>,
}

pub(super) const BUILTIN_ARCHETYPES: &[ArchetypeRule] = &[
    ArchetypeRule {
        name: "aadhaar_card",
        keywords: &[
            "aadhaar", "aadhar", "unique identification authority", "uidai",
            "enrolment no", "mera aadhaar",
        ],
        expected_types: &[PIIType::Aadhaar, PIIType::DateOfBirth, PIIType::Address, PIIType::Phone],
        max_allowed_count: Some(4),
    },
    ArchetypeRule {
        name: "pan_card",
        keywords: &[
            "income tax department", "permanent account number", "pan card", "govt. of india",
            "father's name",
        ],
        expected_types: &[PIIType::Pan, PIIType::DateOfBirth],
        max_allowed_count: Some(3),
    },
    ArchetypeRule {
        name: "passport",
        keywords: &[
            "passport", "republic of india", "nationality", "place of birth", "date of expiry",
            "place of issue",
        ],
        expected_types: &[PIIType::Passport, PIIType::DateOfBirth],
        max_allowed_count: Some(4),
    },
    ArchetypeRule {
        name: "bank_statement",
        keywords: &[
            "bank statement", "account statement", "statement of account", "ifsc",
            "opening balance", "closing balance", "transaction", "branch",
        ],
        expected_types: &[
            PIIType::BankAccount, PIIType::Ifsc, PIIType::UpiId, PIIType::CreditCard,
            PIIType::Phone, PIIType::Email, PIIType::Address,
        ],
        max_allowed_count: None,
    },
    ArchetypeRule {
        name: "tax_certificate",
        keywords: &[
            "form 16", "tax deducted at source", "assessment year", "certificate under section",
            "tds certificate", "deductor",
        ],
        expected_types: &[PIIType::Pan, PIIType::Gstin, PIIType::BankAccount, PIIType::Address],
        max_allowed_count: None,
    },
    ArchetypeRule {
        name: "driving_license",
        keywords: &[
            "driving licence", "driving license", "transport department", "licensing authority",
            "valid till", "motor vehicle",
        ],
        expected_types: &[PIIType::DrivingLicense, PIIType::DateOfBirth, PIIType::Address],
        max_allowed_count: Some(4),
    },
    ArchetypeRule {
        name: "voter_id",
        keywords: &["election commission", "elector", "electoral", "voter", "epic no"],
        expected_types: &[PIIType::VoterId, PIIType::Address],
        max_allowed_count: Some(3),
    },
];
