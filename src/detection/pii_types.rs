//! PII type tags and their semantic categories.

use serde::{Deserialize, Serialize};

/// Semantic grouping of PII types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PIICategory {
    #[serde(rename = "Government-ID")]
    GovernmentId,
    Financial,
    Contact,
    Personal,
    Credentials,
    Technical,
    #[serde(rename = "Custom-ID")]
    CustomId,
}

impl PIICategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PIICategory::GovernmentId => "Government-ID",
            PIICategory::Financial => "Financial",
            PIICategory::Contact => "Contact",
            PIICategory::Personal => "Personal",
            PIICategory::Credentials => "Credentials",
            PIICategory::Technical => "Technical",
            PIICategory::CustomId => "Custom-ID",
        }
    }
}

impl std::fmt::Display for PIICategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// PII types that can be detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PIIType {
    Aadhaar,
    Pan,
    Passport,
    VoterId,
    DrivingLicense,
    Ssn,
    CreditCard,
    BankAccount,
    Ifsc,
    UpiId,
    Gstin,
    Email,
    Phone,
    DateOfBirth,
    Address,
    IpAddress,
    MacAddress,
    Imei,
    ApiKey,
    Jwt,
    Username,
    Password,
    EmployeeId,
}

impl PIIType {
    pub const ALL: [PIIType; 23] = [
        PIIType::Aadhaar, PIIType::Pan, PIIType::Passport, PIIType::VoterId,
        PIIType::DrivingLicense, PIIType::Ssn, PIIType::CreditCard, PIIType::BankAccount,
        PIIType::Ifsc, PIIType::UpiId, PIIType::Gstin, PIIType::Email, PIIType::Phone,
        PIIType::DateOfBirth, PIIType::Address, PIIType::IpAddress, PIIType::MacAddress,
        PIIType::Imei, PIIType::ApiKey, PIIType::Jwt, PIIType::Username, PIIType::Password,
        PIIType::EmployeeId,
    ];

    /// Wire name, e.g. `PASSWORD`.
    pub fn as_str(&self) -> &'static str {
        match self {
            PIIType::Aadhaar => "AADHAAR",
            PIIType::Pan => "PAN",
            PIIType::Passport => "PASSPORT",
            PIIType::VoterId => "VOTER_ID",
            PIIType::DrivingLicense => "DRIVING_LICENSE",
            PIIType::Ssn => "SSN",
            PIIType::CreditCard => "CREDIT_CARD",
            PIIType::BankAccount => "BANK_ACCOUNT",
            PIIType::Ifsc => "IFSC",
            PIIType::UpiId => "UPI_ID",
            PIIType::Gstin => "GSTIN",
            PIIType::Email => "EMAIL",
            PIIType::Phone => "PHONE",
            PIIType::DateOfBirth => "DATE_OF_BIRTH",
            PIIType::Address => "ADDRESS",
            PIIType::IpAddress => "IP_ADDRESS",
            PIIType::MacAddress => "MAC_ADDRESS",
            PIIType::Imei => "IMEI",
            PIIType::ApiKey => "API_KEY",
            PIIType::Jwt => "JWT",
            PIIType::Username => "USERNAME",
            PIIType::Password => "PASSWORD",
            PIIType::EmployeeId => "EMPLOYEE_ID",
        }
    }

    /// Canonical lowercase catalog name used by document contexts.
    pub fn canonical(&self) -> String {
        self.as_str().to_ascii_lowercase()
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            PIIType::Aadhaar => "Aadhaar Number",
            PIIType::Pan => "PAN",
            PIIType::Passport => "Passport Number",
            PIIType::VoterId => "Voter ID",
            PIIType::DrivingLicense => "Driving License",
            PIIType::Ssn => "Social Security Number",
            PIIType::CreditCard => "Credit Card",
            PIIType::BankAccount => "Bank Account",
            PIIType::Ifsc => "IFSC Code",
            PIIType::UpiId => "UPI ID",
            PIIType::Gstin => "GSTIN",
            PIIType::Email => "Email Address",
            PIIType::Phone => "Phone Number",
            PIIType::DateOfBirth => "Date of Birth",
            PIIType::Address => "Address",
            PIIType::IpAddress => "IP Address",
            PIIType::MacAddress => "MAC Address",
            PIIType::Imei => "IMEI",
            PIIType::ApiKey => "API Key",
            PIIType::Jwt => "JSON Web Token",
            PIIType::Username => "Username",
            PIIType::Password => "Password",
            PIIType::EmployeeId => "Employee ID",
        }
    }

    pub fn category(&self) -> PIICategory {
        match self {
            PIIType::Aadhaar | PIIType::Pan | PIIType::Passport | PIIType::VoterId
            | PIIType::DrivingLicense | PIIType::Ssn => PIICategory::GovernmentId,
            PIIType::CreditCard | PIIType::BankAccount | PIIType::Ifsc | PIIType::UpiId
            | PIIType::Gstin => PIICategory::Financial,
            PIIType::Email | PIIType::Phone => PIICategory::Contact,
            PIIType::DateOfBirth | PIIType::Address => PIICategory::Personal,
            PIIType::ApiKey | PIIType::Jwt | PIIType::Username | PIIType::Password => {
                PIICategory::Credentials
            }
            PIIType::IpAddress | PIIType::MacAddress | PIIType::Imei => PIICategory::Technical,
            PIIType::EmployeeId => PIICategory::CustomId,
        }
    }

    /// Types whose normalized value keeps digits only.
    pub fn is_numeric_id(&self) -> bool {
        matches!(
            self,
            PIIType::Aadhaar | PIIType::Ssn | PIIType::CreditCard | PIIType::BankAccount
                | PIIType::Phone | PIIType::Imei
        )
    }

    /// Types compared and substituted without regard to case.
    pub fn is_case_insensitive(&self) -> bool {
        matches!(self, PIIType::Email | PIIType::UpiId)
    }

    /// Types with an unacceptable false-positive rate unless a context
    /// keyword is present near the match.
    pub fn requires_context(&self) -> bool {
        matches!(self, PIIType::Address | PIIType::Username | PIIType::Password)
    }

    /// Parse a type name leniently: wire name, canonical name, or a few
    /// common spellings ("Aadhar", "mobile", "dob").
    pub fn from_name(name: &str) -> Option<PIIType> {
        let key: String = name
            .trim()
            .to_ascii_lowercase()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c })
            .collect();
        if let Some(t) = Self::ALL.iter().find(|t| t.canonical() == key) {
            return Some(*t);
        }
        match key.as_str() {
            "aadhar" | "uid" | "aadhaar_number" | "national_id" => Some(PIIType::Aadhaar),
            "pan_card" | "pan_number" => Some(PIIType::Pan),
            "passport_number" => Some(PIIType::Passport),
            "epic" | "voter" => Some(PIIType::VoterId),
            "dl" | "driving_licence" | "driver_license" => Some(PIIType::DrivingLicense),
            "card" | "card_number" => Some(PIIType::CreditCard),
            "account" | "account_number" => Some(PIIType::BankAccount),
            "upi" => Some(PIIType::UpiId),
            "mail" | "email_address" => Some(PIIType::Email),
            "mobile" | "phone_number" => Some(PIIType::Phone),
            "dob" | "birth_date" => Some(PIIType::DateOfBirth),
            "ip" => Some(PIIType::IpAddress),
            "mac" => Some(PIIType::MacAddress),
            "apikey" | "api_token" => Some(PIIType::ApiKey),
            _ => None,
        }
    }
}

impl std::fmt::Display for PIIType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
