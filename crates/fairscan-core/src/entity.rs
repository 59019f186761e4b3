//! Entity-type vocabulary for PII detection

use serde::{Deserialize, Serialize};
use std::fmt;

/// PII entity types recognized by the pattern detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    /// Email address
    EmailAddress,
    /// Phone number
    PhoneNumber,
    /// National-ID-like sequence (SSN format)
    NationalId,
    /// Card-number-like sequence
    CardNumber,
    /// IPv4 address
    IpAddress,
    /// URL
    Url,
    /// Calendar date
    Date,
    /// Postal/ZIP code
    PostalCode,
}

impl EntityType {
    /// All recognized entity types, in detector scan order
    pub const ALL: [EntityType; 8] = [
        EntityType::EmailAddress,
        EntityType::PhoneNumber,
        EntityType::NationalId,
        EntityType::CardNumber,
        EntityType::IpAddress,
        EntityType::Url,
        EntityType::Date,
        EntityType::PostalCode,
    ];

    /// Stable string form used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::EmailAddress => "EMAIL_ADDRESS",
            EntityType::PhoneNumber => "PHONE_NUMBER",
            EntityType::NationalId => "NATIONAL_ID",
            EntityType::CardNumber => "CARD_NUMBER",
            EntityType::IpAddress => "IP_ADDRESS",
            EntityType::Url => "URL",
            EntityType::Date => "DATE",
            EntityType::PostalCode => "POSTAL_CODE",
        }
    }

    /// PII that alone identifies an individual
    pub fn is_direct_identifier(&self) -> bool {
        matches!(
            self,
            EntityType::NationalId
                | EntityType::CardNumber
                | EntityType::EmailAddress
                | EntityType::PhoneNumber
        )
    }

    /// Data that identifies an individual only in combination with other fields
    pub fn is_quasi_identifier(&self) -> bool {
        matches!(self, EntityType::Date | EntityType::PostalCode)
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
