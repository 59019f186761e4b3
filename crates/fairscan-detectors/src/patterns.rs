//! Regex-based PII entity scanner
//!
//! Stateless detector over bounded text samples. Patterns are compiled once
//! at construction; scanning has no failure modes beyond malformed-input
//! propagation from the caller.

use fairscan_core::{EntityType, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single entity occurrence summary for one column scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMatch {
    /// Entity type that matched
    pub entity_type: EntityType,

    /// First matched text, for reviewer context
    pub matched_text: String,

    /// Number of occurrences in the scanned sample
    pub count: usize,
}

/// Regex-based entity scanner with a fixed set of compiled patterns
pub struct PatternDetector {
    patterns: Vec<(EntityType, Regex)>,
}

impl PatternDetector {
    /// Compile the fixed entity pattern set
    pub fn new() -> Result<Self> {
        let specs: [(EntityType, &str); 8] = [
            (
                EntityType::EmailAddress,
                r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b",
            ),
            (
                EntityType::PhoneNumber,
                r"\b(?:\+\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}\b",
            ),
            (EntityType::NationalId, r"\b\d{3}-\d{2}-\d{4}\b"),
            (
                EntityType::CardNumber,
                r"\b\d{4}[-\s]?\d{4}[-\s]?\d{4}[-\s]?\d{4}\b",
            ),
            (EntityType::IpAddress, r"\b(?:\d{1,3}\.){3}\d{1,3}\b"),
            (EntityType::Url, r"https?://\S+|www\.\S+"),
            (EntityType::Date, r"\b\d{1,2}[-/]\d{1,2}[-/]\d{2,4}\b"),
            (EntityType::PostalCode, r"\b\d{5}(?:-\d{4})?\b"),
        ];

        let mut patterns = Vec::with_capacity(specs.len());
        for (entity, pattern) in specs {
            let regex = Regex::new(pattern).map_err(|e| {
                fairscan_core::Error::detector(format!(
                    "failed to compile {entity} pattern: {e}"
                ))
            })?;
            patterns.push((entity, regex));
        }

        Ok(Self { patterns })
    }

    /// Scan a text sample and return entity type -> matched texts
    pub fn detect(&self, text: &str) -> BTreeMap<EntityType, Vec<String>> {
        let mut detections = BTreeMap::new();

        for (entity, regex) in &self.patterns {
            let matches: Vec<String> = regex
                .find_iter(text)
                .map(|m| m.as_str().to_string())
                .collect();
            if !matches.is_empty() {
                detections.insert(*entity, matches);
            }
        }

        detections
    }

    /// Scan a text sample and summarize matches per entity type
    pub fn detect_summary(&self, text: &str) -> Vec<EntityMatch> {
        self.detect(text)
            .into_iter()
            .map(|(entity_type, matches)| EntityMatch {
                entity_type,
                matched_text: matches[0].clone(),
                count: matches.len(),
            })
            .collect()
    }
}

/// Per-entity-type risk weight; direct identifiers weigh highest
pub fn entity_weight(entity: EntityType) -> f64 {
    match entity {
        EntityType::NationalId => 1.0,
        EntityType::CardNumber => 1.0,
        EntityType::EmailAddress => 0.7,
        EntityType::PhoneNumber => 0.6,
        EntityType::IpAddress => 0.5,
        EntityType::PostalCode => 0.4,
        EntityType::Url => 0.3,
        EntityType::Date => 0.2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_detection() {
        let detector = PatternDetector::new().unwrap();

        let detections = detector.detect("Contact me at john@example.com");
        assert_eq!(
            detections.get(&EntityType::EmailAddress).map(Vec::len),
            Some(1)
        );
    }

    #[test]
    fn test_national_id_detection() {
        let detector = PatternDetector::new().unwrap();

        let detections = detector.detect("ssn 123-45-6789 on file");
        assert!(detections.contains_key(&EntityType::NationalId));
    }

    #[test]
    fn test_clean_text_yields_no_matches() {
        let detector = PatternDetector::new().unwrap();

        let detections = detector.detect("inventory count and product category");
        assert!(detections.is_empty());
    }

    #[test]
    fn test_embedded_ip_in_free_text() {
        let detector = PatternDetector::new().unwrap();

        let detections = detector.detect("request from 192.168.1.1 rejected");
        assert!(detections.contains_key(&EntityType::IpAddress));
    }

    #[test]
    fn test_detect_summary_counts() {
        let detector = PatternDetector::new().unwrap();

        let summary =
            detector.detect_summary("a@b.com | c@d.net | call 555-123-4567");
        let email = summary
            .iter()
            .find(|m| m.entity_type == EntityType::EmailAddress)
            .unwrap();
        assert_eq!(email.count, 2);
        assert_eq!(email.matched_text, "a@b.com");
    }

    #[test]
    fn test_direct_identifiers_weigh_highest() {
        for entity in EntityType::ALL {
            let w = entity_weight(entity);
            assert!((0.0..=1.0).contains(&w));
            if matches!(entity, EntityType::NationalId | EntityType::CardNumber) {
                assert_eq!(w, 1.0);
            }
        }
    }
}
