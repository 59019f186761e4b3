//! GDPR compliance verdict and lookup tables
//!
//! Static maps from detected entity types to applicable GDPR article
//! references and recommended anonymization strategies, plus the combined
//! verdict over the privacy and text-bias reports. The verdict is advisory:
//! it accumulates article-level findings, it does not certify compliance.

use fairscan_core::EntityType;
use fairscan_detectors::{DatasetRiskReport, TextBiasReport};
use serde::{Deserialize, Serialize};

/// Recommended anonymization treatment for a detected entity type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnonymizationStrategy {
    /// One-way hash, preserves joinability
    Hash,
    /// Partial character masking, preserves format
    Mask,
    /// Drop the value entirely
    Remove,
    /// Coarsen to a broader bucket (truncate, round, band)
    Generalize,
    /// Replace with a reversible surrogate held in a vault
    Tokenize,
}

/// Recommended strategy per entity type, consumed read-only
pub fn anonymization_strategy(entity_type: EntityType) -> AnonymizationStrategy {
    match entity_type {
        EntityType::NationalId => AnonymizationStrategy::Hash,
        EntityType::CardNumber => AnonymizationStrategy::Tokenize,
        EntityType::EmailAddress => AnonymizationStrategy::Hash,
        EntityType::PhoneNumber => AnonymizationStrategy::Mask,
        EntityType::IpAddress => AnonymizationStrategy::Generalize,
        EntityType::Url => AnonymizationStrategy::Remove,
        EntityType::Date => AnonymizationStrategy::Generalize,
        EntityType::PostalCode => AnonymizationStrategy::Generalize,
    }
}

/// Applicable GDPR article reference per entity type, consumed read-only
pub fn gdpr_article(entity_type: EntityType) -> &'static str {
    match entity_type {
        EntityType::NationalId => "Art. 4(1) + Recital 26",
        EntityType::CardNumber => "Art. 4(1)",
        EntityType::EmailAddress => "Art. 4(1)",
        EntityType::PhoneNumber => "Art. 4(1)",
        EntityType::IpAddress => "Art. 4(1)",
        EntityType::Url => "Art. 4(1)",
        EntityType::Date => "Recital 26",
        EntityType::PostalCode => "Recital 26",
    }
}

/// Remediation guidance for one detected identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifierGuidance {
    /// Column the entity was detected in
    pub column: String,

    /// Detected entity type
    pub entity_type: EntityType,

    /// Recommended anonymization treatment
    pub strategy: AnonymizationStrategy,

    /// Applicable GDPR article reference
    pub article: String,
}

/// Combined GDPR verdict over one analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceVerdict {
    /// False when an Art. 5 or Art. 9 violation was found
    pub compliant: bool,

    /// Accumulated violation descriptions
    pub violations: Vec<String>,

    /// Article references the findings fall under
    pub articles_applicable: Vec<String>,

    /// Per-identifier strategy and article guidance, direct identifiers first
    pub identifier_guidance: Vec<IdentifierGuidance>,
}

/// Fold the privacy and text-bias reports into one verdict
///
/// - dataset privacy risk HIGH or CRITICAL counts against Art. 5
/// - direct identifiers require protection under Art. 32 (flagged but not
///   alone non-compliant)
/// - special-category text findings count against Art. 9
pub fn assess_gdpr_compliance(
    risk: &DatasetRiskReport,
    bias: &TextBiasReport,
) -> ComplianceVerdict {
    let mut compliant = true;
    let mut violations = Vec::new();
    let mut articles_applicable = Vec::new();

    let identifier_guidance = risk
        .direct_identifiers
        .iter()
        .chain(&risk.quasi_identifiers)
        .map(|finding| IdentifierGuidance {
            column: finding.column.clone(),
            entity_type: finding.entity_type,
            strategy: anonymization_strategy(finding.entity_type),
            article: gdpr_article(finding.entity_type).to_string(),
        })
        .collect();

    if matches!(
        risk.risk_level,
        fairscan_core::RiskLevel::High | fairscan_core::RiskLevel::Critical
    ) {
        compliant = false;
        violations.push("High privacy risk detected (GDPR Art. 5)".to_string());
        articles_applicable.push("Art. 5 - Data minimization".to_string());
    }

    if !risk.direct_identifiers.is_empty() {
        violations.push(format!(
            "{} direct identifiers require protection (GDPR Art. 32)",
            risk.direct_identifiers.len()
        ));
        articles_applicable.push("Art. 32 - Security of processing".to_string());
    }

    if !bias.special_category_columns.is_empty() {
        compliant = false;
        violations.push(format!(
            "{} special category violations (GDPR Art. 9)",
            bias.special_category_columns.len()
        ));
        articles_applicable
            .push("Art. 9 - Special categories of personal data".to_string());
    }

    ComplianceVerdict {
        compliant,
        violations,
        articles_applicable,
        identifier_guidance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fairscan_core::{Column, Dataset, Value};
    use fairscan_detectors::{
        DatasetRiskAggregator, ProtectedAttributeScanner, TextCategoryClassifier,
    };

    fn text_column(name: &str, values: &[&str]) -> Column {
        Column::new(name, values.iter().map(|v| Value::from(*v)).collect())
    }

    fn analyze(dataset: &Dataset) -> (DatasetRiskReport, TextBiasReport) {
        let risk = DatasetRiskAggregator::new()
            .unwrap()
            .aggregate(dataset, &TextCategoryClassifier::new())
            .unwrap();
        let bias = ProtectedAttributeScanner::new()
            .unwrap()
            .analyze_dataset(dataset)
            .unwrap();
        (risk, bias)
    }

    #[test]
    fn test_clean_dataset_is_compliant() {
        let dataset = Dataset::new(
            "t",
            vec![text_column("amount", &["120", "250", "310"])],
        );
        let (risk, bias) = analyze(&dataset);

        let verdict = assess_gdpr_compliance(&risk, &bias);
        assert!(verdict.compliant);
        assert!(verdict.violations.is_empty());
    }

    #[test]
    fn test_direct_identifiers_flag_article_32_without_failing() {
        // one email: article 32 applies but low risk keeps the verdict compliant
        let dataset = Dataset::new(
            "t",
            vec![
                text_column("email", &["a@b.com"]),
                text_column("amount", &["120", "250"]),
            ],
        );
        let (risk, bias) = analyze(&dataset);
        assert_eq!(risk.risk_level, fairscan_core::RiskLevel::Low);

        let verdict = assess_gdpr_compliance(&risk, &bias);
        assert!(verdict.compliant);
        assert_eq!(verdict.violations.len(), 1);
        assert!(verdict.articles_applicable[0].starts_with("Art. 32"));
    }

    #[test]
    fn test_special_categories_fail_compliance() {
        let dataset = Dataset::new(
            "t",
            vec![text_column("notes", &["elderly muslim woman applicant"])],
        );
        let (risk, bias) = analyze(&dataset);

        let verdict = assess_gdpr_compliance(&risk, &bias);
        assert!(!verdict.compliant);
        assert!(verdict
            .articles_applicable
            .iter()
            .any(|a| a.starts_with("Art. 9")));
    }

    #[test]
    fn test_verdict_carries_per_identifier_guidance() {
        let dataset = Dataset::new(
            "t",
            vec![
                text_column("email", &["a@b.com"]),
                text_column("joined", &["12/31/2023"]),
            ],
        );
        let (risk, bias) = analyze(&dataset);

        let verdict = assess_gdpr_compliance(&risk, &bias);
        assert_eq!(
            verdict.identifier_guidance,
            vec![
                IdentifierGuidance {
                    column: "email".to_string(),
                    entity_type: EntityType::EmailAddress,
                    strategy: AnonymizationStrategy::Hash,
                    article: "Art. 4(1)".to_string(),
                },
                IdentifierGuidance {
                    column: "joined".to_string(),
                    entity_type: EntityType::Date,
                    strategy: AnonymizationStrategy::Generalize,
                    article: "Recital 26".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_every_entity_type_has_lookups() {
        for entity_type in EntityType::ALL {
            // both maps must be total over the vocabulary
            let _ = anonymization_strategy(entity_type);
            assert!(!gdpr_article(entity_type).is_empty());
        }
    }
}
