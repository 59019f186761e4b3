//! Protected-attribute text scanner
//!
//! Fast bias screening over column text samples: fixed keyword sets per
//! protected category (special categories of personal data), scanned
//! case-insensitively on word boundaries. The per-column bias score is 0.2
//! per distinct category hit, capped at 1.0, with its own threshold table
//! (HIGH >= 0.6, MEDIUM >= 0.3) distinct from the privacy risk tables.

use fairscan_core::{CategoryLevel, Dataset, Error, Result, CONCAT_CAP};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::info;

/// Bias score contributed by each distinct protected category hit
const SCORE_PER_CATEGORY: f64 = 0.2;

/// Column bias score at or above which a column is flagged
const FLAG_THRESHOLD: f64 = 0.3;

/// Protected demographic categories scanned for in text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtectedCategory {
    Race,
    Gender,
    Religion,
    Age,
    Disability,
    Nationality,
}

impl ProtectedCategory {
    /// All scanned categories in scan order
    pub const ALL: [ProtectedCategory; 6] = [
        ProtectedCategory::Race,
        ProtectedCategory::Gender,
        ProtectedCategory::Religion,
        ProtectedCategory::Age,
        ProtectedCategory::Disability,
        ProtectedCategory::Nationality,
    ];

    /// Stable string form used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            ProtectedCategory::Race => "race",
            ProtectedCategory::Gender => "gender",
            ProtectedCategory::Religion => "religion",
            ProtectedCategory::Age => "age",
            ProtectedCategory::Disability => "disability",
            ProtectedCategory::Nationality => "nationality",
        }
    }

    fn keywords(&self) -> &'static str {
        match self {
            ProtectedCategory::Race => {
                "african|asian|caucasian|hispanic|latino|black|white"
            }
            ProtectedCategory::Gender => {
                "male|female|man|woman|boy|girl|transgender|non-binary"
            }
            ProtectedCategory::Religion => {
                "christian|muslim|jewish|hindu|buddhist|atheist|religious"
            }
            ProtectedCategory::Age => {
                "elderly|senior|young|teenager|minor|adult|aged"
            }
            ProtectedCategory::Disability => {
                "disabled|handicapped|impaired|wheelchair|blind|deaf"
            }
            ProtectedCategory::Nationality => {
                "american|british|indian|chinese|german|french|nationality"
            }
        }
    }
}

impl fmt::Display for ProtectedCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text-bias result for a single column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBiasColumnResult {
    /// Column name
    pub column_name: String,

    /// Distinct matched terms per protected category
    pub matched_terms: BTreeMap<ProtectedCategory, Vec<String>>,

    /// 0.2 per distinct category hit, capped at 1.0
    pub bias_score: f64,

    /// Level derived from `bias_score` on the text-bias table
    pub bias_level: CategoryLevel,

    /// Whether special-category data is present (Art. 9 concern)
    pub special_category_concern: bool,
}

/// Dataset-level text-bias report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBiasReport {
    /// Dataset name
    pub dataset_name: String,

    /// Row count of the analyzed dataset
    pub total_rows: usize,

    /// Column count of the analyzed dataset
    pub total_columns: usize,

    /// Which detection path produced this report
    pub analysis_method: String,

    /// Per-column analysis keyed by column name
    pub column_analysis: BTreeMap<String, TextBiasColumnResult>,

    /// Unweighted mean of column bias scores
    pub bias_score: f64,

    /// Level derived from `bias_score` on the text-bias table
    pub bias_level: CategoryLevel,

    /// Columns with bias score at or above 0.3
    pub flagged_columns: Vec<String>,

    /// Distinct protected categories found, in first-seen column order
    pub categories_found: Vec<ProtectedCategory>,

    /// Columns carrying special-category data
    pub special_category_columns: Vec<String>,

    /// Reviewer guidance derived from the findings
    pub recommendations: Vec<String>,
}

/// Keyword scanner for protected demographic attributes
pub struct ProtectedAttributeScanner {
    patterns: Vec<(ProtectedCategory, Regex)>,
}

impl ProtectedAttributeScanner {
    /// Compile the fixed keyword sets
    pub fn new() -> Result<Self> {
        let mut patterns = Vec::with_capacity(ProtectedCategory::ALL.len());
        for category in ProtectedCategory::ALL {
            let regex = Regex::new(&format!(r"(?i)\b(?:{})\b", category.keywords()))
                .map_err(|e| {
                    Error::detector(format!(
                        "failed to compile {category} keyword pattern: {e}"
                    ))
                })?;
            patterns.push((category, regex));
        }
        Ok(Self { patterns })
    }

    /// Scan a text sample for protected-category terms
    pub fn scan(&self, text: &str) -> BTreeMap<ProtectedCategory, Vec<String>> {
        let mut detections = BTreeMap::new();

        for (category, regex) in &self.patterns {
            let terms: BTreeSet<String> = regex
                .find_iter(text)
                .map(|m| m.as_str().to_lowercase())
                .collect();
            if !terms.is_empty() {
                detections.insert(*category, terms.into_iter().collect());
            }
        }

        detections
    }

    /// Scan one column's bounded text sample
    pub fn analyze_column(&self, column: &fairscan_core::Column) -> TextBiasColumnResult {
        let sample = column.sample_text(CONCAT_CAP).join(" | ");
        let matched_terms = self.scan(&sample);

        let bias_score =
            (matched_terms.len() as f64 * SCORE_PER_CATEGORY).min(1.0);
        let bias_score = crate::column::round3(bias_score);

        TextBiasColumnResult {
            column_name: column.name.clone(),
            special_category_concern: !matched_terms.is_empty(),
            bias_score,
            bias_level: CategoryLevel::from_bias_score(bias_score),
            matched_terms,
        }
    }

    /// Scan every column and fold the results into a dataset bias report
    pub fn analyze_dataset(&self, dataset: &Dataset) -> Result<TextBiasReport> {
        if dataset.is_empty() {
            return Err(Error::empty_dataset(format!(
                "dataset '{}' has no rows or no columns to scan for bias",
                dataset.name
            )));
        }

        let mut column_analysis = BTreeMap::new();
        let mut flagged_columns = Vec::new();
        let mut categories_found = Vec::new();
        let mut special_category_columns = Vec::new();
        let mut score_sum = 0.0;

        for column in &dataset.columns {
            let result = self.analyze_column(column);
            score_sum += result.bias_score;

            if result.bias_score >= FLAG_THRESHOLD {
                flagged_columns.push(column.name.clone());
            }

            if result.special_category_concern {
                special_category_columns.push(column.name.clone());
                for category in result.matched_terms.keys() {
                    if !categories_found.contains(category) {
                        categories_found.push(*category);
                    }
                }
            }

            column_analysis.insert(column.name.clone(), result);
        }

        let bias_score = crate::column::round3(score_sum / dataset.column_count() as f64);
        let bias_level = CategoryLevel::from_bias_score(bias_score);

        info!(
            dataset = %dataset.name,
            bias_score,
            %bias_level,
            flagged = flagged_columns.len(),
            "scanned dataset for protected-attribute text"
        );

        let recommendations = build_recommendations(
            &special_category_columns,
            &categories_found,
            bias_score,
        );

        Ok(TextBiasReport {
            dataset_name: dataset.name.clone(),
            total_rows: dataset.row_count(),
            total_columns: dataset.column_count(),
            analysis_method: "pattern_matching".to_string(),
            column_analysis,
            bias_score,
            bias_level,
            flagged_columns,
            categories_found,
            special_category_columns,
            recommendations,
        })
    }
}

fn build_recommendations(
    special_category_columns: &[String],
    categories_found: &[ProtectedCategory],
    bias_score: f64,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if !special_category_columns.is_empty() {
        recommendations.push(format!(
            "GDPR Article 9: {} columns contain special category data. Remove or obtain explicit consent before processing",
            special_category_columns.len()
        ));
    }

    if !categories_found.is_empty() {
        let names: Vec<&str> = categories_found.iter().map(|c| c.as_str()).collect();
        recommendations.push(format!(
            "Protected attributes detected: {}. Ensure model decisions do not rely on these features",
            names.join(", ")
        ));
    }

    if bias_score >= 0.5 {
        recommendations.push(
            "High bias score detected. Apply bias mitigation techniques (reweighting, adversarial debiasing, fairness constraints)"
                .to_string(),
        );
    }

    if recommendations.is_empty() {
        recommendations.push("No significant bias indicators detected".to_string());
    }

    recommendations
}
