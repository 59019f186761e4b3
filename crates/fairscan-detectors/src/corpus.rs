//! Synthetic labelled corpus for classifier training
//!
//! Deterministic generator cycling fixed sample lists across the
//! PII / SENSITIVE / SAFE categories. Intended for bootstrapping a usable
//! classifier in tests and demos when no curated corpus is available.

const PII_SAMPLES: [&str; 9] = [
    "john.doe@example.com",
    "jane.smith@company.com",
    "+1-555-123-4567",
    "123-45-6789",
    "4532-1234-5678-9012",
    "192.168.1.1",
    "https://example.com/profile",
    "12/31/2023",
    "90210",
];

const SENSITIVE_SAMPLES: [&str; 6] = [
    "Patient has diabetes",
    "Employee salary $120,000",
    "Credit score 750",
    "African American male",
    "Muslim employee",
    "Wheelchair accessible",
];

const SAFE_SAMPLES: [&str; 6] = [
    "Product category",
    "Inventory count",
    "Temperature reading",
    "Anonymous feedback",
    "Aggregated statistics",
    "Public information",
];

/// Generate up to `n_samples` labelled (text, category) pairs
///
/// Category proportions follow the fixed sample lists: roughly one third
/// PII, one third SENSITIVE, one third SAFE. Output is fully deterministic.
pub fn synthetic_compliance_corpus(n_samples: usize) -> Vec<(String, String)> {
    let mut corpus = Vec::with_capacity(n_samples);

    let pii_repeats = n_samples / (PII_SAMPLES.len() * 3);
    let sensitive_repeats = n_samples / (SENSITIVE_SAMPLES.len() * 3);
    let safe_repeats = n_samples / (SAFE_SAMPLES.len() * 3);

    for _ in 0..pii_repeats {
        for sample in PII_SAMPLES {
            corpus.push((sample.to_string(), "PII".to_string()));
        }
    }
    for _ in 0..sensitive_repeats {
        for sample in SENSITIVE_SAMPLES {
            corpus.push((sample.to_string(), "SENSITIVE".to_string()));
        }
    }
    for _ in 0..safe_repeats {
        for sample in SAFE_SAMPLES {
            corpus.push((sample.to_string(), "SAFE".to_string()));
        }
    }

    corpus.truncate(n_samples);
    corpus
}
