//! JSON output format for significance results
//!
//! `--format json` wraps the result in a versioned envelope so consumers can
//! detect format changes.

use crate::request::{ResultKind, SignificanceResult};
use crate::sample_size::SampleSizeRecommendation;
use serde::Serialize;

/// Format identifier written into every document
pub const JSON_FORMAT: &str = "ab-significance-json-v1";

/// Root JSON output structure
///
/// Non-finite numbers (NaN from zero-hit variants) serialize as `null`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonOutput {
    /// Crate version that produced the document
    pub version: String,
    /// Format name
    pub format: String,
    /// Result kind of the computation (absent for sample size output)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_kind: Option<ResultKind>,
    /// Computation result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<SignificanceResult>,
    /// Sample size recommendation (if --sample-size was given)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_size: Option<SampleSizeRecommendation>,
}

impl JsonOutput {
    /// Create an empty JSON output structure
    pub fn new() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: JSON_FORMAT.to_string(),
            result_kind: None,
            result: None,
            sample_size: None,
        }
    }

    /// Set the computation result
    pub fn set_result(&mut self, kind: ResultKind, result: SignificanceResult) {
        self.result_kind = Some(kind);
        self.result = Some(result);
    }

    /// Set the sample size recommendation
    pub fn set_sample_size(&mut self, recommendation: SampleSizeRecommendation) {
        self.sample_size = Some(recommendation);
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}
