//! Single entry point: compute one kind of result for a variant pair
//!
//! A [`ComputationRequest`] carries both variants, the result kind and the
//! presentation options. [`compute_significance`] validates it and
//! dispatches to the significance engine.

use crate::error::{Result, SignificanceError};
use crate::significance::{
    self, calculate_all, conversion_rates, ConfidenceOptions, FormattedValue, FormattingOptions,
    SignificanceReport,
};
use crate::variant::{Variant, VariantMap};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Which metric(s) a request returns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ResultKind {
    Hits,
    Conversions,
    ConversionRates,
    ZScore,
    PValue,
    Confidence,
    Significant,
    #[default]
    All,
}

impl ResultKind {
    /// Every recognized kind
    pub const ALL_KINDS: [ResultKind; 8] = [
        ResultKind::Hits,
        ResultKind::Conversions,
        ResultKind::ConversionRates,
        ResultKind::ZScore,
        ResultKind::PValue,
        ResultKind::Confidence,
        ResultKind::Significant,
        ResultKind::All,
    ];

    /// Canonical name (`zScore`, `conversionRates`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultKind::Hits => "hits",
            ResultKind::Conversions => "conversions",
            ResultKind::ConversionRates => "conversionRates",
            ResultKind::ZScore => "zScore",
            ResultKind::PValue => "pValue",
            ResultKind::Confidence => "confidence",
            ResultKind::Significant => "significant",
            ResultKind::All => "all",
        }
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResultKind {
    type Err = SignificanceError;

    /// Accepts the canonical camelCase name, plus kebab-case and snake_case
    /// spellings (`z-score`, `p_value`)
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();

        ResultKind::ALL_KINDS
            .iter()
            .copied()
            .find(|kind| kind.as_str().to_lowercase() == normalized)
            .ok_or_else(|| {
                SignificanceError::InvalidArgument(format!(
                    "unrecognized result kind '{}' (expected one of: {})",
                    s,
                    ResultKind::ALL_KINDS.map(|k| k.as_str()).join(", ")
                ))
            })
    }
}

impl TryFrom<String> for ResultKind {
    type Error = SignificanceError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ResultKind> for String {
    fn from(kind: ResultKind) -> Self {
        kind.as_str().to_string()
    }
}

/// Full input of one computation
///
/// # Example
/// ```
/// use ab_significance::request::{compute_significance, ComputationRequest, ResultKind};
/// use ab_significance::variant::Variant;
///
/// let request = ComputationRequest::new(
///     Variant::new("Control A", 600, 100),
///     Variant::new("Treatment A", 700, 150),
/// )
/// .with_result_kind(ResultKind::Significant);
///
/// let result = compute_significance(&request).unwrap();
/// assert_eq!(result.as_bool(), Some(true));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComputationRequest {
    pub control: Variant,
    pub treatment: Variant,
    #[serde(default)]
    pub result_kind: ResultKind,
    #[serde(default)]
    pub conversion_rate_options: FormattingOptions,
    #[serde(default)]
    pub confidence_options: ConfidenceOptions,
}

impl ComputationRequest {
    /// Request every metric with default options
    pub fn new(control: Variant, treatment: Variant) -> Self {
        Self {
            control,
            treatment,
            result_kind: ResultKind::default(),
            conversion_rate_options: FormattingOptions::default(),
            confidence_options: ConfidenceOptions::default(),
        }
    }

    pub fn with_result_kind(mut self, kind: ResultKind) -> Self {
        self.result_kind = kind;
        self
    }

    pub fn with_conversion_rate_options(mut self, options: FormattingOptions) -> Self {
        self.conversion_rate_options = options;
        self
    }

    pub fn with_confidence_options(mut self, options: ConfidenceOptions) -> Self {
        self.confidence_options = options;
        self
    }

    /// Load a request from a TOML file
    ///
    /// ```no_run
    /// use ab_significance::request::ComputationRequest;
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let request = ComputationRequest::from_file("experiment.toml")?;
    /// println!("{} vs {}", request.control.label, request.treatment.label);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_toml_str(&content)
    }

    /// Parse a request from TOML text
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("Failed to parse TOML request")
    }

    /// Validate labels and options
    pub fn validate(&self) -> Result<()> {
        if self.control.label == self.treatment.label {
            return Err(SignificanceError::InvalidArgument(format!(
                "control and treatment share the label '{}'",
                self.control.label
            )));
        }

        self.conversion_rate_options.validate()?;
        self.confidence_options.validate()?;

        Ok(())
    }
}

/// Output of [`compute_significance`]; shape depends on the result kind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SignificanceResult {
    Hits(VariantMap<u64>),
    Conversions(VariantMap<u64>),
    ConversionRates(VariantMap<FormattedValue>),
    ZScore(f64),
    PValue(f64),
    Confidence(FormattedValue),
    Significant(bool),
    All(Box<SignificanceReport>),
}

impl SignificanceResult {
    /// Scalar numeric result (`zScore`, `pValue`, unformatted `confidence`)
    pub fn as_number(&self) -> Option<f64> {
        match self {
            SignificanceResult::ZScore(n) | SignificanceResult::PValue(n) => Some(*n),
            SignificanceResult::Confidence(value) => value.as_number(),
            _ => None,
        }
    }

    /// Verdict of a `significant` request
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SignificanceResult::Significant(b) => Some(*b),
            _ => None,
        }
    }

    /// Aggregate report of an `all` request
    pub fn as_report(&self) -> Option<&SignificanceReport> {
        match self {
            SignificanceResult::All(report) => Some(report.as_ref()),
            _ => None,
        }
    }

    /// Generate human-readable output
    pub fn to_report_string(&self) -> String {
        match self {
            SignificanceResult::Hits(map) | SignificanceResult::Conversions(map) => map
                .iter()
                .map(|(label, n)| format!("{}: {}\n", label, n))
                .collect(),
            SignificanceResult::ConversionRates(map) => map
                .iter()
                .map(|(label, rate)| format!("{}: {}\n", label, rate))
                .collect(),
            SignificanceResult::ZScore(n) | SignificanceResult::PValue(n) => format!("{}\n", n),
            SignificanceResult::Confidence(value) => format!("{}\n", value),
            SignificanceResult::Significant(b) => format!("{}\n", b),
            SignificanceResult::All(report) => report.to_report_string(),
        }
    }
}

/// Compute the metric(s) selected by `request.result_kind`
///
/// Fails only on out-of-contract input (colliding labels, invalid options).
/// Zero hits are not an error; the numeric results come back NaN.
pub fn compute_significance(request: &ComputationRequest) -> Result<SignificanceResult> {
    request.validate()?;

    let control = &request.control;
    let treatment = &request.treatment;

    tracing::debug!(
        kind = %request.result_kind,
        control = %control.label,
        treatment = %treatment.label,
        "computing significance"
    );

    for variant in [control, treatment] {
        if variant.hits == 0 {
            tracing::warn!(
                "Variant '{}' has zero hits; z-score and confidence will be NaN",
                variant.label
            );
        }
        if variant.is_inconsistent() {
            tracing::warn!(
                "Variant '{}' has more conversions ({}) than hits ({})",
                variant.label,
                variant.conversions,
                variant.hits
            );
        }
    }

    let result = match request.result_kind {
        ResultKind::Hits => {
            SignificanceResult::Hits(VariantMap::from_pair(control, treatment, |v| v.hits))
        }
        ResultKind::Conversions => SignificanceResult::Conversions(VariantMap::from_pair(
            control,
            treatment,
            |v| v.conversions,
        )),
        ResultKind::ConversionRates => SignificanceResult::ConversionRates(conversion_rates(
            control,
            treatment,
            &request.conversion_rate_options,
        )),
        ResultKind::ZScore => {
            SignificanceResult::ZScore(significance::z_score(control, treatment))
        }
        ResultKind::PValue => SignificanceResult::PValue(significance::p_value(
            significance::raw_confidence(control, treatment),
        )),
        ResultKind::Confidence => SignificanceResult::Confidence(significance::confidence(
            control,
            treatment,
            &request.confidence_options,
        )),
        ResultKind::Significant => {
            let confidence = significance::raw_confidence(control, treatment);
            SignificanceResult::Significant(significance::is_significant_at(
                confidence,
                &request.confidence_options,
            ))
        }
        ResultKind::All => SignificanceResult::All(Box::new(calculate_all(
            control,
            treatment,
            &request.conversion_rate_options,
            &request.confidence_options,
        ))),
    };

    Ok(result)
}
