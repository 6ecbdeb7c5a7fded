//! CLI argument parsing for ab-significance

use crate::request::{ComputationRequest, ResultKind};
use crate::significance::{ConfidenceOptions, FormattingOptions, DEFAULT_TARGET_VALUE};
use crate::variant::Variant;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "ab-significance")]
#[command(version)]
#[command(about = "Statistical significance of A/B test results", long_about = None)]
pub struct Cli {
    /// Load the full request from a TOML file
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Label of the control variant
    #[arg(long = "control-label", default_value = "Control")]
    pub control_label: String,

    /// Trials observed for the control variant
    #[arg(long = "control-hits", value_name = "COUNT")]
    pub control_hits: Option<String>,

    /// Conversions observed for the control variant
    #[arg(long = "control-conversions", value_name = "COUNT")]
    pub control_conversions: Option<String>,

    /// Label of the treatment variant
    #[arg(long = "treatment-label", default_value = "Treatment")]
    pub treatment_label: String,

    /// Trials observed for the treatment variant
    #[arg(long = "treatment-hits", value_name = "COUNT")]
    pub treatment_hits: Option<String>,

    /// Conversions observed for the treatment variant
    #[arg(long = "treatment-conversions", value_name = "COUNT")]
    pub treatment_conversions: Option<String>,

    /// Result to compute: hits, conversions, conversionRates, zScore, pValue,
    /// confidence, significant, all
    #[arg(short = 'r', long = "result", value_name = "KIND")]
    pub result: Option<ResultKind>,

    /// Round conversion rates to N decimal places
    #[arg(long = "rate-decimals", value_name = "N")]
    pub rate_decimals: Option<u32>,

    /// Append % to conversion rates
    #[arg(long = "rate-percentage")]
    pub rate_percentage: bool,

    /// Round confidence to N decimal places
    #[arg(long = "confidence-decimals", value_name = "N")]
    pub confidence_decimals: Option<u32>,

    /// Append % to confidence
    #[arg(long = "confidence-percentage")]
    pub confidence_percentage: bool,

    /// Scale confidence from 0-1 to 0-100
    #[arg(long = "times-hundred")]
    pub times_hundred: bool,

    /// Significance threshold on the 0-100 scale
    #[arg(long = "target", value_name = "VALUE", default_value_t = DEFAULT_TARGET_VALUE)]
    pub target: f64,

    /// Print a sample size recommendation for a baseline conversion rate (0-1)
    #[arg(long = "sample-size", value_name = "BASELINE")]
    pub sample_size: Option<f64>,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug tracing output to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Cli {
    /// Build the computation request from flags or the config file
    ///
    /// With `--config`, the file supplies variants and options; `--result`
    /// still overrides the file's result kind.
    pub fn to_request(&self) -> Result<ComputationRequest> {
        let mut request = match &self.config {
            Some(path) => ComputationRequest::from_file(path)?,
            None => self.request_from_flags()?,
        };

        if let Some(kind) = self.result {
            request.result_kind = kind;
        }

        Ok(request)
    }

    fn request_from_flags(&self) -> Result<ComputationRequest> {
        let control = Variant::parse(
            self.control_label.clone(),
            required(&self.control_hits, "--control-hits")?,
            required(&self.control_conversions, "--control-conversions")?,
        )?;
        let treatment = Variant::parse(
            self.treatment_label.clone(),
            required(&self.treatment_hits, "--treatment-hits")?,
            required(&self.treatment_conversions, "--treatment-conversions")?,
        )?;

        Ok(ComputationRequest::new(control, treatment)
            .with_conversion_rate_options(FormattingOptions {
                as_percentage: self.rate_percentage,
                decimal_places: self.rate_decimals,
            })
            .with_confidence_options(ConfidenceOptions {
                formatting: FormattingOptions {
                    as_percentage: self.confidence_percentage,
                    decimal_places: self.confidence_decimals,
                },
                target_value: self.target,
                scale_to_hundred: self.times_hundred,
            }))
    }
}

fn required<'a>(value: &'a Option<String>, flag: &str) -> Result<&'a str> {
    value
        .as_deref()
        .with_context(|| format!("Missing {} (or pass --config FILE)", flag))
}
