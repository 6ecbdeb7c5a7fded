// Presentation and threshold options for significance metrics
//
// Options are plain values passed into every call. Nothing is retained
// between calls.

use crate::error::{Result, SignificanceError};
use serde::{Deserialize, Serialize};

/// Largest supported number of fractional digits
pub const MAX_DECIMAL_PLACES: u32 = 100;

/// Default significance threshold on the 0-100 scale
pub const DEFAULT_TARGET_VALUE: f64 = 95.0;

/// How a metric is presented to the caller
///
/// With both fields unset the metric is returned as a raw number. Setting
/// either turns the result into text.
///
/// # Example
/// ```
/// use ab_significance::significance::FormattingOptions;
///
/// let options = FormattingOptions::percentage(2);
/// assert_eq!(options.apply(16.666666).to_string(), "16.67%");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormattingOptions {
    /// Append a `%` suffix
    #[serde(alias = "percentage")]
    pub as_percentage: bool,

    /// Round to this many fractional digits (`None` = full precision)
    #[serde(alias = "decimalPlaces")]
    pub decimal_places: Option<u32>,
}

impl FormattingOptions {
    /// Raw number, no rounding, no suffix
    pub fn raw() -> Self {
        Self::default()
    }

    /// Rounded to `decimal_places` with a `%` suffix
    pub fn percentage(decimal_places: u32) -> Self {
        Self {
            as_percentage: true,
            decimal_places: Some(decimal_places),
        }
    }

    /// True when no presentation step applies
    pub fn is_raw(&self) -> bool {
        !self.as_percentage && self.decimal_places.is_none()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(places) = self.decimal_places {
            if places > MAX_DECIMAL_PLACES {
                return Err(SignificanceError::InvalidArgument(format!(
                    "decimal_places must be in [0, {}], got {}",
                    MAX_DECIMAL_PLACES, places
                )));
            }
        }
        Ok(())
    }
}

/// Options for the confidence metric and the significance verdict
///
/// Deserializes from a single flat table (`as_percentage`, `decimal_places`,
/// `target_value`, `scale_to_hundred`); unknown keys are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "ConfidenceOptionsTable")]
pub struct ConfidenceOptions {
    /// Presentation of the confidence value
    #[serde(flatten)]
    pub formatting: FormattingOptions,

    /// Threshold on the 0-100 scale that scaled confidence must reach
    ///
    /// - 95 (default): conventional 95% confidence
    /// - 99: stricter
    /// - 90: looser
    pub target_value: f64,

    /// Multiply the 0-1 confidence by 100 before formatting
    pub scale_to_hundred: bool,
}

impl Default for ConfidenceOptions {
    fn default() -> Self {
        Self {
            formatting: FormattingOptions::raw(),
            target_value: DEFAULT_TARGET_VALUE,
            scale_to_hundred: false,
        }
    }
}

/// Flat on-disk form of [`ConfidenceOptions`]
///
/// `flatten` and `deny_unknown_fields` do not combine, so the formatting
/// fields are spelled out here and folded back on conversion.
#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfidenceOptionsTable {
    #[serde(alias = "percentage")]
    as_percentage: bool,
    #[serde(alias = "decimalPlaces")]
    decimal_places: Option<u32>,
    #[serde(alias = "targetValue")]
    target_value: f64,
    #[serde(alias = "timesHundred")]
    scale_to_hundred: bool,
}

impl Default for ConfidenceOptionsTable {
    fn default() -> Self {
        let defaults = ConfidenceOptions::default();
        Self {
            as_percentage: defaults.formatting.as_percentage,
            decimal_places: defaults.formatting.decimal_places,
            target_value: defaults.target_value,
            scale_to_hundred: defaults.scale_to_hundred,
        }
    }
}

impl From<ConfidenceOptionsTable> for ConfidenceOptions {
    fn from(table: ConfidenceOptionsTable) -> Self {
        Self {
            formatting: FormattingOptions {
                as_percentage: table.as_percentage,
                decimal_places: table.decimal_places,
            },
            target_value: table.target_value,
            scale_to_hundred: table.scale_to_hundred,
        }
    }
}

impl ConfidenceOptions {
    /// Raw confidence, judged against `target_value`
    pub fn with_target(target_value: f64) -> Self {
        Self {
            target_value,
            ..Self::default()
        }
    }

    /// Scaled to 0-100, rounded to two places, with a `%` suffix
    pub fn percentage() -> Self {
        Self {
            formatting: FormattingOptions::percentage(2),
            scale_to_hundred: true,
            ..Self::default()
        }
    }

    /// Stricter 99% threshold
    pub fn strict() -> Self {
        Self::with_target(99.0)
    }

    /// Looser 90% threshold
    pub fn permissive() -> Self {
        Self::with_target(90.0)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.formatting.validate()?;

        if !self.target_value.is_finite() {
            return Err(SignificanceError::InvalidArgument(format!(
                "target_value must be finite, got {}",
                self.target_value
            )));
        }

        Ok(())
    }
}
