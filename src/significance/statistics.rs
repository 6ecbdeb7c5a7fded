// Numeric core of the two-proportion significance test
//
// Every function here is pure and returns raw f64. Degenerate inputs are
// not errors: zero hits yield NaN, and NaN flows through to every metric
// derived from it (confidence, p-value, significance).
//
// Scientific Foundation:
// - Two-proportion z-test with unpooled variance
// - Zelen & Severo (1964) polynomial approximation of the standard normal
//   CDF (Abramowitz & Stegun 26.2.17), absolute error < 7.5e-8

use super::config::ConfidenceOptions;
use super::format::FormattedValue;
use crate::variant::Variant;

// Zelen & Severo coefficients. Changing any digit changes every downstream
// confidence value.
const B1: f64 = 0.319381530;
const B2: f64 = -0.356563782;
const B3: f64 = 1.781477937;
const B4: f64 = -1.821255978;
const B5: f64 = 1.330274429;
const P: f64 = 0.2316419;
const C: f64 = 0.39894228;

/// Conversion rate of a variant on the 0-100 scale
///
/// Returns exactly `0.0` when either `hits` or `conversions` is zero.
///
/// # Example
/// ```
/// use ab_significance::significance::conversion_rate;
/// use ab_significance::variant::Variant;
///
/// assert_eq!(conversion_rate(&Variant::new("A", 100, 75)), 75.0);
/// assert_eq!(conversion_rate(&Variant::new("A", 0, 0)), 0.0);
/// ```
pub fn conversion_rate(variant: &Variant) -> f64 {
    if variant.hits == 0 || variant.conversions == 0 {
        return 0.0;
    }
    (variant.conversions as f64 / variant.hits as f64) * 100.0
}

/// Two-proportion z-statistic (treatment minus control, unpooled variance)
///
/// Positive values mean treatment converts better than control. Zero hits in
/// either variant yield NaN.
pub fn z_score(control: &Variant, treatment: &Variant) -> f64 {
    let p_c = control.proportion();
    let p_t = treatment.proportion();

    let difference = p_t - p_c;
    let variance =
        (p_t * (1.0 - p_t)) / treatment.hits as f64 + (p_c * (1.0 - p_c)) / control.hits as f64;

    difference / variance.sqrt()
}

/// Cumulative normal distribution at `z`
///
/// Non-negative `z` takes the upper branch `1 - φ(z)·poly(t)`; negative `z`
/// returns `φ(z)·poly(t)` directly, with `t` built from `1 - p·z`.
///
/// # Example
/// ```
/// use ab_significance::significance::cumulative_normal_distribution;
///
/// assert!((cumulative_normal_distribution(0.0) - 0.5).abs() < 1e-6);
/// ```
pub fn cumulative_normal_distribution(z: f64) -> f64 {
    if z >= 0.0 {
        let t = 1.0 / (1.0 + P * z);
        1.0 - C * (-z * z / 2.0).exp() * t * polynomial(t)
    } else {
        let t = 1.0 / (1.0 - P * z);
        C * (-z * z / 2.0).exp() * t * polynomial(t)
    }
}

fn polynomial(t: f64) -> f64 {
    t * (t * (t * (t * B5 + B4) + B3) + B2) + B1
}

/// Unscaled (0-1) confidence that treatment differs from control
pub fn raw_confidence(control: &Variant, treatment: &Variant) -> f64 {
    cumulative_normal_distribution(z_score(control, treatment))
}

/// Confidence, scaled and formatted per `options`
///
/// Order: scale ×100 (if requested), round, append `%`. The target value in
/// `options` plays no part here.
pub fn confidence(
    control: &Variant,
    treatment: &Variant,
    options: &ConfidenceOptions,
) -> FormattedValue {
    let mut value = raw_confidence(control, treatment);
    if options.scale_to_hundred {
        value *= 100.0;
    }
    options.formatting.apply(value)
}

/// P-value from an unscaled (0-1) confidence
///
/// Passing a ×100 confidence gives a meaningless result.
pub fn p_value(confidence: f64) -> f64 {
    1.0 - confidence
}

/// `confidence >= target`; both must be on the same scale
///
/// NaN confidence is never significant.
pub fn is_significant(confidence: f64, target: f64) -> bool {
    confidence >= target
}

/// Significance of a raw (0-1) confidence against a 0-100 target
pub fn is_significant_at(raw_confidence: f64, options: &ConfidenceOptions) -> bool {
    is_significant(raw_confidence * 100.0, options.target_value)
}
