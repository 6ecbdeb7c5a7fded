//! Sample size recommendation for a planned experiment
//!
//! Given a baseline conversion rate, estimates how many trials each variant
//! needs to detect a 25%, 15% or 5% effect at 95% confidence.

use crate::error::{Result, SignificanceError};
use serde::Serialize;
use std::fmt;

/// Chi-squared critical value, 95% confidence, 1 degree of freedom
pub const CHI_SQUARED_CRITICAL_95: f64 = 3.84145882689;

/// Squared effect sizes for the worst, medium and best tiers
pub const EFFECT_SIZE_DENOMINATORS: [f64; 3] = [0.0625, 0.0225, 0.0025];

/// Minimum detectable effect tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectTier {
    /// 25% effect, smallest sample
    Worst,
    /// 15% effect
    Medium,
    /// 5% effect, largest sample
    Best,
}

impl EffectTier {
    /// All tiers in recommendation order
    pub const ALL: [EffectTier; 3] = [EffectTier::Worst, EffectTier::Medium, EffectTier::Best];

    /// Absolute effect size detected at this tier
    pub fn effect_size(self) -> f64 {
        match self {
            EffectTier::Worst => 0.25,
            EffectTier::Medium => 0.15,
            EffectTier::Best => 0.05,
        }
    }
}

impl fmt::Display for EffectTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectTier::Worst => write!(f, "worst"),
            EffectTier::Medium => write!(f, "medium"),
            EffectTier::Best => write!(f, "best"),
        }
    }
}

/// Required trials per variant for each effect tier
///
/// `baseline` is a 0-1 fraction. Values outside (0, 1) are not rejected and
/// produce zero, negative or infinite sizes.
///
/// # Example
/// ```
/// use ab_significance::sample_size::sample_size_recommendation;
///
/// let sizes = sample_size_recommendation(0.1);
/// assert!(sizes[0] < sizes[1] && sizes[1] < sizes[2]);
/// ```
pub fn sample_size_recommendation(baseline: f64) -> [f64; 3] {
    EFFECT_SIZE_DENOMINATORS
        .map(|effect| (1.0 - baseline) * CHI_SQUARED_CRITICAL_95 / (effect * baseline))
}

/// One tier of a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleSizeTier {
    pub tier: EffectTier,
    pub effect_size: f64,
    pub sample_size: f64,
}

/// Sample size recommendation for a validated baseline rate
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleSizeRecommendation {
    pub baseline_conversion_rate: f64,
    pub tiers: Vec<SampleSizeTier>,
}

impl SampleSizeRecommendation {
    /// Build a recommendation, rejecting a baseline outside (0, 1)
    pub fn for_baseline(baseline: f64) -> Result<Self> {
        if !(baseline > 0.0 && baseline < 1.0) {
            return Err(SignificanceError::InvalidArgument(format!(
                "baseline conversion rate must be in (0, 1), got {}",
                baseline
            )));
        }

        let sizes = sample_size_recommendation(baseline);
        let tiers = EffectTier::ALL
            .iter()
            .zip(sizes)
            .map(|(&tier, sample_size)| SampleSizeTier {
                tier,
                effect_size: tier.effect_size(),
                sample_size,
            })
            .collect();

        Ok(Self {
            baseline_conversion_rate: baseline,
            tiers,
        })
    }

    /// Generate human-readable report
    pub fn to_report_string(&self) -> String {
        let mut report = format!(
            "📐 Sample size per variant (baseline {:.2}%, 95% confidence)\n\n",
            self.baseline_conversion_rate * 100.0
        );
        for tier in &self.tiers {
            report.push_str(&format!(
                "  {:<6} ({:>2.0}% effect): {}\n",
                tier.tier.to_string(),
                tier.effect_size * 100.0,
                tier.sample_size.ceil()
            ));
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_values() {
        let sizes = sample_size_recommendation(0.5);
        // (1 - 0.5) * a / (e * 0.5) = a / e
        assert!((sizes[0] - CHI_SQUARED_CRITICAL_95 / 0.0625).abs() < 1e-9);
        assert!((sizes[1] - CHI_SQUARED_CRITICAL_95 / 0.0225).abs() < 1e-9);
        assert!((sizes[2] - CHI_SQUARED_CRITICAL_95 / 0.0025).abs() < 1e-9);
    }

    #[test]
    fn test_monotonic_tiers() {
        for baseline in [0.01, 0.1, 0.25, 0.5, 0.9, 0.99] {
            let sizes = sample_size_recommendation(baseline);
            assert!(sizes.iter().all(|&s| s > 0.0));
            assert!(sizes[0] < sizes[1]);
            assert!(sizes[1] < sizes[2]);
        }
    }

    #[test]
    fn test_raw_function_is_unguarded() {
        assert!(sample_size_recommendation(0.0)[0].is_infinite());
        assert_eq!(sample_size_recommendation(1.0)[0], 0.0);
    }

    #[test]
    fn test_recommendation_tiers() {
        let rec = SampleSizeRecommendation::for_baseline(0.2).unwrap();
        assert_eq!(rec.tiers.len(), 3);
        assert_eq!(rec.tiers[0].tier, EffectTier::Worst);
        assert_eq!(rec.tiers[2].tier, EffectTier::Best);
        assert_eq!(rec.tiers[1].effect_size, 0.15);
        assert_eq!(
            rec.tiers.iter().map(|t| t.sample_size).collect::<Vec<_>>(),
            sample_size_recommendation(0.2).to_vec()
        );
    }

    #[test]
    fn test_recommendation_rejects_out_of_range() {
        for baseline in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
            assert!(
                SampleSizeRecommendation::for_baseline(baseline).is_err(),
                "{} should be rejected",
                baseline
            );
        }
    }

    #[test]
    fn test_report_string() {
        let rec = SampleSizeRecommendation::for_baseline(0.5).unwrap();
        let report = rec.to_report_string();
        assert!(report.contains("baseline 50.00%"));
        assert!(report.contains("worst"));
        assert!(report.contains("best"));
        // a / 0.0025 = 1536.58... -> 1537
        assert!(report.contains("1537"));
    }
}
