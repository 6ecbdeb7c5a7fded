//! Presentation step for numeric metrics
//!
//! Computation always produces `f64`. Rounding and the `%` suffix are
//! applied afterwards by [`FormattingOptions::apply`].

use super::config::FormattingOptions;
use serde::Serialize;
use std::fmt;

/// Magnitudes in `[1e-6, 1e21)` print in positional notation; anything
/// outside switches to exponent form
const POSITIONAL_RANGE: std::ops::Range<f64> = 1e-6..1e21;

/// A metric after presentation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FormattedValue {
    /// No formatting requested
    Number(f64),
    /// Rounded and/or suffixed
    Text(String),
}

impl FormattedValue {
    /// Numeric value, if no formatting was applied
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FormattedValue::Number(n) => Some(*n),
            FormattedValue::Text(_) => None,
        }
    }

    /// Text value, if formatting was applied
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FormattedValue::Number(_) => None,
            FormattedValue::Text(s) => Some(s),
        }
    }
}

impl fmt::Display for FormattedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormattedValue::Number(n) => write!(f, "{}", n),
            FormattedValue::Text(s) => f.write_str(s),
        }
    }
}

impl FormattingOptions {
    /// Round and/or suffix `value` according to these options
    ///
    /// Rounding is half away from zero. Without rounding, the `%` suffix is
    /// appended to the shortest decimal form that round-trips (`50%`,
    /// `93.47149669381035%`, `1e-8%`).
    pub fn apply(&self, value: f64) -> FormattedValue {
        if self.is_raw() {
            return FormattedValue::Number(value);
        }

        let mut text = match self.decimal_places {
            Some(places) => to_fixed(value, places),
            None => shortest_decimal(value),
        };

        if self.as_percentage {
            text.push('%');
        }

        FormattedValue::Text(text)
    }
}

/// Render `value` with exactly `places` fractional digits
///
/// Rounds the exact stored value, so `2.675` (stored as `2.67499...`) gives
/// `2.67`. Only exact decimal ties round half away from zero.
pub fn to_fixed(value: f64, places: u32) -> String {
    if is_decimal_tie(value, places) {
        round_tie_away(value, places)
    } else {
        format!("{:.*}", places as usize, value)
    }
}

/// True when `value` lies exactly halfway between two `places`-digit decimals
///
/// With `value = m * 2^e` and `m` odd, `value * 2 * 10^places` is an odd
/// integer iff `e + places + 1 == 0`.
fn is_decimal_tie(value: f64, places: u32) -> bool {
    if !value.is_finite() || value == 0.0 {
        return false;
    }

    let bits = value.to_bits();
    let biased_exponent = ((bits >> 52) & 0x7ff) as i64;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mantissa, exponent) = if biased_exponent == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), biased_exponent - 1075)
    };

    let lowest_bit = exponent + mantissa.trailing_zeros() as i64;
    lowest_bit + places as i64 + 1 == 0
}

/// Round an exact tie away from zero using its exact decimal expansion
fn round_tie_away(value: f64, places: u32) -> String {
    // A tie has exactly `places + 1` fractional digits, the last one a 5
    let mut digits: Vec<u8> = format!("{:.*}", places as usize + 1, value.abs()).into_bytes();
    digits.pop();
    if places == 0 {
        digits.pop();
    }

    let mut carry = true;
    for digit in digits.iter_mut().rev() {
        match *digit {
            b'.' => continue,
            b'9' => *digit = b'0',
            d => {
                *digit = d + 1;
                carry = false;
                break;
            }
        }
    }
    if carry {
        digits.insert(0, b'1');
    }

    let sign = if value.is_sign_negative() { "-" } else { "" };
    let magnitude: String = digits.into_iter().map(char::from).collect();
    format!("{}{}", sign, magnitude)
}

/// Shortest round-trip form, positional inside [`POSITIONAL_RANGE`]
fn shortest_decimal(value: f64) -> String {
    if value == 0.0 || !value.is_finite() || POSITIONAL_RANGE.contains(&value.abs()) {
        return format!("{}", value);
    }

    let text = format!("{:e}", value);
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_passthrough() {
        let value = FormattingOptions::raw().apply(93.47149669381035);
        assert_eq!(value, FormattedValue::Number(93.47149669381035));
        assert_eq!(value.as_number(), Some(93.47149669381035));
        assert_eq!(value.as_text(), None);
    }

    #[test]
    fn test_percentage_without_rounding() {
        let options = FormattingOptions {
            as_percentage: true,
            decimal_places: None,
        };
        assert_eq!(options.apply(50.0).to_string(), "50%");
        assert_eq!(
            options.apply(93.47149669381035).to_string(),
            "93.47149669381035%"
        );
    }

    #[test]
    fn test_rounding_without_percentage() {
        let options = FormattingOptions {
            as_percentage: false,
            decimal_places: Some(2),
        };
        assert_eq!(
            options.apply(93.47149669381035),
            FormattedValue::Text("93.47".to_string())
        );
    }

    #[test]
    fn test_rounding_with_percentage() {
        let options = FormattingOptions::percentage(2);
        assert_eq!(options.apply(50.0).to_string(), "50.00%");
        assert_eq!(options.apply(16.666666666666664).to_string(), "16.67%");
        assert_eq!(options.apply(21.428571428571427).to_string(), "21.43%");
    }

    #[test]
    fn test_zero_places() {
        assert_eq!(to_fixed(2.5, 0), "3");
        assert_eq!(to_fixed(-2.5, 0), "-3");
        assert_eq!(to_fixed(0.4, 0), "0");
    }

    #[test]
    fn test_half_away_from_zero() {
        assert_eq!(to_fixed(0.125, 2), "0.13");
        assert_eq!(to_fixed(-0.125, 2), "-0.13");
    }

    #[test]
    fn test_nan_formatting() {
        let options = FormattingOptions::percentage(2);
        assert_eq!(options.apply(f64::NAN).to_string(), "NaN%");
        assert_eq!(to_fixed(f64::NAN, 2), "NaN");
    }

    #[test]
    fn test_many_places() {
        let text = to_fixed(0.5, 20);
        assert_eq!(text, "0.50000000000000000000");
    }

    #[test]
    fn test_rounds_stored_value_not_scaled_product() {
        // 2.675 and 1.005 are stored just below the written decimal
        assert_eq!(to_fixed(2.675, 2), "2.67");
        assert_eq!(to_fixed(1.005, 2), "1.00");
        assert_eq!(to_fixed(-2.675, 2), "-2.67");
    }

    #[test]
    fn test_exact_ties_round_away_from_zero() {
        assert_eq!(to_fixed(0.625, 2), "0.63");
        assert_eq!(to_fixed(-0.625, 2), "-0.63");
        assert_eq!(to_fixed(0.5, 0), "1");
        assert_eq!(to_fixed(9.5, 0), "10");
        assert_eq!(to_fixed(99.5, 0), "100");
        assert_eq!(to_fixed(0.995, 2), "0.99");
    }

    #[test]
    fn test_decimal_tie_detection() {
        assert!(is_decimal_tie(2.5, 0));
        assert!(is_decimal_tie(0.125, 2));
        assert!(!is_decimal_tie(0.125, 3));
        assert!(!is_decimal_tie(2.675, 2));
        assert!(!is_decimal_tie(1.0, 0));
        assert!(!is_decimal_tie(0.0, 2));
        assert!(!is_decimal_tie(f64::NAN, 2));
    }

    #[test]
    fn test_unrounded_percentage_uses_exponent_outside_positional_range() {
        let options = FormattingOptions {
            as_percentage: true,
            decimal_places: None,
        };
        assert_eq!(options.apply(1e-8).to_string(), "1e-8%");
        assert_eq!(options.apply(1.5e-7).to_string(), "1.5e-7%");
        assert_eq!(options.apply(0.000001).to_string(), "0.000001%");
        assert_eq!(options.apply(1e21).to_string(), "1e+21%");
        assert_eq!(options.apply(0.0).to_string(), "0%");
    }

    #[test]
    fn test_serializes_untagged() {
        let json = serde_json::to_string(&FormattedValue::Text("50.00%".into())).unwrap();
        assert_eq!(json, "\"50.00%\"");
        let json = serde_json::to_string(&FormattedValue::Number(0.5)).unwrap();
        assert_eq!(json, "0.5");
    }
}
