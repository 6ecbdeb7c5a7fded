//! Experiment variants and input coercion
//!
//! A [`Variant`] is one arm of a two-arm experiment: a label plus hit and
//! conversion counts. Counts that arrive as text (CLI flags, TOML strings)
//! go through [`parse_count`] before any arithmetic runs.

use crate::error::{Result, SignificanceError};
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// One arm (control or treatment) of an experiment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Variant {
    /// Display name, used as the key in label-keyed results
    pub label: String,

    /// Number of trials/exposures
    #[serde(deserialize_with = "deserialize_hits")]
    pub hits: u64,

    /// Number of successful outcomes
    ///
    /// Expected to be `<= hits`; not enforced.
    #[serde(deserialize_with = "deserialize_conversions")]
    pub conversions: u64,
}

impl Variant {
    /// Create a variant from already-validated counts
    pub fn new(label: impl Into<String>, hits: u64, conversions: u64) -> Self {
        Self {
            label: label.into(),
            hits,
            conversions,
        }
    }

    /// Create a variant from textual counts
    ///
    /// # Example
    /// ```
    /// use ab_significance::variant::Variant;
    ///
    /// let control = Variant::parse("Control", " 600", "100").unwrap();
    /// assert_eq!(control.hits, 600);
    /// assert!(Variant::parse("Control", "six hundred", "100").is_err());
    /// ```
    pub fn parse(label: impl Into<String>, hits: &str, conversions: &str) -> Result<Self> {
        let label = label.into();
        let hits = parse_count(hits, &format!("{}.hits", label))?;
        let conversions = parse_count(conversions, &format!("{}.conversions", label))?;
        Ok(Self {
            label,
            hits,
            conversions,
        })
    }

    /// Raw conversion proportion (`conversions / hits`), unguarded
    ///
    /// Zero hits yield NaN (or infinity when conversions are non-zero).
    pub fn proportion(&self) -> f64 {
        self.conversions as f64 / self.hits as f64
    }

    /// True when the counts break the `conversions <= hits` assumption
    pub fn is_inconsistent(&self) -> bool {
        self.conversions > self.hits
    }
}

/// Parse a hit/conversion count as a base-10 non-negative integer
///
/// Surrounding whitespace is ignored and a leading `+` is accepted. Anything
/// else (empty input, signs, fractions, trailing garbage) is rejected.
pub fn parse_count(value: &str, field: &str) -> Result<u64> {
    let trimmed = value.trim();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SignificanceError::InvalidCount {
            field: field.to_string(),
            value: value.to_string(),
        });
    }

    digits
        .parse::<u64>()
        .map_err(|_| SignificanceError::InvalidCount {
            field: field.to_string(),
            value: value.to_string(),
        })
}

fn deserialize_hits<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_count(deserializer, "hits")
}

fn deserialize_conversions<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_count(deserializer, "conversions")
}

/// Accepts a count written either as an integer or as a numeric string
fn deserialize_count<'de, D>(deserializer: D, field: &str) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum CountInput {
        Integer(u64),
        Text(String),
    }

    match CountInput::deserialize(deserializer)? {
        CountInput::Integer(n) => Ok(n),
        CountInput::Text(s) => parse_count(&s, field).map_err(de::Error::custom),
    }
}

/// Label-keyed values for the two variants of a pair
///
/// Keeps control first. Serializes as a map from label to value.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantMap<T> {
    entries: [(String, T); 2],
}

impl<T> VariantMap<T> {
    /// Build a map by applying `f` to control and treatment
    pub fn from_pair(
        control: &Variant,
        treatment: &Variant,
        mut f: impl FnMut(&Variant) -> T,
    ) -> Self {
        Self {
            entries: [
                (control.label.clone(), f(control)),
                (treatment.label.clone(), f(treatment)),
            ],
        }
    }

    /// Look up a value by variant label
    pub fn get(&self, label: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(key, _)| key == label)
            .map(|(_, value)| value)
    }

    /// Iterate entries in control, treatment order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl<T: Serialize> Serialize for VariantMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
