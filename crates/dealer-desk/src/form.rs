//! Helpers for payloads that originate from HTML forms.
//!
//! Forms post every field as text and send blank strings for untouched inputs, while
//! JSON clients may send numbers. Both are folded into `Option<String>` here, with
//! blank values mapped to `None`, and typed parsing happens in the validators so a
//! malformed number becomes a field-level validation error instead of a
//! deserialization rejection.

use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use crate::error::ValidationError;

#[derive(Deserialize)]
#[serde(untagged)]
enum FormScalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
}

/// Deserialize a string, number, or boolean into trimmed text; blank and `null` become `None`.
pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<FormScalar>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| {
        let text = match value {
            FormScalar::Text(text) => text,
            FormScalar::Integer(number) => number.to_string(),
            FormScalar::Float(number) => number.to_string(),
            FormScalar::Flag(flag) => flag.to_string(),
        };
        non_blank(&text)
    }))
}

/// Trimmed copy of `raw`, or `None` when nothing but whitespace remains.
pub fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Reasons a present form value could not be turned into the requested number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberProblem {
    NotANumber,
    OutOfRange,
}

impl NumberProblem {
    pub fn for_field(self, field: &'static str) -> ValidationError {
        match self {
            NumberProblem::NotANumber => ValidationError::Malformed { field },
            NumberProblem::OutOfRange => ValidationError::OutOfRange { field },
        }
    }
}

/// Parse an optional form value, accepting `,` as decimal separator.
pub fn parse_number<T>(raw: Option<&str>) -> Result<Option<T>, NumberProblem>
where
    T: FromStr,
{
    match raw {
        None => Ok(None),
        Some(text) => text
            .trim()
            .replace(',', ".")
            .parse::<T>()
            .map(Some)
            .map_err(|_| NumberProblem::NotANumber),
    }
}

/// Parse an optional decimal that must be strictly positive and finite.
pub fn parse_positive_decimal(raw: Option<&str>) -> Result<Option<f64>, NumberProblem> {
    match parse_number::<f64>(raw)? {
        Some(value) if !value.is_finite() || value <= 0.0 => Err(NumberProblem::OutOfRange),
        other => Ok(other),
    }
}

/// Parse an optional integer that must be at least one.
pub fn parse_positive_count(raw: Option<&str>) -> Result<Option<u32>, NumberProblem> {
    match parse_signed(raw)? {
        Some(value) if value < 1 => Err(NumberProblem::OutOfRange),
        Some(value) => u32::try_from(value)
            .map(Some)
            .map_err(|_| NumberProblem::OutOfRange),
        None => Ok(None),
    }
}

/// Parse an optional integer that must be zero or more.
pub fn parse_non_negative(raw: Option<&str>) -> Result<Option<u32>, NumberProblem> {
    match parse_signed(raw)? {
        Some(value) => u32::try_from(value)
            .map(Some)
            .map_err(|_| NumberProblem::OutOfRange),
        None => Ok(None),
    }
}

fn parse_signed(raw: Option<&str>) -> Result<Option<i64>, NumberProblem> {
    parse_number::<i64>(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "optional_text")]
        value: Option<String>,
    }

    fn probe(json: &str) -> Option<String> {
        serde_json::from_str::<Probe>(json).expect("probe parses").value
    }

    #[test]
    fn optional_text_folds_blank_and_null_into_none() {
        assert_eq!(probe(r#"{"value": "   "}"#), None);
        assert_eq!(probe(r#"{"value": null}"#), None);
        assert_eq!(probe(r#"{}"#), None);
        assert_eq!(probe(r#"{"value": " Fiat "}"#), Some("Fiat".to_string()));
    }

    #[test]
    fn optional_text_accepts_numbers() {
        assert_eq!(probe(r#"{"value": 125000}"#), Some("125000".to_string()));
        assert_eq!(probe(r#"{"value": 7.4}"#), Some("7.4".to_string()));
    }

    #[test]
    fn numbers_reject_garbage_and_ranges() {
        assert_eq!(parse_non_negative(Some("12000")), Ok(Some(12000)));
        assert_eq!(parse_non_negative(Some("-1")), Err(NumberProblem::OutOfRange));
        assert_eq!(parse_non_negative(Some("veel")), Err(NumberProblem::NotANumber));
        assert_eq!(parse_positive_count(Some("0")), Err(NumberProblem::OutOfRange));
        assert_eq!(parse_positive_decimal(Some("7,35")), Ok(Some(7.35)));
        assert_eq!(parse_positive_decimal(Some("0")), Err(NumberProblem::OutOfRange));
        assert_eq!(parse_positive_decimal(None), Ok(None));
    }
}
