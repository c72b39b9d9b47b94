//! Field coercion from the spreadsheet-like edit buffer.
//!
//! Grid cells arrive loosely typed: numbers as text, keyword lists as one
//! string, dates with or without a time part. These functions turn them into
//! the typed values stored on a plan item. Blank never becomes zero and never
//! becomes an empty string; it becomes `None`.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A keyword cell: either a list or one string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeywordsInput {
    List(Vec<String>),
    Text(String),
}

/// A numeric cell as the grid sends it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberInput {
    Integer(i64),
    Float(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoercionError {
    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: i64 },

    #[error("invalid date {value:?}, expected YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("unknown status {value:?}")]
    UnknownStatus { value: String },

    #[error("unknown funnel stage {value:?}")]
    UnknownStage { value: String },
}

/// Normalizes a keyword cell to trimmed, non-empty keywords in order.
///
/// ```
/// use contentpulse_shared::editorial::coerce::{coerce_keywords, KeywordsInput};
///
/// let text = KeywordsInput::Text("a, b ,c".to_string());
/// assert_eq!(coerce_keywords(Some(&text)), vec!["a", "b", "c"]);
/// assert!(coerce_keywords(None).is_empty());
/// ```
pub fn coerce_keywords(input: Option<&KeywordsInput>) -> Vec<String> {
    match input {
        None => Vec::new(),
        Some(KeywordsInput::List(items)) => clean_keywords(items.iter().map(String::as_str)),
        Some(KeywordsInput::Text(text)) => parse_keyword_text(text),
    }
}

/// Parses a comma-delimited string, or a string holding a serialized list
/// such as `["a", "b"]` or `['a', 'b']`.
pub fn parse_keyword_text(text: &str) -> Vec<String> {
    let trimmed = text.trim();

    if let Some(inner) = trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        if let Ok(items) = serde_json::from_str::<Vec<String>>(trimmed) {
            return clean_keywords(items.iter().map(String::as_str));
        }
        return clean_keywords(
            inner
                .split(',')
                .map(|item| item.trim().trim_matches(|c| c == '"' || c == '\'')),
        );
    }

    clean_keywords(trimmed.split(','))
}

fn clean_keywords<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
    items
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Coerces a metric cell.
///
/// Blank, whitespace-only and unparsable values are unknown (`None`). Decimal
/// text is truncated toward zero. Negative values are rejected.
///
/// ```
/// use contentpulse_shared::editorial::coerce::{coerce_metric, NumberInput};
///
/// let cell = |s: &str| NumberInput::Text(s.to_string());
/// assert_eq!(coerce_metric("views", Some(&cell(""))), Ok(None));
/// assert_eq!(coerce_metric("views", Some(&cell("12"))), Ok(Some(12)));
/// assert_eq!(coerce_metric("views", Some(&cell("abc"))), Ok(None));
/// ```
pub fn coerce_metric(
    field: &'static str,
    input: Option<&NumberInput>,
) -> Result<Option<i64>, CoercionError> {
    let value = match input {
        None => None,
        Some(NumberInput::Integer(n)) => Some(*n),
        Some(NumberInput::Float(f)) => float_to_int(*f),
        Some(NumberInput::Text(text)) => parse_metric_text(text),
    };

    match value {
        Some(n) if n < 0 => Err(CoercionError::Negative { field, value: n }),
        other => Ok(other),
    }
}

fn parse_metric_text(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| trimmed.parse::<f64>().ok().and_then(float_to_int))
}

fn float_to_int(value: f64) -> Option<i64> {
    if value.is_finite() && value.abs() < i64::MAX as f64 {
        Some(value.trunc() as i64)
    } else {
        None
    }
}

/// Parses `YYYY-MM-DD`, or the date part of an ISO datetime. Blank is `None`.
pub fn coerce_date(input: Option<&str>) -> Result<Option<NaiveDate>, CoercionError> {
    let Some(text) = input.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(Some(date));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(Some(datetime.date()));
        }
    }

    if let Ok(datetime) = chrono::DateTime::parse_from_rfc3339(text) {
        return Ok(Some(datetime.date_naive()));
    }

    Err(CoercionError::InvalidDate {
        value: text.to_string(),
    })
}

/// Trims free text; blank becomes `None`.
pub fn coerce_text(input: Option<String>) -> Option<String> {
    input
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Like [`coerce_text`] but the field must be present.
pub fn require_text(field: &'static str, input: Option<String>) -> Result<String, CoercionError> {
    coerce_text(input).ok_or(CoercionError::Missing { field })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> KeywordsInput {
        KeywordsInput::Text(s.to_string())
    }

    fn cell(s: &str) -> NumberInput {
        NumberInput::Text(s.to_string())
    }

    #[test]
    fn test_keywords_from_comma_string() {
        assert_eq!(coerce_keywords(Some(&text("a, b ,c"))), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_keywords_list_passes_through() {
        let list = KeywordsInput::List(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(coerce_keywords(Some(&list)), vec!["a", "b"]);
    }

    #[test]
    fn test_keywords_empty_string_is_empty_list() {
        assert!(coerce_keywords(Some(&text(""))).is_empty());
        assert!(coerce_keywords(Some(&text("  ,  , "))).is_empty());
    }

    #[test]
    fn test_keywords_from_serialized_list() {
        assert_eq!(
            coerce_keywords(Some(&text(r#"["seo", " content ", ""]"#))),
            vec!["seo", "content"]
        );
        assert_eq!(
            coerce_keywords(Some(&text("['seo', 'b2b marketing']"))),
            vec!["seo", "b2b marketing"]
        );
        assert!(coerce_keywords(Some(&text("[]"))).is_empty());
    }

    #[test]
    fn test_keywords_list_entries_are_trimmed() {
        let list = KeywordsInput::List(vec![" a ".to_string(), "".to_string(), "b".to_string()]);
        assert_eq!(coerce_keywords(Some(&list)), vec!["a", "b"]);
    }

    #[test]
    fn test_keywords_keep_order_and_duplicates() {
        assert_eq!(coerce_keywords(Some(&text("z, a, z"))), vec!["z", "a", "z"]);
    }

    #[test]
    fn test_keywords_deserialize_untagged() {
        let list: KeywordsInput = serde_json::from_str(r#"["a","b"]"#).unwrap();
        assert_eq!(list, KeywordsInput::List(vec!["a".to_string(), "b".to_string()]));
        let single: KeywordsInput = serde_json::from_str(r#""a, b""#).unwrap();
        assert_eq!(single, text("a, b"));
    }

    #[test]
    fn test_metric_blank_is_unknown_not_zero() {
        assert_eq!(coerce_metric("views", Some(&cell(""))), Ok(None));
        assert_eq!(coerce_metric("views", Some(&cell("   "))), Ok(None));
        assert_eq!(coerce_metric("views", None), Ok(None));
    }

    #[test]
    fn test_metric_parses_integers() {
        assert_eq!(coerce_metric("views", Some(&cell("12"))), Ok(Some(12)));
        assert_eq!(coerce_metric("views", Some(&cell(" 7 "))), Ok(Some(7)));
        assert_eq!(coerce_metric("views", Some(&cell("0"))), Ok(Some(0)));
        assert_eq!(coerce_metric("views", Some(&NumberInput::Integer(40))), Ok(Some(40)));
    }

    #[test]
    fn test_metric_unparsable_is_unknown() {
        assert_eq!(coerce_metric("views", Some(&cell("abc"))), Ok(None));
        assert_eq!(coerce_metric("views", Some(&cell("12 views"))), Ok(None));
        assert_eq!(coerce_metric("views", Some(&cell("NaN"))), Ok(None));
    }

    #[test]
    fn test_metric_truncates_decimals() {
        assert_eq!(coerce_metric("views", Some(&cell("12.0"))), Ok(Some(12)));
        assert_eq!(coerce_metric("views", Some(&cell("12.9"))), Ok(Some(12)));
        assert_eq!(coerce_metric("views", Some(&NumberInput::Float(3.5))), Ok(Some(3)));
    }

    #[test]
    fn test_metric_rejects_negative() {
        assert_eq!(
            coerce_metric("conversions", Some(&cell("-3"))),
            Err(CoercionError::Negative {
                field: "conversions",
                value: -3
            })
        );
    }

    #[test]
    fn test_number_input_deserialize_untagged() {
        let n: NumberInput = serde_json::from_str("5").unwrap();
        assert_eq!(n, NumberInput::Integer(5));
        let f: NumberInput = serde_json::from_str("5.5").unwrap();
        assert_eq!(f, NumberInput::Float(5.5));
        let s: NumberInput = serde_json::from_str(r#""5""#).unwrap();
        assert_eq!(s, cell("5"));
    }

    #[test]
    fn test_dates() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 6);
        assert_eq!(coerce_date(Some("2024-05-06")), Ok(expected));
        assert_eq!(coerce_date(Some("2024-05-06T00:00:00")), Ok(expected));
        assert_eq!(coerce_date(Some("2024-05-06 10:30:00")), Ok(expected));
        assert_eq!(coerce_date(Some("2024-05-06T10:30:00Z")), Ok(expected));
        assert_eq!(coerce_date(Some("  ")), Ok(None));
        assert_eq!(coerce_date(None), Ok(None));
        assert!(matches!(
            coerce_date(Some("06/05/2024")),
            Err(CoercionError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_text_coercion() {
        assert_eq!(coerce_text(Some("  hi ".to_string())), Some("hi".to_string()));
        assert_eq!(coerce_text(Some("   ".to_string())), None);
        assert_eq!(
            require_text("title", None),
            Err(CoercionError::Missing { field: "title" })
        );
    }
}
