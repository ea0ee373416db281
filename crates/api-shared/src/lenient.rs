//! Deserialisers for integer fields that may arrive as JSON numbers or numeric strings.
//!
//! HTML-backed clients submit every form value as a string, so `"5000"` and `5000` must both
//! be accepted for a salary.

use serde::de::{self, Deserializer};
use serde::Deserialize;
use std::fmt::Display;
use std::str::FromStr;

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString<T> {
    Number(T),
    Text(String),
}

fn parse<T, E>(text: &str) -> Result<T, E>
where
    T: FromStr,
    T::Err: Display,
    E: de::Error,
{
    text.trim()
        .parse()
        .map_err(|e| E::custom(format!("invalid number '{}': {}", text, e)))
}

/// Use with `#[serde(deserialize_with = "lenient::number")]`.
pub fn number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    match NumberOrString::<T>::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => parse(&s),
    }
}

/// Use with `#[serde(default, deserialize_with = "lenient::optional_number")]`.
///
/// `null` and blank strings both mean "not supplied".
pub fn optional_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    match Option::<NumberOrString<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberOrString::Text(s)) => parse(&s).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Body {
        #[serde(deserialize_with = "number")]
        salary: i32,
        #[serde(default, deserialize_with = "optional_number")]
        bonus: Option<i32>,
    }

    #[test]
    fn test_accepts_numbers_and_numeric_strings() {
        let body: Body = serde_json::from_str(r#"{"salary": 5000, "bonus": "250"}"#).unwrap();
        assert_eq!(body.salary, 5000);
        assert_eq!(body.bonus, Some(250));

        let body: Body = serde_json::from_str(r#"{"salary": " 4200 "}"#).unwrap();
        assert_eq!(body.salary, 4200);
        assert_eq!(body.bonus, None);
    }

    #[test]
    fn test_blank_or_null_optional_is_none() {
        let body: Body = serde_json::from_str(r#"{"salary": 1, "bonus": ""}"#).unwrap();
        assert_eq!(body.bonus, None);
        let body: Body = serde_json::from_str(r#"{"salary": 1, "bonus": null}"#).unwrap();
        assert_eq!(body.bonus, None);
    }

    #[test]
    fn test_rejects_non_numeric_text() {
        let err = serde_json::from_str::<Body>(r#"{"salary": "lots"}"#)
            .expect_err("non-numeric salary should fail");
        assert!(err.to_string().contains("invalid number 'lots'"));
    }
}
