use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;

use serde::de::DeserializeOwned;

use crate::error::ActionError;

/// Longest parameter value quoted back in an error message, in characters
const QUOTED_VALUE_LIMIT: usize = 64;

/// Parameter value as quoted in an error; long values are cut to a prefix
fn quoted(value: &str) -> String {
    match value.char_indices().nth(QUOTED_VALUE_LIMIT) {
        Some((cut, _)) => format!("{}…", &value[..cut]),
        None => value.to_string(),
    }
}

/// `"true"`/`"false"` in any case, otherwise numeric truthiness
pub fn parse_bool(value: &str) -> Option<bool> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        value.parse::<f64>().ok().map(|n| n != 0.0 && !n.is_nan())
    }
}

/// Typed view over a request's string parameters
#[derive(Debug, Clone, Copy)]
pub struct Parameters<'a> {
    values: &'a HashMap<String, String>,
}

impl<'a> Parameters<'a> {
    pub fn new(values: &'a HashMap<String, String>) -> Self {
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn require(&self, name: &'static str) -> Result<&'a str, ActionError> {
        self.get(name).ok_or(ActionError::MissingParameter(name))
    }

    /// Value of the first of `names` that is present
    pub fn first_of(&self, names: &[&str]) -> Option<&'a str> {
        names.iter().find_map(|name| self.get(name))
    }

    pub fn flag(&self, name: &'static str) -> Result<Option<bool>, ActionError> {
        self.get(name)
            .map(|value| {
                parse_bool(value).ok_or_else(|| ActionError::InvalidParameter {
                    name,
                    value: quoted(value),
                    reason: "expected true, false or a number".to_string(),
                })
            })
            .transpose()
    }

    pub fn require_flag(&self, name: &'static str) -> Result<bool, ActionError> {
        self.flag(name)?.ok_or(ActionError::MissingParameter(name))
    }

    pub fn number<T>(&self, name: &'static str) -> Result<Option<T>, ActionError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.get(name)
            .map(|value| {
                value
                    .trim()
                    .parse::<T>()
                    .map_err(|e| ActionError::InvalidParameter {
                        name,
                        value: quoted(value),
                        reason: e.to_string(),
                    })
            })
            .transpose()
    }

    pub fn require_number<T>(&self, name: &'static str) -> Result<T, ActionError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.number(name)?.ok_or(ActionError::MissingParameter(name))
    }

    /// Parse a JSON-shaped parameter; malformed JSON is reported, never panics
    pub fn json<T: DeserializeOwned>(&self, name: &'static str) -> Result<T, ActionError> {
        let value = self.require(name)?;
        serde_json::from_str(value).map_err(|e| ActionError::InvalidParameter {
            name,
            value: quoted(value),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("true", Some(true))]
    #[case("TRUE", Some(true))]
    #[case(" False ", Some(false))]
    #[case("1", Some(true))]
    #[case("0", Some(false))]
    #[case("0.0", Some(false))]
    #[case("2.5", Some(true))]
    #[case("yes", None)]
    #[case("", None)]
    fn test_parse_bool(#[case] input: &str, #[case] expected: Option<bool>) {
        assert_eq!(parse_bool(input), expected);
    }

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_typed_accessors() {
        let values = values(&[
            ("duration_seconds", "90"),
            ("visible", "nope"),
            ("ranges", r#"[{"start": 1, "end": 4}]"#),
            ("broken", "[{"),
        ]);
        let params = Parameters::new(&values);

        assert_eq!(params.require_number::<f64>("duration_seconds"), Ok(90.0));
        assert_eq!(
            params.require("text"),
            Err(ActionError::MissingParameter("text"))
        );
        assert!(matches!(
            params.flag("visible"),
            Err(ActionError::InvalidParameter { name: "visible", .. })
        ));
        let ranges: Vec<serde_json::Value> = params.json("ranges").unwrap();
        assert_eq!(ranges.len(), 1);
        assert!(params.json::<Vec<serde_json::Value>>("broken").is_err());
    }

    #[test]
    fn test_long_values_are_cut_in_errors() {
        let entry = r#"{"id": "h", "start": "0", "end": 5, "type": "grammar"}"#;
        let long = format!("[{}", vec![entry; 100].join(","));
        let values = values(&[("highlights", long.as_str())]);
        let params = Parameters::new(&values);

        let Err(ActionError::InvalidParameter { value, .. }) =
            params.json::<Vec<serde_json::Value>>("highlights")
        else {
            panic!("expected an invalid parameter error");
        };

        assert_eq!(value.chars().count(), QUOTED_VALUE_LIMIT + 1);
        assert!(value.ends_with('…'));
        assert!(long.starts_with(value.trim_end_matches('…')));
        assert_eq!(quoted("short"), "short");
    }

    #[test]
    fn test_first_of_prefers_earlier_names() {
        let values = values(&[("text_chunk", " "), ("text", "fallback")]);
        let params = Parameters::new(&values);

        assert_eq!(params.first_of(&["text_chunk", "text"]), Some(" "));
        assert_eq!(params.first_of(&["html_content", "text"]), Some("fallback"));
        assert_eq!(params.first_of(&["missing"]), None);
    }
}
