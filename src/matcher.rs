//! Matching of extracted claim/attribute values against configured values.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::Display;

use crate::error::MapperError;

/// How a configured value is compared with extracted values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    #[default]
    Literal,
    Regex,
}

impl MatchMode {
    pub fn from_regex_flag(values_are_regex: bool) -> Self {
        if values_are_regex {
            MatchMode::Regex
        } else {
            MatchMode::Literal
        }
    }
}

/// A configured value prepared for matching.
#[derive(Debug, Clone)]
pub enum Matcher {
    Literal(String),
    Regex(Regex),
}

impl Matcher {
    /// Prepare `expected` under `mode`; regex patterns are compiled here.
    pub fn new(expected: &str, mode: MatchMode) -> Result<Self, MapperError> {
        match mode {
            MatchMode::Literal => Ok(Matcher::Literal(expected.to_string())),
            MatchMode::Regex => Ok(Matcher::Regex(compile_pattern(expected)?)),
        }
    }

    /// Whether the value, or any element of it when it is an array, matches.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Matcher::Literal(expected) => value_equals(expected, value),
            Matcher::Regex(re) => value_matches_regex(re, value),
        }
    }

    /// Whether any of several values matches.
    pub fn matches_any<'a, I>(&self, values: I) -> bool
    where
        I: IntoIterator<Item = &'a Value>,
    {
        values.into_iter().any(|value| self.matches(value))
    }
}

/// Compile a pattern so that it must match the whole value.
///
/// The pattern is checked on its own before it is anchored. An unbalanced
/// pattern such as `x)|(.*` would otherwise close the anchoring group and
/// compile into an unanchored regex.
pub fn compile_pattern(pattern: &str) -> Result<Regex, MapperError> {
    Regex::new(pattern)?;
    Ok(Regex::new(&format!("^(?:{pattern})$"))?)
}

/// Stable string form of a scalar claim value.
///
/// Strings render verbatim, booleans as `true`/`false`, numbers in their JSON
/// form (integers in decimal). `null`, arrays and objects have no rendering.
pub fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Literal comparison with array containment.
pub fn value_equals(expected: &str, value: &Value) -> bool {
    match value {
        Value::String(s) => s == expected,
        Value::Array(items) => items.iter().any(|item| value_equals(expected, item)),
        other => render_scalar(other).is_some_and(|rendered| rendered == expected),
    }
}

/// Full-string regex match against a scalar or any element of an array.
pub fn value_matches_regex(re: &Regex, value: &Value) -> bool {
    match value {
        Value::String(s) => re.is_match(s),
        Value::Array(items) => items.iter().any(|item| value_matches_regex(re, item)),
        other => render_scalar(other).is_some_and(|rendered| re.is_match(&rendered)),
    }
}
