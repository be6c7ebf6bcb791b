//! Turns the text R prints on stdout into typed values.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::platform::Platform;

/// One value recovered from R's printed output.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedValue {
    Str(String),
    Number(f64),
    /// R's `NA`.
    Missing,
    /// R's `NaN`; serialized as the string `"NaN"`.
    NaN,
    /// A whole-document JSON value that is neither a string nor a number.
    Structured(serde_json::Value),
}

impl Serialize for ParsedValue {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Str(v) => s.serialize_str(v),
            Self::Number(n) => s.serialize_f64(*n),
            Self::Missing => s.serialize_none(),
            Self::NaN => s.serialize_str("NaN"),
            Self::Structured(v) => v.serialize(s),
        }
    }
}

impl ParsedValue {
    fn from_json(v: serde_json::Value) -> Self {
        use serde_json::Value;
        match v {
            Value::String(s) => Self::Str(s),
            Value::Number(n) => match n.as_f64() {
                Some(f) => Self::Number(f),
                None => Self::Structured(Value::Number(n)),
            },
            Value::Null => Self::Missing,
            other => Self::Structured(other),
        }
    }

    fn from_token(token: &str) -> Self {
        match token {
            "NA" => Self::Missing,
            "NaN" => Self::NaN,
            _ => Self::Str(token.replace('"', "")),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

/// Values in the order R printed them.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct ParsedOutput(pub Vec<ParsedValue>);

impl ParsedOutput {
    pub fn values(&self) -> &[ParsedValue] {
        &self.0
    }

    pub fn into_values(self) -> Vec<ParsedValue> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Set when the whole output decoded as one JSON document.
    pub fn structured(&self) -> Option<&serde_json::Value> {
        match self.0.as_slice() {
            [ParsedValue::Structured(v)] => Some(v),
            _ => None,
        }
    }
}

impl IntoIterator for ParsedOutput {
    type Item = ParsedValue;
    type IntoIter = std::vec::IntoIter<ParsedValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

// Constant patterns; `constant_patterns_compile` covers them.
fn index_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[\d+\] ").expect("static regex"))
}

fn whitespace_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static regex"))
}

/// Parse raw stdout from R.
///
/// `[n] ` index prefixes are dropped, trailing whitespace is removed and every
/// remaining whitespace run becomes a line break. If that normalized text is
/// one JSON document it comes back as a single value, otherwise every line is
/// one token. Numeric tokens stay strings unless the whole output is a single
/// JSON number.
pub fn parse(raw: &str, platform: Platform) -> ParsedOutput {
    let sep = platform.line_separator();
    let stripped = index_prefix().replace_all(raw, "");
    let trimmed = stripped.trim_end();
    let normalized = whitespace_run().replace_all(trimmed, sep);

    if let Ok(v) = serde_json::from_str::<serde_json::Value>(&normalized) {
        return ParsedOutput(vec![ParsedValue::from_json(v)]);
    }

    ParsedOutput(normalized.split(sep).map(ParsedValue::from_token).collect())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn lin(raw: &str) -> Vec<ParsedValue> {
        parse(raw, Platform::Lin).into_values()
    }

    #[test]
    fn quoted_string_scalar() {
        assert_eq!(lin("[1] \"hello\"\n"), vec![ParsedValue::Str("hello".into())]);
    }

    #[test]
    fn na_becomes_missing() {
        let out = lin("[1] NA\n");
        assert_eq!(out, vec![ParsedValue::Missing]);
        assert!(out[0].is_missing());
        assert_eq!(out[0].as_str(), None);
    }

    #[test]
    fn json_document_is_one_value() {
        let out = parse("{\"a\":1}\n", Platform::Lin);
        assert_eq!(out.len(), 1);
        assert_eq!(out.structured(), Some(&json!({"a": 1})));
    }

    #[test]
    fn spaces_inside_json_strings_break_the_document() {
        let out = parse("{\"name\": \"two words\"}\n", Platform::Lin);
        assert_eq!(out.structured(), None);
        let tokens: Vec<_> = out.values().iter().filter_map(ParsedValue::as_str).collect();
        assert_eq!(tokens, vec!["{name:", "two", "words}"]);
    }

    #[test]
    fn printed_string_with_space_splits_into_words() {
        assert_eq!(
            lin("[1] \"a b\"\n"),
            vec![ParsedValue::Str("a".into()), ParsedValue::Str("b".into())]
        );
    }

    #[test]
    fn constant_patterns_compile() {
        assert!(index_prefix().is_match("[12] x"));
        assert!(whitespace_run().is_match(" \r\n\t"));
    }

    #[test]
    fn lone_number_decodes_as_number() {
        assert_eq!(lin("5"), vec![ParsedValue::Number(5.0)]);
        assert_eq!(lin("[1] 2.5\n"), vec![ParsedValue::Number(2.5)]);
    }

    #[test]
    fn vector_output_splits_into_string_tokens() {
        assert_eq!(
            lin("[1] 1 2 3\n"),
            vec![
                ParsedValue::Str("1".into()),
                ParsedValue::Str("2".into()),
                ParsedValue::Str("3".into()),
            ]
        );
    }

    #[test]
    fn wrapped_vector_drops_every_index_prefix() {
        let raw = "[1]  1  2  3  4  5  6  7  8  9 10\n[11] 11 12\n";
        let out = lin(raw);
        assert_eq!(out.len(), 13);
        // the padding R puts before `1` leaves one empty leading token
        assert_eq!(out[0], ParsedValue::Str(String::new()));
        assert_eq!(out[1].as_str(), Some("1"));
        assert_eq!(out[12].as_str(), Some("12"));
    }

    #[test]
    fn mixed_markers_and_quotes() {
        assert_eq!(
            lin("[1] \"a\" NA  NaN \"b\"\n"),
            vec![
                ParsedValue::Str("a".into()),
                ParsedValue::Missing,
                ParsedValue::NaN,
                ParsedValue::Str("b".into()),
            ]
        );
    }

    #[test]
    fn windows_uses_crlf_separator() {
        let out = parse("[1] \"x\" \"y\"\r\n", Platform::Win).into_values();
        assert_eq!(
            out,
            vec![ParsedValue::Str("x".into()), ParsedValue::Str("y".into())]
        );
    }

    #[test]
    fn null_document_is_missing() {
        assert_eq!(lin("null\n"), vec![ParsedValue::Missing]);
    }

    #[test]
    fn serializes_to_plain_json() {
        let out = ParsedOutput(vec![
            ParsedValue::Str("a".into()),
            ParsedValue::Number(1.5),
            ParsedValue::Missing,
            ParsedValue::NaN,
        ]);
        assert_eq!(serde_json::to_value(&out).unwrap(), json!(["a", 1.5, null, "NaN"]));
    }
}
