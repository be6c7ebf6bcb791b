//! Builds R call expressions from structured parameters.
//!
//! Strings are written between single quotes exactly as given. Embedded quotes
//! and separators are NOT escaped, so untrusted input can break out of the
//! literal. Callers that pass user data must sanitize it themselves.

use std::{collections::HashSet, fmt};

use crate::error::{BridgeError, Result};

const SEPARATOR: char = ',';
const MISSING: &str = "NA";

/// A single argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Num(f64),
    Bool(bool),
    List(Vec<ParamValue>),
    Missing,
}

impl ParamValue {
    fn write_to(&self, out: &mut String) {
        match self {
            Self::List(items) => {
                out.push_str("c(");
                write_joined(items.iter(), out, |v, out| v.write_to(out));
                out.push(')');
            }
            Self::Str(s) => {
                out.push('\'');
                out.push_str(s);
                out.push('\'');
            }
            Self::Missing => out.push_str(MISSING),
            Self::Num(n) if n.is_infinite() => {
                out.push_str(if n.is_sign_negative() { "-Inf" } else { "Inf" })
            }
            Self::Num(n) => out.push_str(&n.to_string()),
            Self::Bool(true) => out.push_str("TRUE"),
            Self::Bool(false) => out.push_str("FALSE"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Num(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        Self::Num(f64::from(v))
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Self::Missing)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl TryFrom<serde_json::Value> for ParamValue {
    type Error = BridgeError;

    fn try_from(v: serde_json::Value) -> Result<Self> {
        use serde_json::Value;
        Ok(match v {
            Value::Null => Self::Missing,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Num(
                n.as_f64()
                    .ok_or_else(|| BridgeError::validation(format!("unrepresentable number {n}")))?,
            ),
            Value::String(s) => Self::Str(s),
            Value::Array(items) => Self::List(
                items
                    .into_iter()
                    .map(Self::try_from)
                    .collect::<Result<Vec<_>>>()?,
            ),
            Value::Object(_) => {
                return Err(BridgeError::validation(
                    "nested objects cannot be passed as R arguments",
                ))
            }
        })
    }
}

/// Arguments of one call, either positional or keyword.
#[derive(Debug, Clone, PartialEq)]
pub enum Params {
    Positional(Vec<ParamValue>),
    /// Kept in insertion order; names must be unique.
    Named(Vec<(String, ParamValue)>),
}

impl Params {
    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ParamValue>,
    {
        Self::Positional(values.into_iter().map(Into::into).collect())
    }

    pub fn named<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ParamValue>,
    {
        Self::Named(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// A JSON array maps to positional arguments, an object to named ones.
    pub fn from_json(v: serde_json::Value) -> Result<Self> {
        use serde_json::Value;
        match v {
            Value::Array(items) => Ok(Self::Positional(
                items
                    .into_iter()
                    .map(ParamValue::try_from)
                    .collect::<Result<Vec<_>>>()?,
            )),
            Value::Object(map) => Ok(Self::Named(
                map.into_iter()
                    .map(|(k, v)| Ok((k, ParamValue::try_from(v)?)))
                    .collect::<Result<Vec<_>>>()?,
            )),
            other => Err(BridgeError::validation(format!(
                "arguments must be a JSON array or object, got {other}"
            ))),
        }
    }

    fn validate(&self) -> Result<()> {
        if let Self::Named(entries) = self {
            let mut seen = HashSet::new();
            for (name, _) in entries {
                if name.trim().is_empty() {
                    return Err(BridgeError::validation("empty parameter name"));
                }
                if !seen.insert(name.as_str()) {
                    return Err(BridgeError::validation(format!(
                        "duplicate parameter name '{name}'"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// An R function call, e.g. `mean(c(1,2,3),na.rm=TRUE)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallExpression(String);

impl CallExpression {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CallExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CallExpression {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pub fn build_call(function_name: &str, params: &Params) -> Result<CallExpression> {
    let name = function_name.trim();
    if name.is_empty() {
        return Err(BridgeError::validation("function name is required"));
    }
    params.validate()?;

    let mut out = String::with_capacity(name.len() + 16);
    out.push_str(name);
    out.push('(');
    match params {
        Params::Positional(values) => {
            write_joined(values.iter(), &mut out, |v, out| v.write_to(out));
        }
        Params::Named(entries) => {
            write_joined(entries.iter(), &mut out, |(k, v), out| {
                out.push_str(k);
                out.push('=');
                v.write_to(out);
            });
        }
    }
    out.push(')');
    Ok(CallExpression(out))
}

/// Writes each item followed by a separator, then strips the trailing one.
fn write_joined<'a, T: 'a>(
    items: impl Iterator<Item = &'a T>,
    out: &mut String,
    mut write: impl FnMut(&'a T, &mut String),
) {
    let mark = out.len();
    for item in items {
        write(item, out);
        out.push(SEPARATOR);
    }
    if out.len() > mark && out.ends_with(SEPARATOR) {
        out.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, params: Params) -> String {
        build_call(name, &params).unwrap().into_string()
    }

    fn balanced(s: &str) -> bool {
        let mut depth = 0i32;
        for c in s.chars() {
            match c {
                '(' => depth += 1,
                ')' => depth -= 1,
                _ => {}
            }
            if depth < 0 {
                return false;
            }
        }
        depth == 0
    }

    #[test]
    fn positional_scalars() {
        assert_eq!(
            call("f", Params::positional([ParamValue::from(1), "a".into(), 2.5.into()])),
            "f(1,'a',2.5)"
        );
    }

    #[test]
    fn positional_lists_are_balanced_without_trailing_separator() {
        let cases = vec![
            Params::positional(Vec::<ParamValue>::new()),
            Params::positional([1]),
            Params::positional([ParamValue::from(vec![1, 2, 3]), "x".into()]),
            Params::positional([ParamValue::List(vec![]), ParamValue::Missing]),
        ];
        for p in cases {
            let s = call("g", p);
            assert!(balanced(&s), "{s}");
            assert!(!s.contains(",)"), "{s}");
            assert!(s.ends_with(')'));
        }
    }

    #[test]
    fn empty_params_produce_empty_call() {
        assert_eq!(call("Sys.time", Params::positional(Vec::<ParamValue>::new())), "Sys.time()");
        assert_eq!(call("ls", Params::Named(vec![])), "ls()");
    }

    #[test]
    fn nested_lists_wrap_per_depth() {
        let nested = ParamValue::List(vec![
            ParamValue::from(vec![1, 2]),
            ParamValue::List(vec![ParamValue::from(vec!["a"]), 3.into()]),
        ]);
        assert_eq!(
            call("h", Params::Positional(vec![nested])),
            "h(c(c(1,2),c(c('a'),3)))"
        );
    }

    #[test]
    fn named_arguments_keep_order_and_wrap_lists() {
        let p = Params::named([
            ("x", ParamValue::from(vec![1.5, 2.0])),
            ("na.rm", true.into()),
            ("label", "hi".into()),
        ]);
        assert_eq!(call("mean", p), "mean(x=c(1.5,2),na.rm=TRUE,label='hi')");
    }

    #[test]
    fn embedded_quote_is_emitted_verbatim() {
        let expr = build_call("paste", &Params::positional(["a'b"])).unwrap();
        assert_eq!(expr.as_str(), "paste('a'b')");
        assert_eq!(expr.to_string(), expr.as_str());
    }

    #[test]
    fn missing_values_serialize_to_na() {
        let p = Params::positional([
            ParamValue::Missing,
            Option::<i32>::None.into(),
            ParamValue::from(vec![ParamValue::Missing]),
        ]);
        assert_eq!(call("sum", p), "sum(NA,NA,c(NA))");
        let named = Params::named([("y", ParamValue::Missing)]);
        assert_eq!(call("f", named), "f(y=NA)");
    }

    #[test]
    fn whole_numbers_print_without_fraction() {
        assert_eq!(call("f", Params::positional([3.0, -0.25, 1e3])), "f(3,-0.25,1000)");
        assert_eq!(
            call("f", Params::positional([f64::INFINITY, f64::NEG_INFINITY])),
            "f(Inf,-Inf)"
        );
    }

    #[test]
    fn empty_function_name_is_rejected() {
        let err = build_call("  ", &Params::positional([1])).unwrap_err();
        assert!(matches!(err, BridgeError::Validation(_)));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let p = Params::named([("a", 1), ("a", 2)]);
        assert!(matches!(build_call("f", &p), Err(BridgeError::Validation(_))));
    }

    #[test]
    fn params_from_json() {
        let p = Params::from_json(serde_json::json!({"b": [1, null], "a": "s"})).unwrap();
        assert_eq!(call("f", p), "f(b=c(1,NA),a='s')");
        let p = Params::from_json(serde_json::json!([true, [[2]]])).unwrap();
        assert_eq!(call("f", p), "f(TRUE,c(c(2)))");
        assert!(Params::from_json(serde_json::json!(5)).is_err());
        assert!(Params::from_json(serde_json::json!([{"x": 1}])).is_err());
    }
}
