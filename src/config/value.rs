//! Configuration values and the mapping handed to the renderer

use serde::Serialize;
use std::collections::BTreeMap;

use crate::common::escape::{self, Quote};
use crate::error::ValueError;

/// Named values substituted into a template
pub type ValueMap = BTreeMap<String, Value>;

/// A single configuration value: string, boolean or null
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "serde_json::Value")]
pub enum Value {
    Null,
    Bool(bool),
    String(String),
}

impl Value {
    /// Short type name for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::String(_) => "string",
        }
    }

    /// Parse a command-line literal: `true`, `false` and `null` are tokens,
    /// anything else is a string
    pub fn parse_literal(raw: &str) -> Self {
        match raw {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            "null" => Value::Null,
            other => Value::String(other.to_string()),
        }
    }

    /// Convert a JSON value, rejecting numbers, arrays and objects
    pub fn from_json(key: &str, json: serde_json::Value) -> Result<Self, ValueError> {
        match json {
            serde_json::Value::Null => Ok(Value::Null),
            serde_json::Value::Bool(b) => Ok(Value::Bool(b)),
            serde_json::Value::String(s) => Ok(Value::String(s)),
            other => Err(ValueError::UnsupportedType {
                key: key.to_string(),
                found: json_kind(&other),
            }),
        }
    }

    /// JS expression text: quoted string, or a bare `true`/`false`/`null`
    pub fn to_js_literal(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::String(s) => escape::quoted(s),
        }
    }

    /// Write the value into an already open string literal
    pub fn write_string_contents(&self, out: &mut String, quote: Quote) {
        match self {
            Value::Null => {}
            Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Value::String(s) => escape::escape_into(out, s, quote),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Option<String>> for Value {
    fn from(s: Option<String>) -> Self {
        s.map_or(Value::Null, Value::String)
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::String(s) => serde_json::Value::String(s),
        }
    }
}

fn json_kind(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Split a `KEY=VALUE` override into its key and parsed value
pub fn parse_override(raw: &str) -> Result<(String, Value), ValueError> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| ValueError::MalformedOverride(raw.to_string()))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(ValueError::MalformedOverride(raw.to_string()));
    }
    Ok((key.to_string(), Value::parse_literal(value)))
}

/// Parse a flat JSON object of values, reporting the offending key on type errors
pub fn values_from_json(json: serde_json::Value) -> Result<ValueMap, ValueError> {
    let serde_json::Value::Object(map) = json else {
        return Err(ValueError::NotAnObject);
    };
    map.into_iter()
        .map(|(key, json)| Value::from_json(&key, json).map(|value| (key, value)))
        .collect()
}
