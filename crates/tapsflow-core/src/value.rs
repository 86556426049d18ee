use std::fmt;

use serde::{Serialize, Serializer};

use crate::config::ConfigNode;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Boolean(bool),
    List(Vec<String>),
    Node(ConfigNode),
}

/// Closed set of types a key table can declare for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Integer,
    Text,
    Boolean,
    List,
}

impl ValueType {
    pub fn name(self) -> &'static str {
        match self {
            ValueType::Integer => "integer",
            ValueType::Text => "string",
            ValueType::Boolean => "boolean",
            ValueType::List => "list",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    pub fn text(value: impl Into<String>) -> Self {
        Value::Text(value.into())
    }

    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// `None` for nested nodes, which no key table can declare.
    pub fn value_type(&self) -> Option<ValueType> {
        match self {
            Value::Text(_) => Some(ValueType::Text),
            Value::Integer(_) => Some(ValueType::Integer),
            Value::Boolean(_) => Some(ValueType::Boolean),
            Value::List(_) => Some(ValueType::List),
            Value::Node(_) => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self.value_type() {
            Some(value_type) => value_type.name(),
            None => "group",
        }
    }

    pub fn is_type(&self, expected: ValueType) -> bool {
        self.value_type() == Some(expected)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(number) => Some(*number),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&ConfigNode> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn is_empty_text(&self) -> bool {
        matches!(self, Value::Text(text) if text.is_empty())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(text) => f.write_str(text),
            Value::Integer(number) => write!(f, "{number}"),
            Value::Boolean(flag) => write!(f, "{flag}"),
            Value::List(items) => write!(f, "[{}]", items.join(", ")),
            Value::Node(node) => {
                let entries = node
                    .iter()
                    .map(|(key, value)| format!("{key}: {value}"))
                    .collect::<Vec<_>>();
                write!(f, "{{{}}}", entries.join(", "))
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Text(text) => serializer.serialize_str(text),
            Value::Integer(number) => serializer.serialize_i64(*number),
            Value::Boolean(flag) => serializer.serialize_bool(*flag),
            Value::List(items) => items.serialize(serializer),
            Value::Node(node) => node.serialize(serializer),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<ConfigNode> for Value {
    fn from(value: ConfigNode) -> Self {
        Value::Node(value)
    }
}

/// Parse a raw properties scalar: digits become integers, `true`/`false` in
/// any case become booleans, anything else stays text.
pub fn parse_value(raw: &str) -> Value {
    if !raw.is_empty() && raw.bytes().all(|byte| byte.is_ascii_digit()) {
        if let Ok(number) = raw.parse::<i64>() {
            return Value::Integer(number);
        }
    }
    if raw.eq_ignore_ascii_case("true") {
        return Value::Boolean(true);
    }
    if raw.eq_ignore_ascii_case("false") {
        return Value::Boolean(false);
    }
    Value::Text(raw.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastFailure {
    /// No cast exists towards the target type.
    Undefined,
    /// A cast exists but the value does not convert.
    Rejected,
}

pub fn cast(value: &Value, target: ValueType) -> Result<Value, CastFailure> {
    if value.is_type(target) {
        return Ok(value.clone());
    }
    match (target, value) {
        (ValueType::Integer, Value::Text(text)) => text
            .trim()
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| CastFailure::Rejected),
        (ValueType::Integer, Value::Boolean(flag)) => Ok(Value::Integer(i64::from(*flag))),
        (ValueType::Integer, _) => Err(CastFailure::Rejected),
        (ValueType::Text, Value::Integer(number)) => Ok(Value::Text(number.to_string())),
        (ValueType::Text, Value::Boolean(flag)) => Ok(Value::Text(flag.to_string())),
        (ValueType::Text, Value::List(items)) => Ok(Value::Text(items.join(","))),
        (ValueType::Text, _) => Err(CastFailure::Rejected),
        (ValueType::Boolean, Value::Text(text)) => {
            if text.eq_ignore_ascii_case("true") {
                Ok(Value::Boolean(true))
            } else if text.eq_ignore_ascii_case("false") {
                Ok(Value::Boolean(false))
            } else {
                Err(CastFailure::Rejected)
            }
        }
        (ValueType::Boolean, _) => Err(CastFailure::Rejected),
        (ValueType::List, _) => Err(CastFailure::Undefined),
    }
}
