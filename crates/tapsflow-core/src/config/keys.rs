use crate::config::ConfigNode;
use crate::value::{Value, ValueType};

pub type Predicate = fn(&ConfigNode) -> bool;
pub type Transform = fn(&Value) -> Result<Value, String>;
pub type Check = fn(&Value) -> Result<bool, String>;
pub type Producer = fn(&ConfigNode) -> Result<Option<Value>, String>;

#[derive(Clone, Copy)]
pub enum Required {
    Always,
    Never,
    /// Required only when the enclosing config satisfies the predicate.
    When(Predicate),
}

impl Required {
    pub fn resolve(&self, config: &ConfigNode) -> bool {
        match self {
            Required::Always => true,
            Required::Never => false,
            Required::When(predicate) => predicate(config),
        }
    }
}

#[derive(Clone, Copy)]
pub enum DefaultValue {
    Integer(i64),
    Text(&'static str),
    List(&'static [&'static str]),
    Produce(Producer),
}

impl DefaultValue {
    pub fn resolve(&self, config: &ConfigNode) -> Result<Option<Value>, String> {
        match self {
            DefaultValue::Integer(number) => Ok(Some(Value::Integer(*number))),
            DefaultValue::Text(text) => Ok(Some(Value::text(*text))),
            DefaultValue::List(items) => Ok(Some(Value::list(items.iter().copied()))),
            DefaultValue::Produce(producer) => producer(config),
        }
    }
}

#[derive(Clone, Copy)]
pub struct KeySpec {
    pub required: Required,
    pub expected: ValueType,
    pub transform: Option<Transform>,
    pub check: Option<Check>,
    pub default: Option<DefaultValue>,
}

impl KeySpec {
    pub const fn optional(expected: ValueType) -> Self {
        Self {
            required: Required::Never,
            expected,
            transform: None,
            check: None,
            default: None,
        }
    }

    pub const fn required(expected: ValueType) -> Self {
        Self {
            required: Required::Always,
            expected,
            transform: None,
            check: None,
            default: None,
        }
    }

    pub const fn required_when(predicate: Predicate, expected: ValueType) -> Self {
        Self {
            required: Required::When(predicate),
            expected,
            transform: None,
            check: None,
            default: None,
        }
    }

    pub const fn transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    pub const fn check(mut self, check: Check) -> Self {
        self.check = Some(check);
        self
    }

    pub const fn default(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }
}

/// Key tables are ordered: keys are validated in declaration order, so a
/// conditional key sees the already processed state of earlier keys.
pub type KeyTable = [(&'static str, KeySpec)];

pub fn declares(table: &KeyTable, key: &str) -> bool {
    table.iter().any(|(name, _)| *name == key)
}
