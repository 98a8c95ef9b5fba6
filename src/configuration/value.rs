//! Parameter values
//!
//! [`Value`] is the tagged value stored in every [`Param`](super::Param).
//! Dependencies are values too: an unresolved [`RegistrationKey`], a
//! materialized [`Configuration`], or a built [`Component`].

use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

use crate::component::Component;
use crate::configuration::Configuration;
use crate::registry::key::{is_taggable_str, RegistrationKey};

/// Parameter name to value bindings, in insertion order
pub type ParamValues = IndexMap<String, Value>;

#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Enumeration-like value, rendered by its variant name
    Symbol(String),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
    Key(RegistrationKey),
    Config(Box<Configuration>),
    Component(Arc<dyn Component>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// True for keys, configurations and components
    pub fn is_dependency(&self) -> bool {
        matches!(self, Value::Key(_) | Value::Config(_) | Value::Component(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) | Value::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_key(&self) -> Option<&RegistrationKey> {
        match self {
            Value::Key(key) => Some(key),
            _ => None,
        }
    }

    pub fn as_config(&self) -> Option<&Configuration> {
        match self {
            Value::Config(config) => Some(config),
            _ => None,
        }
    }

    pub fn as_config_mut(&mut self) -> Option<&mut Configuration> {
        match self {
            Value::Config(config) => Some(config),
            _ => None,
        }
    }

    pub fn as_component(&self) -> Option<&Arc<dyn Component>> {
        match self {
            Value::Component(component) => Some(component),
            _ => None,
        }
    }

    /// Name of the value kind, used in error messages and type checks
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Symbol(_) => "symbol",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Key(_) => "key",
            Value::Config(_) => "configuration",
            Value::Component(_) => "component",
        }
    }

    /// Representation used inside key tags, if the value is taggable
    pub(crate) fn tag_repr(&self) -> Option<String> {
        match self {
            Value::Null => Some("null".to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Int(i) => Some(i.to_string()),
            Value::Float(f) => Some(format!("{:?}", f)),
            Value::Str(s) | Value::Symbol(s) if is_taggable_str(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Key(a), Value::Key(b)) => a == b,
            (Value::Config(a), Value::Config(b)) => a == b,
            (Value::Component(a), Value::Component(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Str(s) | Value::Symbol(s) => write!(f, "{}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(entries) => {
                write!(f, "{{")?;
                for (i, (name, item)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", name, item)?;
                }
                write!(f, "}}")
            }
            Value::Key(key) => write!(f, "{}", key),
            Value::Config(config) => write!(f, "{}", config),
            Value::Component(component) => write!(f, "{:?}", component),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{:?}", s),
            other => fmt::Display::fmt(other, f),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::Int(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<RegistrationKey> for Value {
    fn from(value: RegistrationKey) -> Self {
        Value::Key(value)
    }
}

impl From<Configuration> for Value {
    fn from(value: Configuration) -> Self {
        Value::Config(Box::new(value))
    }
}

impl From<Arc<dyn Component>> for Value {
    fn from(value: Arc<dyn Component>) -> Self {
        Value::Component(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_repr_for_scalars() {
        assert_eq!(Value::Null.tag_repr().as_deref(), Some("null"));
        assert_eq!(Value::Bool(true).tag_repr().as_deref(), Some("true"));
        assert_eq!(Value::Int(3).tag_repr().as_deref(), Some("3"));
        assert_eq!(Value::Float(1.0).tag_repr().as_deref(), Some("1.0"));
        assert_eq!(Value::from("adam").tag_repr().as_deref(), Some("adam"));
        assert_eq!(Value::Symbol("Mean".into()).tag_repr().as_deref(), Some("Mean"));
    }

    #[test]
    fn test_tag_repr_rejects_structured_values() {
        assert!(Value::from(vec![1, 2]).tag_repr().is_none());
        assert!(Value::Map(IndexMap::new()).tag_repr().is_none());
        assert!(Value::from("a, b").tag_repr().is_none());
    }

    #[test]
    fn test_equality_is_structural() {
        assert_eq!(Value::from(vec![1, 2]), Value::from(vec![1, 2]));
        assert_ne!(Value::Int(1), Value::Float(1.0));
        assert_ne!(Value::Str("a".into()), Value::Symbol("a".into()));
    }

    #[test]
    fn test_option_conversion() {
        assert!(Value::from(None::<i64>).is_null());
        assert_eq!(Value::from(Some(4)), Value::Int(4));
    }
}
