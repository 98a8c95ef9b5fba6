//! Configuration parameters

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::configuration::value::Value;

/// Tag marking a parameter as a dependency even when its value is unset
pub const DEPENDENCY_TAG: &str = "dependency";

/// Predicate over a parameter value
pub type RangePredicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Expected kind of a parameter value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeHint {
    Bool,
    Int,
    Float,
    Str,
    Symbol,
    List,
    Map,
    Key,
    Configuration,
    Component,
}

impl TypeHint {
    /// Check a value against this hint; null always matches
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (TypeHint::Bool, Value::Bool(_)) => true,
            (TypeHint::Int, Value::Int(_)) => true,
            (TypeHint::Float, Value::Float(_) | Value::Int(_)) => true,
            (TypeHint::Str, Value::Str(_)) => true,
            (TypeHint::Symbol, Value::Symbol(_)) => true,
            (TypeHint::List, Value::List(_)) => true,
            (TypeHint::Map, Value::Map(_)) => true,
            (TypeHint::Key, Value::Key(_)) => true,
            (TypeHint::Configuration, Value::Config(_)) => true,
            (TypeHint::Component, Value::Component(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for TypeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeHint::Bool => "bool",
            TypeHint::Int => "int",
            TypeHint::Float => "float",
            TypeHint::Str => "str",
            TypeHint::Symbol => "symbol",
            TypeHint::List => "list",
            TypeHint::Map => "map",
            TypeHint::Key => "key",
            TypeHint::Configuration => "configuration",
            TypeHint::Component => "component",
        };
        write!(f, "{}", name)
    }
}

/// A named, typed, tagged value slot
///
/// Built with a small builder:
///
/// ```rust
/// use cinnamon_core::configuration::{Param, TypeHint};
///
/// let param = Param::new("hidden_size")
///     .value(128)
///     .type_hint(TypeHint::Int)
///     .allowed_range(|v| v.as_int().map_or(false, |n| n > 0))
///     .variants([64, 256]);
/// assert!(param.is_required);
/// ```
#[derive(Clone)]
pub struct Param {
    pub name: String,
    pub value: Value,
    pub type_hint: Option<TypeHint>,
    pub description: Option<String>,
    pub tags: BTreeSet<String>,
    pub allowed_range: Option<RangePredicate>,
    pub is_required: bool,
    pub variants: Vec<Value>,
}

impl Param {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Value::Null,
            type_hint: None,
            description: None,
            tags: BTreeSet::new(),
            allowed_range: None,
            is_required: true,
            variants: Vec::new(),
        }
    }

    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = value.into();
        self
    }

    pub fn type_hint(mut self, type_hint: TypeHint) -> Self {
        self.type_hint = Some(type_hint);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn allowed_range<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.allowed_range = Some(Arc::new(predicate));
        self
    }

    pub fn required(mut self, is_required: bool) -> Self {
        self.is_required = is_required;
        self
    }

    pub fn variants<I, V>(mut self, variants: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.variants = variants.into_iter().map(Into::into).collect();
        self
    }

    /// True if the value is (or is declared to be) another configuration
    pub fn is_dependency(&self) -> bool {
        self.value.is_dependency()
            || self.type_hint == Some(TypeHint::Key)
            || self.tags.contains(DEPENDENCY_TAG)
            || self.variants.iter().any(|v| matches!(v, Value::Key(_)))
    }

    pub fn has_variants(&self) -> bool {
        !self.variants.is_empty()
    }

    pub fn long_repr(&self) -> String {
        format!(
            "name: {}\nvalue: {}\ntype_hint: {}\ndescription: {}\ntags: {:?}\nis_required: {}\nvariants: {:?}",
            self.name,
            self.value,
            self.type_hint.map(|t| t.to_string()).unwrap_or_else(|| "none".to_string()),
            self.description.as_deref().unwrap_or(""),
            self.tags,
            self.is_required,
            self.variants
        )
    }
}

/// Two params are equal iff name and value are equal
impl PartialEq for Param {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.value == other.value
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Param")
            .field("name", &self.name)
            .field("value", &self.value)
            .field("type_hint", &self.type_hint)
            .field("tags", &self.tags)
            .field("is_required", &self.is_required)
            .field("variants", &self.variants)
            .finish()
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
