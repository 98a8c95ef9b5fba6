//! Component construction arguments

use std::sync::Arc;

use crate::component::error::ComponentError;
use crate::component::Component;
use crate::configuration::{Configuration, ParamValues, Value};
use crate::registry::RegistrationKey;

/// Conversion from a parameter value into a constructor argument
pub trait FromValue: Sized {
    const EXPECTED: &'static str;

    fn from_value(value: Value) -> Option<Self>;
}

impl FromValue for Value {
    const EXPECTED: &'static str = "any";

    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }
}

impl FromValue for bool {
    const EXPECTED: &'static str = "bool";

    fn from_value(value: Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FromValue for i64 {
    const EXPECTED: &'static str = "int";

    fn from_value(value: Value) -> Option<Self> {
        value.as_int()
    }
}

impl FromValue for f64 {
    const EXPECTED: &'static str = "float";

    fn from_value(value: Value) -> Option<Self> {
        value.as_float()
    }
}

impl FromValue for String {
    const EXPECTED: &'static str = "str";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Str(s) | Value::Symbol(s) => Some(s),
            _ => None,
        }
    }
}

impl FromValue for RegistrationKey {
    const EXPECTED: &'static str = "key";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Key(key) => Some(key),
            _ => None,
        }
    }
}

impl FromValue for Configuration {
    const EXPECTED: &'static str = "configuration";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Config(config) => Some(*config),
            _ => None,
        }
    }
}

impl FromValue for Arc<dyn Component> {
    const EXPECTED: &'static str = "component";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Component(component) => Some(component),
            _ => None,
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    const EXPECTED: &'static str = "list";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            _ => None,
        }
    }
}

/// Null maps to `None`
impl<T: FromValue> FromValue for Option<T> {
    const EXPECTED: &'static str = T::EXPECTED;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}

/// Named arguments handed to a component constructor
///
/// Constructors take what they need; anything left over is reported by the
/// owning [`ComponentClass`](super::ComponentClass).
#[derive(Debug, Clone, Default)]
pub struct ComponentArgs {
    values: ParamValues,
}

impl ComponentArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Extend with other arguments; later values win
    pub fn merge(mut self, other: ComponentArgs) -> Self {
        self.values.extend(other.values);
        self
    }

    pub fn take<T: FromValue>(&mut self, name: &str) -> Result<T, ComponentError> {
        let value = self
            .values
            .shift_remove(name)
            .ok_or_else(|| ComponentError::MissingArgument(name.to_string()))?;
        convert(name, value)
    }

    /// Like [`take`](Self::take), but absent arguments are `None`
    pub fn take_opt<T: FromValue>(&mut self, name: &str) -> Result<Option<T>, ComponentError> {
        match self.values.shift_remove(name) {
            Some(value) => convert::<Option<T>>(name, value),
            None => Ok(None),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn remaining(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn convert<T: FromValue>(name: &str, value: Value) -> Result<T, ComponentError> {
    let found = value.kind();
    T::from_value(value).ok_or_else(|| ComponentError::InvalidArgument {
        name: name.to_string(),
        expected: T::EXPECTED,
        found,
    })
}

impl From<ParamValues> for ComponentArgs {
    fn from(values: ParamValues) -> Self {
        Self { values }
    }
}
