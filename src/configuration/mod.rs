//! Configurations
//!
//! A [`Configuration`] is an ordered bag of [`Param`]s plus the
//! [`Condition`]s that validate them. Configuration kinds are declared by
//! implementing [`ConfigurationType`]:
//!
//! ```rust
//! use cinnamon_core::configuration::{Configuration, ConfigurationError, ConfigurationType, Param};
//!
//! struct TrainerConfig;
//!
//! impl ConfigurationType for TrainerConfig {
//!     const NAME: &'static str = "TrainerConfig";
//!
//!     fn default_configuration() -> Result<Configuration, ConfigurationError> {
//!         let mut config = Configuration::new(Self::NAME);
//!         config.add(Param::new("epochs").value(10))?;
//!         config.add(Param::new("optimizer").variants(["adam", "sgd"]))?;
//!         Ok(config)
//!     }
//! }
//! ```

pub mod condition;
pub mod error;
pub mod param;
pub mod value;
pub mod variants;

pub use condition::{Condition, ValidationResult, PRE_CONDITION_TAG};
pub use error::ConfigurationError;
pub use param::{Param, RangePredicate, TypeHint, DEPENDENCY_TAG};
pub use value::{ParamValues, Value};
pub use variants::Variant;

use indexmap::IndexMap;
use std::fmt;
use tracing::info;

/// Kind name of configurations built without a dedicated type
pub const BASE_KIND: &str = "Configuration";

/// A named configuration kind with a default constructor
pub trait ConfigurationType {
    const NAME: &'static str;

    fn default_configuration() -> Result<Configuration, ConfigurationError>;
}

#[derive(Clone)]
pub struct Configuration {
    kind: String,
    params: IndexMap<String, Param>,
    conditions: IndexMap<String, Condition>,
}

impl Configuration {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            params: IndexMap::new(),
            conditions: IndexMap::new(),
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub(crate) fn with_kind(mut self, kind: &str) -> Self {
        self.kind = kind.to_string();
        self
    }

    fn contains_name(&self, name: &str) -> bool {
        self.params.contains_key(name) || self.conditions.contains_key(name)
    }

    /// Add a parameter together with its built-in conditions
    pub fn add(&mut self, param: Param) -> Result<&mut Self, ConfigurationError> {
        if self.contains_name(&param.name) {
            return Err(ConfigurationError::AlreadyExistingParameter(param.name));
        }

        let mut generated = Vec::new();
        if param.is_required {
            generated.push(condition::is_required(&param.name));
        }
        if let Some(type_hint) = param.type_hint {
            if !param.is_dependency() {
                generated.push(condition::typecheck(&param.name, type_hint));
            }
        }
        if let Some(predicate) = &param.allowed_range {
            generated.push(condition::allowed_range(
                &param.name,
                predicate.clone(),
                param.is_dependency(),
            ));
        }

        self.params.insert(param.name.clone(), param);
        for condition in generated {
            self.add_condition(condition)?;
        }
        Ok(self)
    }

    /// Add a custom condition; tag it [`PRE_CONDITION_TAG`] to run it before resolution
    pub fn add_condition(&mut self, condition: Condition) -> Result<&mut Self, ConfigurationError> {
        if self.contains_name(&condition.name) {
            return Err(ConfigurationError::AlreadyExistingParameter(condition.name));
        }
        self.conditions.insert(condition.name.clone(), condition);
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&Param> {
        self.params.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Param> {
        self.params.get_mut(name)
    }

    pub fn value(&self, name: &str) -> Result<&Value, ConfigurationError> {
        self.params
            .get(name)
            .map(|param| &param.value)
            .ok_or_else(|| ConfigurationError::NonExistingParameter(name.to_string()))
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), ConfigurationError> {
        let param = self
            .params
            .get_mut(name)
            .ok_or_else(|| ConfigurationError::NonExistingParameter(name.to_string()))?;
        param.value = value.into();
        Ok(())
    }

    pub fn params(&self) -> impl Iterator<Item = &Param> {
        self.params.values()
    }

    pub fn conditions(&self) -> impl Iterator<Item = &Condition> {
        self.conditions.values()
    }

    /// Top-level parameter values in declaration order
    pub fn values(&self) -> ParamValues {
        self.params
            .iter()
            .map(|(name, param)| (name.clone(), param.value.clone()))
            .collect()
    }

    pub fn dependencies(&self) -> impl Iterator<Item = &Param> {
        self.params.values().filter(|param| param.is_dependency())
    }

    pub fn has_variants(&self) -> bool {
        self.params.values().any(Param::has_variants)
    }

    /// Run post-resolution conditions
    ///
    /// Materialized dependency configurations are validated first and the
    /// first failing one is returned as is. In strict mode a failure becomes
    /// [`ConfigurationError::ValidationFailure`].
    pub fn validate(&self, strict: bool) -> Result<ValidationResult, ConfigurationError> {
        for param in self.dependencies() {
            if let Value::Config(child) = &param.value {
                let child_result = child.validate(strict)?;
                if !child_result.passed {
                    return Ok(child_result);
                }
            }
        }
        self.run_conditions(strict, |condition| !condition.is_pre_condition())
    }

    /// Run pre-conditions only, without descending into dependencies
    pub fn pre_validate(&self, strict: bool) -> Result<ValidationResult, ConfigurationError> {
        self.run_conditions(strict, Condition::is_pre_condition)
    }

    fn run_conditions<F>(&self, strict: bool, filter: F) -> Result<ValidationResult, ConfigurationError>
    where
        F: Fn(&Condition) -> bool,
    {
        for condition in self.conditions.values().filter(|condition| filter(*condition)) {
            if !condition.evaluate(self) {
                let result = ValidationResult::failed(&self.kind, &condition.name);
                if strict {
                    return Err(ConfigurationError::ValidationFailure(result));
                }
                return Ok(result);
            }
        }
        Ok(ValidationResult::passed(&self.kind))
    }

    /// Independent copy with some parameter values replaced
    ///
    /// Overrides are flat: they never reach into nested configurations.
    pub fn delta_copy(&self, overrides: &ParamValues) -> Result<Self, ConfigurationError> {
        let mut copy = self.clone();
        for (name, value) in overrides {
            copy.set(name, value.clone())?;
        }
        Ok(copy)
    }

    /// All combinations of declared variants
    ///
    /// Every parameter declaring variants contributes an axis made of its
    /// current value (when set) followed by its variants, without repeats.
    /// Axes are ordered by parameter name.
    pub fn variants(&self) -> Vec<Variant> {
        let mut axes: Vec<(String, Vec<Value>)> = self
            .params
            .values()
            .filter(|param| param.has_variants())
            .map(|param| {
                let mut admissible: Vec<Value> = Vec::with_capacity(param.variants.len() + 1);
                let candidates = std::iter::once(&param.value)
                    .filter(|value| !value.is_null())
                    .chain(param.variants.iter());
                for candidate in candidates {
                    if !admissible.contains(candidate) {
                        admissible.push(candidate.clone());
                    }
                }
                (param.name.clone(), admissible)
            })
            .collect();
        axes.sort_by(|a, b| a.0.cmp(&b.0));
        variants::cross_product(&axes)
    }

    /// Flattened values, nested configurations under `<param>.` prefixes
    ///
    /// Unresolved dependency keys are left out.
    pub fn to_value_dict(&self) -> ParamValues {
        let mut flat = ParamValues::new();
        for (name, param) in &self.params {
            flatten_into(&mut flat, name, &param.value);
        }
        flat
    }

    pub fn search_param_by_tag(&self, tags: &[&str], exact_match: bool) -> ParamValues {
        let matches_tags = |param: &Param| {
            let all_present = tags.iter().all(|tag| param.tags.contains(*tag));
            if exact_match {
                all_present && param.tags.len() == tags.len()
            } else {
                all_present
            }
        };
        self.search_param(&[&matches_tags])
    }

    pub fn search_param(&self, predicates: &[&dyn Fn(&Param) -> bool]) -> ParamValues {
        self.params
            .iter()
            .filter(|(_, param)| predicates.iter().all(|predicate| predicate(param)))
            .map(|(name, param)| (name.clone(), param.value.clone()))
            .collect()
    }

    pub fn show(&self) {
        info!("Displaying {} parameters...", self.kind);
        for (name, value) in self.to_value_dict() {
            info!("{}: {}", name, value);
        }
    }
}

fn flatten_into(flat: &mut ParamValues, prefix: &str, value: &Value) {
    match value {
        Value::Key(_) => {}
        Value::Config(config) => {
            for (name, param) in &config.params {
                flatten_into(flat, &format!("{}.{}", prefix, name), &param.value);
            }
        }
        Value::Map(entries) => {
            for (name, entry) in entries {
                flatten_into(flat, &format!("{}.{}", prefix, name), entry);
            }
        }
        other => {
            flat.insert(prefix.to_string(), other.clone());
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new(BASE_KIND)
    }
}

/// Configurations are equal when they hold the same parameters with equal values
impl PartialEq for Configuration {
    fn eq(&self, other: &Self) -> bool {
        self.params.len() == other.params.len()
            && self.params.iter().all(|(name, param)| {
                other
                    .params
                    .get(name)
                    .map_or(false, |other_param| other_param.value == param.value)
            })
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Value::Map(self.to_value_dict()))
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("kind", &self.kind)
            .field("params", &self.params.values().collect::<Vec<_>>())
            .field("conditions", &self.conditions.keys().collect::<Vec<_>>())
            .finish()
    }
}
