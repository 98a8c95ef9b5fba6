//! Validation conditions
//!
//! Conditions are predicates over a whole [`Configuration`]. Those tagged
//! [`PRE_CONDITION_TAG`] run before dependencies are resolved, the rest run
//! on the fully built configuration.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::configuration::param::{RangePredicate, TypeHint};
use crate::configuration::Configuration;

pub const CONDITION_TAG: &str = "condition";
pub const PRE_CONDITION_TAG: &str = "pre-condition";
pub const TYPECHECK_TAG: &str = "typechecking";
pub const PRE_BUILT_TAG: &str = "pre-built";
pub const ALLOWED_RANGE_TAG: &str = "allowed_range";

pub type ConditionFn = Arc<dyn Fn(&Configuration) -> bool + Send + Sync>;

/// A named check attached to a configuration
#[derive(Clone)]
pub struct Condition {
    pub name: String,
    pub check: ConditionFn,
    pub description: Option<String>,
    pub tags: BTreeSet<String>,
}

impl Condition {
    pub fn new<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Configuration) -> bool + Send + Sync + 'static,
    {
        let mut tags = BTreeSet::new();
        tags.insert(CONDITION_TAG.to_string());
        Self {
            name: name.into(),
            check: Arc::new(check),
            description: None,
            tags,
        }
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

    pub fn is_pre_condition(&self) -> bool {
        self.tags.contains(PRE_CONDITION_TAG)
    }

    pub fn evaluate(&self, config: &Configuration) -> bool {
        (self.check)(config)
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition")
            .field("name", &self.name)
            .field("tags", &self.tags)
            .finish()
    }
}

/// Outcome of a validation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub passed: bool,
    /// Kind of the configuration that produced the result
    pub source: String,
    pub error_message: Option<String>,
}

impl ValidationResult {
    pub fn passed(source: impl Into<String>) -> Self {
        Self {
            passed: true,
            source: source.into(),
            error_message: None,
        }
    }

    pub fn failed(source: impl Into<String>, condition_name: &str) -> Self {
        Self {
            passed: false,
            source: source.into(),
            error_message: Some(format!("Condition {} failed!", condition_name)),
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "source: {}, passed: {}, error message: {}",
            self.source,
            self.passed,
            self.error_message.as_deref().unwrap_or("none")
        )
    }
}

pub(crate) fn is_required(name: &str) -> Condition {
    let param = name.to_string();
    Condition::new(format!("{}_is_required", name), move |config| {
        config.get(&param).map_or(false, |p| !p.value.is_null())
    })
    .description(format!("Checks that {} is set.", name))
}

pub(crate) fn typecheck(name: &str, type_hint: TypeHint) -> Condition {
    let param = name.to_string();
    Condition::new(format!("{}_typecheck", name), move |config| {
        config.get(&param).map_or(false, |p| type_hint.matches(&p.value))
    })
    .description(format!("Checks if {} is of type {}.", name, type_hint))
    .tags([TYPECHECK_TAG, PRE_BUILT_TAG])
}

pub(crate) fn allowed_range(name: &str, predicate: RangePredicate, pre_condition: bool) -> Condition {
    let param = name.to_string();
    let condition = Condition::new(format!("{}_allowed_range", name), move |config| {
        config
            .get(&param)
            .map_or(false, |p| p.value.is_null() || predicate(&p.value))
    })
    .description(format!("Checks if {} is in allowed range.", name))
    .tags([ALLOWED_RANGE_TAG]);

    if pre_condition {
        condition.tags([PRE_CONDITION_TAG])
    } else {
        condition
    }
}
