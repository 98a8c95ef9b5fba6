//! Registration requests and the command queue that buffers them
//!
//! Declaration code never touches the registry directly: it pushes
//! [`Registration`]s into a [`RegistrationContext`], which the registry
//! replays in order.
//!
//! ```rust
//! use cinnamon_core::registry::{ConfigClass, Registration, RegistrationContext};
//!
//! fn register_defaults(ctx: &mut RegistrationContext) {
//!     ctx.register(Registration::new(ConfigClass::base(), "empty", "testing").tags(["t1"]));
//! }
//!
//! let mut ctx = RegistrationContext::new();
//! register_defaults(&mut ctx);
//! assert_eq!(ctx.len(), 1);
//! ```

use crate::component::ComponentClass;
use crate::configuration::{Configuration, ConfigurationError, ParamValues};
use crate::registry::info::{ConfigClass, Constructor};
use crate::registry::key::{RegistrationKey, Tags};

use std::fmt;
use std::sync::Arc;

/// Entry point that declares registrations
pub type DeclareFn = fn(&mut RegistrationContext);

/// Everything needed to register one configuration
#[derive(Clone)]
pub struct Registration {
    pub config_class: ConfigClass,
    pub name: String,
    pub namespace: String,
    pub tags: Tags,
    pub description: Option<String>,
    /// Overrides the class default constructor
    pub constructor: Option<Constructor>,
    pub component_class: Option<ComponentClass>,
    pub build_recursively: bool,
}

impl Registration {
    pub fn new(config_class: ConfigClass, name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            config_class,
            name: name.into(),
            namespace: namespace.into(),
            tags: Tags::new(),
            description: None,
            constructor: None,
            component_class: None,
            build_recursively: true,
        }
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn constructor<F>(mut self, constructor: F) -> Self
    where
        F: Fn() -> Result<Configuration, ConfigurationError> + Send + Sync + 'static,
    {
        self.constructor = Some(Arc::new(constructor));
        self
    }

    pub fn component(mut self, component_class: ComponentClass) -> Self {
        self.component_class = Some(component_class);
        self
    }

    pub fn build_recursively(mut self, build_recursively: bool) -> Self {
        self.build_recursively = build_recursively;
        self
    }

    pub fn key(&self) -> RegistrationKey {
        let key = RegistrationKey::new(self.name.clone(), self.namespace.clone())
            .with_tags(self.tags.iter().cloned());
        match &self.description {
            Some(description) => key.with_description(description.clone()),
            None => key,
        }
    }

    /// Explicit constructor, or the class default
    pub(crate) fn effective_constructor(&self) -> Constructor {
        self.constructor
            .clone()
            .unwrap_or_else(|| self.config_class.default_constructor())
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("key", &self.key())
            .field("config_class", &self.config_class)
            .field("custom_constructor", &self.constructor.is_some())
            .field("component_class", &self.component_class)
            .field("build_recursively", &self.build_recursively)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum PendingRegistration {
    Configuration(Registration),
    FromVariant {
        registration: Registration,
        values: ParamValues,
    },
}

/// Ordered queue of registrations awaiting replay
#[derive(Debug, Clone, Default)]
pub struct RegistrationContext {
    pending: Vec<PendingRegistration>,
}

impl RegistrationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, registration: Registration) -> &mut Self {
        self.pending.push(PendingRegistration::Configuration(registration));
        self
    }

    /// Register a delta copy of the class configuration with `values` applied
    pub fn register_from_variant(&mut self, registration: Registration, values: ParamValues) -> &mut Self {
        self.pending.push(PendingRegistration::FromVariant {
            registration,
            values,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Keys that replaying this context would register
    pub fn keys(&self) -> Vec<RegistrationKey> {
        self.pending
            .iter()
            .map(|pending| match pending {
                PendingRegistration::Configuration(registration) => registration.key(),
                PendingRegistration::FromVariant { registration, .. } => registration.key(),
            })
            .collect()
    }

    pub(crate) fn into_pending(self) -> Vec<PendingRegistration> {
        self.pending
    }
}
