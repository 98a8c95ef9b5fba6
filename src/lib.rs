//! Cinnamon Core - configuration registry and variant resolution
//!
//! Configurations describe how to build components. They are registered
//! under compound [`RegistrationKey`]s, may depend on each other through key
//! valued parameters and may declare alternative values (variants) for any
//! parameter. Resolving the registry expands every variant combination into
//! its own registration and validates all of them.
//!
//! ## Lifecycle
//!
//! 1. Register configurations directly, through declaration functions, or
//!    from TOML manifests found under `configurations/` folders
//! 2. Run [`Registry::dag_resolution`] (or [`Registry::setup`]) to expand
//!    and validate
//! 3. Build configurations or components by key
//!
//! ```rust
//! use cinnamon_core::configuration::{Configuration, Param};
//! use cinnamon_core::registry::{ConfigClass, Registration, Registry};
//!
//! let mut registry = Registry::new();
//! registry
//!     .register_configuration(
//!         Registration::new(ConfigClass::base(), "model", "demo").constructor(|| {
//!             let mut config = Configuration::default();
//!             config.add(Param::new("hidden").value(64).variants([128, 256]))?;
//!             Ok(config)
//!         }),
//!     )
//!     .unwrap();
//!
//! let resolution = registry.dag_resolution().unwrap();
//! assert_eq!(resolution.valid.len(), 3);
//! ```

pub mod component;
pub mod config;
pub mod configuration;
pub mod loader;
pub mod registry;
pub mod utils;

// Re-export config module
pub use config::*;

pub use component::{BuildComponent, Component, ComponentArgs, ComponentClass, ComponentError};
pub use configuration::{
    Condition, Configuration, ConfigurationError, ConfigurationType, Param, ParamValues, TypeHint,
    ValidationResult, Value, Variant,
};
pub use loader::DeclarationCatalog;
pub use registry::{
    ConfigClass, Registration, RegistrationContext, RegistrationKey, Registry, RegistryError,
    RegistryState, Resolution, ResolvedKey,
};
