//! Variant expansion and validation of the registration graph

use indexmap::IndexSet;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::configuration::{ParamValues, Value};
use crate::registry::graph::EdgeKind;
use crate::registry::registration::Registration;
use crate::registry::{Registry, RegistryError, RegistryState, RegistrationKey};

/// A key produced by resolution with its flattened configuration values
#[derive(Debug, Clone)]
pub struct ResolvedKey {
    /// Carries the failure reason in its metadata when invalid
    pub key: RegistrationKey,
    pub values: ParamValues,
}

/// Outcome of [`Registry::dag_resolution`], both lists in discovery order
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub valid: Vec<ResolvedKey>,
    pub invalid: Vec<ResolvedKey>,
}

impl Resolution {
    pub fn valid_keys(&self) -> Vec<&RegistrationKey> {
        self.valid.iter().map(|resolved| &resolved.key).collect()
    }

    pub fn invalid_keys(&self) -> Vec<&RegistrationKey> {
        self.invalid.iter().map(|resolved| &resolved.key).collect()
    }

    pub fn is_valid(&self, key: &RegistrationKey) -> bool {
        self.valid.iter().any(|resolved| &resolved.key == key)
    }

    pub fn is_invalid(&self, key: &RegistrationKey) -> bool {
        self.invalid.iter().any(|resolved| &resolved.key == key)
    }

    pub fn get(&self, key: &RegistrationKey) -> Option<&ResolvedKey> {
        self.valid
            .iter()
            .chain(self.invalid.iter())
            .find(|resolved| &resolved.key == key)
    }
}

/// Keys touched during expansion, plus memoized results per key
#[derive(Default)]
struct Expansion {
    buffer: IndexSet<RegistrationKey>,
    expanded: HashMap<RegistrationKey, Vec<RegistrationKey>>,
}

impl Registry {
    /// Expand every variant reachable from the root, then validate
    ///
    /// Expansion is depth first: a dependency is expanded before its parent
    /// so that the parent can vary over the dependency's variants too. Once
    /// expanded the registry no longer accepts registrations.
    pub fn dag_resolution(&mut self) -> Result<Resolution, RegistryError> {
        self.check_registration_graph()?;

        let mut expansion = Expansion::default();
        let root = self.graph.root().clone();
        let mut pending = self.graph.successors(&root);

        // A dependency on a variant key exists only once its base has been
        // expanded, so such subtrees are retried until no progress is made
        loop {
            let attempted = pending.len();
            let mut deferred = Vec::new();
            let mut missing = None;
            for key in pending {
                match self.expand_node(&key, &mut expansion) {
                    Ok(_) => {}
                    Err(RegistryError::NotRegistered(target)) => {
                        debug!("Deferring {}: {} is not registered yet", key, target);
                        deferred.push(key);
                        missing = Some(target);
                    }
                    Err(err) => return Err(err),
                }
            }
            match missing {
                None => break,
                Some(target) if deferred.len() == attempted => {
                    return Err(RegistryError::NotRegistered(target));
                }
                Some(_) => pending = deferred,
            }
        }

        self.state = RegistryState::Expanded;
        info!(
            "Registry expanded: {} keys to validate",
            expansion.buffer.len()
        );

        let mut resolution = Resolution::default();
        for mut key in expansion.buffer {
            let unresolved = self.retrieve_configuration(&key)?;
            let pre_result = unresolved.pre_validate(false)?;
            let (result, values) = if pre_result.passed {
                let built = self.build_configuration(&key)?;
                (built.validate(false)?, built.to_value_dict())
            } else {
                (pre_result, unresolved.to_value_dict())
            };

            if result.passed {
                resolution.valid.push(ResolvedKey { key, values });
            } else {
                if let Some(message) = &result.error_message {
                    key.set_metadata(message.clone());
                }
                debug!("Invalid key {}: {:?}", key, result.error_message);
                resolution.invalid.push(ResolvedKey { key, values });
            }
        }

        info!(
            "Resolution complete: {} valid, {} invalid",
            resolution.valid.len(),
            resolution.invalid.len()
        );
        Ok(resolution)
    }

    fn expand_node(
        &mut self,
        key: &RegistrationKey,
        expansion: &mut Expansion,
    ) -> Result<Vec<RegistrationKey>, RegistryError> {
        if let Some(variant_keys) = expansion.expanded.get(key) {
            return Ok(variant_keys.clone());
        }

        let info = self.retrieve_configuration_info(key)?.clone();
        let mut config = info.build()?;

        // Fold the variants of every dependency into the parent's own variants
        let dependencies: Vec<(String, Vec<RegistrationKey>)> = config
            .dependencies()
            .map(|param| {
                let targets = param
                    .value
                    .as_key()
                    .into_iter()
                    .chain(param.variants.iter().filter_map(Value::as_key))
                    .cloned()
                    .collect();
                (param.name.clone(), targets)
            })
            .collect();

        for (name, targets) in dependencies {
            let mut child_variants = Vec::new();
            for target in &targets {
                child_variants.extend(self.expand_node(target, expansion)?);
            }
            if let Some(param) = config.get_mut(&name) {
                for child_variant in child_variants {
                    let value = Value::Key(child_variant);
                    if !param.variants.contains(&value) {
                        param.variants.push(value);
                    }
                }
            }
        }

        let mut variant_keys = Vec::new();
        for variant in config.variants() {
            let variant_config = config.delta_copy(variant.as_values())?;
            if variant_config == config {
                continue;
            }

            let variant_key = key.from_variant(&variant)?;
            self.graph.add_edge(key, &variant_key, EdgeKind::Variant);

            if !self.in_registry(&variant_key) {
                let mut registration = Registration::new(
                    info.config_class.clone(),
                    variant_key.name(),
                    variant_key.namespace(),
                )
                .tags(variant_key.tags().iter().cloned())
                .build_recursively(info.build_recursively);
                registration.constructor = Some(info.constructor.clone());
                registration.component_class = info.component_class.clone();
                registration.description = key.description().map(str::to_string);
                self.register_configuration_from_variant(registration, variant.as_values())?;
            }
            variant_keys.push(variant_key);
        }

        debug!("Expanded {} into {} variants", key, variant_keys.len());
        expansion.buffer.insert(key.clone());
        expansion.buffer.extend(variant_keys.iter().cloned());
        expansion.expanded.insert(key.clone(), variant_keys.clone());
        Ok(variant_keys)
    }
}
