//! Ambient utilities: environment lookup and logging setup

pub mod env;
pub mod logging;

pub use env::{env_bool, env_opt, env_or_default};
#[cfg(feature = "json-logging")]
pub use logging::init_json_logging;
pub use logging::{init_logging, init_logging_from_config};
