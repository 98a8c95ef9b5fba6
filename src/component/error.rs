//! Component errors

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ComponentError {
    #[error("Missing component argument: {0}")]
    MissingArgument(String),

    #[error("Invalid component argument {name}: expected {expected}, got {found}")]
    InvalidArgument {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Component {component} got unexpected arguments: {names:?}")]
    UnexpectedArguments {
        component: String,
        names: Vec<String>,
    },

    #[error("Component {0} is not runnable")]
    NotRunnable(String),

    #[error("Component failed: {0}")]
    Failed(String),
}
