//! Configuration errors

use thiserror::Error;

use crate::configuration::condition::ValidationResult;

#[derive(Debug, Clone, Error)]
pub enum ConfigurationError {
    #[error("Parameter {0} already exists")]
    AlreadyExistingParameter(String),

    #[error("Cannot find any parameter with name {0}")]
    NonExistingParameter(String),

    #[error("The validation process has failed ({0})")]
    ValidationFailure(ValidationResult),
}
