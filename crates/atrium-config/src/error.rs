//! Configuration error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment extraction or merge error.
    #[error("configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// A required configuration section is missing its required fields.
    #[error("configuration section '{section}' is missing required fields")]
    NotConfigured { section: String },

    /// A configuration field holds a value the system cannot use.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
