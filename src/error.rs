//! Configuration error taxonomy for the validation engine.
//!
//! Validation failures are not errors: they are collected as messages on the
//! report. The variants here represent caller/configuration bugs that must
//! surface distinctly so they show up in testing instead of being swallowed
//! as passing checks.

use thiserror::Error;

/// A misconfigured rule detected while parsing or running a validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A rule's `type` named a validator that is not in the catalogue.
    /// Raised eagerly while parsing rule descriptors, never mid-pass.
    #[error("the validator '{0}' does not exist")]
    UnknownValidator(String),

    /// A zipcode rule asked for a country without a known zipcode length.
    #[error("unsupported country '{country}' for zipcode validation of field '{field}'")]
    UnsupportedCountry { field: String, country: String },

    /// A rule's cross-cutting `regex` pattern failed to compile.
    #[error("invalid regex pattern '{pattern}' for field '{field}'")]
    InvalidRegex { field: String, pattern: String },
}
