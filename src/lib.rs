//! # Fieldcheck
//!
//! Declarative field validation: a `RuleSet` maps field identifiers to rule
//! descriptors, a `ValidationEngine` walks the fields in declaration order
//! and collects human-readable messages into a `ValidationReport`.
//!
//! The validator catalogue covers format checks (integer, monetary value,
//! letters-only, person name, RFC-5322-style email), length and range
//! bounds, Brazilian zipcodes, and the CPF/CNPJ taxpayer-registry checksum
//! algorithms. Values either travel inline on the rules or are resolved
//! through an injectable [`ValueSource`], which keeps the engine usable far
//! away from any UI.
//!
//! ```
//! use fieldcheck::prelude::*;
//!
//! let rules = RuleSet::new()
//!     .field("name", FieldRule::new().value("José da Silva").kind(ValidatorKind::PersonName))
//!     .field("document", FieldRule::new().value("111.444.777-35").kind(ValidatorKind::CpfOrCnpj))
//!     .field("age", FieldRule::new().value("31").kind(ValidatorKind::Integer).gte(18.0));
//!
//! let mut engine = ValidationEngine::new(rules);
//! let report = engine.validate();
//! assert!(report.is_valid());
//! ```

pub mod engine;
pub mod error;
pub mod rules;
pub mod validators;

pub use engine::{NoSource, ValidationEngine, ValidationReport, ValueSource};
pub use error::ConfigError;
pub use rules::{FieldRule, RuleSet, ValidatorKind};

/// Common imports for working with the validation engine.
pub mod prelude {
    pub use crate::engine::{NoSource, ValidationEngine, ValidationReport, ValueSource};
    pub use crate::error::ConfigError;
    pub use crate::rules::{FieldRule, RuleSet, ValidatorKind};
}
