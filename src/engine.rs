//! Declarative rule engine
//!
//! Walks a `RuleSet` in declaration order, resolves each field's value,
//! dispatches to the validator catalogue and accumulates messages into a
//! `ValidationReport`. Value resolution goes through the injectable
//! `ValueSource` trait so the engine stays testable without a UI behind it.

use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock};

use itertools::Itertools;
use regex::Regex;

use crate::error::ConfigError;
use crate::rules::{FieldRule, RuleSet};
use crate::validators;

/// External collaborator supplying raw values for fields whose rules carry
/// no inline `value`.
pub trait ValueSource {
    /// Return the current raw value for a field identifier, or `None` when
    /// the source cannot supply one.
    fn resolve(&self, field: &str) -> Option<String>;
}

/// Source that never resolves anything; every rule must carry its value.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSource;

impl ValueSource for NoSource {
    fn resolve(&self, _field: &str) -> Option<String> {
        None
    }
}

impl ValueSource for HashMap<String, String> {
    fn resolve(&self, field: &str) -> Option<String> {
        self.get(field).cloned()
    }
}

impl<S: ValueSource + ?Sized> ValueSource for &S {
    fn resolve(&self, field: &str) -> Option<String> {
        (**self).resolve(field)
    }
}

/// Outcome of one validation pass. Immutable once produced; the caller owns
/// it outright and a re-run produces a fresh report.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    valid: bool,
    messages: Vec<String>,
    config_errors: Vec<ConfigError>,
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self {
            valid: true,
            messages: Vec::new(),
            config_errors: Vec::new(),
        }
    }
}

impl ValidationReport {
    /// Aggregate validity: logical AND over every per-field outcome.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Every message produced, in field declaration order and check order
    /// within a field. Duplicates are kept.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Configuration errors found during the pass (unsupported zipcode
    /// country, uncompilable regex). These mark the report invalid and are
    /// kept apart from the validation messages so misconfiguration is
    /// visible to callers as such.
    pub fn config_errors(&self) -> &[ConfigError] {
        &self.config_errors
    }

    /// All messages joined into a single line, for logging and display.
    pub fn summary(&self) -> String {
        self.messages.iter().join(" ")
    }

    fn fail(&mut self, message: String) {
        self.valid = false;
        self.messages.push(message);
    }

    fn fail_all(&mut self, messages: Vec<String>) {
        if !messages.is_empty() {
            self.valid = false;
            self.messages.extend(messages);
        }
    }

    fn config_failure(&mut self, error: ConfigError) {
        self.valid = false;
        self.config_errors.push(error);
    }
}

/// Field validation engine over a declarative `RuleSet`.
///
/// `validate` runs a full pass and returns the report; `is_valid` and
/// `messages` read the report of the most recent pass. Validation is never
/// run implicitly: before the first `validate` call the engine reports the
/// vacuous `true` with no messages.
pub struct ValidationEngine<S: ValueSource = NoSource> {
    rules: RuleSet,
    source: S,
    last: Option<ValidationReport>,
}

impl ValidationEngine<NoSource> {
    /// Engine over rules that all carry inline values.
    pub fn new(rules: RuleSet) -> Self {
        Self::with_source(rules, NoSource)
    }
}

impl<S: ValueSource> ValidationEngine<S> {
    /// Engine that resolves missing values through `source`.
    pub fn with_source(rules: RuleSet, source: S) -> Self {
        Self {
            rules,
            source,
            last: None,
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Mutable access to the rules, for adjusting values between passes.
    pub fn rules_mut(&mut self) -> &mut RuleSet {
        &mut self.rules
    }

    /// Run a full validation pass over every field in declaration order.
    ///
    /// The pass never aborts early: every field is checked and every
    /// message accumulated. The returned report also replaces the engine's
    /// stored last report, so `is_valid`/`messages` reflect this pass only.
    pub fn validate(&mut self) -> ValidationReport {
        let mut report = ValidationReport::default();
        for (id, rule) in self.rules.iter() {
            validate_field(&self.source, id, rule, &mut report);
        }
        self.last = Some(report.clone());
        report
    }

    /// Validity of the last pass; vacuously `true` before the first one.
    pub fn is_valid(&self) -> bool {
        self.last.as_ref().map_or(true, ValidationReport::is_valid)
    }

    /// Messages of the last pass; empty before the first one.
    pub fn messages(&self) -> &[String] {
        match &self.last {
            Some(report) => report.messages(),
            None => &[],
        }
    }
}

/// Validate one field into the report. The rule is never mutated; the
/// resolved value lives only for the duration of this call.
fn validate_field<S: ValueSource>(
    source: &S,
    id: &str,
    rule: &FieldRule,
    report: &mut ValidationReport,
) {
    let display = rule.name.as_deref().unwrap_or(id);

    let value = match rule.value.clone().or_else(|| source.resolve(id)) {
        Some(value) => value,
        None => {
            // Unresolvable fields fail loudly for that field only; the rest
            // of the pass still runs.
            log::warn!("no value could be resolved for field '{}'", id);
            report.fail(format!(
                "Cannot resolve a value for the field '{}'.",
                display
            ));
            return;
        }
    };

    if rule.presence && value.trim().is_empty() {
        report.fail(format!("The field '{}' is required.", display));
    }

    if value.is_empty() {
        return;
    }

    if let Some(kind) = rule.kind {
        match validators::dispatch(kind, display, &value, rule) {
            Ok(messages) => report.fail_all(messages),
            Err(error) => {
                log::error!("rule for field '{}' is misconfigured: {}", id, error);
                report.config_failure(error);
            }
        }
    }

    if let Some(pattern) = rule.regex.as_deref() {
        match cached_regex(pattern) {
            Some(regex) => {
                if !regex.is_match(&value) {
                    report.fail(format!(
                        "The field '{}' does not match the pattern.",
                        display
                    ));
                }
            }
            None => {
                let error = ConfigError::InvalidRegex {
                    field: id.to_string(),
                    pattern: pattern.to_string(),
                };
                log::error!("rule for field '{}' is misconfigured: {}", id, error);
                report.config_failure(error);
            }
        }
    }
}

/// Compile-once cache for the user-supplied cross-cutting patterns, so
/// repeated passes do not recompile. Patterns that fail to compile are not
/// cached; the caller turns them into a config error.
fn cached_regex(pattern: &str) -> Option<Regex> {
    static REGEX_CACHE: OnceLock<RwLock<HashMap<String, Regex>>> = OnceLock::new();

    let cache = REGEX_CACHE.get_or_init(|| RwLock::new(HashMap::new()));

    // The cache holds no invariant a panicked writer could break, so a
    // poisoned lock is simply recovered.
    if let Some(regex) = cache
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(pattern)
    {
        return Some(regex.clone());
    }

    let regex = Regex::new(pattern).ok()?;
    cache
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(pattern.to_string(), regex.clone());
    Some(regex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::ValidatorKind;

    #[test]
    fn test_rules_without_checks_are_vacuously_valid() {
        let rules = RuleSet::new()
            .field("a", FieldRule::new().value("anything"))
            .field("b", FieldRule::new().value(""));
        let mut engine = ValidationEngine::new(rules);

        let report = engine.validate();
        assert!(report.is_valid());
        assert!(report.messages().is_empty());
    }

    #[test]
    fn test_unvalidated_engine_reports_vacuous_results() {
        let rules = RuleSet::new().field("a", FieldRule::new().presence());
        let engine = ValidationEngine::new(rules);

        assert!(engine.is_valid());
        assert!(engine.messages().is_empty());
    }

    #[test]
    fn test_presence_failure_uses_display_name() {
        let rules = RuleSet::new().field(
            "first_name",
            FieldRule::new().value("").display_name("First name").presence(),
        );
        let mut engine = ValidationEngine::new(rules);

        let report = engine.validate();
        assert!(!report.is_valid());
        assert_eq!(
            report.messages(),
            ["The field 'First name' is required.".to_string()]
        );
    }

    #[test]
    fn test_type_and_regex_run_independently() {
        // Value passes the integer check but misses the pattern: only the
        // pattern message shows up.
        let rules = RuleSet::new().field(
            "code",
            FieldRule::new()
                .value("123")
                .kind(ValidatorKind::Integer)
                .regex("^9"),
        );
        let mut engine = ValidationEngine::new(rules);

        let report = engine.validate();
        assert!(!report.is_valid());
        assert_eq!(
            report.messages(),
            ["The field 'code' does not match the pattern.".to_string()]
        );
    }

    #[test]
    fn test_messages_keep_field_declaration_order() {
        let rules = RuleSet::new()
            .field("b_field", FieldRule::new().value("").presence())
            .field(
                "a_field",
                FieldRule::new().value("x1").kind(ValidatorKind::OnlyLetters),
            );
        let mut engine = ValidationEngine::new(rules);

        let report = engine.validate();
        assert_eq!(
            report.messages(),
            [
                "The field 'b_field' is required.".to_string(),
                "The field 'a_field' must have only letters.".to_string(),
            ]
        );
    }

    #[test]
    fn test_values_resolve_through_the_source() {
        let mut form = HashMap::new();
        form.insert("cep".to_string(), "09435-470".to_string());
        form.insert("document".to_string(), "11144477735".to_string());

        let rules = RuleSet::new()
            .field("cep", FieldRule::new().kind(ValidatorKind::Zipcode))
            .field("document", FieldRule::new().kind(ValidatorKind::Cpf));
        let mut engine = ValidationEngine::with_source(rules, form);

        let report = engine.validate();
        assert!(report.is_valid(), "{:?}", report.messages());
    }

    #[test]
    fn test_unresolvable_field_fails_without_aborting_the_pass() {
        let rules = RuleSet::new()
            .field("ghost", FieldRule::new().kind(ValidatorKind::Integer))
            .field(
                "age",
                FieldRule::new().value("abc").kind(ValidatorKind::Integer),
            );
        let mut engine = ValidationEngine::new(rules);

        let report = engine.validate();
        assert!(!report.is_valid());
        assert_eq!(
            report.messages(),
            [
                "Cannot resolve a value for the field 'ghost'.".to_string(),
                "The field 'age' must have only numbers.".to_string(),
            ]
        );
    }

    #[test]
    fn test_unsupported_country_surfaces_as_config_error() {
        let rules = RuleSet::new().field(
            "zip",
            FieldRule::new()
                .value("12345")
                .kind(ValidatorKind::Zipcode)
                .country("us"),
        );
        let mut engine = ValidationEngine::new(rules);

        let report = engine.validate();
        assert!(!report.is_valid());
        assert!(report.messages().is_empty());
        assert_eq!(
            report.config_errors(),
            [ConfigError::UnsupportedCountry {
                field: "zip".to_string(),
                country: "us".to_string(),
            }]
        );
    }

    #[test]
    fn test_invalid_pattern_surfaces_as_config_error() {
        let rules = RuleSet::new().field(
            "code",
            FieldRule::new().value("abc").regex("(unclosed"),
        );
        let mut engine = ValidationEngine::new(rules);

        let report = engine.validate();
        assert!(!report.is_valid());
        assert_eq!(
            report.config_errors(),
            [ConfigError::InvalidRegex {
                field: "code".to_string(),
                pattern: "(unclosed".to_string(),
            }]
        );
    }

    #[test]
    fn test_shared_pattern_is_reused_across_fields_and_passes() {
        // Both fields and both passes go through the compiled-pattern
        // cache; results stay identical on the cache-hit paths.
        let rules = RuleSet::new()
            .field("a", FieldRule::new().value("abc").regex("^[a-z]+$"))
            .field("b", FieldRule::new().value("123").regex("^[a-z]+$"));
        let mut engine = ValidationEngine::new(rules);

        for _ in 0..2 {
            let report = engine.validate();
            assert!(!report.is_valid());
            assert_eq!(
                report.messages(),
                ["The field 'b' does not match the pattern.".to_string()]
            );
            assert!(report.config_errors().is_empty());
        }
    }

    #[test]
    fn test_revalidation_drops_stale_messages() {
        let rules = RuleSet::new().field(
            "age",
            FieldRule::new().value("abc").kind(ValidatorKind::Integer),
        );
        let mut engine = ValidationEngine::new(rules);

        assert!(!engine.validate().is_valid());
        assert_eq!(engine.messages().len(), 1);

        if let Some(rule) = engine.rules_mut().get_mut("age") {
            rule.value = Some("42".to_string());
        }

        let report = engine.validate();
        assert!(report.is_valid());
        assert!(report.messages().is_empty());
        assert!(engine.is_valid());
        assert!(engine.messages().is_empty());
    }

    #[test]
    fn test_summary_joins_messages() {
        let rules = RuleSet::new()
            .field("a", FieldRule::new().value("").presence())
            .field("b", FieldRule::new().value("").presence());
        let mut engine = ValidationEngine::new(rules);

        let report = engine.validate();
        assert_eq!(
            report.summary(),
            "The field 'a' is required. The field 'b' is required."
        );
    }
}
