//! Validator Catalogue
//!
//! Fixed set of pure field checks dispatched by `ValidatorKind`. Each
//! validator takes the field's display name, its raw value and the rule it
//! came from, and returns the failure messages it produced (empty means the
//! value passed). Format regexes are compiled once and cached.

mod documents;

pub use documents::{cnpj, cpf, cpf_or_cnpj};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ConfigError;
use crate::rules::{FieldRule, ValidatorKind};

/// Cached regex patterns for validation
static INTEGER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]*$").unwrap());
static MONEY_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\$?\d+(\.\d{3})*(,\d*)?$").unwrap());
static ONLY_LETTERS_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z]*$").unwrap());
static NO_SPECIAL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9a-zA-Z]*$").unwrap());
// Prefix match only: ASCII letters, the Latin-1 supplement letter range,
// whitespace, period, hyphen and apostrophe.
static PERSON_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[a-zA-ZÀ-ÿ\s.'-]+").unwrap());
// RFC-5322-style address pattern, carried over from the original message set.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)(?:[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*|"(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21\x23-\x5b\x5d-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])*")@(?:(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9](?:[a-z0-9-]*[a-z0-9])?|\[(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?|[a-z0-9-]*[a-z0-9]:(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21-\x5a\x53-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])+)\])"#,
    )
    .unwrap()
});

/// Run the catalogue validator named by `kind` against a resolved value.
///
/// This is the whole dispatch surface: the enumerated tag makes unknown
/// validator names unrepresentable here, they are rejected when the rule
/// descriptor is parsed. Only `zipcode` can report a configuration error.
pub fn dispatch(
    kind: ValidatorKind,
    field: &str,
    value: &str,
    rule: &FieldRule,
) -> Result<Vec<String>, ConfigError> {
    match kind {
        ValidatorKind::Integer => Ok(integer(field, value, rule)),
        ValidatorKind::Money => Ok(money(field, value, rule)),
        ValidatorKind::OnlyLetters => Ok(only_letters(field, value, rule)),
        ValidatorKind::NoSpecialCharacters => Ok(no_special_characters(field, value, rule)),
        ValidatorKind::PersonName => Ok(person_name(field, value, rule)),
        ValidatorKind::Cpf => Ok(cpf(field, value)),
        ValidatorKind::Cnpj => Ok(cnpj(field, value)),
        ValidatorKind::CpfOrCnpj => Ok(cpf_or_cnpj(field, value)),
        ValidatorKind::Email => Ok(email(field, value)),
        ValidatorKind::Zipcode => zipcode(field, value, rule),
    }
}

/// Evaluate the numeric bounds of a rule against an already parsed value.
///
/// Each bound is checked independently, there is no short-circuit: a value
/// violating several bounds accumulates one message per violated bound.
pub fn check_numeric_bounds(field: &str, value: f64, rule: &FieldRule) -> Vec<String> {
    let mut messages = Vec::new();

    if let Some(gt) = rule.gt {
        if value <= gt {
            messages.push(format!(
                "The field '{}' must be greater than {}.",
                field, gt
            ));
        }
    }

    if let Some(gte) = rule.gte {
        if value < gte {
            messages.push(format!(
                "The field '{}' must be greater than or equal to {}.",
                field, gte
            ));
        }
    }

    if let Some(lt) = rule.lt {
        if value >= lt {
            messages.push(format!("The field '{}' must be less than {}.", field, lt));
        }
    }

    if let Some(lte) = rule.lte {
        if value > lte {
            messages.push(format!(
                "The field '{}' must be less than or equal to {}.",
                field, lte
            ));
        }
    }

    messages
}

/// Evaluate the string length bounds of a rule against the raw value.
///
/// Lengths are counted in characters, not bytes. Like the numeric bounds,
/// min/max/exact are independent and never short-circuit.
pub fn check_string_bounds(field: &str, value: &str, rule: &FieldRule) -> Vec<String> {
    let len = value.chars().count();
    let mut messages = Vec::new();

    if let Some(min) = rule.min {
        if len < min {
            messages.push(format!(
                "The field '{}' must have at least {} characters.",
                field, min
            ));
        }
    }

    if let Some(max) = rule.max {
        if len > max {
            messages.push(format!(
                "The field '{}' must have up to {} characters.",
                field, max
            ));
        }
    }

    if let Some(exact) = rule.exact {
        if len != exact {
            messages.push(format!(
                "The field '{}' must have exactly {} characters.",
                field, exact
            ));
        }
    }

    messages
}

/// Digits only. Passing values are parsed and checked against the rule's
/// numeric bounds; a format failure yields exactly one message.
pub fn integer(field: &str, value: &str, rule: &FieldRule) -> Vec<String> {
    if !INTEGER_REGEX.is_match(value) {
        return vec![format!("The field '{}' must have only numbers.", field)];
    }

    // Digit-only input always parses; going through f64 sidesteps overflow
    // on long digit runs while keeping the bound comparisons uniform.
    match value.parse::<f64>() {
        Ok(parsed) => check_numeric_bounds(field, parsed, rule),
        Err(_) => Vec::new(),
    }
}

/// Monetary value with `.` as the thousands separator and `,` as the decimal
/// separator, optionally prefixed with `$`.
pub fn money(field: &str, value: &str, rule: &FieldRule) -> Vec<String> {
    if !MONEY_REGEX.is_match(value) {
        return vec![format!("The field '{}' is not a monetary value.", field)];
    }

    let normalized = value
        .trim_start_matches('$')
        .replace('.', "")
        .replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(parsed) => check_numeric_bounds(field, parsed, rule),
        Err(_) => Vec::new(),
    }
}

/// ASCII letters only, no spaces.
pub fn only_letters(field: &str, value: &str, rule: &FieldRule) -> Vec<String> {
    if !ONLY_LETTERS_REGEX.is_match(value) {
        return vec![format!("The field '{}' must have only letters.", field)];
    }
    check_string_bounds(field, value, rule)
}

/// ASCII letters and digits only, no spaces.
pub fn no_special_characters(field: &str, value: &str, rule: &FieldRule) -> Vec<String> {
    if !NO_SPECIAL_REGEX.is_match(value) {
        return vec![format!(
            "The field '{}' must have only letters and numbers.",
            field
        )];
    }
    check_string_bounds(field, value, rule)
}

/// Person name: letters (including accented Latin-1), whitespace, period,
/// hyphen and apostrophe.
pub fn person_name(field: &str, value: &str, rule: &FieldRule) -> Vec<String> {
    if !PERSON_NAME_REGEX.is_match(value) {
        return vec![format!("The field '{}' is not a person name.", field)];
    }
    check_string_bounds(field, value, rule)
}

/// RFC-5322-style email address.
pub fn email(field: &str, value: &str) -> Vec<String> {
    if !EMAIL_REGEX.is_match(value) {
        return vec![format!("The field '{}' is not a valid email.", field)];
    }
    Vec::new()
}

/// Zipcode for the rule's country (default `"br"`): non-digits are stripped
/// and the remaining digit count must match the country's zipcode length.
///
/// An unknown country is a configuration error, not a validation failure.
pub fn zipcode(field: &str, value: &str, rule: &FieldRule) -> Result<Vec<String>, ConfigError> {
    let country = rule.country.as_deref().unwrap_or("br");
    let expected_len = match country {
        // Example: 09435-470
        "br" => 8,
        _ => {
            return Err(ConfigError::UnsupportedCountry {
                field: field.to_string(),
                country: country.to_string(),
            })
        }
    };

    let digits = value.chars().filter(char::is_ascii_digit).count();
    if digits != expected_len {
        return Ok(vec![format!(
            "The field '{}' is not a valid zipcode.",
            field
        )]);
    }
    Ok(Vec::new())
}
