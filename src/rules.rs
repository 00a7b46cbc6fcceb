//! Declarative rule model
//!
//! Rule descriptors are plain data: a `RuleSet` maps field identifiers to
//! `FieldRule`s, and each rule names its validator through the `ValidatorKind`
//! tag. Descriptors can be built fluently in code or deserialized from JSON,
//! where the tag travels under the `type` key. Unknown validator names are
//! rejected while parsing, so they can never reach a validation pass.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_derive::{Deserialize as DeriveDeserialize, Serialize as DeriveSerialize};

use crate::error::ConfigError;

/// Enumerated tag naming a validator from the catalogue.
///
/// The string form is the descriptor name used in JSON rule documents
/// (`"integer"`, `"onlyLetters"`, `"cpfOrCnpj"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidatorKind {
    Integer,
    Money,
    OnlyLetters,
    NoSpecialCharacters,
    PersonName,
    Cpf,
    Cnpj,
    CpfOrCnpj,
    Email,
    Zipcode,
}

impl ValidatorKind {
    /// Every validator in the catalogue.
    pub const ALL: [ValidatorKind; 10] = [
        ValidatorKind::Integer,
        ValidatorKind::Money,
        ValidatorKind::OnlyLetters,
        ValidatorKind::NoSpecialCharacters,
        ValidatorKind::PersonName,
        ValidatorKind::Cpf,
        ValidatorKind::Cnpj,
        ValidatorKind::CpfOrCnpj,
        ValidatorKind::Email,
        ValidatorKind::Zipcode,
    ];

    /// The descriptor name of this validator.
    pub fn name(&self) -> &'static str {
        match self {
            ValidatorKind::Integer => "integer",
            ValidatorKind::Money => "money",
            ValidatorKind::OnlyLetters => "onlyLetters",
            ValidatorKind::NoSpecialCharacters => "noSpecialCharacters",
            ValidatorKind::PersonName => "personName",
            ValidatorKind::Cpf => "cpf",
            ValidatorKind::Cnpj => "cnpj",
            ValidatorKind::CpfOrCnpj => "cpfOrCnpj",
            ValidatorKind::Email => "email",
            ValidatorKind::Zipcode => "zipcode",
        }
    }
}

impl fmt::Display for ValidatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ValidatorKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ValidatorKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ConfigError::UnknownValidator(s.to_string()))
    }
}

impl Serialize for ValidatorKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for ValidatorKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(de::Error::custom)
    }
}

/// Validation rule descriptor for a single field.
///
/// Every part is optional; an empty rule always passes. Numeric bounds only
/// take effect with validators that parse the value to a number, string
/// bounds apply to the raw value's character count.
#[derive(Debug, Clone, Default, DeriveSerialize, DeriveDeserialize)]
#[serde(default)]
pub struct FieldRule {
    /// Inline raw input. When absent the engine asks its value source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Display name used in messages instead of the field identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Validator from the catalogue to run against the value.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ValidatorKind>,
    /// Pattern the raw value must match, independent of `kind`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    /// Require a non-blank value.
    pub presence: bool,
    /// Parsed value must be strictly greater than this bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gt: Option<f64>,
    /// Parsed value must be greater than or equal to this bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gte: Option<f64>,
    /// Parsed value must be strictly less than this bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lt: Option<f64>,
    /// Parsed value must be less than or equal to this bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lte: Option<f64>,
    /// Minimum character count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<usize>,
    /// Maximum character count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<usize>,
    /// Exact character count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exact: Option<usize>,
    /// Country for zipcode validation, defaults to `"br"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl FieldRule {
    /// Create an empty rule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the inline raw value.
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set the display name used in messages.
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the catalogue validator to run.
    pub fn kind(mut self, kind: ValidatorKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Set the cross-cutting regex pattern.
    pub fn regex(mut self, pattern: impl Into<String>) -> Self {
        self.regex = Some(pattern.into());
        self
    }

    /// Require a non-blank value.
    pub fn presence(mut self) -> Self {
        self.presence = true;
        self
    }

    /// Require the parsed value to be strictly greater than `bound`.
    pub fn gt(mut self, bound: f64) -> Self {
        self.gt = Some(bound);
        self
    }

    /// Require the parsed value to be at least `bound`.
    pub fn gte(mut self, bound: f64) -> Self {
        self.gte = Some(bound);
        self
    }

    /// Require the parsed value to be strictly less than `bound`.
    pub fn lt(mut self, bound: f64) -> Self {
        self.lt = Some(bound);
        self
    }

    /// Require the parsed value to be at most `bound`.
    pub fn lte(mut self, bound: f64) -> Self {
        self.lte = Some(bound);
        self
    }

    /// Require at least `len` characters.
    pub fn min(mut self, len: usize) -> Self {
        self.min = Some(len);
        self
    }

    /// Require at most `len` characters.
    pub fn max(mut self, len: usize) -> Self {
        self.max = Some(len);
        self
    }

    /// Require exactly `len` characters.
    pub fn exact(mut self, len: usize) -> Self {
        self.exact = Some(len);
        self
    }

    /// Set the zipcode country.
    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }
}

/// Ordered mapping from field identifiers to their validation rules.
///
/// Declaration order is preserved so message order stays deterministic; the
/// JSON representation is a plain object and keeps the document's key order
/// when deserialized. Inserting an identifier twice replaces the earlier
/// rule in place.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    fields: Vec<(String, FieldRule)>,
}

impl RuleSet {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field rule, fluent form.
    pub fn field(mut self, id: impl Into<String>, rule: FieldRule) -> Self {
        self.insert(id, rule);
        self
    }

    /// Add a field rule, replacing any earlier rule for the same identifier
    /// without changing its position.
    pub fn insert(&mut self, id: impl Into<String>, rule: FieldRule) {
        let id = id.into();
        if let Some(slot) = self.fields.iter_mut().find(|(key, _)| *key == id) {
            slot.1 = rule;
        } else {
            self.fields.push((id, rule));
        }
    }

    /// Look up the rule for a field identifier.
    pub fn get(&self, id: &str) -> Option<&FieldRule> {
        self.fields
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, rule)| rule)
    }

    /// Mutable lookup, for adjusting rule values between passes.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut FieldRule> {
        self.fields
            .iter_mut()
            .find(|(key, _)| key == id)
            .map(|(_, rule)| rule)
    }

    /// Iterate fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldRule)> {
        self.fields.iter().map(|(id, rule)| (id.as_str(), rule))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Parse a rule set from a JSON object of field id → rule descriptor.
    ///
    /// Fails on malformed documents and on unknown validator names, so a
    /// misspelled `type` is caught before any validation runs.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl FromIterator<(String, FieldRule)> for RuleSet {
    fn from_iter<I: IntoIterator<Item = (String, FieldRule)>>(iter: I) -> Self {
        let mut rules = RuleSet::new();
        for (id, rule) in iter {
            rules.insert(id, rule);
        }
        rules
    }
}

impl Serialize for RuleSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (id, rule) in &self.fields {
            map.serialize_entry(id, rule)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RuleSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RuleSetVisitor;

        impl<'de> Visitor<'de> for RuleSetVisitor {
            type Value = RuleSet;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of field identifiers to rule descriptors")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                // Entries land in encounter order, which is what keeps
                // message order deterministic.
                let mut rules = RuleSet::new();
                while let Some((id, rule)) = access.next_entry::<String, FieldRule>()? {
                    rules.insert(id, rule);
                }
                Ok(rules)
            }
        }

        deserializer.deserialize_map(RuleSetVisitor)
    }
}
