//! Rule-based validation of user text.
//!
//! Rules are attached per field by the caller; the checks themselves are
//! generic. The first failing check wins and failures are returned as data.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Shape constraints for a single field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationRule {
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(
        default,
        with = "pattern_serde",
        skip_serializing_if = "Option::is_none"
    )]
    pub pattern: Option<Regex>,
}

impl PartialEq for ValidationRule {
    fn eq(&self, other: &Self) -> bool {
        self.required == other.required
            && self.min_length == other.min_length
            && self.max_length == other.max_length
            && self.pattern.as_ref().map(Regex::as_str) == other.pattern.as_ref().map(Regex::as_str)
    }
}

impl ValidationRule {
    /// A rule that only requires a non-blank value.
    pub fn required() -> Self {
        Self {
            required: true,
            ..Default::default()
        }
    }

    pub fn with_min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn with_max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn with_pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Company name: 2..=200 characters.
    pub fn company() -> Self {
        Self::required().with_min_length(2).with_max_length(200)
    }

    /// Industry: 2..=100 characters.
    pub fn industry() -> Self {
        Self::required().with_min_length(2).with_max_length(100)
    }

    /// Free description: 10..=2000 characters.
    pub fn description() -> Self {
        Self::required().with_min_length(10).with_max_length(2000)
    }

    pub fn short_text() -> Self {
        Self::required().with_min_length(3).with_max_length(500)
    }

    pub fn long_text() -> Self {
        Self::required().with_min_length(10).with_max_length(5000)
    }

    pub fn name() -> Self {
        Self::required().with_min_length(2).with_max_length(100)
    }

    /// Optional e-mail address, at most 254 characters.
    pub fn email() -> Self {
        Self::default()
            .with_max_length(254)
            .with_pattern(EMAIL_REGEX.clone())
    }

    /// Look up a preset by name (`company`, `industry`, `description`,
    /// `short_text`, `long_text`, `name`, `email`).
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_lowercase().replace('-', "_").as_str() {
            "company" => Some(Self::company()),
            "industry" => Some(Self::industry()),
            "description" => Some(Self::description()),
            "short_text" | "shorttext" => Some(Self::short_text()),
            "long_text" | "longtext" => Some(Self::long_text()),
            "name" => Some(Self::name()),
            "email" => Some(Self::email()),
            _ => None,
        }
    }
}

/// Why a value failed its rule. Display text is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("Este campo es requerido")]
    Required,

    #[error("Debe tener al menos {min} caracteres")]
    TooShort { min: usize },

    #[error("No puede exceder {max} caracteres")]
    TooLong { max: usize },

    #[error("Formato inválido")]
    InvalidFormat,

    #[error("Selecciona al menos {min} opciones")]
    TooFewItems { min: usize },
}

/// Outcome of validating one value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    pub error: Option<ValidationError>,
}

impl Validation {
    pub fn ok() -> Self {
        Self { error: None }
    }

    pub fn fail(error: ValidationError) -> Self {
        Self { error: Some(error) }
    }

    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

/// Check `input` against `rule`.
///
/// Order: required-but-blank, blank-and-optional (passes), minimum length,
/// maximum length, pattern. Lengths count characters of the untrimmed input.
pub fn validate(input: &str, rule: &ValidationRule) -> Validation {
    let blank = input.trim().is_empty();

    if blank {
        return if rule.required {
            Validation::fail(ValidationError::Required)
        } else {
            Validation::ok()
        };
    }

    let len = input.chars().count();

    if let Some(min) = rule.min_length.filter(|&m| m > 0)
        && len < min
    {
        return Validation::fail(ValidationError::TooShort { min });
    }

    if let Some(max) = rule.max_length.filter(|&m| m > 0)
        && len > max
    {
        return Validation::fail(ValidationError::TooLong { max });
    }

    if let Some(pattern) = &rule.pattern
        && !pattern.is_match(input)
    {
        return Validation::fail(ValidationError::InvalidFormat);
    }

    Validation::ok()
}

mod pattern_serde {
    use regex::Regex;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(pattern: &Option<Regex>, s: S) -> Result<S::Ok, S::Error> {
        match pattern {
            Some(re) => s.serialize_some(re.as_str()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Regex>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        raw.map(|p| Regex::new(&p).map_err(serde::de::Error::custom))
            .transpose()
    }
}
