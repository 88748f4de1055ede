//! Whole-form sanitization and requirement checks.
//!
//! A form is an ordered key → value mapping produced by the presentation
//! layer. Values are text, lists (e.g. selected techniques) or opaque JSON
//! that is passed through untouched.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::validate::{ValidationError, ValidationRule, validate};
use super::{SanitizeOptions, sanitize};

/// A single form value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Text(String),
    List(Vec<serde_json::Value>),
    Other(serde_json::Value),
}

impl FormValue {
    /// Apply `sanitize` to the string-bearing parts of this value.
    ///
    /// Only direct string elements of a list are sanitized; nested lists and
    /// other JSON values are left as they are.
    pub fn sanitized(&self, options: &SanitizeOptions) -> Self {
        match self {
            FormValue::Text(s) => FormValue::Text(sanitize(s, options)),
            FormValue::List(items) => FormValue::List(
                items
                    .iter()
                    .map(|item| match item {
                        serde_json::Value::String(s) => {
                            serde_json::Value::String(sanitize(s, options))
                        }
                        other => other.clone(),
                    })
                    .collect(),
            ),
            FormValue::Other(v) => FormValue::Other(v.clone()),
        }
    }

    /// Flatten the value into one line of text for export.
    pub fn display_text(&self) -> String {
        match self {
            FormValue::Text(s) => s.clone(),
            FormValue::List(items) => items
                .iter()
                .map(json_text)
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
            FormValue::Other(v) => json_text(v),
        }
    }

    /// Number of non-blank string entries in a list value.
    fn filled_items(&self) -> usize {
        match self {
            FormValue::List(items) => items
                .iter()
                .filter(|item| match item {
                    serde_json::Value::String(s) => !s.trim().is_empty(),
                    serde_json::Value::Null => false,
                    _ => true,
                })
                .count(),
            FormValue::Text(s) if !s.trim().is_empty() => 1,
            _ => 0,
        }
    }
}

fn json_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl From<&str> for FormValue {
    fn from(s: &str) -> Self {
        FormValue::Text(s.to_string())
    }
}

impl From<String> for FormValue {
    fn from(s: String) -> Self {
        FormValue::Text(s)
    }
}

impl From<Vec<&str>> for FormValue {
    fn from(items: Vec<&str>) -> Self {
        FormValue::List(
            items
                .into_iter()
                .map(|s| serde_json::Value::String(s.to_string()))
                .collect(),
        )
    }
}

/// Ordered key → value form contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData(IndexMap<String, FormValue>);

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<FormValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<FormValue>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&FormValue> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FormValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<FormValue>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Sanitize every string-bearing entry of `data`, returning a new form.
pub fn sanitize_form_data(data: &FormData, options: &SanitizeOptions) -> FormData {
    FormData(
        data.0
            .iter()
            .map(|(k, v)| (k.clone(), v.sanitized(options)))
            .collect(),
    )
}

/// What a phase form must contain for one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRequirement {
    pub key: String,
    #[serde(flatten)]
    pub rule: ValidationRule,
    /// Minimum number of selected entries for list-valued fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,
}

impl FieldRequirement {
    pub fn new(key: &str, rule: ValidationRule) -> Self {
        Self {
            key: key.to_string(),
            rule,
            min_items: None,
        }
    }

    /// Required non-blank text field.
    pub fn required(key: &str) -> Self {
        Self::new(key, ValidationRule::required())
    }

    /// Required list field with at least `min` entries.
    pub fn selection(key: &str, min: usize) -> Self {
        Self {
            key: key.to_string(),
            rule: ValidationRule::required(),
            min_items: Some(min),
        }
    }

    /// Check this requirement against the form. Missing keys count as empty.
    pub fn check(&self, form: &FormData) -> Option<ValidationError> {
        let value = form.get(&self.key);

        if let Some(min) = self.min_items {
            let filled = value.map(FormValue::filled_items).unwrap_or(0);
            if filled == 0 && self.rule.required {
                return Some(ValidationError::Required);
            }
            if filled < min {
                return Some(ValidationError::TooFewItems { min });
            }
            return None;
        }

        match value {
            Some(FormValue::Text(s)) => validate(s, &self.rule).error,
            Some(FormValue::Other(serde_json::Value::Null)) | None => {
                validate("", &self.rule).error
            }
            Some(other) => validate(&other.display_text(), &self.rule).error,
        }
    }
}

/// One field that failed its requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub key: String,
    pub error: ValidationError,
}

impl std::fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.key, self.error)
    }
}

/// Check every requirement and collect all failures, in requirement order.
pub fn check_requirements(form: &FormData, requirements: &[FieldRequirement]) -> Vec<FieldIssue> {
    requirements
        .iter()
        .filter_map(|req| {
            req.check(form).map(|error| FieldIssue {
                key: req.key.clone(),
                error,
            })
        })
        .collect()
}
