//! Input sanitization for free-form answers.
//!
//! `sanitize` turns untrusted text into a string that is safe to embed in a
//! generated document. The steps run in a fixed order:
//! 1. empty input short-circuits to an empty string
//! 2. leading/trailing whitespace is trimmed (`trim_whitespace`)
//! 3. markup tags `<...>` are stripped (unless `allow_html`)
//! 4. script-injection vectors are removed, case-insensitively
//! 5. `< > & " '` are escaped to entities
//! 6. the result is truncated to `max_length` characters
//!
//! Validation lives in [`validate`]; whole-form helpers live in [`form`].

pub mod form;
pub mod validate;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

pub use form::{FieldIssue, FieldRequirement, FormData, FormValue, check_requirements, sanitize_form_data};
pub use validate::{Validation, ValidationError, ValidationRule, validate};

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

static SCRIPT_SCHEME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)javascript:").unwrap());

static EVENT_HANDLER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)on\w+\s*=").unwrap());

static DATA_HTML_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)data:text/html").unwrap());

/// Entities produced by the escaping step. Existing occurrences are kept as-is.
const ENTITIES: [&str; 5] = ["&amp;", "&lt;", "&gt;", "&quot;", "&#x27;"];

/// Default character limit for a sanitized answer.
pub const DEFAULT_MAX_LENGTH: usize = 10_000;

/// Options controlling a single `sanitize` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizeOptions {
    /// Maximum length of the output, in characters
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    /// Keep markup tags instead of stripping them
    #[serde(default)]
    pub allow_html: bool,
    /// Trim leading and trailing whitespace
    #[serde(default = "default_trim_whitespace")]
    pub trim_whitespace: bool,
}

fn default_max_length() -> usize {
    DEFAULT_MAX_LENGTH
}

fn default_trim_whitespace() -> bool {
    true
}

impl Default for SanitizeOptions {
    fn default() -> Self {
        Self {
            max_length: default_max_length(),
            allow_html: false,
            trim_whitespace: default_trim_whitespace(),
        }
    }
}

impl SanitizeOptions {
    /// Same options with a different length limit.
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }
}

/// Sanitize a single piece of user text. Never fails.
pub fn sanitize(input: &str, options: &SanitizeOptions) -> String {
    if input.is_empty() {
        return String::new();
    }

    let mut text = if options.trim_whitespace {
        input.trim().to_string()
    } else {
        input.to_string()
    };

    if !options.allow_html {
        text = TAG_REGEX.replace_all(&text, "").into_owned();
    }

    let (stripped, removed) = strip_injection_vectors(&text);
    if removed > 0 {
        tracing::warn!(removed, "Removed script injection vectors from input");
    }

    let escaped = escape_entities(&stripped);
    let mut out = truncate_entity_safe(&escaped, options.max_length);

    if options.trim_whitespace {
        let trimmed = out.trim();
        if trimmed.len() != out.len() {
            out = trimmed.to_string();
        }
    }

    out
}

/// Remove script schemes, inline event handlers and HTML data URIs until
/// none remain. Returns the cleaned text and the number of removals.
fn strip_injection_vectors(text: &str) -> (String, usize) {
    let mut current = text.to_string();
    let mut removed = 0;

    loop {
        let mut changed = false;
        for re in [&*SCRIPT_SCHEME_REGEX, &*EVENT_HANDLER_REGEX, &*DATA_HTML_REGEX] {
            let hits = re.find_iter(&current).count();
            if hits > 0 {
                current = re.replace_all(&current, "").into_owned();
                removed += hits;
                changed = true;
            }
        }
        if !changed {
            return (current, removed);
        }
    }
}

/// Escape `< > & " '` to named entities without re-escaping entities that
/// are already present.
fn escape_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, ch) in text.char_indices() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '&' if starts_with_entity(&text[i..]) => out.push('&'),
            '&' => out.push_str("&amp;"),
            _ => out.push(ch),
        }
    }
    out
}

fn starts_with_entity(text: &str) -> bool {
    ENTITIES.iter().any(|e| text.starts_with(e))
}

/// Truncate to `max_chars` characters. A cut that would land inside an
/// entity drops the whole entity instead.
fn truncate_entity_safe(text: &str, max_chars: usize) -> String {
    let Some((cut, _)) = text.char_indices().nth(max_chars) else {
        return text.to_string();
    };

    let head = &text[..cut];
    if let Some(amp) = head.rfind('&') {
        let tail = &head[amp..];
        if !tail.contains(';') && starts_with_entity(&text[amp..]) {
            return head[..amp].to_string();
        }
    }
    head.to_string()
}
