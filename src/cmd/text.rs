//! One-off text commands: `dtkit sanitize` and `dtkit validate`.

use anyhow::{Context, Result, anyhow};
use regex::Regex;
use std::io::Read;

use dtkit::config::DtkitConfig;
use dtkit::sanitize::{ValidationRule, sanitize, validate};
use dtkit::ui::icons::{CHECK, CROSS};

pub fn cmd_sanitize(
    config: &DtkitConfig,
    text: Option<String>,
    max_length: Option<usize>,
    allow_html: bool,
    keep_whitespace: bool,
) -> Result<()> {
    let text = match text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read text from stdin")?;
            buf
        }
    };

    let mut options = config.sanitize_options();
    if let Some(max) = max_length {
        options.max_length = max;
    }
    options.allow_html |= allow_html;
    if keep_whitespace {
        options.trim_whitespace = false;
    }

    println!("{}", sanitize(&text, &options));
    Ok(())
}

/// Rule flags for `dtkit validate`.
#[derive(Debug, Clone, Default)]
pub struct RuleArgs {
    pub preset: Option<String>,
    pub required: bool,
    pub min: Option<usize>,
    pub max: Option<usize>,
    pub pattern: Option<String>,
}

impl RuleArgs {
    pub fn to_rule(&self) -> Result<ValidationRule> {
        if let Some(name) = &self.preset {
            return ValidationRule::preset(name).ok_or_else(|| {
                anyhow!(
                    "Unknown preset '{}'. Valid values: company, industry, description, short_text, long_text, name, email",
                    name
                )
            });
        }

        let pattern = self
            .pattern
            .as_deref()
            .map(Regex::new)
            .transpose()
            .context("Invalid --pattern")?;

        Ok(ValidationRule {
            required: self.required,
            min_length: self.min,
            max_length: self.max,
            pattern,
        })
    }
}

/// Returns whether the text passed.
pub fn cmd_validate(text: &str, args: &RuleArgs) -> Result<bool> {
    let rule = args.to_rule()?;
    let result = validate(text, &rule);

    match &result.error {
        None => println!("{}Valid", CHECK),
        Some(error) => println!("{}{}", CROSS, error),
    }
    Ok(result.is_valid())
}
