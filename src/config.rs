//! Configuration for dtkit.
//!
//! Settings are read from `dtkit.toml` in the project directory and layered
//! file → environment → CLI.
//!
//! # Configuration File Format
//!
//! ```toml
//! [sanitize]
//! max_length = 10000
//! allow_html = false
//! trim_whitespace = true
//!
//! [export]
//! product_label = "Design Thinking Toolkit"
//! max_length = 5000
//! page_width = 210.0
//! line_height = 6.0
//!
//! [catalog]
//! path = "phases.json"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::export::ExportConfig;
use crate::phase::{PhaseCatalog, load_catalog_or_default};
use crate::sanitize::SanitizeOptions;

/// Name of the configuration file inside the project directory.
pub const CONFIG_FILE_NAME: &str = "dtkit.toml";

/// Overrides `catalog.path`.
pub const ENV_CATALOG: &str = "DTKIT_CATALOG";

/// Overrides `export.product_label`.
pub const ENV_PRODUCT_LABEL: &str = "DTKIT_PRODUCT_LABEL";

/// `[catalog]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSection {
    /// JSON catalog file; the built-in workflow is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Contents of `dtkit.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DtkitToml {
    #[serde(default)]
    pub sanitize: SanitizeOptions,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub catalog: CatalogSection,
}

impl DtkitToml {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse dtkit.toml")
    }

    /// Load `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_toml()?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize dtkit.toml")
    }

    /// Apply environment overrides. `lookup` is `std::env::var` outside tests.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup(ENV_CATALOG).filter(|v| !v.trim().is_empty()) {
            self.catalog.path = Some(PathBuf::from(path));
        }
        if let Some(label) = lookup(ENV_PRODUCT_LABEL).filter(|v| !v.trim().is_empty()) {
            self.export.product_label = label;
        }
    }

    /// Validate the configuration and return any warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.sanitize.max_length == 0 {
            warnings.push("sanitize.max_length is 0: every answer will be emptied".to_string());
        }
        if self.export.max_length == 0 {
            warnings.push("export.max_length is 0: exported answers will be empty".to_string());
        }
        if self.export.product_label.trim().is_empty() {
            warnings.push("export.product_label is empty".to_string());
        }
        if let Err(e) = self.export.layout.validate() {
            warnings.push(e.to_string());
        }
        if let Some(path) = &self.catalog.path
            && path.as_os_str().is_empty()
        {
            warnings.push("catalog.path is set but empty".to_string());
        }

        warnings
    }
}

/// Resolved configuration.
///
/// It merges settings from:
/// 1. dtkit.toml file
/// 2. Environment variables
/// 3. CLI arguments
#[derive(Debug, Clone)]
pub struct DtkitConfig {
    /// Path to the project directory
    pub project_dir: PathBuf,
    /// Path the configuration was (or would be) read from
    pub config_path: PathBuf,
    /// Effective settings
    pub toml: DtkitToml,
}

impl DtkitConfig {
    /// Resolve configuration for `project_dir`, reading `config_path` when
    /// given and `<project_dir>/dtkit.toml` otherwise.
    pub fn new(project_dir: PathBuf, config_path: Option<PathBuf>) -> Result<Self> {
        let project_dir = project_dir
            .canonicalize()
            .with_context(|| format!("Failed to resolve project directory: {}", project_dir.display()))?;

        let (config_path, toml) = match config_path {
            Some(path) => {
                let toml = DtkitToml::load(&path)?;
                (path, toml)
            }
            None => {
                let path = project_dir.join(CONFIG_FILE_NAME);
                let toml = DtkitToml::load_or_default(&path)?;
                (path, toml)
            }
        };

        let mut config = Self {
            project_dir,
            config_path,
            toml,
        };
        config.toml.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn sanitize_options(&self) -> SanitizeOptions {
        self.toml.sanitize
    }

    pub fn export_config(&self) -> &ExportConfig {
        &self.toml.export
    }

    /// Catalog path, resolved against the project directory.
    pub fn catalog_path(&self) -> Option<PathBuf> {
        self.toml.catalog.path.as_ref().map(|p| {
            if p.is_absolute() {
                p.clone()
            } else {
                self.project_dir.join(p)
            }
        })
    }

    /// Load the configured catalog, or the built-in one.
    pub fn load_catalog(&self) -> Result<PhaseCatalog> {
        let path = self.catalog_path();
        load_catalog_or_default(path.as_deref()).context("Failed to load phase catalog")
    }

    pub fn validate(&self) -> Vec<String> {
        self.toml.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_parse_empty() {
        let toml = DtkitToml::parse("").unwrap();
        assert_eq!(toml, DtkitToml::default());
        assert_eq!(toml.sanitize.max_length, 10_000);
        assert!(!toml.sanitize.allow_html);
        assert!(toml.sanitize.trim_whitespace);
        assert_eq!(toml.export.max_length, 5000);
        assert!(toml.catalog.path.is_none());
    }

    #[test]
    fn test_parse_sections() {
        let content = r#"
[sanitize]
max_length = 300
allow_html = true

[export]
product_label = "Acme Labs"
margin = 15.0
page_bottom_limit = 260.0

[catalog]
path = "phases.json"
"#;
        let toml = DtkitToml::parse(content).unwrap();
        assert_eq!(toml.sanitize.max_length, 300);
        assert!(toml.sanitize.allow_html);
        assert!(toml.sanitize.trim_whitespace);
        assert_eq!(toml.export.product_label, "Acme Labs");
        assert_eq!(toml.export.layout.margin, 15.0);
        assert_eq!(toml.export.layout.page_bottom_limit, 260.0);
        assert_eq!(toml.export.layout.line_height, 6.0);
        assert_eq!(toml.catalog.path, Some(PathBuf::from("phases.json")));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(DtkitToml::parse("[sanitize]\nmax_length = \"many\"").is_err());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let mut toml = DtkitToml::default();
        toml.export.product_label = "Acme".into();
        toml.sanitize.max_length = 42;

        toml.save(&path).unwrap();
        let loaded = DtkitToml::load(&path).unwrap();

        assert_eq!(loaded, toml);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempdir().unwrap();
        let toml = DtkitToml::load_or_default(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(toml, DtkitToml::default());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_CATALOG, "/tmp/custom.json"),
            (ENV_PRODUCT_LABEL, "Taller DT"),
        ]);
        let mut toml = DtkitToml::default();

        toml.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(toml.catalog.path, Some(PathBuf::from("/tmp/custom.json")));
        assert_eq!(toml.export.product_label, "Taller DT");
    }

    #[test]
    fn test_blank_env_values_are_ignored() {
        let mut toml = DtkitToml::default();
        toml.apply_env(|_| Some("  ".to_string()));
        assert!(toml.catalog.path.is_none());
        assert_eq!(toml.export.product_label, "Design Thinking Toolkit");
    }

    #[test]
    fn test_validate_default_is_clean() {
        assert!(DtkitToml::default().validate().is_empty());
    }

    #[test]
    fn test_validate_reports_problems() {
        let mut toml = DtkitToml::default();
        toml.export.layout.margin = 200.0;
        toml.export.max_length = 0;

        let warnings = toml.validate();

        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().any(|w| w.contains("export.max_length")));
        assert!(warnings.iter().any(|w| w.contains("Invalid page layout")));
    }

    #[test]
    fn test_config_reads_project_file() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[sanitize]\nmax_length = 12\n",
        )
        .unwrap();

        let config = DtkitConfig::new(dir.path().to_path_buf(), None).unwrap();

        assert_eq!(config.sanitize_options().max_length, 12);
        assert_eq!(config.config_path, config.project_dir.join(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_explicit_config_path_must_exist() {
        let dir = tempdir().unwrap();
        let result = DtkitConfig::new(dir.path().to_path_buf(), Some(dir.path().join("missing.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_catalog_path_is_resolved_against_project() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[catalog]\npath = \"flows/phases.json\"\n",
        )
        .unwrap();

        let mut config = DtkitConfig::new(dir.path().to_path_buf(), None).unwrap();
        // Ignore whatever the environment running the tests carries.
        config.toml.catalog.path = Some(PathBuf::from("flows/phases.json"));

        assert_eq!(
            config.catalog_path(),
            Some(config.project_dir.join("flows/phases.json"))
        );
    }

    #[test]
    fn test_load_catalog_defaults_to_builtin() {
        let dir = tempdir().unwrap();
        let mut config = DtkitConfig::new(dir.path().to_path_buf(), None).unwrap();
        config.toml.catalog.path = None;

        let catalog = config.load_catalog().unwrap();

        assert_eq!(catalog.len(), 7);
        assert_eq!(catalog.first().id, "context");
    }
}
