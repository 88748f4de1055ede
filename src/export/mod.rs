//! Paginated document export.
//!
//! - `layout`: page geometry and the pagination pass
//! - `wrap`: greedy body wrapping
//! - `render`: turning a laid-out document into bytes
//!
//! The engine performs no escaping of its own; text must already have been
//! through [`crate::sanitize::sanitize`]. [`ExportEngine::export_form`] does
//! that for form answers.

pub mod layout;
pub mod render;
pub mod wrap;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::ExportError;
use crate::sanitize::{FormData, SanitizeOptions, sanitize};

pub use layout::{LayoutConfig, Page, PageItem, PaginatedDocument, TextStyle, paginate};
pub use render::{DocumentRenderer, JsonRenderer, RenderFormat, TextRenderer, write_rendered};

/// Default running footer label.
pub const DEFAULT_PRODUCT_LABEL: &str = "Design Thinking Toolkit";

/// Sanitize limit applied to exported answers.
pub const DEFAULT_EXPORT_MAX_LENGTH: usize = 5_000;

/// One labelled block of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub label: String,
    #[serde(default)]
    pub body: String,
}

impl Section {
    pub fn new(label: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            body: body.into(),
        }
    }
}

/// A title and its sections in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Document {
    pub fn new(title: impl Into<String>, sections: Vec<Section>) -> Self {
        Self {
            title: title.into(),
            sections,
        }
    }

    /// One section per form entry, in form order, keyed by the field name.
    pub fn from_form(title: impl Into<String>, form: &FormData) -> Self {
        let sections = form
            .iter()
            .map(|(key, value)| Section::new(key, value.display_text()))
            .collect();
        Self::new(title, sections)
    }

    /// Run the title, every label and every body through [`sanitize`].
    fn sanitized(self, options: &SanitizeOptions) -> Self {
        let sections = self
            .sections
            .into_iter()
            .map(|section| Section::new(sanitize(&section.label, options), sanitize(&section.body, options)))
            .collect();
        Self::new(sanitize(&self.title, options), sections)
    }
}

/// `[export]` configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Running label printed in every footer
    #[serde(default = "default_product_label")]
    pub product_label: String,
    /// Sanitize limit for exported answers
    #[serde(default = "default_export_max_length")]
    pub max_length: usize,
    #[serde(flatten)]
    pub layout: LayoutConfig,
}

fn default_product_label() -> String {
    DEFAULT_PRODUCT_LABEL.to_string()
}

fn default_export_max_length() -> usize {
    DEFAULT_EXPORT_MAX_LENGTH
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            product_label: default_product_label(),
            max_length: default_export_max_length(),
            layout: LayoutConfig::default(),
        }
    }
}

/// Lays documents out onto pages.
#[derive(Debug, Clone, Default)]
pub struct ExportEngine {
    config: ExportConfig,
    date: Option<NaiveDate>,
}

impl ExportEngine {
    pub fn new(config: ExportConfig) -> Self {
        Self { config, date: None }
    }

    /// Stamp footers with `date` instead of today's local date.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    fn footer_date(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Lay out an already-sanitized document.
    pub fn export_document(&self, document: &Document) -> Result<PaginatedDocument, ExportError> {
        let paginated = paginate(
            document,
            &self.config.layout,
            &self.config.product_label,
            self.footer_date(),
        )?;

        tracing::info!(
            title = %document.title,
            sections = document.sections.len(),
            pages = paginated.page_count(),
            "Exported document"
        );
        Ok(paginated)
    }

    /// Sanitize a form's answers and lay them out under `title`.
    pub fn export_form(&self, title: &str, form: &FormData) -> Result<PaginatedDocument, ExportError> {
        let options = SanitizeOptions::default().with_max_length(self.config.max_length);
        let document = Document::from_form(title, form).sanitized(&options);
        self.export_document(&document)
    }
}
