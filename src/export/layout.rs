//! Page geometry and the pagination algorithm.
//!
//! Units are abstract (millimetres with the default A4 geometry). The
//! vertical cursor starts at `top_start` on every page; a body line is moved
//! to a fresh page when the cursor has passed `page_bottom_limit`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Document;
use super::wrap::wrap_body;
use crate::errors::ExportError;

/// Page geometry and vertical rhythm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_page_width")]
    pub page_width: f64,
    #[serde(default = "default_page_height")]
    pub page_height: f64,
    #[serde(default = "default_margin")]
    pub margin: f64,
    /// Cursor position at the top of every page
    #[serde(default = "default_top_start")]
    pub top_start: f64,
    /// Cursor position past which the next body line goes to a new page
    #[serde(default = "default_page_bottom_limit")]
    pub page_bottom_limit: f64,
    /// Space reserved below the document title
    #[serde(default = "default_title_block_height")]
    pub title_block_height: f64,
    /// Space below the separator rule
    #[serde(default = "default_separator_gap")]
    pub separator_gap: f64,
    /// Advance after a section label
    #[serde(default = "default_label_height")]
    pub label_height: f64,
    /// Advance after a body line
    #[serde(default = "default_line_height")]
    pub line_height: f64,
    /// Extra space after each section
    #[serde(default = "default_section_gap")]
    pub section_gap: f64,
    /// Footer baseline distance from the page bottom
    #[serde(default = "default_footer_offset")]
    pub footer_offset: f64,
    /// Average glyph advance used to turn the usable width into columns
    #[serde(default = "default_char_width")]
    pub char_width: f64,
}

fn default_page_width() -> f64 {
    210.0
}

fn default_page_height() -> f64 {
    297.0
}

fn default_margin() -> f64 {
    20.0
}

fn default_top_start() -> f64 {
    30.0
}

fn default_page_bottom_limit() -> f64 {
    270.0
}

fn default_title_block_height() -> f64 {
    20.0
}

fn default_separator_gap() -> f64 {
    15.0
}

fn default_label_height() -> f64 {
    8.0
}

fn default_line_height() -> f64 {
    6.0
}

fn default_section_gap() -> f64 {
    10.0
}

fn default_footer_offset() -> f64 {
    15.0
}

fn default_char_width() -> f64 {
    2.1
}

/// Horizontal distance of the date stamp from the right margin.
const DATE_STAMP_WIDTH: f64 = 30.0;

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_width: default_page_width(),
            page_height: default_page_height(),
            margin: default_margin(),
            top_start: default_top_start(),
            page_bottom_limit: default_page_bottom_limit(),
            title_block_height: default_title_block_height(),
            separator_gap: default_separator_gap(),
            label_height: default_label_height(),
            line_height: default_line_height(),
            section_gap: default_section_gap(),
            footer_offset: default_footer_offset(),
            char_width: default_char_width(),
        }
    }
}

impl LayoutConfig {
    /// `page_width - 2 * margin`.
    pub fn usable_width(&self) -> f64 {
        self.page_width - 2.0 * self.margin
    }

    /// Number of text columns that fit in the usable width.
    pub fn columns(&self) -> usize {
        (self.usable_width() / self.char_width).floor().max(1.0) as usize
    }

    /// Baseline of the footer.
    pub fn footer_y(&self) -> f64 {
        self.page_height - self.footer_offset
    }

    /// Reject geometry that cannot produce a sensible layout.
    pub fn validate(&self) -> Result<(), ExportError> {
        let positive = [
            ("page_width", self.page_width),
            ("page_height", self.page_height),
            ("line_height", self.line_height),
            ("char_width", self.char_width),
            ("page_bottom_limit", self.page_bottom_limit),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ExportError::InvalidLayout(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        let non_negative = [
            ("margin", self.margin),
            ("top_start", self.top_start),
            ("title_block_height", self.title_block_height),
            ("separator_gap", self.separator_gap),
            ("label_height", self.label_height),
            ("section_gap", self.section_gap),
            ("footer_offset", self.footer_offset),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ExportError::InvalidLayout(format!(
                    "{} must not be negative, got {}",
                    name, value
                )));
            }
        }

        if self.usable_width() < self.char_width {
            return Err(ExportError::InvalidLayout(format!(
                "margins of {} leave no usable width on a page {} wide",
                self.margin, self.page_width
            )));
        }
        if self.page_bottom_limit <= self.top_start {
            return Err(ExportError::InvalidLayout(format!(
                "page_bottom_limit ({}) must be below top_start ({})",
                self.page_bottom_limit, self.top_start
            )));
        }
        if self.page_bottom_limit > self.page_height {
            return Err(ExportError::InvalidLayout(format!(
                "page_bottom_limit ({}) is past the page height ({})",
                self.page_bottom_limit, self.page_height
            )));
        }
        Ok(())
    }
}

/// Visual role of a placed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextStyle {
    Title,
    Label,
    Body,
    Footer,
}

/// Something drawn on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageItem {
    Text {
        x: f64,
        y: f64,
        style: TextStyle,
        text: String,
    },
    /// Horizontal rule
    Rule { x1: f64, x2: f64, y: f64 },
}

impl PageItem {
    pub fn text(&self) -> Option<&str> {
        match self {
            PageItem::Text { text, .. } => Some(text),
            PageItem::Rule { .. } => None,
        }
    }

    pub fn style(&self) -> Option<TextStyle> {
        match self {
            PageItem::Text { style, .. } => Some(*style),
            PageItem::Rule { .. } => None,
        }
    }

    pub fn y(&self) -> f64 {
        match self {
            PageItem::Text { y, .. } | PageItem::Rule { y, .. } => *y,
        }
    }
}

/// One laid-out page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// 1-based page number
    pub number: u32,
    pub items: Vec<PageItem>,
}

impl Page {
    fn new(number: u32) -> Self {
        Self {
            number,
            items: Vec::new(),
        }
    }

    /// Content text lines (title, labels, body) in placement order.
    pub fn lines(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter(|item| item.style().is_some_and(|s| s != TextStyle::Footer))
            .filter_map(PageItem::text)
            .collect()
    }

    /// Footer texts (running label and date stamp).
    pub fn footer(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter(|item| item.style() == Some(TextStyle::Footer))
            .filter_map(PageItem::text)
            .collect()
    }

    /// Lowest content baseline on the page.
    pub fn content_bottom(&self) -> Option<f64> {
        self.items
            .iter()
            .filter(|item| item.style() != Some(TextStyle::Footer))
            .map(PageItem::y)
            .fold(None, |acc: Option<f64>, y| Some(acc.map_or(y, |a| a.max(y))))
    }
}

/// A document laid out onto pages, footers included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedDocument {
    pub title: String,
    pub generated_on: NaiveDate,
    pub page_width: f64,
    pub page_height: f64,
    pub pages: Vec<Page>,
}

impl PaginatedDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Running footer label for page `page` of `total`.
pub fn footer_label(product_label: &str, page: u32, total: u32) -> String {
    format!("{} - Página {} de {}", product_label, page, total)
}

/// Date stamp in `d/m/yyyy` form.
pub fn date_stamp(date: NaiveDate) -> String {
    date.format("%-d/%-m/%Y").to_string()
}

/// Vertical cursor over a growing list of pages.
struct Cursor<'a> {
    config: &'a LayoutConfig,
    pages: Vec<Page>,
    y: f64,
}

impl<'a> Cursor<'a> {
    fn new(config: &'a LayoutConfig) -> Self {
        Self {
            config,
            pages: vec![Page::new(1)],
            y: config.top_start,
        }
    }

    fn page(&mut self) -> &mut Page {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn new_page(&mut self) {
        let number = self.pages.len() as u32 + 1;
        self.pages.push(Page::new(number));
        self.y = self.config.top_start;
    }

    fn text(&mut self, style: TextStyle, text: String) {
        let x = self.config.margin;
        let y = self.y;
        self.page().items.push(PageItem::Text { x, y, style, text });
    }

    fn rule(&mut self) {
        let (x1, x2, y) = (
            self.config.margin,
            self.config.page_width - self.config.margin,
            self.y,
        );
        self.page().items.push(PageItem::Rule { x1, x2, y });
    }

    fn advance(&mut self, dy: f64) {
        self.y += dy;
    }

    fn past_bottom(&self) -> bool {
        self.y > self.config.page_bottom_limit
    }
}

/// Lay `document` out onto pages and stamp every page's footer.
///
/// Labels are never wrapped and never trigger a page break; only body lines
/// do. The gap after a section is added without a break check.
pub fn paginate(
    document: &Document,
    config: &LayoutConfig,
    product_label: &str,
    date: NaiveDate,
) -> Result<PaginatedDocument, ExportError> {
    config.validate()?;

    let columns = config.columns();
    let mut cursor = Cursor::new(config);

    cursor.text(TextStyle::Title, document.title.clone());
    cursor.advance(config.title_block_height);
    cursor.rule();
    cursor.advance(config.separator_gap);

    for section in &document.sections {
        cursor.text(TextStyle::Label, format!("{}:", section.label));
        cursor.advance(config.label_height);

        for line in wrap_body(&section.body, columns) {
            if cursor.past_bottom() {
                cursor.new_page();
            }
            cursor.text(TextStyle::Body, line);
            cursor.advance(config.line_height);
        }

        cursor.advance(config.section_gap);
    }

    let mut pages = cursor.pages;
    stamp_footers(&mut pages, config, product_label, date);

    Ok(PaginatedDocument {
        title: document.title.clone(),
        generated_on: date,
        page_width: config.page_width,
        page_height: config.page_height,
        pages,
    })
}

/// Second pass: the total page count is final, so every footer can name it.
fn stamp_footers(pages: &mut [Page], config: &LayoutConfig, product_label: &str, date: NaiveDate) {
    let total = pages.len() as u32;
    let y = config.footer_y();
    let stamp = date_stamp(date);

    for page in pages.iter_mut() {
        if let Some(bottom) = page.content_bottom()
            && bottom >= y
        {
            tracing::warn!(page = page.number, bottom, footer_y = y, "Content runs into the footer");
        }
        page.items.push(PageItem::Text {
            x: config.margin,
            y,
            style: TextStyle::Footer,
            text: footer_label(product_label, page.number, total),
        });
        page.items.push(PageItem::Text {
            x: config.page_width - config.margin - DATE_STAMP_WIDTH,
            y,
            style: TextStyle::Footer,
            text: stamp.clone(),
        });
    }
}
