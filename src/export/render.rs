//! Output formats for a laid-out document.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use super::layout::{PageItem, PaginatedDocument, TextStyle};
use crate::errors::ExportError;

/// Page separator in plain-text output.
const FORM_FEED: char = '\u{000C}';

/// Turns a [`PaginatedDocument`] into bytes.
pub trait DocumentRenderer {
    /// File extension for output written by this renderer, without the dot.
    fn extension(&self) -> &'static str;

    fn render(&self, document: &PaginatedDocument) -> Result<Vec<u8>, ExportError>;
}

/// Plain text, one page per form-feed separated block.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl TextRenderer {
    fn check_renderable(page: u32, text: &str) -> Result<(), ExportError> {
        match text.chars().find(|c| c.is_control() && *c != '\t') {
            Some(ch) => Err(ExportError::Unrenderable { page, ch }),
            None => Ok(()),
        }
    }
}

impl DocumentRenderer for TextRenderer {
    fn extension(&self) -> &'static str {
        "txt"
    }

    fn render(&self, document: &PaginatedDocument) -> Result<Vec<u8>, ExportError> {
        let mut out = String::new();

        for (i, page) in document.pages.iter().enumerate() {
            if i > 0 {
                out.push(FORM_FEED);
                out.push('\n');
            }

            let mut footer = Vec::new();
            for item in &page.items {
                match item {
                    PageItem::Text { style, text, .. } => {
                        Self::check_renderable(page.number, text)?;
                        match style {
                            TextStyle::Footer => footer.push(text.as_str()),
                            TextStyle::Title => {
                                out.push_str(text);
                                out.push('\n');
                            }
                            TextStyle::Label => {
                                out.push('\n');
                                out.push_str(text);
                                out.push('\n');
                            }
                            TextStyle::Body => {
                                out.push_str("  ");
                                out.push_str(text);
                                out.push('\n');
                            }
                        }
                    }
                    PageItem::Rule { .. } => {
                        out.push_str(&"-".repeat(40));
                        out.push('\n');
                    }
                }
            }

            if !footer.is_empty() {
                out.push('\n');
                out.push_str(&footer.join("    "));
                out.push('\n');
            }
        }

        Ok(out.into_bytes())
    }
}

/// The laid-out document as pretty JSON, positions included.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl DocumentRenderer for JsonRenderer {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn render(&self, document: &PaginatedDocument) -> Result<Vec<u8>, ExportError> {
        Ok(serde_json::to_vec_pretty(document)?)
    }
}

/// Selectable output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderFormat {
    #[default]
    Text,
    Json,
}

impl RenderFormat {
    pub fn renderer(self) -> Box<dyn DocumentRenderer> {
        match self {
            RenderFormat::Text => Box::new(TextRenderer),
            RenderFormat::Json => Box::new(JsonRenderer),
        }
    }
}

impl fmt::Display for RenderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderFormat::Text => write!(f, "text"),
            RenderFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for RenderFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(RenderFormat::Text),
            "json" => Ok(RenderFormat::Json),
            other => Err(format!("unknown format '{}' (expected text or json)", other)),
        }
    }
}

/// Render `document` and write it to `path`.
pub fn write_rendered(
    renderer: &dyn DocumentRenderer,
    document: &PaginatedDocument,
    path: &Path,
) -> Result<(), ExportError> {
    let bytes = renderer.render(document)?;
    std::fs::write(path, bytes).map_err(|source| ExportError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), pages = document.page_count(), "Wrote export");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{Document, ExportConfig, ExportEngine, Section};
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn paginated(document: &Document) -> PaginatedDocument {
        ExportEngine::new(ExportConfig::default())
            .with_date(NaiveDate::from_ymd_opt(2026, 2, 14).unwrap())
            .export_document(document)
            .unwrap()
    }

    fn sample() -> PaginatedDocument {
        paginated(&Document::new(
            "Caso Acme",
            vec![Section::new("Empresa", "Acme"), Section::new("Industria", "Retail")],
        ))
    }

    #[test]
    fn test_text_renderer_layout() {
        let out = String::from_utf8(TextRenderer.render(&sample()).unwrap()).unwrap();
        let expected = format!(
            "Caso Acme\n{}\n\nEmpresa:\n  Acme\n\nIndustria:\n  Retail\n\n\
             Design Thinking Toolkit - Página 1 de 1    14/2/2026\n",
            "-".repeat(40)
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn test_text_renderer_separates_pages() {
        let doc = paginated(&Document::new("Case", vec![Section::new("Notes", "x ".repeat(2000))]));
        let out = String::from_utf8(TextRenderer.render(&doc).unwrap()).unwrap();

        assert_eq!(out.matches(FORM_FEED).count(), doc.page_count() - 1);
        assert!(out.contains("Página 1 de 2"));
        assert!(out.contains("Página 2 de 2"));
    }

    #[test]
    fn test_text_renderer_rejects_control_characters() {
        let doc = paginated(&Document::new("Ti\u{7}tle", vec![]));
        let err = TextRenderer.render(&doc).unwrap_err();
        match err {
            ExportError::Unrenderable { page, ch } => {
                assert_eq!(page, 1);
                assert_eq!(ch, '\u{7}');
            }
            other => panic!("Expected Unrenderable, got {:?}", other),
        }
    }

    #[test]
    fn test_text_renderer_allows_tabs() {
        let doc = paginated(&Document::new("A\tB", vec![]));
        assert!(TextRenderer.render(&doc).is_ok());
    }

    #[test]
    fn test_text_renderer_accepts_crlf_answers() {
        let form = crate::sanitize::FormData::new().with("historia", "Primera línea\r\nSegunda línea");
        let doc = ExportEngine::new(ExportConfig::default())
            .with_date(NaiveDate::from_ymd_opt(2026, 2, 14).unwrap())
            .export_form("Caso", &form)
            .unwrap();

        assert_eq!(doc.pages[0].lines(), vec!["Caso", "historia:", "Primera línea", "Segunda línea"]);
        let out = String::from_utf8(TextRenderer.render(&doc).unwrap()).unwrap();
        assert!(out.contains("historia:\n  Primera línea\n  Segunda línea\n"));
        assert!(!out.contains('\r'));
    }

    #[test]
    fn test_json_renderer_round_trips() {
        let doc = sample();
        let bytes = JsonRenderer.render(&doc).unwrap();
        let back: PaginatedDocument = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(back, doc);

        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["pages"][0]["items"][0]["kind"], "text");
        assert_eq!(value["pages"][0]["items"][1]["kind"], "rule");
        assert_eq!(value["generated_on"], "2026-02-14");
    }

    #[test]
    fn test_render_format_parsing() {
        assert_eq!("json".parse::<RenderFormat>().unwrap(), RenderFormat::Json);
        assert_eq!("TXT".parse::<RenderFormat>().unwrap(), RenderFormat::Text);
        assert!("pdf".parse::<RenderFormat>().is_err());
        assert_eq!(RenderFormat::Json.renderer().extension(), "json");
    }

    #[test]
    fn test_write_rendered() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("caso.txt");

        write_rendered(&TextRenderer, &sample(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("Caso Acme\n"));
    }

    #[test]
    fn test_write_rendered_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("caso.txt");

        let err = write_rendered(&TextRenderer, &sample(), &path).unwrap_err();

        match err {
            ExportError::WriteFailed { path: p, .. } => assert_eq!(p, path),
            other => panic!("Expected WriteFailed, got {:?}", other),
        }
    }
}
