//! Single-document export: `dtkit export`.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

use dtkit::config::DtkitConfig;
use dtkit::export::{ExportEngine, RenderFormat, write_rendered};
use dtkit::sanitize::FormData;
use dtkit::ui::icons::FILE_NEW;

/// Read a JSON answers object.
pub fn load_form(path: &Path) -> Result<FormData> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read answers file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Answers file must be a JSON object: {}", path.display()))
}

pub fn cmd_export(
    config: &DtkitConfig,
    title: &str,
    input: &Path,
    output: Option<&Path>,
    format: RenderFormat,
) -> Result<()> {
    let form = load_form(input)?;
    let engine = ExportEngine::new(config.export_config().clone());
    let document = engine.export_form(title, &form)?;
    let renderer = format.renderer();

    match output {
        Some(path) => {
            write_rendered(renderer.as_ref(), &document, path)?;
            println!(
                "{}Wrote {} page(s) to {}",
                FILE_NEW,
                document.page_count(),
                path.display()
            );
        }
        None => {
            let bytes = renderer.render(&document)?;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes).context("Failed to write to stdout")?;
            stdout.flush().context("Failed to write to stdout")?;
        }
    }
    Ok(())
}
