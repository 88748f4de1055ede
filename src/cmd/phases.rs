//! Catalog listing: `dtkit phases`.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

use dtkit::config::DtkitConfig;
use dtkit::flow::FlowController;
use dtkit::phase::load_catalog_or_default;
use dtkit::ui::{status_icon, styled_status};

pub fn cmd_phases(config: &DtkitConfig, catalog: Option<&Path>) -> Result<()> {
    let catalog = match catalog {
        Some(path) => load_catalog_or_default(Some(path))
            .with_context(|| format!("Failed to load phase catalog: {}", path.display()))?,
        None => config.load_catalog()?,
    };
    let flow = FlowController::new(Arc::new(catalog));

    println!();
    println!(
        "{:<4} {:<12} {:<28} {:<12} Fields",
        "#", "Id", "Name", "Status"
    );
    println!(
        "{:<4} {:<12} {:<28} {:<12} ------",
        "--", "----------", "----------------------------", "----------"
    );

    let rows = flow.overview();
    for row in &rows {
        let required = row.phase.fields.iter().filter(|f| f.rule.required).count();
        println!(
            "{:<4} {:<12} {:<28} {}{:<12} {} ({} required)",
            row.position,
            row.phase.id,
            row.phase.name,
            status_icon(row.status),
            styled_status(row.status),
            row.phase.fields.len(),
            required
        );
        if !row.phase.description.is_empty() {
            println!("     {}", console::style(&row.phase.description).dim());
        }
    }
    println!();
    let open = rows.iter().filter(|row| row.status.is_open()).count();
    println!("{} phases, {} open", flow.catalog().len(), open);
    println!();
    Ok(())
}
