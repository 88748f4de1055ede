//! Workflow replay: `dtkit session`.
//!
//! Answers are submitted phase by phase in catalog order. The run stops at
//! the first phase without answers, with missing fields, or that is refused.
//! Nothing is persisted between invocations.

use anyhow::{Context, Result};
use indexmap::IndexMap;
use std::path::Path;
use std::sync::Arc;

use dtkit::config::DtkitConfig;
use dtkit::export::{ExportEngine, RenderFormat, write_rendered};
use dtkit::flow::FlowController;
use dtkit::sanitize::FormData;
use dtkit::submit::{SubmitOutcome, submit_phase};
use dtkit::ui::icons::{CHECK, CROSS, FILE_NEW, PROGRESS, SPARKLE, WARN};
use dtkit::ui::progress_bar;

fn load_answers(path: &Path) -> Result<IndexMap<String, FormData>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read answers file: {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| {
        format!(
            "Answers file must map phase ids to answer objects: {}",
            path.display()
        )
    })
}

/// Returns false when a phase was incomplete or refused.
pub fn cmd_session(
    config: &DtkitConfig,
    answers: &Path,
    output_dir: Option<&Path>,
    format: RenderFormat,
) -> Result<bool> {
    let catalog = Arc::new(config.load_catalog()?);
    let answers = load_answers(answers)?;

    for id in answers.keys().filter(|id| !catalog.contains(id)) {
        println!("{}Ignoring answers for unknown phase '{}'", WARN, id);
    }

    if let Some(dir) = output_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    }

    let options = config.sanitize_options();
    let engine = ExportEngine::new(config.export_config().clone());
    let renderer = format.renderer();
    let mut flow = FlowController::new(Arc::clone(&catalog));
    let mut success = true;

    println!();
    for (i, phase) in catalog.phases().iter().enumerate() {
        let Some(form) = answers.get(&phase.id) else {
            println!("{}No answers for '{}', stopping here", WARN, phase.id);
            break;
        };

        flow.select_phase(&phase.id);
        match submit_phase(&mut flow, &phase.id, form, &options) {
            SubmitOutcome::Accepted { form, .. } => {
                println!("{}{}. {}", CHECK, i + 1, phase.name);

                if let Some(dir) = output_dir {
                    let document = engine.export_form(&phase.name, &form)?;
                    let path = dir.join(format!("{:02}-{}.{}", i + 1, phase.id, renderer.extension()));
                    write_rendered(renderer.as_ref(), &document, &path)?;
                    println!("   {}{}", FILE_NEW, path.display());
                }
            }
            SubmitOutcome::Incomplete { issues } => {
                println!("{}{}. {} is incomplete:", CROSS, i + 1, phase.name);
                for issue in &issues {
                    println!("   - {}", issue);
                }
                success = false;
                break;
            }
            SubmitOutcome::Refused(refusal) => {
                println!("{}{}. {}: {}", CROSS, i + 1, phase.name, refusal);
                success = false;
                break;
            }
        }
    }

    if flow.state().is_not_started() {
        println!("{}No phase was started", WARN);
    }

    println!();
    println!(
        "{}{} {}% ({}/{} phases)",
        PROGRESS,
        progress_bar(flow.progress_ratio(), 20),
        flow.progress_percent(),
        flow.completed_count(),
        catalog.len()
    );
    if flow.is_done() {
        println!("{}All phases completed", SPARKLE);
    }
    println!();

    Ok(success)
}
