//! A whole case: three phases, an out-of-order attempt, completion and export.

use chrono::NaiveDate;
use dtkit::export::{
    Document, ExportConfig, ExportEngine, RenderFormat, Section, TextStyle, write_rendered,
};
use dtkit::flow::{FlowController, Refusal, Transition};
use dtkit::phase::{Phase, PhaseCatalog};
use dtkit::sanitize::{FieldRequirement, FormData, SanitizeOptions};
use dtkit::submit::{SubmitOutcome, submit_phase};
use std::sync::Arc;
use tempfile::tempdir;

fn abc() -> Arc<PhaseCatalog> {
    Arc::new(
        PhaseCatalog::new(vec![
            Phase::new("A", "Phase A"),
            Phase::new("B", "Phase B"),
            Phase::new("C", "Phase C"),
        ])
        .unwrap(),
    )
}

#[test]
fn test_case_flow_and_export() {
    let mut flow = FlowController::new(abc());

    // Selecting B before A is completed is refused and changes nothing.
    let t = flow.select_phase("B");
    assert_eq!(
        t,
        Transition::Refused(Refusal::Locked {
            phase: "B".into(),
            waiting_on: "A".into()
        })
    );
    assert!(flow.state().active_phase.is_none());

    flow.complete_phase("A");
    assert!(flow.is_available("B"));
    assert_eq!(flow.state().active_phase.as_deref(), Some("B"));

    let doc = ExportEngine::new(ExportConfig::default())
        .with_date(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap())
        .export_document(&Document::new(
            "Case",
            vec![Section::new("Notes", "x ".repeat(2000))],
        ))
        .unwrap();

    let n = doc.page_count();
    assert!(n >= 2);
    for (i, page) in doc.pages.iter().enumerate() {
        let footer = page.footer();
        assert_eq!(
            footer[0],
            format!("Design Thinking Toolkit - Página {} de {}", i + 1, n)
        );
        assert_eq!(footer[1], "18/10/2026");
    }

    // The body spans the break; the label only appears once.
    let labels: usize = doc
        .pages
        .iter()
        .flat_map(|p| p.items.iter())
        .filter(|item| item.style() == Some(TextStyle::Label))
        .count();
    assert_eq!(labels, 1);
}

#[test]
fn test_submitted_answers_reach_the_document_sanitized() {
    let catalog = Arc::new(
        PhaseCatalog::new(vec![
            Phase::new("context", "Contexto")
                .with_fields(vec![FieldRequirement::required("empresa")]),
            Phase::new("empathize", "Empatizar")
                .with_fields(vec![FieldRequirement::selection("tecnicas", 2)]),
        ])
        .unwrap(),
    );
    let mut flow = FlowController::new(catalog);
    let options = SanitizeOptions::default();

    let raw = FormData::new()
        .with("empresa", "<img src=x onerror=alert(1)>Acme \"Labs\"")
        .with("tecnicas", vec!["Entrevistas", "<b>Shadowing</b>"]);

    // Not yet available
    let early = submit_phase(&mut flow, "empathize", &raw, &options);
    assert!(matches!(early, SubmitOutcome::Refused(_)));

    let accepted = submit_phase(&mut flow, "context", &raw, &options);
    let SubmitOutcome::Accepted { form, .. } = accepted else {
        panic!("context should be accepted");
    };

    let engine = ExportEngine::new(ExportConfig::default())
        .with_date(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
    let doc = engine.export_form("Contexto", &form).unwrap();

    assert_eq!(
        doc.pages[0].lines(),
        vec![
            "Contexto",
            "empresa:",
            "Acme &quot;Labs&quot;",
            "tecnicas:",
            "Entrevistas, Shadowing",
        ]
    );

    let second = submit_phase(&mut flow, "empathize", &raw, &options);
    assert!(second.is_accepted());
    assert!(flow.is_done());
    assert_eq!(flow.progress_ratio(), 1.0);

    let dir = tempdir().unwrap();
    let path = dir.path().join("contexto.txt");
    write_rendered(RenderFormat::Text.renderer().as_ref(), &doc, &path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("Página 1 de 1"));
}
