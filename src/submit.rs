//! Phase submission: check the form, sanitize it, complete the phase.
//!
//! The sanitized form is handed back to the caller; nothing is stored here.

use serde::Serialize;

use crate::flow::{FlowController, Refusal, Transition};
use crate::sanitize::{FieldIssue, FormData, SanitizeOptions, check_requirements, sanitize_form_data};

/// Result of submitting a phase form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// The phase was completed (or already was); `form` is the sanitized answers
    Accepted {
        transition: Transition,
        form: FormData,
    },
    /// Required fields are missing or malformed; state is unchanged
    Incomplete { issues: Vec<FieldIssue> },
    /// The phase cannot be completed right now; state is unchanged
    Refused(Refusal),
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Submit the form for `phase_id`.
pub fn submit_phase(
    flow: &mut FlowController,
    phase_id: &str,
    form: &FormData,
    options: &SanitizeOptions,
) -> SubmitOutcome {
    let Some(phase) = flow.catalog().get(phase_id) else {
        return SubmitOutcome::Refused(Refusal::UnknownPhase {
            phase: phase_id.to_string(),
        });
    };

    if let Err(refusal) = flow.check_available(phase_id) {
        return SubmitOutcome::Refused(refusal);
    }

    let issues = check_requirements(form, &phase.fields);
    if !issues.is_empty() {
        tracing::debug!(phase = phase_id, missing = issues.len(), "Phase form incomplete");
        return SubmitOutcome::Incomplete { issues };
    }

    let form = sanitize_form_data(form, options);
    let transition = flow.complete_phase(phase_id);

    SubmitOutcome::Accepted { transition, form }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::{Phase, PhaseCatalog};
    use crate::sanitize::{FieldRequirement, FormValue, ValidationError};
    use std::sync::Arc;

    fn flow() -> FlowController {
        let catalog = PhaseCatalog::new(vec![
            Phase::new("context", "Contexto")
                .with_fields(vec![FieldRequirement::required("empresa")]),
            Phase::new("empathize", "Empatizar")
                .with_fields(vec![FieldRequirement::selection("tecnicas", 2)]),
        ])
        .unwrap();
        FlowController::new(Arc::new(catalog))
    }

    #[test]
    fn test_submit_complete_form() {
        let mut flow = flow();
        let form = FormData::new().with("empresa", " <b>Acme</b> ");

        let outcome = submit_phase(&mut flow, "context", &form, &SanitizeOptions::default());

        match outcome {
            SubmitOutcome::Accepted { transition, form } => {
                assert_eq!(
                    transition,
                    Transition::Completed {
                        phase: "context".into(),
                        next: Some("empathize".into())
                    }
                );
                assert_eq!(form.get("empresa"), Some(&FormValue::Text("Acme".into())));
            }
            other => panic!("Expected Accepted, got {:?}", other),
        }
        assert_eq!(flow.state().active_phase.as_deref(), Some("empathize"));
    }

    #[test]
    fn test_submit_incomplete_form_leaves_state() {
        let mut flow = flow();

        let outcome = submit_phase(&mut flow, "context", &FormData::new(), &SanitizeOptions::default());

        assert_eq!(
            outcome,
            SubmitOutcome::Incomplete {
                issues: vec![FieldIssue {
                    key: "empresa".into(),
                    error: ValidationError::Required
                }]
            }
        );
        assert_eq!(flow.completed_count(), 0);
    }

    #[test]
    fn test_submit_locked_phase_is_refused() {
        let mut flow = flow();
        let form = FormData::new().with("tecnicas", vec!["a", "b"]);

        let outcome = submit_phase(&mut flow, "empathize", &form, &SanitizeOptions::default());

        assert!(matches!(outcome, SubmitOutcome::Refused(Refusal::Locked { .. })));
        assert_eq!(flow.completed_count(), 0);
    }

    #[test]
    fn test_submit_unknown_phase_is_refused() {
        let mut flow = flow();
        let outcome = submit_phase(&mut flow, "nope", &FormData::new(), &SanitizeOptions::default());
        assert!(matches!(outcome, SubmitOutcome::Refused(Refusal::UnknownPhase { .. })));
    }

    #[test]
    fn test_resubmitting_completed_phase_is_accepted_without_change() {
        let mut flow = flow();
        let form = FormData::new().with("empresa", "Acme");
        submit_phase(&mut flow, "context", &form, &SanitizeOptions::default());

        let outcome = submit_phase(&mut flow, "context", &form, &SanitizeOptions::default());

        match outcome {
            SubmitOutcome::Accepted { transition, .. } => {
                assert_eq!(transition, Transition::AlreadyCompleted { phase: "context".into() });
            }
            other => panic!("Expected Accepted, got {:?}", other),
        }
        assert_eq!(flow.completed_count(), 1);
    }
}
