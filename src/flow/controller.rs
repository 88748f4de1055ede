//! Ordered-phase state machine.
//!
//! A phase may be opened or completed only when it is the first phase or its
//! immediate predecessor is completed. Illegal requests leave the state
//! untouched and come back as [`Transition::Refused`].

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::state::{FlowState, PhaseStatus};
use crate::phase::{Phase, PhaseCatalog};

/// Why a transition was not applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Refusal {
    /// No phase with this id exists in the catalog
    UnknownPhase { phase: String },
    /// The predecessor has not been completed yet
    Locked { phase: String, waiting_on: String },
}

impl std::fmt::Display for Refusal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Refusal::UnknownPhase { phase } => write!(f, "unknown phase '{}'", phase),
            Refusal::Locked { phase, waiting_on } => {
                write!(f, "phase '{}' is locked until '{}' is completed", phase, waiting_on)
            }
        }
    }
}

/// Result of a transition request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transition {
    /// The phase is now active
    Selected { phase: String },
    /// The phase was newly completed; `next` is the phase auto-advanced to
    Completed { phase: String, next: Option<String> },
    /// The phase was already completed; nothing changed
    AlreadyCompleted { phase: String },
    /// Nothing changed
    Refused(Refusal),
}

impl Transition {
    /// Whether the state changed.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Selected { .. } | Self::Completed { .. })
    }

    pub fn refusal(&self) -> Option<&Refusal> {
        match self {
            Self::Refused(r) => Some(r),
            _ => None,
        }
    }
}

/// One row of the phase overview.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseOverview<'a> {
    /// 1-based position
    pub position: usize,
    pub phase: &'a Phase,
    pub status: PhaseStatus,
    pub active: bool,
}

/// Drives one session through a shared phase catalog.
#[derive(Debug, Clone)]
pub struct FlowController {
    catalog: Arc<PhaseCatalog>,
    state: FlowState,
}

impl FlowController {
    /// Start a new session at the overview with nothing completed.
    pub fn new(catalog: Arc<PhaseCatalog>) -> Self {
        Self {
            catalog,
            state: FlowState::new(),
        }
    }

    pub fn catalog(&self) -> &PhaseCatalog {
        &self.catalog
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn active_phase(&self) -> Option<&Phase> {
        self.state
            .active_phase
            .as_deref()
            .and_then(|id| self.catalog.get(id))
    }

    /// Check whether `id` may be opened or completed, with the reason if not.
    pub fn check_available(&self, id: &str) -> Result<(), Refusal> {
        if !self.catalog.contains(id) {
            return Err(Refusal::UnknownPhase {
                phase: id.to_string(),
            });
        }
        match self.catalog.predecessor(id) {
            Some(prev) if !self.state.is_completed(&prev.id) => Err(Refusal::Locked {
                phase: id.to_string(),
                waiting_on: prev.id.clone(),
            }),
            _ => Ok(()),
        }
    }

    /// True iff `id` is the first phase or its predecessor is completed.
    pub fn is_available(&self, id: &str) -> bool {
        self.check_available(id).is_ok()
    }

    pub fn status(&self, id: &str) -> PhaseStatus {
        if self.state.is_completed(id) {
            PhaseStatus::Completed
        } else if self.is_available(id) {
            PhaseStatus::Available
        } else {
            PhaseStatus::Locked
        }
    }

    /// Open a phase.
    pub fn select_phase(&mut self, id: &str) -> Transition {
        if let Err(refusal) = self.check_available(id) {
            tracing::debug!(phase = id, %refusal, "Refused phase selection");
            return Transition::Refused(refusal);
        }

        self.state.active_phase = Some(id.to_string());
        tracing::debug!(phase = id, "Selected phase");
        Transition::Selected {
            phase: id.to_string(),
        }
    }

    /// Mark a phase completed and advance to the next one.
    ///
    /// Completing an already-completed phase changes nothing. Completing the
    /// last phase leaves the active phase as it is.
    pub fn complete_phase(&mut self, id: &str) -> Transition {
        if let Err(refusal) = self.check_available(id) {
            tracing::debug!(phase = id, %refusal, "Refused phase completion");
            return Transition::Refused(refusal);
        }

        if self.state.is_completed(id) {
            return Transition::AlreadyCompleted {
                phase: id.to_string(),
            };
        }

        self.state.completed.insert(id.to_string());

        let next = self.catalog.successor(id).map(|p| p.id.clone());
        if let Some(next_id) = &next {
            self.state.active_phase = Some(next_id.clone());
        }

        tracing::debug!(
            phase = id,
            next = next.as_deref().unwrap_or("-"),
            completed = self.state.completed.len(),
            total = self.catalog.len(),
            "Completed phase"
        );

        Transition::Completed {
            phase: id.to_string(),
            next,
        }
    }

    /// Return to the overview. Completion is untouched.
    pub fn leave_phase(&mut self) {
        self.state.active_phase = None;
    }

    pub fn completed_count(&self) -> usize {
        self.state.completed.len()
    }

    /// Completed phases over catalog size, in `[0, 1]`.
    pub fn progress_ratio(&self) -> f64 {
        self.state.completed.len() as f64 / self.catalog.len() as f64
    }

    /// Progress as a whole percentage.
    pub fn progress_percent(&self) -> u8 {
        (self.progress_ratio() * 100.0).round() as u8
    }

    /// Every phase is completed.
    pub fn is_done(&self) -> bool {
        self.state.completed.len() == self.catalog.len()
    }

    /// Every phase in order with its status.
    pub fn overview(&self) -> Vec<PhaseOverview<'_>> {
        let active = self.state.active_phase.as_deref();
        self.catalog
            .phases()
            .iter()
            .enumerate()
            .map(|(i, phase)| PhaseOverview {
                position: i + 1,
                phase,
                status: self.status(&phase.id),
                active: active == Some(phase.id.as_str()),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> FlowController {
        let catalog = PhaseCatalog::new(vec![
            Phase::new("a", "A"),
            Phase::new("b", "B"),
            Phase::new("c", "C"),
        ])
        .unwrap();
        FlowController::new(Arc::new(catalog))
    }

    #[test]
    fn test_initial_availability() {
        let flow = controller();
        assert!(flow.is_available("a"));
        assert!(!flow.is_available("b"));
        assert!(!flow.is_available("c"));
        assert!(!flow.is_available("zzz"));
    }

    #[test]
    fn test_select_locked_phase_is_refused() {
        let mut flow = controller();
        let t = flow.select_phase("b");
        assert_eq!(
            t,
            Transition::Refused(Refusal::Locked {
                phase: "b".into(),
                waiting_on: "a".into()
            })
        );
        assert!(flow.state().active_phase.is_none());
    }

    #[test]
    fn test_select_unknown_phase_is_refused() {
        let mut flow = controller();
        let t = flow.select_phase("nope");
        assert!(matches!(t, Transition::Refused(Refusal::UnknownPhase { .. })));
        assert!(!t.is_applied());
    }

    #[test]
    fn test_select_first_phase() {
        let mut flow = controller();
        assert_eq!(
            flow.select_phase("a"),
            Transition::Selected { phase: "a".into() }
        );
        assert_eq!(flow.active_phase().unwrap().id, "a");
    }

    #[test]
    fn test_complete_advances_to_next() {
        let mut flow = controller();
        flow.select_phase("a");
        let t = flow.complete_phase("a");
        assert_eq!(
            t,
            Transition::Completed {
                phase: "a".into(),
                next: Some("b".into())
            }
        );
        assert_eq!(flow.state().active_phase.as_deref(), Some("b"));
        assert!(flow.is_available("b"));
        assert!(!flow.is_available("c"));
    }

    #[test]
    fn test_complete_out_of_order_is_refused() {
        let mut flow = controller();
        let t = flow.complete_phase("c");
        assert!(t.refusal().is_some());
        assert!(flow.state().completed.is_empty());
    }

    #[test]
    fn test_complete_is_idempotent() {
        let mut flow = controller();
        flow.complete_phase("a");
        let before = flow.state().clone();
        flow.leave_phase();
        flow.select_phase("a");

        let t = flow.complete_phase("a");

        assert_eq!(t, Transition::AlreadyCompleted { phase: "a".into() });
        assert_eq!(flow.state().completed, before.completed);
        // No re-advance: the active phase stays where the user put it
        assert_eq!(flow.state().active_phase.as_deref(), Some("a"));
    }

    #[test]
    fn test_complete_last_phase_keeps_active() {
        let mut flow = controller();
        flow.complete_phase("a");
        flow.complete_phase("b");
        assert_eq!(flow.state().active_phase.as_deref(), Some("c"));

        let t = flow.complete_phase("c");

        assert_eq!(
            t,
            Transition::Completed {
                phase: "c".into(),
                next: None
            }
        );
        assert_eq!(flow.state().active_phase.as_deref(), Some("c"));
        assert!(flow.is_done());
    }

    #[test]
    fn test_progress() {
        let mut flow = controller();
        assert_eq!(flow.progress_ratio(), 0.0);
        flow.complete_phase("a");
        assert_eq!(flow.progress_percent(), 33);
        flow.complete_phase("b");
        assert_eq!(flow.progress_percent(), 67);
        flow.complete_phase("c");
        assert_eq!(flow.progress_ratio(), 1.0);
        assert_eq!(flow.progress_percent(), 100);
    }

    #[test]
    fn test_leave_phase_returns_to_overview() {
        let mut flow = controller();
        flow.complete_phase("a");
        flow.leave_phase();
        assert!(flow.state().active_phase.is_none());
        assert_eq!(flow.completed_count(), 1);
    }

    #[test]
    fn test_overview_statuses() {
        let mut flow = controller();
        flow.complete_phase("a");

        let rows = flow.overview();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].position, 1);
        assert_eq!(rows[0].status, PhaseStatus::Completed);
        assert_eq!(rows[1].status, PhaseStatus::Available);
        assert!(rows[1].active);
        assert_eq!(rows[2].status, PhaseStatus::Locked);
    }

    #[test]
    fn test_sessions_sharing_a_catalog_are_independent() {
        let first = controller();
        let catalog = Arc::new(first.catalog().clone());
        let mut one = FlowController::new(Arc::clone(&catalog));
        let two = FlowController::new(catalog);

        one.complete_phase("a");

        assert_eq!(one.completed_count(), 1);
        assert_eq!(two.completed_count(), 0);
    }
}
