//! Per-session progress state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Where a session currently stands in the workflow.
///
/// Created empty at session start and changed only through
/// [`FlowController`](super::FlowController) transitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowState {
    /// Phase currently open, `None` while on the overview
    pub active_phase: Option<String>,
    /// Phases completed so far
    pub completed: BTreeSet<String>,
}

impl FlowState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_completed(&self, id: &str) -> bool {
        self.completed.contains(id)
    }

    /// True before any phase has been opened or completed.
    pub fn is_not_started(&self) -> bool {
        self.active_phase.is_none() && self.completed.is_empty()
    }
}

/// Display status of a phase for the overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    Completed,
    Available,
    Locked,
}

impl PhaseStatus {
    /// Whether the phase may be opened.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Completed | Self::Available)
    }
}

impl std::fmt::Display for PhaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhaseStatus::Completed => write!(f, "Completada"),
            PhaseStatus::Available => write!(f, "Disponible"),
            PhaseStatus::Locked => write!(f, "Bloqueada"),
        }
    }
}
