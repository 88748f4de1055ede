//! Phase progression for a single session.
//!
//! - `state`: the per-session `FlowState` and derived `PhaseStatus`
//! - `controller`: `FlowController`, which applies transitions over a shared catalog

pub mod controller;
pub mod state;

pub use controller::{FlowController, PhaseOverview, Refusal, Transition};
pub use state::{FlowState, PhaseStatus};
