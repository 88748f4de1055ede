//! Terminal presentation helpers shared by the CLI commands.

pub mod icons;

use console::{Emoji, StyledObject, style};

use crate::flow::PhaseStatus;

/// Icon for a phase status.
pub fn status_icon(status: PhaseStatus) -> Emoji<'static, 'static> {
    match status {
        PhaseStatus::Completed => icons::CHECK,
        PhaseStatus::Available => icons::OPEN,
        PhaseStatus::Locked => icons::LOCK,
    }
}

/// Status label coloured by state.
pub fn styled_status(status: PhaseStatus) -> StyledObject<String> {
    let label = status.to_string();
    match status {
        PhaseStatus::Completed => style(label).green(),
        PhaseStatus::Available => style(label).cyan(),
        PhaseStatus::Locked => style(label).dim(),
    }
}

/// Fixed-width text progress bar, e.g. `[#####-----]`.
pub fn progress_bar(ratio: f64, width: usize) -> String {
    let filled = ((ratio.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}
