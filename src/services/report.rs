//! Rendering of aggregate results into annotated text.
//!
//! The output is plain text with `**bold**` markers and literal emoji; the
//! chat renderer and the dashboard front end each apply their own markup
//! translation on top, so nothing platform-specific may leak in here.

use crate::services::aggregator::AggregateResult;
use crate::services::event_store::EventKind;

/// Empty-state sentinel. The dashboard front end keys off this exact phrase
/// to render its no-data message, so the wording is part of the contract.
pub const NO_STATISTICS: &str = "No statistics available";

/// Icon and label for events tallied into the catch-all bucket.
const OTHER_ICON: &str = "📋";
const OTHER_LABEL: &str = "Other Actions";

/// A rendered statistics report for one guild.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Report {
    pub today: String,
    pub weekly: String,
}

/// Renders one window's counts: one line per non-zero bucket in stable kind
/// order, or the no-statistics sentinel when every bucket is zero.
///
/// Pure and total over the aggregate domain; the same counts always produce
/// byte-identical text.
#[must_use]
pub fn format_window(result: &AggregateResult) -> String {
    if result.is_empty() {
        return NO_STATISTICS.to_owned();
    }

    let mut lines = Vec::new();
    for kind in EventKind::ALL {
        let count = result.count(kind);
        if count > 0 {
            lines.push(format!("{} {}: **{}**", kind.icon(), kind.label(), count));
        }
    }
    if result.other() > 0 {
        lines.push(format!("{} {}: **{}**", OTHER_ICON, OTHER_LABEL, result.other()));
    }

    lines.join("\n")
}
