//! Plain-text views of the client state.

use std::fmt::Write as _;

use client_core::{Coordinate, Selection, TimelineProjection};
use shared::domain::{Alert, Process};

pub fn alert_line(alert: &Alert) -> String {
    format!("[{}] {}", alert.severity, alert.message)
}

/// Line printed whenever the visible alert changes.
pub fn alert_notice(alert: Option<&Alert>) -> String {
    match alert {
        Some(alert) => alert_line(alert),
        None => "(alert cleared)".to_string(),
    }
}

pub fn process_table(processes: &[Process], selection: Selection) -> String {
    if processes.is_empty() {
        return "(no processes)\n".to_string();
    }

    let name_width = processes
        .iter()
        .map(|p| p.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(4);

    let mut out = String::new();
    let _ = writeln!(out, "{:>4}  {:<name_width$}  {:>5}  Role", "ID", "Name", "Clock");
    for process in processes {
        let mut roles = Vec::new();
        if selection.source == Some(process.id) {
            roles.push("sender");
        }
        if selection.destination == Some(process.id) {
            roles.push("receiver");
        }
        let _ = writeln!(
            out,
            "{:>4}  {:<name_width$}  {:>5}  {}",
            process.id,
            process.name,
            process.logical_clock,
            roles.join(",")
        );
    }
    out
}

/// Draws one row per process id (highest on top) and one column per distinct
/// clock value, so the width follows the number of ticks rather than their
/// magnitude. `*` marks an event, `+` the crosshair.
pub fn clock_diagram(timeline: &TimelineProjection, crosshair: Option<Coordinate>) -> String {
    if timeline.is_empty() {
        return "(no events yet)\n".to_string();
    }

    let cell = timeline
        .x_ticks
        .iter()
        .map(|x| x.to_string().len())
        .max()
        .unwrap_or(1)
        .max(2)
        + 1;
    let label = timeline
        .y_ticks
        .iter()
        .map(|id| id.to_string().len())
        .max()
        .unwrap_or(1)
        + 2;

    let mut out = String::new();
    for &row in timeline.y_ticks.iter().rev() {
        let _ = write!(out, "{:>width$} |", format!("P{row}"), width = label);
        for &x in &timeline.x_ticks {
            let here = Coordinate::new(x, row);
            let mark = if crosshair == Some(here) {
                '+'
            } else if timeline.lookup(here).is_some() {
                '*'
            } else {
                '.'
            };
            let _ = write!(out, "{mark:>cell$}");
        }
        out.push('\n');
    }

    let rule = "-".repeat(timeline.x_ticks.len().saturating_mul(cell));
    let _ = writeln!(out, "{:>label$} +{rule}", "");
    let _ = write!(out, "{:>label$}  ", "");
    for x in &timeline.x_ticks {
        let _ = write!(out, "{x:>cell$}");
    }
    out.push('\n');
    out
}
