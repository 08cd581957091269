use console::Style;

use starlog_core::aggregate::{AggregationResult, SessionReport};
use starlog_core::matching::CalibrationMatchResult;
use starlog_core::scoring::SessionStatus;

struct Styles {
    header: Style,
    label: Style,
    complete: Style,
    partial: Style,
    missing: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            complete: Style::new().green(),
            partial: Style::new().yellow(),
            missing: Style::new().red(),
        }
    }

    fn for_status(&self, status: SessionStatus) -> &Style {
        match status {
            SessionStatus::Complete | SessionStatus::CompleteWithMasters => &self.complete,
            SessionStatus::Partial => &self.partial,
            SessionStatus::Missing => &self.missing,
        }
    }
}

/// One line per session: identity, status, lights, and the three
/// calibration cells.
pub fn print_session_table(reports: &[&SessionReport]) {
    let s = Styles::new();

    println!();
    println!(
        "{:<44} {:<19} {:>7}  {:>12} {:>12} {:>12}",
        s.header.apply_to("Session"),
        s.header.apply_to("Status"),
        s.header.apply_to("Lights"),
        s.header.apply_to("Darks"),
        s.header.apply_to("Bias"),
        s.header.apply_to("Flats"),
    );
    println!("{}", "-".repeat(112));

    for report in reports {
        println!(
            "{:<44} {:<19} {:>7}  {:>12} {:>12} {:>12}",
            session_name(report),
            s.for_status(report.status).apply_to(report.status).to_string(),
            report.session.light_frame_count,
            calibration_cell(&report.darks),
            calibration_cell(&report.bias),
            calibration_cell(&report.flats),
        );
    }
}

/// Totals and diagnostics footer, over the unfiltered result.
pub fn print_totals(result: &AggregationResult) {
    let s = Styles::new();
    let counts = result.status_counts();

    println!();
    println!(
        "{} {}   {} {}   {} {}   {} {}",
        s.label.apply_to("Total:"),
        result.sessions.len(),
        s.label.apply_to("Complete:"),
        s.complete.apply_to(counts.complete),
        s.label.apply_to("Partial:"),
        s.partial.apply_to(counts.partial),
        s.label.apply_to("Missing:"),
        s.missing.apply_to(counts.missing),
    );

    let diag = result.diagnostics;
    if diag.unassignable_lights > 0 || diag.unusable_calibration > 0 {
        println!(
            "{} {} light frames without a session date, {} unusable calibration frames",
            s.label.apply_to("Data quality:"),
            diag.unassignable_lights,
            diag.unusable_calibration,
        );
    }
}

pub fn session_name(report: &SessionReport) -> String {
    let key = &report.session.key;
    let mut name = format!(
        "{} - {} - {}",
        key.date,
        key.object.as_deref().unwrap_or("(no object)"),
        key.filter.as_deref().unwrap_or("no filter"),
    );
    if let Some(instrument) = &key.instrument {
        name.push_str(&format!(" [{instrument}]"));
    }
    name
}

/// "20 (100%)", "8+M (40%)" with a master, or "none".
pub fn calibration_cell(result: &CalibrationMatchResult) -> String {
    if result.frame_count == 0 && !result.has_master {
        return "none".to_string();
    }
    let master = if result.has_master { "+M" } else { "" };
    format!(
        "{}{} ({}%)",
        result.frame_count,
        master,
        result.quality_score()
    )
}
