use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use starlog_core::aggregate::{
    run_aggregation, AggregationOutcome, AggregationResult, CancellationToken, SessionReport,
};

use crate::catalog::{load_catalog, load_match_config};
use crate::summary::{calibration_cell, session_name};

#[derive(Args)]
pub struct ReportArgs {
    /// Frame catalog file (TOML)
    pub catalog: PathBuf,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Matching configuration file (TOML); defaults apply if omitted
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: &ReportArgs) -> Result<()> {
    let store = load_catalog(&args.catalog)?;
    let config = load_match_config(args.config.as_deref())?;

    let outcome = run_aggregation(&store, None, &config, &CancellationToken::new())?;
    let AggregationOutcome::Completed(result) = outcome else {
        bail!("Aggregation run was cancelled");
    };

    let report = render_report(&result);
    if let Some(ref path) = args.output {
        std::fs::write(path, &report)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        println!("Report saved to {}", path.display());
    } else {
        print!("{report}");
    }

    Ok(())
}

/// Flatten the result set into a plain-text report: run totals, then one
/// block per session with its per-type counts, scores, and guidance.
fn render_report(result: &AggregationResult) -> String {
    let counts = result.status_counts();
    let mut out = String::new();

    let _ = writeln!(out, "Calibration Session Report");
    let _ = writeln!(out, "==========================");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Sessions: {} ({} complete, {} partial, {} missing)",
        result.sessions.len(),
        counts.complete,
        counts.partial,
        counts.missing,
    );
    let _ = writeln!(
        out,
        "Unassignable light frames: {}",
        result.diagnostics.unassignable_lights
    );
    let _ = writeln!(
        out,
        "Unusable calibration frames: {}",
        result.diagnostics.unusable_calibration
    );

    for report in &result.sessions {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", session_name(report));
        let _ = writeln!(out, "  Status: {}", report.status);
        let _ = writeln!(out, "  Lights: {}", lights_line(report));
        let _ = writeln!(out, "  Darks:  {}", calibration_cell(&report.darks));
        let _ = writeln!(out, "  Bias:   {}", calibration_cell(&report.bias));
        let _ = writeln!(out, "  Flats:  {}", calibration_cell(&report.flats));
        if !report.recommendations.is_empty() {
            let _ = writeln!(out, "  Recommendations:");
            for line in &report.recommendations {
                let _ = writeln!(out, "    - {line}");
            }
        }
    }

    out
}

fn lights_line(report: &SessionReport) -> String {
    let session = &report.session;
    let mut line = format!("{} frames", session.light_frame_count);
    if let Some(exposure) = session.avg_exposure_secs {
        let _ = write!(line, ", ~{exposure:.1}s");
    }
    if let Some(temp) = session.avg_temp_c {
        let _ = write!(line, ", ~{temp:.1}°C");
    }
    let _ = write!(line, ", {}x{}", session.binning_x, session.binning_y);
    line
}
