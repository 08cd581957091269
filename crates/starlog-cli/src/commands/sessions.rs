use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use starlog_core::aggregate::{
    spawn_aggregation, AggregationEvent, AggregationResult, AggregationStage, SessionReport,
};
use starlog_core::matching::MatchConfig;
use starlog_core::scoring::SessionStatus;
use starlog_core::store::{DateRange, InMemoryFrameStore};

use crate::catalog::{load_catalog, load_match_config};
use crate::summary;

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    All,
    Complete,
    Partial,
    Missing,
}

impl StatusArg {
    fn admits(self, status: SessionStatus) -> bool {
        match self {
            Self::All => true,
            Self::Complete => status.is_complete(),
            Self::Partial => status == SessionStatus::Partial,
            Self::Missing => status == SessionStatus::Missing,
        }
    }
}

#[derive(Args)]
pub struct SessionsArgs {
    /// Frame catalog file (TOML)
    pub catalog: PathBuf,

    /// Show only sessions with this status
    #[arg(long, value_enum, default_value = "all")]
    pub status: StatusArg,

    /// Show only sessions missing some calibration
    #[arg(long)]
    pub missing_only: bool,

    /// Earliest session date to include (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Latest session date to include (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Matching configuration file (TOML); defaults apply if omitted
    #[arg(long)]
    pub config: Option<PathBuf>,
}

fn date_range(args: &SessionsArgs) -> Option<DateRange> {
    if args.from.is_none() && args.to.is_none() {
        return None;
    }
    Some(DateRange {
        from: args.from.unwrap_or(NaiveDate::MIN),
        to: args.to.unwrap_or(NaiveDate::MAX),
    })
}

pub fn run(args: &SessionsArgs) -> Result<()> {
    let store = load_catalog(&args.catalog)?;
    let config = load_match_config(args.config.as_deref())?;
    info!(frames = store.len(), "Catalog loaded");

    let result = aggregate_with_progress(store, date_range(args), config)?;

    let shown: Vec<&SessionReport> = result
        .sessions
        .iter()
        .filter(|r| args.status.admits(r.status))
        .filter(|r| !args.missing_only || !r.status.is_complete())
        .collect();

    summary::print_session_table(&shown);
    if shown.len() < result.sessions.len() {
        println!("\n({} of {} sessions shown)", shown.len(), result.sessions.len());
    }
    summary::print_totals(&result);

    Ok(())
}

/// Run the aggregation on the background worker, driving a progress bar
/// from its event stream.
fn aggregate_with_progress(
    store: InMemoryFrameStore,
    range: Option<DateRange>,
    config: MatchConfig,
) -> Result<AggregationResult> {
    let (tx, rx) = std::sync::mpsc::channel();
    let handle = spawn_aggregation(Arc::new(store), range, config, tx);

    let mut bar: Option<ProgressBar> = None;
    let mut outcome: Option<AggregationResult> = None;

    for event in rx {
        match event {
            AggregationEvent::Progress {
                stage: AggregationStage::Matching,
                items_done,
                items_total,
            } => {
                if let (Some(done), Some(total)) = (items_done, items_total) {
                    let pb = bar.get_or_insert_with(|| {
                        let pb = ProgressBar::new(total as u64);
                        pb.set_style(
                            ProgressStyle::default_bar()
                                .template("{msg} [{bar:40}] {pos}/{len}")
                                .expect("static template")
                                .progress_chars("=> "),
                        );
                        pb.set_message("Matching sessions");
                        pb
                    });
                    pb.set_position(done as u64);
                }
            }
            AggregationEvent::Progress { .. } => {}
            AggregationEvent::Completed(result) => {
                outcome = Some(result);
            }
            AggregationEvent::Cancelled => bail!("Aggregation run was cancelled"),
            AggregationEvent::Failed { message } => bail!("Aggregation failed: {message}"),
        }
    }
    handle.join();

    if let Some(pb) = bar {
        pb.finish_and_clear();
    }
    outcome.ok_or_else(|| anyhow::anyhow!("Aggregation ended without a result"))
}
