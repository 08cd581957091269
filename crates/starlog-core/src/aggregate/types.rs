use crate::frame::CalibrationKind;
use crate::matching::CalibrationMatchResult;
use crate::scoring::SessionStatus;
use crate::session::Session;

/// Aggregation phase, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AggregationStage {
    LoadingFrames,
    DetectingSessions,
    BuildingCache,
    Matching,
}

impl std::fmt::Display for AggregationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LoadingFrames => write!(f, "Loading frames"),
            Self::DetectingSessions => write!(f, "Detecting sessions"),
            Self::BuildingCache => write!(f, "Building calibration cache"),
            Self::Matching => write!(f, "Matching calibration"),
        }
    }
}

/// Thread-safe progress reporting for an aggregation run.
///
/// Implementors can drive progress bars, logging, or any other feedback.
/// All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A new stage has started. `total_items` is the number of work
    /// items in this stage (session count for matching), if known.
    fn begin_stage(&self, _stage: AggregationStage, _total_items: Option<usize>) {}

    /// Work items completed so far within the current stage.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// No-op reporter, used when `run_aggregation` delegates.
pub(super) struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}

/// Data-quality counts for one aggregation run. These are conditions,
/// not errors: the affected frames are excluded from the computation and
/// surfaced here.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// Light frames with no session date, excluded from grouping.
    pub unassignable_lights: u32,
    /// Calibration frames missing required attributes, excluded from
    /// matching.
    pub unusable_calibration: u32,
}

/// One session's full assessment: profile, per-type match results,
/// overall status, and capture guidance.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionReport {
    pub session: Session,
    pub darks: CalibrationMatchResult,
    pub bias: CalibrationMatchResult,
    pub flats: CalibrationMatchResult,
    pub status: SessionStatus,
    pub recommendations: Vec<String>,
}

impl SessionReport {
    pub fn result_for(&self, kind: CalibrationKind) -> &CalibrationMatchResult {
        match kind {
            CalibrationKind::Dark => &self.darks,
            CalibrationKind::Bias => &self.bias,
            CalibrationKind::Flat => &self.flats,
        }
    }
}

/// Session counts by status, for summary displays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub complete: usize,
    pub partial: usize,
    pub missing: usize,
}

/// Final result of one aggregation run, delivered atomically: the whole
/// session list or nothing.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregationResult {
    pub sessions: Vec<SessionReport>,
    pub diagnostics: Diagnostics,
}

impl AggregationResult {
    pub fn status_counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for report in &self.sessions {
            match report.status {
                SessionStatus::Missing => counts.missing += 1,
                SessionStatus::Partial => counts.partial += 1,
                SessionStatus::Complete | SessionStatus::CompleteWithMasters => {
                    counts.complete += 1
                }
            }
        }
        counts
    }
}

/// How an aggregation run ended. Cancellation is a normal outcome, not
/// an error: the run's partial state is discarded and never reported.
#[derive(Clone, Debug, PartialEq)]
pub enum AggregationOutcome {
    Completed(AggregationResult),
    Cancelled,
}

/// Events published by a background aggregation run.
#[derive(Clone, Debug)]
pub enum AggregationEvent {
    /// Progress update during any stage.
    Progress {
        stage: AggregationStage,
        items_done: Option<usize>,
        items_total: Option<usize>,
    },
    /// The run finished; the full result set, delivered at once.
    Completed(AggregationResult),
    /// The run was cancelled; no result follows.
    Cancelled,
    /// The frame store failed; the previous result set (if any) remains
    /// valid and displayable.
    Failed { message: String },
}
