use rayon::prelude::*;
use tracing::info;

use crate::consts::MATCH_BATCH_SIZE;
use crate::error::Result;
use crate::frame::CalibrationKind;
use crate::matching::{match_session, CalibrationCache, MatchConfig};
use crate::recommend::recommendations;
use crate::scoring::classify_status;
use crate::session::{detect_sessions, Session};
use crate::store::{DateRange, FrameStore};

use super::runner::CancellationToken;
use super::types::{
    AggregationOutcome, AggregationResult, AggregationStage, Diagnostics, NoOpReporter,
    ProgressReporter, SessionReport,
};

/// Run one full aggregation pass with a thread-safe progress reporter.
///
/// Stages run sequentially: load frames (one store query each for
/// lights and calibration, regardless of catalog size), detect
/// sessions, build the calibration cache, then match/score/recommend
/// per session. Sessions are matched in parallel batches; cancellation
/// is checked between stages and between batches, and a cancelled run
/// returns without reporting partial results.
///
/// A store failure aborts the run with an error; the caller's previous
/// result set stays untouched.
pub fn run_aggregation_reported(
    store: &dyn FrameStore,
    range: Option<&DateRange>,
    config: &MatchConfig,
    reporter: &dyn ProgressReporter,
    cancel: &CancellationToken,
) -> Result<AggregationOutcome> {
    reporter.begin_stage(AggregationStage::LoadingFrames, None);
    let lights = store.light_frames(range)?;
    let calibration = store.calibration_frames(range)?;
    reporter.finish_stage();
    info!(
        lights = lights.len(),
        calibration = calibration.len(),
        "Loaded frame records"
    );
    if cancel.is_cancelled() {
        return Ok(AggregationOutcome::Cancelled);
    }

    reporter.begin_stage(AggregationStage::DetectingSessions, None);
    let detection = detect_sessions(&lights);
    reporter.finish_stage();
    info!(
        sessions = detection.sessions.len(),
        unassignable = detection.unassignable_lights,
        "Detected sessions"
    );
    if cancel.is_cancelled() {
        return Ok(AggregationOutcome::Cancelled);
    }

    reporter.begin_stage(AggregationStage::BuildingCache, None);
    let cache = CalibrationCache::build(&calibration);
    reporter.finish_stage();
    if cancel.is_cancelled() {
        return Ok(AggregationOutcome::Cancelled);
    }

    reporter.begin_stage(AggregationStage::Matching, Some(detection.sessions.len()));
    let mut reports: Vec<SessionReport> = Vec::with_capacity(detection.sessions.len());
    for batch in detection.sessions.chunks(MATCH_BATCH_SIZE) {
        if cancel.is_cancelled() {
            return Ok(AggregationOutcome::Cancelled);
        }
        let batch_reports: Vec<SessionReport> = batch
            .par_iter()
            .map(|session| assess_session(session, &cache, config))
            .collect();
        reports.extend(batch_reports);
        reporter.advance(reports.len());
    }
    reporter.finish_stage();
    info!(sessions = reports.len(), "Aggregation complete");

    Ok(AggregationOutcome::Completed(AggregationResult {
        sessions: reports,
        diagnostics: Diagnostics {
            unassignable_lights: detection.unassignable_lights,
            unusable_calibration: cache.unusable_count(),
        },
    }))
}

/// Match, classify, and phrase guidance for one session. Pure function
/// of the session and the run's immutable cache, safe to call from
/// parallel workers.
fn assess_session(
    session: &Session,
    cache: &CalibrationCache,
    config: &MatchConfig,
) -> SessionReport {
    let darks = match_session(session, CalibrationKind::Dark, cache, config);
    let bias = match_session(session, CalibrationKind::Bias, cache, config);
    let flats = match_session(session, CalibrationKind::Flat, cache, config);
    let status = classify_status(&darks, &bias, &flats, config);
    let recommendations = recommendations(session, &darks, &bias, &flats, status, config);
    SessionReport {
        session: session.clone(),
        darks,
        bias,
        flats,
        status,
        recommendations,
    }
}

/// Run one full aggregation pass without progress reporting.
pub fn run_aggregation(
    store: &dyn FrameStore,
    range: Option<&DateRange>,
    config: &MatchConfig,
    cancel: &CancellationToken,
) -> Result<AggregationOutcome> {
    run_aggregation_reported(store, range, config, &NoOpReporter, cancel)
}
